// Path: crates/consensus/src/certificate/mod.rs
//! Certificates: the block attestations signed by validators and verified by
//! partner chains.
//!
//! Validators sign the unsigned encoding of a certificate, tagged with
//! [`MESSAGE_TAG_CERTIFICATE`] and the chain ID of the certified chain.

use meridian_crypto::sha256;
use meridian_crypto::sign::bls::{
    create_aggregate_signature, sign_data, verify_data, verify_weighted_agg_sig, BlsKeyPair,
    SIGNATURE_LENGTH,
};
use meridian_types::app::{ActiveValidator, BlockHeader, Certificate, ChainId, MESSAGE_TAG_CERTIFICATE};
use meridian_types::codec::SchemaObject;
use meridian_types::error::InteropError;

/// The ID of a block: the hash of its full encoding.
pub fn block_id(header: &BlockHeader) -> Result<Vec<u8>, InteropError> {
    Ok(sha256(&header.encode()?).to_vec())
}

/// The unsigned certificate of the block `header`.
pub fn compute_certificate_from_block_header(
    header: &BlockHeader,
) -> Result<Certificate, InteropError> {
    Ok(Certificate {
        block_id: block_id(header)?,
        height: header.height,
        timestamp: header.timestamp,
        state_root: header.state_root.clone(),
        validators_hash: header.validators_hash.clone(),
        aggregation_bits: Vec::new(),
        signature: Vec::new(),
    })
}

/// Signs `certificate` on behalf of a validator of `chain_id`.
pub fn sign_certificate(
    key_pair: &BlsKeyPair,
    chain_id: &ChainId,
    certificate: &Certificate,
) -> Result<[u8; SIGNATURE_LENGTH], InteropError> {
    Ok(sign_data(
        MESSAGE_TAG_CERTIFICATE,
        chain_id.as_bytes(),
        &certificate.signing_bytes()?,
        key_pair,
    ))
}

/// Verifies one validator's signature on `certificate`.
pub fn verify_single_certificate_signature(
    public_key: &[u8],
    signature: &[u8],
    chain_id: &ChainId,
    certificate: &Certificate,
) -> Result<bool, InteropError> {
    Ok(verify_data(
        MESSAGE_TAG_CERTIFICATE,
        chain_id.as_bytes(),
        &certificate.signing_bytes()?,
        signature,
        public_key,
    )?)
}

/// Fills in the aggregation bits and aggregate signature of `certificate` from
/// the `(public key, signature)` pairs of some of `validators`.
pub fn aggregate_certificate_signatures(
    certificate: &Certificate,
    validators: &[ActiveValidator],
    signatures: &[(Vec<u8>, Vec<u8>)],
) -> Result<Certificate, InteropError> {
    let keys: Vec<Vec<u8>> = validators.iter().map(|v| v.bls_key.clone()).collect();
    let (aggregation_bits, signature) = create_aggregate_signature(&keys, signatures)?;
    Ok(Certificate {
        aggregation_bits,
        signature,
        ..certificate.clone()
    })
}

/// Verifies the aggregate signature of `certificate` against `validators`,
/// requiring the signers to carry at least `threshold` weight.
pub fn verify_aggregate_certificate_signature(
    validators: &[ActiveValidator],
    threshold: u64,
    chain_id: &ChainId,
    certificate: &Certificate,
) -> Result<bool, InteropError> {
    let keys: Vec<Vec<u8>> = validators.iter().map(|v| v.bls_key.clone()).collect();
    let weights: Vec<u64> = validators.iter().map(|v| v.bft_weight).collect();
    Ok(verify_weighted_agg_sig(
        &keys,
        &certificate.aggregation_bits,
        &certificate.signature,
        MESSAGE_TAG_CERTIFICATE,
        chain_id.as_bytes(),
        &certificate.signing_bytes()?,
        &weights,
        threshold,
    )?)
}

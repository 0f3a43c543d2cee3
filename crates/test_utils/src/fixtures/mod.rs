// Path: crates/test_utils/src/fixtures/mod.rs
//! Certified headers and proofs for cross-chain update tests.

use anyhow::Result;
use meridian_consensus::certificate::{
    aggregate_certificate_signatures, compute_certificate_from_block_header, sign_certificate,
};
use meridian_crypto::sign::bls::BlsKeyPair;
use meridian_state::tree::merkle::generate_right_witness;
use meridian_state::tree::sparse::{compute_root, SparseMerkleQuery};
use meridian_types::app::{
    ActiveValidator, BlockHeader, Certificate, ChainId, ChainValidators, LastCertificate,
};
use meridian_types::codec::SchemaObject;

/// A block header carrying only the fields certificates are built from.
pub fn fake_block_header(height: u32, timestamp: u32, state_root: Vec<u8>) -> BlockHeader {
    BlockHeader {
        version: 2,
        height,
        timestamp,
        previous_block_id: vec![0; 32],
        generator_address: vec![0; 20],
        state_root,
        validators_hash: vec![0; 32],
        ..BlockHeader::default()
    }
}

/// A last certificate at `height` and `timestamp` with zeroed roots.
pub fn last_certificate(height: u32, timestamp: u32) -> LastCertificate {
    LastCertificate {
        height,
        timestamp,
        state_root: vec![0; 32],
        validators_hash: vec![0; 32],
    }
}

/// The certificate signers of a test chain, sorted by public key, each with
/// weight one.
#[derive(Debug, Clone)]
pub struct ValidatorSet {
    keys: Vec<BlsKeyPair>,
    /// The signers as stored in a chain validators account.
    pub validators: Vec<ActiveValidator>,
    /// Weight a certificate needs.
    pub threshold: u64,
}

impl ValidatorSet {
    /// `count` validators derived from `seed`, with a two-thirds threshold.
    pub fn new(count: u8, seed: u8) -> Result<Self> {
        let mut keys = (0..count)
            .map(|i| BlsKeyPair::from_seed(&[seed, i]))
            .collect::<Result<Vec<_>, _>>()?;
        keys.sort_by_key(|k| k.public_key());
        let validators = keys
            .iter()
            .map(|k| ActiveValidator {
                bls_key: k.public_key().to_vec(),
                bft_weight: 1,
            })
            .collect();
        Ok(Self {
            keys,
            validators,
            threshold: u64::from(count) * 2 / 3 + 1,
        })
    }

    /// The chain validators account for this set.
    pub fn chain_validators(&self) -> ChainValidators {
        ChainValidators {
            active_validators: self.validators.clone(),
            certificate_threshold: self.threshold,
        }
    }

    /// Certifies `header` of `chain_id` with the signatures of the first
    /// `signers` validators.
    pub fn certify(
        &self,
        chain_id: &ChainId,
        header: &BlockHeader,
        signers: usize,
    ) -> Result<Certificate> {
        let unsigned = compute_certificate_from_block_header(header)?;
        let signatures = self
            .keys
            .iter()
            .take(signers)
            .map(|k| {
                let signature = sign_certificate(k, chain_id, &unsigned)?;
                Ok((k.public_key().to_vec(), signature.to_vec()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(aggregate_certificate_signatures(&unsigned, &self.validators, &signatures)?)
    }

    /// Encoded certificate of `header` signed by every validator.
    pub fn certify_encoded(&self, chain_id: &ChainId, header: &BlockHeader) -> Result<Vec<u8>> {
        Ok(self.certify(chain_id, header, self.keys.len())?.encode()?)
    }
}

/// Root of a sparse Merkle tree holding only `key` and `value`. The matching
/// proof has an empty bitmap and no siblings.
pub fn single_leaf_state_root(key: &[u8], value: &[u8]) -> Result<Vec<u8>> {
    let query = SparseMerkleQuery {
        key: key.to_vec(),
        value: value.to_vec(),
        bitmap: Vec::new(),
    };
    Ok(compute_root(&query, &[])?.to_vec())
}

/// Right witness completing the first `size` leaves of `leaves` to the full
/// tree.
pub fn right_witness(size: usize, leaves: &[Vec<u8>]) -> Result<Vec<Vec<u8>>> {
    Ok(generate_right_witness(size, leaves)?)
}

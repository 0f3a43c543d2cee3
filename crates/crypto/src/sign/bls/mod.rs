// Path: crates/crypto/src/sign/bls/mod.rs
//! BLS12-381 signatures using blst.
//!
//! Uses the minimal-public-key-size variant with proof-of-possession:
//! - Public keys in G1 (48 bytes compressed)
//! - Signatures in G2 (96 bytes compressed)
//! - Messages are tagged with a domain tag and a chain ID before signing

use crate::algorithms::hash::sha256;
use crate::error::CryptoError;
use blst::min_pk::{AggregateSignature, PublicKey, SecretKey, Signature};
use blst::BLST_ERROR;
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;

/// Domain separation tag of the proof-of-possession ciphersuite.
pub const BLS_DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";
/// Length of a compressed public key.
pub const PUBLIC_KEY_LENGTH: usize = 48;
/// Length of a compressed signature.
pub const SIGNATURE_LENGTH: usize = 96;

/// A BLS secret key and its public key.
#[derive(Clone)]
pub struct BlsKeyPair {
    secret_key: SecretKey,
    public_key: PublicKey,
}

impl fmt::Debug for BlsKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlsKeyPair")
            .field("public_key", &hex::encode(self.public_key()))
            .finish_non_exhaustive()
    }
}

impl BlsKeyPair {
    /// Generates a key pair from operating-system randomness.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut ikm = [0u8; 32];
        OsRng.fill_bytes(&mut ikm);
        Self::from_ikm(&ikm)
    }

    /// Derives a key pair deterministically from `seed`.
    pub fn from_seed(seed: &[u8]) -> Result<Self, CryptoError> {
        Self::from_ikm(&sha256(seed))
    }

    fn from_ikm(ikm: &[u8]) -> Result<Self, CryptoError> {
        let secret_key = SecretKey::key_gen(ikm, &[])
            .map_err(|e| CryptoError::InvalidKey(format!("key generation failed: {e:?}")))?;
        let public_key = secret_key.sk_to_pk();
        Ok(Self {
            secret_key,
            public_key,
        })
    }

    /// The compressed public key.
    pub fn public_key(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.public_key.to_bytes()
    }

    /// Signs `message` as is.
    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_LENGTH] {
        self.secret_key.sign(message, BLS_DST, &[]).to_bytes()
    }
}

/// Prefixes `message` with the domain `tag` and the `chain_id`.
pub fn tag_message(tag: &[u8], chain_id: &[u8], message: &[u8]) -> Vec<u8> {
    [tag, chain_id, message].concat()
}

/// Signs the tagged form of `message`.
pub fn sign_data(
    tag: &[u8],
    chain_id: &[u8],
    message: &[u8],
    key_pair: &BlsKeyPair,
) -> [u8; SIGNATURE_LENGTH] {
    key_pair.sign(&tag_message(tag, chain_id, message))
}

fn parse_public_key(bytes: &[u8]) -> Result<PublicKey, CryptoError> {
    PublicKey::key_validate(bytes)
        .map_err(|e| CryptoError::InvalidKey(format!("{}: {e:?}", hex::encode(bytes))))
}

fn parse_signature(bytes: &[u8]) -> Result<Signature, CryptoError> {
    Signature::from_bytes(bytes).map_err(|e| CryptoError::InvalidSignature(format!("{e:?}")))
}

/// Verifies a single signature over the tagged form of `message`.
pub fn verify_data(
    tag: &[u8],
    chain_id: &[u8],
    message: &[u8],
    signature: &[u8],
    public_key: &[u8],
) -> Result<bool, CryptoError> {
    let public_key = parse_public_key(public_key)?;
    let signature = parse_signature(signature)?;
    let tagged = tag_message(tag, chain_id, message);
    Ok(signature.verify(true, &tagged, BLS_DST, &[], &public_key, false) == BLST_ERROR::BLST_SUCCESS)
}

/// Whether bit `index` of a least-significant-bit-first bitmap is set.
pub fn aggregation_bit(aggregation_bits: &[u8], index: usize) -> bool {
    aggregation_bits
        .get(index / 8)
        .is_some_and(|byte| byte & (1 << (index % 8)) != 0)
}

fn check_bits_length(keys: usize, aggregation_bits: &[u8]) -> Result<(), CryptoError> {
    let expected = keys.div_ceil(8);
    if aggregation_bits.len() != expected {
        return Err(CryptoError::InvalidAggregationBits {
            expected,
            got: aggregation_bits.len(),
        });
    }
    Ok(())
}

/// Aggregates the signatures of `signatures` (public key, signature pairs) and
/// returns the bitmap over `keys_list` together with the aggregate signature.
pub fn create_aggregate_signature(
    keys_list: &[Vec<u8>],
    signatures: &[(Vec<u8>, Vec<u8>)],
) -> Result<(Vec<u8>, Vec<u8>), CryptoError> {
    let mut aggregation_bits = vec![0u8; keys_list.len().div_ceil(8)];
    let mut parsed = Vec::with_capacity(signatures.len());
    for (public_key, signature) in signatures {
        let index = keys_list
            .iter()
            .position(|key| key == public_key)
            .ok_or_else(|| {
                CryptoError::InvalidKey(format!("{} is not in the key list", hex::encode(public_key)))
            })?;
        if let Some(byte) = aggregation_bits.get_mut(index / 8) {
            *byte |= 1 << (index % 8);
        }
        parsed.push(parse_signature(signature)?);
    }
    let refs: Vec<&Signature> = parsed.iter().collect();
    let aggregate = AggregateSignature::aggregate(&refs, true)
        .map_err(|e| CryptoError::InvalidSignature(format!("aggregation failed: {e:?}")))?;
    Ok((aggregation_bits, aggregate.to_signature().to_bytes().to_vec()))
}

fn fast_aggregate_verify(
    public_keys: &[&[u8]],
    tagged_message: &[u8],
    signature: &[u8],
) -> Result<bool, CryptoError> {
    if public_keys.is_empty() {
        return Ok(false);
    }
    let keys = public_keys
        .iter()
        .map(|key| parse_public_key(key))
        .collect::<Result<Vec<_>, _>>()?;
    let refs: Vec<&PublicKey> = keys.iter().collect();
    let signature = parse_signature(signature)?;
    Ok(signature.fast_aggregate_verify(true, tagged_message, BLS_DST, &refs)
        == BLST_ERROR::BLST_SUCCESS)
}

/// Verifies an aggregate signature by the keys selected in `aggregation_bits`.
pub fn verify_aggregate_signature(
    keys_list: &[Vec<u8>],
    aggregation_bits: &[u8],
    signature: &[u8],
    tag: &[u8],
    chain_id: &[u8],
    message: &[u8],
) -> Result<bool, CryptoError> {
    check_bits_length(keys_list.len(), aggregation_bits)?;
    let selected: Vec<&[u8]> = keys_list
        .iter()
        .enumerate()
        .filter(|(i, _)| aggregation_bit(aggregation_bits, *i))
        .map(|(_, key)| key.as_slice())
        .collect();
    fast_aggregate_verify(&selected, &tag_message(tag, chain_id, message), signature)
}

/// Verifies an aggregate signature whose signers must together carry at least
/// `threshold` weight. The weight check happens before any pairing.
#[allow(clippy::too_many_arguments)]
pub fn verify_weighted_agg_sig(
    keys_list: &[Vec<u8>],
    aggregation_bits: &[u8],
    signature: &[u8],
    tag: &[u8],
    chain_id: &[u8],
    message: &[u8],
    weights: &[u64],
    threshold: u64,
) -> Result<bool, CryptoError> {
    if keys_list.len() != weights.len() {
        return Err(CryptoError::WeightMismatch {
            keys: keys_list.len(),
            weights: weights.len(),
        });
    }
    check_bits_length(keys_list.len(), aggregation_bits)?;

    let mut selected = Vec::new();
    let mut weight_sum: u128 = 0;
    for (i, (key, weight)) in keys_list.iter().zip(weights).enumerate() {
        if aggregation_bit(aggregation_bits, i) {
            selected.push(key.as_slice());
            weight_sum += u128::from(*weight);
        }
    }
    if weight_sum < u128::from(threshold) {
        tracing::debug!(
            target: "crypto",
            weight_sum = %weight_sum,
            threshold,
            "aggregate signature below threshold"
        );
        return Ok(false);
    }
    fast_aggregate_verify(&selected, &tag_message(tag, chain_id, message), signature)
}

#[cfg(test)]
mod tests;

// Path: crates/crypto/src/sign/bls/tests/mod.rs

use super::*;

const TAG: &[u8] = b"LSK_CE_";
const CHAIN_ID: &[u8] = &[0x04, 0x00, 0x00, 0x01];

fn validators(count: u8) -> Vec<BlsKeyPair> {
    (0..count)
        .map(|i| BlsKeyPair::from_seed(&[i; 8]).unwrap())
        .collect()
}

fn keys_of(pairs: &[BlsKeyPair]) -> Vec<Vec<u8>> {
    pairs.iter().map(|k| k.public_key().to_vec()).collect()
}

fn signatures_by(pairs: &[&BlsKeyPair], message: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
    pairs
        .iter()
        .map(|k| {
            (
                k.public_key().to_vec(),
                sign_data(TAG, CHAIN_ID, message, k).to_vec(),
            )
        })
        .collect()
}

#[test]
fn test_sign_verify_tagged() {
    let key = BlsKeyPair::from_seed(b"seed").unwrap();
    let signature = sign_data(TAG, CHAIN_ID, b"certificate", &key);
    assert!(verify_data(TAG, CHAIN_ID, b"certificate", &signature, &key.public_key()).unwrap());
    // A different chain ID changes the signed message.
    assert!(!verify_data(TAG, &[0, 0, 0, 1], b"certificate", &signature, &key.public_key()).unwrap());
}

#[test]
fn test_seeded_keys_are_deterministic() {
    let a = BlsKeyPair::from_seed(b"same").unwrap();
    let b = BlsKeyPair::from_seed(b"same").unwrap();
    assert_eq!(a.public_key(), b.public_key());
    assert_ne!(
        a.public_key(),
        BlsKeyPair::from_seed(b"other").unwrap().public_key()
    );
}

#[test]
fn test_aggregation_bits_are_lsb_first() {
    assert!(aggregation_bit(&[0b0000_0001], 0));
    assert!(!aggregation_bit(&[0b0000_0001], 7));
    assert!(aggregation_bit(&[0x00, 0b0000_0100], 10));
    assert!(!aggregation_bit(&[0xff], 8));
}

#[test]
fn test_weighted_aggregate_signature() {
    let set = validators(4);
    let keys = keys_of(&set);
    let message = b"unsigned certificate bytes";
    let signers = [&set[0], &set[2], &set[3]];
    let (bits, signature) =
        create_aggregate_signature(&keys, &signatures_by(&signers, message)).unwrap();
    assert_eq!(bits, vec![0b0000_1101]);

    let weights = [10, 20, 30, 40];
    // 10 + 30 + 40 = 80
    assert!(verify_weighted_agg_sig(
        &keys, &bits, &signature, TAG, CHAIN_ID, message, &weights, 80
    )
    .unwrap());
    assert!(!verify_weighted_agg_sig(
        &keys, &bits, &signature, TAG, CHAIN_ID, message, &weights, 81
    )
    .unwrap());
    assert!(!verify_weighted_agg_sig(
        &keys, &bits, &signature, TAG, CHAIN_ID, b"other message", &weights, 1
    )
    .unwrap());
    assert!(verify_aggregate_signature(&keys, &bits, &signature, TAG, CHAIN_ID, message).unwrap());
}

#[test]
fn test_wrong_bitmap_fails_verification() {
    let set = validators(3);
    let keys = keys_of(&set);
    let message = b"msg";
    let (_, signature) =
        create_aggregate_signature(&keys, &signatures_by(&[&set[0], &set[1]], message)).unwrap();
    // Claims signer 2 instead of signer 1.
    assert!(!verify_weighted_agg_sig(
        &keys,
        &[0b0000_0101],
        &signature,
        TAG,
        CHAIN_ID,
        message,
        &[1, 1, 1],
        2
    )
    .unwrap());
}

#[test]
fn test_structural_errors() {
    let set = validators(2);
    let keys = keys_of(&set);
    assert_eq!(
        verify_weighted_agg_sig(&keys, &[1], &[0u8; 96], TAG, CHAIN_ID, b"m", &[1], 1),
        Err(CryptoError::WeightMismatch {
            keys: 2,
            weights: 1
        })
    );
    assert_eq!(
        verify_weighted_agg_sig(&keys, &[1, 0], &[0u8; 96], TAG, CHAIN_ID, b"m", &[1, 1], 1),
        Err(CryptoError::InvalidAggregationBits {
            expected: 1,
            got: 2
        })
    );
    assert!(matches!(
        create_aggregate_signature(&keys, &[(vec![7u8; 48], vec![0u8; 96])]),
        Err(CryptoError::InvalidKey(_))
    ));
}

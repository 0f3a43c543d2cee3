// Path: crates/test_utils/src/randomness/mod.rs
//! Deterministic randomness for reproducible tests

use meridian_types::app::ChainId;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Deterministic random number generator for tests
pub struct TestRng {
    rng: StdRng,
}

impl TestRng {
    /// Create a new test RNG with the specified seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a test RNG with the default seed 12345
    pub fn with_default_seed() -> Self {
        Self::new(12345)
    }

    /// `len` random bytes
    pub fn bytes(&mut self, len: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; len];
        self.rng.fill_bytes(&mut bytes);
        bytes
    }

    /// A random 32-byte hash
    pub fn hash(&mut self) -> Vec<u8> {
        self.bytes(32)
    }

    /// A random sidechain ID of the network `network`. The chain part is never
    /// zero, so the result is never a mainchain ID.
    pub fn sidechain_id(&mut self, network: u8) -> ChainId {
        let chain = self.rng.gen_range(1u32..0x0100_0000).to_be_bytes();
        let [_, a, b, c] = chain;
        ChainId([network, a, b, c])
    }

    /// Generate a random value
    pub fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    /// Generate a random value
    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }
}

impl Default for TestRng {
    fn default() -> Self {
        Self::with_default_seed()
    }
}

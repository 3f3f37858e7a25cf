use rand_chacha::rand_core::{RngCore, SeedableRng};

use crate::pke::{HqcPke, PrivateKey, PublicKey};

/// Deterministic tiny RNG for repeatable tests
pub struct TestRng {
    rng: rand_chacha::ChaCha8Rng,
}
impl TestRng {
    pub fn new() -> Self {
        let rng = rand_chacha::ChaCha8Rng::seed_from_u64(0xdead_beef);
        Self { rng }
    }
    pub fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }
    pub fn gen_usize(&mut self, upper: usize) -> usize {
        (self.next_u32() as usize) % upper
    }
}

impl Default for TestRng {
    fn default() -> Self {
        Self::new()
    }
}

/// Key pair from a fixed ChaCha seed; every call returns the same keys.
pub fn test_keypair() -> (PublicKey, PrivateKey) {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(0x5eed);
    HqcPke::keygen(&mut rng).expect("keygen from a seeded rng")
}

//! HMAC-SHA512 deterministic random bit generator.
//!
//! Key and value are both 64 bytes. A freshly seeded generator starts from
//! `K = 0x00..`, `V = 0x01..` and absorbs the seed with [`HmacDrbg::reseed`].
//! Every call to [`HmacDrbg::generate`] ends with an empty reseed, so two
//! generators fed the same seed and the same sequence of requests produce the
//! same bytes.

use alloc::vec::Vec;

use hmac::{Hmac, Mac};
use rand_core::{CryptoRng, RngCore};
use sha2::Sha512;

use crate::param::DIGEST_BYTES;

type HmacSha512 = Hmac<Sha512>;

/// HMAC-DRBG instantiated with SHA-512.
#[derive(Clone)]
pub struct HmacDrbg {
    k: [u8; DIGEST_BYTES],
    v: [u8; DIGEST_BYTES],
}

impl core::fmt::Debug for HmacDrbg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HmacDrbg").finish_non_exhaustive()
    }
}

impl HmacDrbg {
    /// Instantiates the generator and absorbs `seed`.
    pub fn new(seed: &[u8]) -> Self {
        let mut drbg = Self {
            k: [0x00; DIGEST_BYTES],
            v: [0x01; DIGEST_BYTES],
        };
        drbg.reseed(seed);
        drbg
    }

    fn hmac(&self) -> HmacSha512 {
        HmacSha512::new_from_slice(&self.k).expect("HMAC accepts keys of any length")
    }

    fn step(&mut self, separator: u8, data: &[u8]) {
        let mut kmac = self.hmac();
        kmac.update(&self.v);
        kmac.update(&[separator]);
        kmac.update(data);
        self.k.copy_from_slice(&kmac.finalize().into_bytes());

        let mut vmac = self.hmac();
        vmac.update(&self.v);
        self.v.copy_from_slice(&vmac.finalize().into_bytes());
    }

    /// Mixes `data` into the state.
    ///
    /// # Algorithm
    /// 1. K = HMAC(K, V || 0x00 || data); V = HMAC(K, V)
    /// 2. if data is non-empty: K = HMAC(K, V || 0x01 || data); V = HMAC(K, V)
    pub fn reseed(&mut self, data: &[u8]) {
        self.step(0x00, data);
        if !data.is_empty() {
            self.step(0x01, data);
        }
    }

    /// Fills `out` with generator output, then reseeds with empty data.
    pub fn fill(&mut self, out: &mut [u8]) {
        for chunk in out.chunks_mut(DIGEST_BYTES) {
            let mut vmac = self.hmac();
            vmac.update(&self.v);
            self.v.copy_from_slice(&vmac.finalize().into_bytes());
            chunk.copy_from_slice(&self.v[..chunk.len()]);
        }
        self.reseed(&[]);
    }

    /// Returns `len` bytes of output.
    pub fn generate(&mut self, len: usize) -> Vec<u8> {
        let mut out = alloc::vec![0u8; len];
        self.fill(&mut out);
        out
    }
}

impl RngCore for HmacDrbg {
    fn next_u32(&mut self) -> u32 {
        rand_core::impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        rand_core::impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.fill(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill(dest);
        Ok(())
    }
}

impl CryptoRng for HmacDrbg {}

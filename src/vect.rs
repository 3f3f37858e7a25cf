//! Vectors of GF(2)[x]/(x^n - 1): sampling, arithmetic and serialization.
//!
//! A ring element is stored as `N_WORDS` little-endian `u64` limbs, bit `i`
//! of the vector being the coefficient of `x^i`. Bits at or above `HQC_N` in
//! the last limb are always zero.
//!
//! The serialized form is the big-endian integer of the vector over
//! `N_BYTES` bytes, so the first byte carries the highest coefficients.

use alloc::vec::Vec;

use rand_core::RngCore;
use tracing::trace;

use crate::{
    drbg::HmacDrbg,
    error::{Error, Result},
    param::{
        HQC_N, LAST_WORD_MASK, MAX_SAMPLING_ATTEMPTS, N1N2, N1N2_BYTES, N_BYTES,
        N_BYTES_EXCESS_BITS, N_WORDS,
    },
};

/// Element of GF(2)[x]/(x^n - 1), i.e. an `HQC_N`-bit vector.
#[derive(Clone, PartialEq, Eq)]
pub struct Vect {
    words: [u64; N_WORDS],
}

impl core::fmt::Debug for Vect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Vect")
            .field("weight", &self.weight())
            .finish_non_exhaustive()
    }
}

impl Default for Vect {
    fn default() -> Self {
        Self::zero()
    }
}

impl Vect {
    /// The zero polynomial.
    pub const fn zero() -> Self {
        Self {
            words: [0u64; N_WORDS],
        }
    }

    /// The polynomial `x^i`.
    ///
    /// # Panics
    /// If `i >= HQC_N`.
    pub fn monomial(i: usize) -> Self {
        let mut v = Self::zero();
        v.set_bit(i);
        v
    }

    /// Builds a vector with the listed positions set.
    ///
    /// # Panics
    /// If any position is `>= HQC_N`.
    pub fn from_support(support: &[u32]) -> Self {
        let mut v = Self::zero();
        for &pos in support {
            v.set_bit(pos as usize);
        }
        v
    }

    /// Uniformly random vector of `HQC_N` bits.
    pub fn random<R: RngCore + ?Sized>(rng: &mut R) -> Result<Self> {
        let mut bytes = [0u8; N_WORDS * 8];
        rng.try_fill_bytes(&mut bytes)?;
        let mut v = Self::zero();
        for (word, chunk) in v.words.iter_mut().zip(bytes.chunks_exact(8)) {
            let mut limb = [0u8; 8];
            limb.copy_from_slice(chunk);
            *word = u64::from_le_bytes(limb);
        }
        v.mask_tail();
        Ok(v)
    }

    /// Coefficient of `x^i`.
    #[inline]
    pub fn bit(&self, i: usize) -> bool {
        (self.words[i / 64] >> (i % 64)) & 1 == 1
    }

    #[inline]
    pub(crate) fn set_bit(&mut self, i: usize) {
        assert!(i < HQC_N, "bit position {i} outside the ring");
        self.words[i / 64] |= 1u64 << (i % 64);
    }

    #[inline]
    fn mask_tail(&mut self) {
        self.words[N_WORDS - 1] &= LAST_WORD_MASK;
    }

    /// Hamming weight.
    pub fn weight(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Positions of the set bits in increasing order.
    pub fn support(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            let mut rest = word;
            core::iter::from_fn(move || {
                if rest == 0 {
                    return None;
                }
                let tz = rest.trailing_zeros() as usize;
                rest &= rest - 1;
                Some(i * 64 + tz)
            })
        })
    }

    /// Ring addition, bitwise XOR.
    pub fn add(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.add_assign(other);
        out
    }

    pub(crate) fn add_assign(&mut self, other: &Self) {
        for (a, b) in self.words.iter_mut().zip(other.words.iter()) {
            *a ^= *b;
        }
    }

    /// Cyclic left rotation by `shift` positions, i.e. multiplication by `x^shift`.
    pub fn rotate_left(&self, shift: usize) -> Self {
        let mut out = Self::zero();
        out.xor_rotated(self, shift % HQC_N);
        out.mask_tail();
        out
    }

    /// XORs `src` rotated left by `shift` into `self`.
    ///
    /// `shift` must be below `HQC_N`. The low part `src << shift` may spill
    /// past bit `HQC_N - 1` of the last limb; callers clear that with
    /// [`Vect::mask_tail`] once they are done accumulating.
    fn xor_rotated(&mut self, src: &Self, shift: usize) {
        debug_assert!(shift < HQC_N);
        xor_shifted_left(&mut self.words, &src.words, shift);
        if shift != 0 {
            xor_shifted_right(&mut self.words, &src.words, HQC_N - shift);
        }
    }

    /// Cyclic convolution `b(x) * a(x) mod (x^n - 1)`.
    ///
    /// Runs one rotation of `b` per set bit of `a`, so `a` should be the
    /// sparse operand.
    ///
    /// # Algorithm
    /// 1. acc = 0
    /// 2. for each set bit i of a, from least to most significant: acc ^= rotl(b, i)
    pub fn convolve(b: &Self, a: &Self) -> Self {
        let mut acc = Self::zero();
        for i in a.support() {
            acc.xor_rotated(b, i);
        }
        acc.mask_tail();
        acc
    }

    /// Writes the low `out.len() * 8` bits as a big-endian integer.
    fn store_be(&self, out: &mut [u8]) {
        let len = out.len();
        for (w, word) in self.words.iter().enumerate() {
            for (k, byte) in word.to_le_bytes().into_iter().enumerate() {
                let idx = 8 * w + k;
                if idx < len {
                    out[len - 1 - idx] = byte;
                }
            }
        }
    }

    /// Reads a big-endian integer of at most `N_BYTES` bytes.
    fn load_be(bytes: &[u8]) -> Self {
        debug_assert!(bytes.len() <= N_BYTES);
        let len = bytes.len();
        let mut v = Self::zero();
        for (idx, &byte) in bytes.iter().rev().enumerate() {
            v.words[idx / 8] |= u64::from(byte) << (8 * (idx % 8));
        }
        debug_assert!(len < N_BYTES || bytes[0] >> (8 - N_BYTES_EXCESS_BITS) == 0);
        v
    }

    /// Serializes to `N_BYTES` big-endian bytes.
    pub fn to_bytes(&self) -> [u8; N_BYTES] {
        let mut out = [0u8; N_BYTES];
        self.store_be(&mut out);
        out
    }

    /// Parses `N_BYTES` big-endian bytes, rejecting bits at or above `HQC_N`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != N_BYTES {
            return Err(Error::InvalidLength {
                expected: N_BYTES,
                got: bytes.len(),
            });
        }
        if bytes[0] >> (8 - N_BYTES_EXCESS_BITS) != 0 {
            return Err(Error::NonCanonicalEncoding);
        }
        Ok(Self::load_be(bytes))
    }

    /// Embeds a concatenated codeword (big-endian, `N1N2_BYTES` long) in the
    /// low `N1N2` coefficients.
    pub(crate) fn from_codeword(codeword: &[u8]) -> Result<Self> {
        if codeword.len() != N1N2_BYTES {
            return Err(Error::InvalidLength {
                expected: N1N2_BYTES,
                got: codeword.len(),
            });
        }
        Ok(Self::load_be(codeword))
    }

    /// The low `N1N2` coefficients as a big-endian codeword, i.e. the vector
    /// reduced modulo `2^(n1 n2)`.
    pub(crate) fn truncated_codeword(&self) -> Vec<u8> {
        debug_assert_eq!(N1N2 % 8, 0);
        let mut out = alloc::vec![0u8; N1N2_BYTES];
        self.store_be(&mut out);
        out
    }
}

/// `acc ^= src << shift` over limb arrays, dropping bits past the last limb.
fn xor_shifted_left(acc: &mut [u64; N_WORDS], src: &[u64; N_WORDS], shift: usize) {
    let ws = shift / 64;
    let bs = shift % 64;
    for i in ws..N_WORDS {
        let mut w = src[i - ws] << bs;
        if bs != 0 && i > ws {
            w |= src[i - ws - 1] >> (64 - bs);
        }
        acc[i] ^= w;
    }
}

/// `acc ^= src >> shift` over limb arrays.
fn xor_shifted_right(acc: &mut [u64; N_WORDS], src: &[u64; N_WORDS], shift: usize) {
    let ws = shift / 64;
    let bs = shift % 64;
    for i in 0..N_WORDS.saturating_sub(ws) {
        let mut w = src[i + ws] >> bs;
        if bs != 0 && i + ws + 1 < N_WORDS {
            w |= src[i + ws + 1] << (64 - bs);
        }
        acc[i] ^= w;
    }
}

/// Draws `weight` distinct positions in `[0, n)` by rejection sampling.
///
/// # Algorithm
/// 1. bits = ceil(log2 n), bytes = ceil(bits / 8), discard = 8 * bytes - bits
/// 2. draw `bytes` bytes, read big-endian, shift right by `discard`
/// 3. reject values >= n and positions already taken, otherwise accept
/// 4. repeat until `weight` positions are accepted
///
/// Each draw is a separate `generate` call, so the order and size of the
/// requests are part of the output. Fails with [`Error::SamplingExhausted`]
/// once [`MAX_SAMPLING_ATTEMPTS`] draws are spent.
pub fn sample_support(n: usize, weight: usize, rng: &mut HmacDrbg) -> Result<Vec<u32>> {
    sample_support_bounded(n, weight, MAX_SAMPLING_ATTEMPTS, rng)
}

/// [`sample_support`] with an explicit draw budget.
pub(crate) fn sample_support_bounded(
    n: usize,
    weight: usize,
    max_attempts: usize,
    rng: &mut HmacDrbg,
) -> Result<Vec<u32>> {
    if n > u32::MAX as usize {
        return Err(Error::SamplingLengthTooLarge {
            n,
            max: u32::MAX as usize,
        });
    }
    if weight > n {
        return Err(Error::InvalidWeight { n, weight });
    }
    if weight == 0 {
        return Ok(Vec::new());
    }

    let bits_needed = (usize::BITS - (n - 1).leading_zeros()) as usize;
    let bytes_needed = bits_needed.div_ceil(8);
    let discard = bytes_needed * 8 - bits_needed;

    let mut taken = alloc::vec![false; n];
    let mut support = Vec::with_capacity(weight);
    let mut buf = [0u8; 8];
    let mut attempts = 0;
    while support.len() < weight {
        if attempts == max_attempts {
            return Err(Error::SamplingExhausted { weight, attempts });
        }
        attempts += 1;

        let draw = &mut buf[..bytes_needed];
        rng.fill(draw);
        let value = draw.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b)) >> discard;
        let pos = value as usize;
        if pos >= n || taken[pos] {
            continue;
        }
        taken[pos] = true;
        support.push(pos as u32);
    }
    trace!(n, weight, attempts, "sampled fixed-weight support");
    Ok(support)
}

/// Ring element of Hamming weight exactly `weight`.
pub fn sample_fixed_weight_vect(weight: usize, rng: &mut HmacDrbg) -> Result<Vect> {
    let support = sample_support(HQC_N, weight, rng)?;
    Ok(Vect::from_support(&support))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::DRBG_WARMUP_BYTES;
    use crate::test_util::TestRng;

    fn sparse(rng: &mut TestRng, weight: usize) -> Vect {
        let mut v = Vect::zero();
        while v.weight() < weight {
            v.set_bit(rng.gen_usize(HQC_N));
        }
        v
    }

    #[test]
    fn vect_add_properties() {
        let mut rng = TestRng::new();
        let a = sparse(&mut rng, 500);
        let b = sparse(&mut rng, 500);
        let c = sparse(&mut rng, 500);
        let zero = Vect::zero();

        assert_eq!(a.add(&zero), a, "a + 0 should equal a");
        assert_eq!(a.add(&b), b.add(&a), "a + b should equal b + a");
        assert_eq!(a.add(&a), zero, "a + a should equal 0");
        assert_eq!(a.add(&b).add(&c), a.add(&b.add(&c)));
    }

    #[test]
    fn monomials_multiply_by_adding_exponents() {
        for (i, j) in [(0, 0), (1, 2), (HQC_N - 1, 1), (40000, 30000), (63, 64)] {
            let prod = Vect::convolve(&Vect::monomial(i), &Vect::monomial(j));
            assert_eq!(prod, Vect::monomial((i + j) % HQC_N), "x^{i} * x^{j}");
        }
    }

    #[test]
    fn rotation_wraps_around() {
        let mut rng = TestRng::new();
        let a = sparse(&mut rng, 300);
        assert_eq!(a.rotate_left(0), a);
        assert_eq!(a.rotate_left(HQC_N), a);
        assert_eq!(a.rotate_left(HQC_N - 1).rotate_left(1), a);
        assert_eq!(a.rotate_left(12345).rotate_left(HQC_N - 12345), a);
        assert_eq!(a.rotate_left(777).weight(), a.weight());
        assert_eq!(Vect::monomial(HQC_N - 1).rotate_left(1), Vect::monomial(0));
    }

    #[test]
    fn vect_mul_properties() {
        let mut rng = TestRng::new();
        let a = sparse(&mut rng, 1000);
        let b = sparse(&mut rng, 40);
        let c = sparse(&mut rng, 40);
        let zero = Vect::zero();
        let one = Vect::monomial(0);

        assert_eq!(Vect::convolve(&a, &one), a, "a * 1 should equal a");
        assert_eq!(Vect::convolve(&a, &zero), zero, "a * 0 should equal 0");
        assert_eq!(Vect::convolve(&b, &c), Vect::convolve(&c, &b), "b * c should equal c * b");
        assert_eq!(
            Vect::convolve(&Vect::convolve(&a, &b), &c),
            Vect::convolve(&a, &Vect::convolve(&b, &c)),
            "(a * b) * c should equal a * (b * c)"
        );
        assert_eq!(
            Vect::convolve(&a, &b.add(&c)),
            Vect::convolve(&a, &b).add(&Vect::convolve(&a, &c)),
            "a * (b + c) should equal (a * b) + (a * c)"
        );
    }

    #[test]
    fn convolve_matches_rotation_sum() {
        let mut rng = TestRng::new();
        let b = sparse(&mut rng, 2000);
        let a = Vect::from_support(&[3, 64, 59000]);
        let expected = b.rotate_left(3).add(&b.rotate_left(64)).add(&b.rotate_left(59000));
        assert_eq!(Vect::convolve(&b, &a), expected);
    }

    #[test]
    fn bytes_are_big_endian() {
        let bytes = Vect::monomial(0).to_bytes();
        assert_eq!(bytes[N_BYTES - 1], 0x01);
        assert!(bytes[..N_BYTES - 1].iter().all(|&b| b == 0));

        let bytes = Vect::monomial(HQC_N - 1).to_bytes();
        // bit 59956 lives in byte 59956 / 8 = 7494 counted from the end
        assert_eq!(bytes[0], 1 << ((HQC_N - 1) % 8));
        assert!(bytes[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn bytes_roundtrip() {
        let mut rng = TestRng::new();
        let a = sparse(&mut rng, 5000);
        assert_eq!(Vect::from_bytes(&a.to_bytes()).unwrap(), a);
    }

    #[test]
    fn from_bytes_rejects_bad_input() {
        assert_eq!(
            Vect::from_bytes(&[0u8; N_BYTES - 1]),
            Err(Error::InvalidLength {
                expected: N_BYTES,
                got: N_BYTES - 1
            })
        );
        let mut bytes = [0u8; N_BYTES];
        bytes[0] = 0x20;
        assert_eq!(Vect::from_bytes(&bytes), Err(Error::NonCanonicalEncoding));
        bytes[0] = 0x1f;
        assert!(Vect::from_bytes(&bytes).is_ok());
    }

    #[test]
    fn codeword_truncation_drops_high_bits() {
        let mut codeword = alloc::vec![0u8; N1N2_BYTES];
        codeword[0] = 0x80;
        codeword[N1N2_BYTES - 1] = 0x01;
        let mut v = Vect::from_codeword(&codeword).unwrap();
        assert!(v.bit(N1N2 - 1));
        assert!(v.bit(0));
        v.set_bit(N1N2);
        v.set_bit(HQC_N - 1);
        assert_eq!(v.truncated_codeword(), codeword);
    }

    #[test]
    fn random_vect_respects_ring_length() {
        let mut drbg = HmacDrbg::new(b"random vect");
        let v = Vect::random(&mut drbg).unwrap();
        assert_eq!(v.words[N_WORDS - 1] & !LAST_WORD_MASK, 0);
        assert!(v.weight() > HQC_N / 3);
    }

    #[test]
    fn sample_fixed_weight_vect_weight() {
        let mut drbg = HmacDrbg::new(&[42u8; 32]);
        for weight in [0, 1, 133, 153] {
            let v = sample_fixed_weight_vect(weight, &mut drbg).unwrap();
            assert_eq!(v.weight(), weight);
        }
    }

    #[test]
    fn sample_support_small_lengths() {
        let mut drbg = HmacDrbg::new(b"small");
        for (n, weight) in [(1, 1), (2, 2), (10, 10), (255, 17), (256, 256), (1000, 999)] {
            let support = sample_support(n, weight, &mut drbg).unwrap();
            assert_eq!(support.len(), weight);
            let mut sorted = support.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), weight, "positions must be distinct");
            assert!(support.iter().all(|&p| (p as usize) < n));
        }
    }

    #[test]
    fn sample_support_deterministic() {
        let a = sample_support(HQC_N, 153, &mut HmacDrbg::new(b"theta")).unwrap();
        let b = sample_support(HQC_N, 153, &mut HmacDrbg::new(b"theta")).unwrap();
        let c = sample_support(HQC_N, 153, &mut HmacDrbg::new(b"other")).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn sample_support_known_prefix() {
        // Fresh DRBG, 256-byte warm-up, then two-byte draws (16 bits, no
        // discard) in request order.
        let mut drbg = HmacDrbg::new(b"fixed-weight sampler");
        drbg.generate(DRBG_WARMUP_BYTES);
        let support = sample_support(HQC_N, 153, &mut drbg).unwrap();
        assert_eq!(
            support[..8],
            [14915, 37722, 52630, 8109, 6975, 30471, 35277, 31988]
        );
    }

    #[test]
    fn sample_support_small_n_known_answer() {
        // n = 1000 needs 10 bits from a 2-byte draw, so 6 bits are discarded.
        let support = sample_support(1000, 5, &mut HmacDrbg::new(b"small")).unwrap();
        assert_eq!(support, [452, 255, 580, 724, 264]);
    }

    #[test]
    fn sample_support_rejects_overweight() {
        let mut drbg = HmacDrbg::new(b"w");
        assert_eq!(
            sample_support(5, 6, &mut drbg),
            Err(Error::InvalidWeight { n: 5, weight: 6 })
        );
    }

    #[test]
    fn sample_support_budget_exhausted() {
        // Full weight with 10 draws cannot succeed.
        let mut drbg = HmacDrbg::new(b"budget");
        assert_eq!(
            sample_support_bounded(1000, 1000, 10, &mut drbg),
            Err(Error::SamplingExhausted {
                weight: 1000,
                attempts: 10
            })
        );
    }

    #[test]
    fn sample_support_within_budget() {
        let mut a = HmacDrbg::new(b"budget");
        let mut b = HmacDrbg::new(b"budget");
        assert_eq!(
            sample_support_bounded(HQC_N, 20, 1000, &mut a).unwrap(),
            sample_support(HQC_N, 20, &mut b).unwrap()
        );
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn sample_support_rejects_oversized_length() {
        let n = u32::MAX as usize + 1;
        assert_eq!(
            sample_support(n, 1, &mut HmacDrbg::new(b"n")),
            Err(Error::SamplingLengthTooLarge {
                n,
                max: u32::MAX as usize
            })
        );
    }

    #[test]
    #[should_panic(expected = "outside the ring")]
    fn from_support_panics_outside_ring() {
        Vect::from_support(&[HQC_N as u32]);
    }
}

//! Fixed parameters of the scheme and the byte-array types derived from them.
//!
//! There is exactly one parameter set. Everything that depends on it is a
//! `const` here so the rest of the crate can size arrays at compile time.

use hybrid_array::{
    Array,
    typenum::{U16, U32, U46, U64, U78, Unsigned},
};

/// Length of the ambient ring GF(2)[x]/(x^n - 1), denoted `n`.
pub const HQC_N: usize = 59957;

/// Width in bytes of a serialized ring element: `floor(n / 8) + 1`.
pub const N_BYTES: usize = HQC_N / 8 + 1;

/// Number of `u64` limbs holding one ring element.
pub const N_WORDS: usize = HQC_N.div_ceil(64);

/// Mask selecting the valid bits of the last limb.
pub(crate) const LAST_WORD_MASK: u64 = (1u64 << (HQC_N % 64)) - 1;

/// Unused high bits in the top serialized byte; they must be zero.
pub(crate) const N_BYTES_EXCESS_BITS: usize = N_BYTES * 8 - HQC_N;

/// Weight of the secret vectors `x` and `y`, denoted `ω`.
pub const HQC_OMEGA: usize = 133;

/// Weight of the encryption error `e`, denoted `ω_e`.
pub const HQC_OMEGA_E: usize = 153;

/// Weight of the ephemeral vectors `r1` and `r2`, denoted `ω_r`.
pub const HQC_OMEGA_R: usize = 153;

/// Reed-Solomon block length in bytes, denoted `n1`.
pub const RS_N1: usize = 78;

/// Reed-Solomon dimension in bytes, denoted `k`.
pub const RS_K: usize = 32;

/// Reed-Solomon correction capacity in symbols, denoted `δ`.
pub const RS_DELTA: usize = 23;

/// Number of Reed-Solomon parity symbols, `2δ`.
pub const RS_PARITY: usize = 2 * RS_DELTA;

/// log2 of the Reed-Muller block length.
pub const RM_M: usize = 7;

/// Reed-Muller block length in bits, `2^m`.
pub const RM_N: usize = 1 << RM_M;

/// Reed-Muller block length in bytes.
pub const RM_BYTES: usize = RM_N / 8;

/// Number of times each Reed-Muller block is repeated.
pub const RM_MULTIPLICITY: usize = 6;

/// Bits produced per Reed-Solomon symbol after the inner encoding, denoted `n2`.
pub const N2: usize = RM_N * RM_MULTIPLICITY;

/// Length of the concatenated codeword in bits.
pub const N1N2: usize = RS_N1 * N2;

/// Length of the concatenated codeword in bytes.
pub const N1N2_BYTES: usize = N1N2 / 8;

/// Length of a KEM message in bytes.
pub const MSG_BYTES: usize = RS_K;

/// Length of the 512-bit digests (theta, shared secret, confirmation tag).
pub const DIGEST_BYTES: usize = 64;

/// Entropy drawn from the OS to seed the key generation DRBG.
pub const KEYGEN_ENTROPY_BYTES: usize = 256;

/// Output discarded from every freshly seeded DRBG before sampling starts.
pub const DRBG_WARMUP_BYTES: usize = 256;

/// Upper bound on draws a single fixed-weight sampling call may consume.
pub const MAX_SAMPLING_ATTEMPTS: usize = 1 << 20;

/// Serialized public key: `h || s`.
pub const PUBLIC_KEY_BYTES: usize = 2 * N_BYTES;

/// Serialized private key: `x || y`.
pub const PRIVATE_KEY_BYTES: usize = 2 * N_BYTES;

/// Serialized KEM ciphertext: `u || v || d`.
pub const CIPHERTEXT_BYTES: usize = 2 * N_BYTES + DIGEST_BYTES;

/// KEM message, one Reed-Solomon information word.
pub type Msg = Array<u8, U32>;

const _: () = assert!(<U32 as Unsigned>::USIZE == MSG_BYTES);

/// Reed-Solomon codeword, message followed by parity.
pub type RsCodeword = Array<u8, U78>;

/// Reed-Solomon syndromes `S_1..S_2δ`.
pub type Syndromes = Array<u8, U46>;

/// One undistributed Reed-Muller block, 128 bits packed MSB first.
pub type RmCodeword = Array<u8, U16>;

/// Encryption seed derived from the message.
pub type Theta = Array<u8, U64>;

/// 64-byte shared secret.
pub type SharedSecret = Array<u8, U64>;

/// Plaintext-confirmation tag carried in the ciphertext.
pub type ConfirmationTag = Array<u8, U64>;

//! Crate-wide error type.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Everything that can go wrong when generating keys, encrypting, decoding
/// or parsing serialized material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A serialized object or codeword has the wrong size.
    #[error("invalid length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Required length in bytes.
        expected: usize,
        /// Length actually supplied.
        got: usize,
    },

    /// Bits above the ring length are set in a serialized ring element.
    #[error("non-canonical encoding: bits set beyond the ring length")]
    NonCanonicalEncoding,

    /// A private key component does not have the required Hamming weight.
    #[error("invalid key weight: expected {expected}, got {got}")]
    InvalidKeyWeight {
        /// Required weight.
        expected: usize,
        /// Weight found.
        got: usize,
    },

    /// The sampler was asked for more set positions than the vector has.
    #[error("cannot sample weight {weight} in length {n}")]
    InvalidWeight {
        /// Vector length.
        n: usize,
        /// Requested weight.
        weight: usize,
    },

    /// The sampler was asked for positions it cannot represent as `u32`.
    #[error("sampling length {n} exceeds the maximum of {max}")]
    SamplingLengthTooLarge {
        /// Vector length.
        n: usize,
        /// Largest supported length.
        max: usize,
    },

    /// Rejection sampling ran out of its attempt budget.
    #[error("sampling weight {weight} exhausted after {attempts} attempts")]
    SamplingExhausted {
        /// Requested weight.
        weight: usize,
        /// Draws consumed before giving up.
        attempts: usize,
    },

    /// The symbol decoder saw more errors than it can correct.
    #[error("uncorrectable codeword")]
    Uncorrectable,

    /// Decapsulation re-encryption did not reproduce the ciphertext.
    #[error("re-encryption mismatch, ciphertext rejected")]
    ReencryptionMismatch,

    /// The engine has no public key loaded.
    #[error("no public key loaded")]
    MissingPublicKey,

    /// The engine has no private key loaded.
    #[error("no private key loaded")]
    MissingPrivateKey,

    /// The operating system entropy source failed.
    #[error("entropy source failure")]
    Entropy,
}

impl From<rand_core::Error> for Error {
    fn from(_: rand_core::Error) -> Self {
        Error::Entropy
    }
}

#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//!
//! # Security Warning
//!
//! This implementation has not been audited. Decoding in the inner codes is
//! not constant time, and the fixed parameter set has not been analysed
//! beyond the design it comes from.
//!
//! # Usage
//!
//! ```
//! use hqcrm::{Decapsulation, HqcEngine};
//!
//! let mut alice = HqcEngine::new();
//! alice.keygen().unwrap();
//!
//! let mut bob = HqcEngine::new();
//! bob.set_public_key(&alice.public_key_bytes().unwrap()).unwrap();
//! let (k_bob, ct) = bob.encapsulate().unwrap();
//!
//! let payload = ct.to_bytes();
//! let ct = hqcrm::kem::KemCiphertext::from_bytes(&payload).unwrap();
//! assert_eq!(alice.decapsulate(&ct).unwrap(), Decapsulation::Confirmed(k_bob));
//! ```

extern crate alloc;

#[cfg(test)]
extern crate std;

#[cfg(test)]
mod test_util;

/// Parameters and derived sizes
pub mod param;

/// Error type
mod error;

/// Hashing
mod hash;

/// HMAC-SHA512 DRBG
pub mod drbg;

/// Ring arithmetic and fixed-weight sampling
pub mod vect;

/// GF(256)
mod gf256;

/// Inner symbol code
pub mod rs;

/// Duplicated Reed-Muller code
pub mod rm;

/// Concatenated code
pub mod concat;

/// Public-key encryption
pub mod pke;

/// Key encapsulation
pub mod kem;

/// Key-holding engine
mod engine;

pub use engine::HqcEngine;
pub use error::{Error, Result};
pub use kem::{Decapsulation, HqcKem, KemCiphertext};
pub use pke::{HqcPke, PkeCiphertext, PrivateKey, PublicKey};

//! Key encapsulation on top of the PKE.
//!
//! Encapsulation picks a random message `m` and binds everything to it:
//! - theta = SHA3-512(m) seeds the (deterministic) encryption
//! - K = SHA3-512(m || u || v) is the shared secret
//! - d = SHA-512(m) travels with the ciphertext as a confirmation tag
//!
//! Decapsulation decrypts, re-encrypts and compares `(u, v, d)` with the
//! `subtle` crate, so every check runs regardless of the others' outcome.

use alloc::vec::Vec;

use rand_core::{CryptoRng, RngCore};
use subtle::{Choice, ConstantTimeEq};
use tracing::debug;

use crate::{
    error::{Error, Result},
    hash::{hash_confirmation, hash_shared_secret, hash_theta},
    param::{CIPHERTEXT_BYTES, ConfirmationTag, DIGEST_BYTES, N_BYTES},
    pke::{HqcPke, PkeCiphertext},
    vect::Vect,
};

pub use crate::param::{Msg, SharedSecret};
pub use crate::pke::{PrivateKey, PublicKey};

/// KEM ciphertext `(u, v, d)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KemCiphertext {
    pub(crate) c_pke: PkeCiphertext,
    pub(crate) d: ConfirmationTag,
}

impl KemCiphertext {
    /// Serializes as `u || v || d`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(CIPHERTEXT_BYTES);
        bytes.extend_from_slice(&self.c_pke.u.to_bytes());
        bytes.extend_from_slice(&self.c_pke.v.to_bytes());
        bytes.extend_from_slice(&self.d);
        bytes
    }

    /// Parses `u || v || d`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != CIPHERTEXT_BYTES {
            return Err(Error::InvalidLength {
                expected: CIPHERTEXT_BYTES,
                got: bytes.len(),
            });
        }
        let (u, rest) = bytes.split_at(N_BYTES);
        let (v, d_bytes) = rest.split_at(N_BYTES);
        debug_assert_eq!(d_bytes.len(), DIGEST_BYTES);
        let mut d = ConfirmationTag::default();
        d.copy_from_slice(d_bytes);
        Ok(Self {
            c_pke: PkeCiphertext {
                u: Vect::from_bytes(u)?,
                v: Vect::from_bytes(v)?,
            },
            d,
        })
    }
}

/// Outcome of decapsulation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decapsulation {
    /// Re-encryption reproduced the ciphertext; carries the shared secret.
    Confirmed(SharedSecret),
    /// The ciphertext was not produced by encapsulating to this key.
    Rejected,
}

impl Decapsulation {
    /// Whether the ciphertext was accepted.
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Decapsulation::Confirmed(_))
    }

    /// The shared secret, or [`Error::ReencryptionMismatch`].
    pub fn into_result(self) -> Result<SharedSecret> {
        match self {
            Decapsulation::Confirmed(k) => Ok(k),
            Decapsulation::Rejected => Err(Error::ReencryptionMismatch),
        }
    }
}

/// Key encapsulation mechanism.
pub struct HqcKem;

impl HqcKem {
    /// Generates a key pair, seeding the key generation DRBG from `rng`.
    pub fn keygen<R: RngCore + CryptoRng>(rng: &mut R) -> Result<(PublicKey, PrivateKey)> {
        let keys = HqcPke::keygen(rng)?;
        debug!("generated key pair");
        Ok(keys)
    }

    /// Encapsulates a fresh shared secret to `pk`.
    pub fn encapsulate<R: RngCore + CryptoRng>(
        pk: &PublicKey,
        rng: &mut R,
    ) -> Result<(SharedSecret, KemCiphertext)> {
        let mut m = Msg::default();
        rng.try_fill_bytes(&mut m)?;
        Self::encapsulate_deterministic(pk, &m)
    }

    /// Encapsulation with a caller-chosen message.
    ///
    /// # Algorithm
    /// 1. theta = SHA3-512(m)
    /// 2. (u, v) = PKE.Encrypt(pk, m, theta)
    /// 3. K = SHA3-512(m || u || v)
    /// 4. d = SHA-512(m)
    pub fn encapsulate_deterministic(
        pk: &PublicKey,
        m: &Msg,
    ) -> Result<(SharedSecret, KemCiphertext)> {
        let theta = hash_theta(m);
        let c_pke = HqcPke::encrypt(pk, m, &theta)?;
        let k = hash_shared_secret(m, &c_pke.u.to_bytes(), &c_pke.v.to_bytes());
        let d = hash_confirmation(m);
        debug!("encapsulated shared secret");
        Ok((k, KemCiphertext { c_pke, d }))
    }

    /// Recovers the shared secret from `ct`.
    ///
    /// # Algorithm
    /// 1. m' = PKE.Decrypt(sk, (u, v)); an undecodable ciphertext continues
    ///    with m' = 0 and is rejected at the end
    /// 2. (u', v') = PKE.Encrypt(pk, m', SHA3-512(m')), d' = SHA-512(m')
    /// 3. accept iff decoding succeeded and (u', v', d') == (u, v, d),
    ///    compared in constant time
    /// 4. K = SHA3-512(m' || u || v)
    ///
    /// Errors are reserved for internal failures such as sampler exhaustion;
    /// a bad ciphertext yields [`Decapsulation::Rejected`].
    pub fn decapsulate(
        pk: &PublicKey,
        sk: &PrivateKey,
        ct: &KemCiphertext,
    ) -> Result<Decapsulation> {
        let (m_prime, decoded) = match HqcPke::decrypt(sk, &ct.c_pke) {
            Ok(m) => (m, Choice::from(1)),
            Err(Error::Uncorrectable) => (Msg::default(), Choice::from(0)),
            Err(e) => return Err(e),
        };

        let theta_prime = hash_theta(&m_prime);
        let c_prime = HqcPke::encrypt(pk, &m_prime, &theta_prime)?;
        let d_prime = hash_confirmation(&m_prime);

        let u_bytes = ct.c_pke.u.to_bytes();
        let v_bytes = ct.c_pke.v.to_bytes();
        let u_eq = u_bytes.as_slice().ct_eq(c_prime.u.to_bytes().as_slice());
        let v_eq = v_bytes.as_slice().ct_eq(c_prime.v.to_bytes().as_slice());
        let d_eq = ct.d.as_slice().ct_eq(d_prime.as_slice());
        let valid = decoded & u_eq & v_eq & d_eq;

        let k = hash_shared_secret(&m_prime, &u_bytes, &v_bytes);
        if bool::from(valid) {
            debug!("decapsulation confirmed");
            Ok(Decapsulation::Confirmed(k))
        } else {
            debug!("decapsulation rejected");
            Ok(Decapsulation::Rejected)
        }
    }
}

//! Public-key encryption core.
//!
//! - Keygen: `s = x + h·y` with `h` uniform and `x`, `y` of weight ω
//! - Encrypt: `u = r1 + h·r2`, `v = C(m) + s·r2 + e`, all randomness drawn
//!   from a DRBG seeded with theta
//! - Decrypt: `C^-1((v + u·y) mod 2^(n1 n2))`
//!
//! Decryption works because `v + u·y = C(m) + x·r2 + r1·y + e`, a low-weight
//! error the concatenated code absorbs.

use alloc::vec::Vec;

use rand_core::{CryptoRng, RngCore};

use crate::{
    concat::Concat,
    drbg::HmacDrbg,
    error::{Error, Result},
    hash::hash_fingerprint,
    param::{
        DRBG_WARMUP_BYTES, HQC_OMEGA, HQC_OMEGA_E, HQC_OMEGA_R, KEYGEN_ENTROPY_BYTES, Msg,
        N_BYTES, PRIVATE_KEY_BYTES, PUBLIC_KEY_BYTES, Theta,
    },
    vect::{Vect, sample_fixed_weight_vect},
};

/// Public key `(h, s)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    pub(crate) h: Vect,
    pub(crate) s: Vect,
}

impl PublicKey {
    /// Serializes as `h || s`, each `N_BYTES` big-endian.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(PUBLIC_KEY_BYTES);
        bytes.extend_from_slice(&self.h.to_bytes());
        bytes.extend_from_slice(&self.s.to_bytes());
        bytes
    }

    /// Parses `h || s`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PUBLIC_KEY_BYTES {
            return Err(Error::InvalidLength {
                expected: PUBLIC_KEY_BYTES,
                got: bytes.len(),
            });
        }
        let (h, s) = bytes.split_at(N_BYTES);
        Ok(Self {
            h: Vect::from_bytes(h)?,
            s: Vect::from_bytes(s)?,
        })
    }

    /// SHA-256 of the serialized key, for out-of-band comparison.
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&hash_fingerprint(&self.to_bytes()));
        out
    }
}

/// Private key `(x, y)`, both of weight ω.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    pub(crate) x: Vect,
    pub(crate) y: Vect,
}

impl core::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PrivateKey").finish_non_exhaustive()
    }
}

impl PrivateKey {
    /// Serializes as `x || y`, each `N_BYTES` big-endian.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(PRIVATE_KEY_BYTES);
        bytes.extend_from_slice(&self.x.to_bytes());
        bytes.extend_from_slice(&self.y.to_bytes());
        bytes
    }

    /// Parses `x || y` and checks both have weight ω.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PRIVATE_KEY_BYTES {
            return Err(Error::InvalidLength {
                expected: PRIVATE_KEY_BYTES,
                got: bytes.len(),
            });
        }
        let (x, y) = bytes.split_at(N_BYTES);
        let x = Vect::from_bytes(x)?;
        let y = Vect::from_bytes(y)?;
        for v in [&x, &y] {
            let weight = v.weight();
            if weight != HQC_OMEGA {
                return Err(Error::InvalidKeyWeight {
                    expected: HQC_OMEGA,
                    got: weight,
                });
            }
        }
        Ok(Self { x, y })
    }
}

/// PKE ciphertext `(u, v)`, both full ring elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PkeCiphertext {
    pub(crate) u: Vect,
    pub(crate) v: Vect,
}

impl PkeCiphertext {
    /// Serialized `(u, v)`, each `N_BYTES` big-endian.
    pub fn to_bytes(&self) -> ([u8; N_BYTES], [u8; N_BYTES]) {
        (self.u.to_bytes(), self.v.to_bytes())
    }

    /// Parses serialized `u` and `v`.
    pub fn from_bytes(u: &[u8], v: &[u8]) -> Result<Self> {
        Ok(Self {
            u: Vect::from_bytes(u)?,
            v: Vect::from_bytes(v)?,
        })
    }
}

/// Public-key encryption over the concatenated code.
pub struct HqcPke;

impl HqcPke {
    /// Generates a key pair from `rng`.
    ///
    /// # Algorithm
    /// 1. seed a DRBG with 256 bytes from `rng`, discard its first 256 bytes
    /// 2. h = uniform vector, then x, y of weight ω, all from the DRBG
    /// 3. s = x + h·y
    pub fn keygen<R: RngCore + CryptoRng>(rng: &mut R) -> Result<(PublicKey, PrivateKey)> {
        let mut entropy = [0u8; KEYGEN_ENTROPY_BYTES];
        rng.try_fill_bytes(&mut entropy)?;
        let mut drbg = HmacDrbg::new(&entropy);
        drbg.generate(DRBG_WARMUP_BYTES);

        let h = Vect::random(&mut drbg)?;
        let x = sample_fixed_weight_vect(HQC_OMEGA, &mut drbg)?;
        let y = sample_fixed_weight_vect(HQC_OMEGA, &mut drbg)?;

        let s = x.add(&Vect::convolve(&h, &y));
        Ok((PublicKey { h, s }, PrivateKey { x, y }))
    }

    /// Deterministic encryption of `m` under `pk` with randomness `theta`.
    ///
    /// # Algorithm
    /// 1. seed a DRBG with theta, discard its first 256 bytes
    /// 2. sample e (weight ω_e), then r1 and r2 (weight ω_r), in that order
    /// 3. u = r1 + h·r2
    /// 4. v = C(m) + s·r2 + e
    pub fn encrypt(pk: &PublicKey, m: &Msg, theta: &Theta) -> Result<PkeCiphertext> {
        let mut drbg = HmacDrbg::new(theta);
        drbg.generate(DRBG_WARMUP_BYTES);
        let e = sample_fixed_weight_vect(HQC_OMEGA_E, &mut drbg)?;
        let r1 = sample_fixed_weight_vect(HQC_OMEGA_R, &mut drbg)?;
        let r2 = sample_fixed_weight_vect(HQC_OMEGA_R, &mut drbg)?;

        let u = r1.add(&Vect::convolve(&pk.h, &r2));

        let mut v = Vect::from_codeword(&Concat::encode(m))?;
        v.add_assign(&Vect::convolve(&pk.s, &r2));
        v.add_assign(&e);

        Ok(PkeCiphertext { u, v })
    }

    /// Recovers the message, or fails if the noise exceeds the code's capacity.
    pub fn decrypt(sk: &PrivateKey, ct: &PkeCiphertext) -> Result<Msg> {
        let noisy = ct.v.add(&Vect::convolve(&ct.u, &sk.y));
        Concat::decode(&noisy.truncated_codeword())
    }
}

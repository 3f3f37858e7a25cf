//! Hash functions binding messages, ciphertexts and keys.
//!
//! - `hash_theta`: SHA3-512(m), the seed for deterministic encryption
//! - `hash_shared_secret`: SHA3-512(m || u || v)
//! - `hash_confirmation`: SHA-512(m), the tag carried in the ciphertext
//! - `hash_fingerprint`: SHA-256 of a public key blob

use hybrid_array::{Array, typenum::U32};
use sha2::{Sha256, Sha512};
use sha3::Sha3_512;
use sha3::digest::Digest;

use crate::param::{ConfirmationTag, SharedSecret, Theta};

/// Seed for the encryption DRBG.
pub fn hash_theta(m: &[u8]) -> Theta {
    let out = Sha3_512::digest(m);
    let mut theta = Theta::default();
    theta.copy_from_slice(&out);
    theta
}

/// Shared secret `K`.
pub fn hash_shared_secret(m: &[u8], u: &[u8], v: &[u8]) -> SharedSecret {
    let mut hasher = Sha3_512::new();
    hasher.update(m);
    hasher.update(u);
    hasher.update(v);
    let out = hasher.finalize();
    let mut k = SharedSecret::default();
    k.copy_from_slice(&out);
    k
}

/// Plaintext confirmation tag `d`.
pub fn hash_confirmation(m: &[u8]) -> ConfirmationTag {
    let out = Sha512::digest(m);
    let mut d = ConfirmationTag::default();
    d.copy_from_slice(&out);
    d
}

/// Public key fingerprint.
pub fn hash_fingerprint(public_key: &[u8]) -> Array<u8, U32> {
    let out = Sha256::digest(public_key);
    let mut a = Array::<u8, U32>::default();
    a.copy_from_slice(&out);
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theta_is_sha3_512() {
        let expected = hex::decode(
            "b751850b1a57168a5693cd924b6b096e08f621827444f70d884f5d0240d2712e\
             10e116e9192af3c91a7ec57647e3934057340b4cf408d5a56592f8274eec53f0",
        )
        .unwrap();
        assert_eq!(hash_theta(b"abc").as_slice(), expected.as_slice());
    }

    #[test]
    fn confirmation_is_sha_512() {
        let expected = hex::decode(
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
             2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f",
        )
        .unwrap();
        assert_eq!(hash_confirmation(b"abc").as_slice(), expected.as_slice());
    }

    #[test]
    fn fingerprint_is_sha_256() {
        let expected =
            hex::decode("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
                .unwrap();
        assert_eq!(hash_fingerprint(b"abc").as_slice(), expected.as_slice());
    }

    #[test]
    fn shared_secret_hashes_concatenation() {
        assert_eq!(
            hash_shared_secret(b"a", b"bc", b""),
            hash_theta(b"abc"),
            "K is SHA3-512 over m || u || v"
        );
        assert_ne!(hash_theta(b"abc"), hash_confirmation(b"abc"));
    }
}

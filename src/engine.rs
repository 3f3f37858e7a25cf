//! Stateful holder for a key pair.
//!
//! The engine starts empty and becomes usable once keys are generated or
//! loaded. All cryptography happens in [`HqcPke`] and [`HqcKem`]; the
//! engine only supplies the stored keys and the OS entropy source.

use alloc::vec::Vec;

use rand_core::{CryptoRng, OsRng, RngCore};
use tracing::instrument;

use crate::{
    error::{Error, Result},
    kem::{Decapsulation, HqcKem, KemCiphertext},
    param::{Msg, SharedSecret, Theta},
    pke::{HqcPke, PkeCiphertext, PrivateKey, PublicKey},
};

/// Key holder exposing the PKE and KEM operations.
#[derive(Clone, Debug, Default)]
pub struct HqcEngine {
    public: Option<PublicKey>,
    private: Option<PrivateKey>,
}

impl HqcEngine {
    /// An engine with no keys.
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine holding an existing key pair.
    pub fn with_keys(public: PublicKey, private: PrivateKey) -> Self {
        Self {
            public: Some(public),
            private: Some(private),
        }
    }

    /// Both halves of a key pair are loaded.
    pub fn is_keyed(&self) -> bool {
        self.public.is_some() && self.private.is_some()
    }

    /// Generates a fresh key pair from OS entropy, replacing any stored keys.
    pub fn keygen(&mut self) -> Result<()> {
        self.keygen_with_rng(&mut OsRng)
    }

    /// Generates a fresh key pair from `rng`, replacing any stored keys.
    #[instrument(level = "debug", skip_all)]
    pub fn keygen_with_rng<R: RngCore + CryptoRng>(&mut self, rng: &mut R) -> Result<()> {
        let (public, private) = HqcKem::keygen(rng)?;
        self.public = Some(public);
        self.private = Some(private);
        Ok(())
    }

    /// The stored public key.
    pub fn public_key(&self) -> Result<&PublicKey> {
        self.public.as_ref().ok_or(Error::MissingPublicKey)
    }

    /// The stored private key.
    pub fn private_key(&self) -> Result<&PrivateKey> {
        self.private.as_ref().ok_or(Error::MissingPrivateKey)
    }

    /// Serialized public key `h || s`.
    pub fn public_key_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.public_key()?.to_bytes())
    }

    /// Serialized private key `x || y`.
    pub fn private_key_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.private_key()?.to_bytes())
    }

    /// Loads a serialized public key. The stored key is kept on error.
    pub fn set_public_key(&mut self, bytes: &[u8]) -> Result<()> {
        self.public = Some(PublicKey::from_bytes(bytes)?);
        Ok(())
    }

    /// Loads a serialized private key. The stored key is kept on error.
    pub fn set_private_key(&mut self, bytes: &[u8]) -> Result<()> {
        self.private = Some(PrivateKey::from_bytes(bytes)?);
        Ok(())
    }

    /// Deterministic encryption under the stored public key.
    pub fn encrypt(&self, m: &Msg, theta: &Theta) -> Result<PkeCiphertext> {
        HqcPke::encrypt(self.public_key()?, m, theta)
    }

    /// Decryption with the stored private key.
    pub fn decrypt(&self, ct: &PkeCiphertext) -> Result<Msg> {
        HqcPke::decrypt(self.private_key()?, ct)
    }

    /// Encapsulates to the stored public key using OS entropy.
    pub fn encapsulate(&self) -> Result<(SharedSecret, KemCiphertext)> {
        self.encapsulate_with_rng(&mut OsRng)
    }

    /// Encapsulates to the stored public key using `rng` for the message.
    #[instrument(level = "debug", skip_all)]
    pub fn encapsulate_with_rng<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
    ) -> Result<(SharedSecret, KemCiphertext)> {
        HqcKem::encapsulate(self.public_key()?, rng)
    }

    /// Decapsulates with the stored key pair.
    #[instrument(level = "debug", skip_all)]
    pub fn decapsulate(&self, ct: &KemCiphertext) -> Result<Decapsulation> {
        HqcKem::decapsulate(self.public_key()?, self.private_key()?, ct)
    }
}

//! Concatenated code: a symbol-level code on the outside, duplicated
//! Reed–Muller underneath.
//!
//! - Encode: message → symbol encode → RM encode → concatenated codeword
//! - Decode: concatenated codeword → RM decode → symbol decode → message
//!
//! The codeword is `n1 * n2` bits, i.e. 78 RM blocks of 6 × 128 bits.

use alloc::vec::Vec;

use crate::{
    error::{Error, Result},
    param::{Msg, N1N2_BYTES, RsCodeword},
    rm::ReedMuller,
    rs::ReedSolomon,
};

/// Byte-oriented code correcting whole-symbol errors.
///
/// `encode` appends parity to the message; `decode` corrects up to the
/// code's bound and fails with [`Error::Uncorrectable`] beyond it.
pub trait SymbolCodec {
    /// Message to codeword.
    fn encode(msg: &Msg) -> RsCodeword;

    /// Codeword (possibly corrupted) to message.
    fn decode(codeword: &RsCodeword) -> Result<Msg>;
}

/// The code used by the KEM.
pub struct Concat;

impl Concat {
    /// Encodes a message into `N1N2_BYTES` bytes.
    pub fn encode(msg: &Msg) -> Vec<u8> {
        Self::encode_with::<ReedSolomon>(msg)
    }

    /// Decodes `N1N2_BYTES` bytes back to a message.
    pub fn decode(encoded: &[u8]) -> Result<Msg> {
        Self::decode_with::<ReedSolomon>(encoded)
    }

    /// Encodes with an arbitrary outer symbol code.
    pub fn encode_with<C: SymbolCodec>(msg: &Msg) -> Vec<u8> {
        let symbols = C::encode(msg);
        ReedMuller::default().encode(&symbols)
    }

    /// Decodes with an arbitrary outer symbol code.
    pub fn decode_with<C: SymbolCodec>(encoded: &[u8]) -> Result<Msg> {
        if encoded.len() != N1N2_BYTES {
            return Err(Error::InvalidLength {
                expected: N1N2_BYTES,
                got: encoded.len(),
            });
        }
        let bytes = ReedMuller::default().decode(encoded)?;
        let mut symbols = RsCodeword::default();
        symbols.copy_from_slice(&bytes);
        C::decode(&symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::{RM_BYTES, RM_MULTIPLICITY, RS_DELTA, RS_K};
    use crate::test_util::TestRng;

    fn random_msg(rng: &mut TestRng) -> Msg {
        let mut msg = Msg::default();
        for byte in msg.iter_mut() {
            *byte = rng.next_u32() as u8;
        }
        msg
    }

    #[test]
    fn concat_encode_decode_roundtrip() {
        let mut rng = TestRng::new();
        for _ in 0..5 {
            let msg = random_msg(&mut rng);
            let encoded = Concat::encode(&msg);
            assert_eq!(encoded.len(), N1N2_BYTES);
            assert_eq!(Concat::decode(&encoded).unwrap(), msg);
        }
    }

    #[test]
    fn concat_survives_scattered_bit_errors() {
        let mut rng = TestRng::new();
        let msg = random_msg(&mut rng);
        let mut encoded = Concat::encode(&msg);
        // ~3% bit error rate
        for _ in 0..(N1N2_BYTES * 8 / 32) {
            let bit = rng.gen_usize(N1N2_BYTES * 8);
            encoded[bit / 8] ^= 0x80 >> (bit % 8);
        }
        assert_eq!(Concat::decode(&encoded).unwrap(), msg);
    }

    #[test]
    fn concat_survives_destroyed_symbols() {
        let mut rng = TestRng::new();
        let msg = random_msg(&mut rng);
        let mut encoded = Concat::encode(&msg);
        let block = RM_MULTIPLICITY * RM_BYTES;
        // wipe δ whole RM blocks, i.e. δ symbol errors
        for sym in 0..RS_DELTA {
            let start = (3 * sym % 78) * block;
            for b in &mut encoded[start..start + block] {
                *b = rng.next_u32() as u8;
            }
        }
        assert_eq!(Concat::decode(&encoded).unwrap(), msg);
    }

    #[test]
    fn concat_reports_uncorrectable() {
        let mut rng = TestRng::new();
        let msg = random_msg(&mut rng);
        let mut encoded = Concat::encode(&msg);
        for b in encoded.iter_mut() {
            *b = rng.next_u32() as u8;
        }
        assert_eq!(Concat::decode(&encoded), Err(Error::Uncorrectable));
    }

    #[test]
    fn concat_rejects_wrong_length() {
        assert!(matches!(
            Concat::decode(&[0u8; RS_K]),
            Err(Error::InvalidLength { .. })
        ));
    }
}

//! Shortened Reed–Solomon RS(78, 32) over GF(256).
//!
//! Codewords are laid out message first, parity appended, and read as a
//! polynomial with the first byte as the highest-degree coefficient. The
//! generator polynomial has the `2δ` consecutive roots `alpha^0 .. alpha^(2δ-1)`.
//!
//! Decoding:
//! 1) syndromes
//! 2) Berlekamp–Massey -> error locator polynomial σ(x)
//! 3) Chien search for the roots of σ(x)
//! 4) Forney's formula for the magnitudes, correct, re-check the syndromes
//!
//! Anything that does not resolve to at most δ consistent error positions is
//! reported as [`Error::Uncorrectable`].

use tracing::debug;

use crate::{
    concat::SymbolCodec,
    error::{Error, Result},
    gf256::{self, GF_EXP, exp, mul_vartime},
    param::{Msg, RS_DELTA, RS_K, RS_N1, RS_PARITY, RsCodeword, Syndromes},
};

/// Exponent of the first root of the generator polynomial.
pub const RS_FIRST_ROOT: usize = 0;

/// Generator polynomial, ascending coefficients, monic of degree `2δ`.
pub static RS_GENERATOR: [u8; RS_PARITY + 1] = generator_poly();

const fn generator_poly() -> [u8; RS_PARITY + 1] {
    let mut g = [0u8; RS_PARITY + 1];
    g[0] = 1;
    let mut i = 0;
    while i < RS_PARITY {
        // g(x) <- g(x) * (x + alpha^(first + i))
        let root = GF_EXP[RS_FIRST_ROOT + i];
        let mut j = i + 1;
        while j > 0 {
            g[j] = g[j - 1] ^ mul_vartime(g[j], root);
            j -= 1;
        }
        g[0] = mul_vartime(g[0], root);
        i += 1;
    }
    g
}

/// Error locator polynomial σ(x), ascending coefficients.
type ErrorLocatorPoly = [u8; RS_PARITY + 1];

/// Error evaluator polynomial Ω(x), ascending coefficients.
type ErrorEvaluatorPoly = [u8; RS_PARITY];

/// Reed–Solomon codec for the fixed RS(78, 32) parameters.
pub struct ReedSolomon;

impl ReedSolomon {
    /// Systematic encoding: `msg || (msg(x) * x^2δ mod g(x))`.
    ///
    /// # Algorithm
    /// An LFSR over the generator polynomial, fed with the message from its
    /// highest-degree byte down, leaves the remainder in its register.
    pub fn encode(msg: &Msg) -> RsCodeword {
        let mut parity = [0u8; RS_PARITY];
        for &byte in msg.iter() {
            let gate = byte ^ parity[RS_PARITY - 1];
            for j in (1..RS_PARITY).rev() {
                parity[j] = parity[j - 1] ^ gf256::mul(gate, RS_GENERATOR[j]);
            }
            parity[0] = gf256::mul(gate, RS_GENERATOR[0]);
        }

        let mut codeword = RsCodeword::default();
        codeword[..RS_K].copy_from_slice(msg);
        for (out, &p) in codeword[RS_K..].iter_mut().zip(parity.iter().rev()) {
            *out = p;
        }
        codeword
    }

    /// Corrects up to δ symbol errors and returns the message part.
    pub fn decode(encoded: &RsCodeword) -> Result<Msg> {
        let mut codeword = encoded.clone();
        let syndromes = Self::compute_syndromes(&codeword);

        if syndromes.iter().any(|&s| s != 0) {
            let (sigma, degree) = Self::compute_elp(&syndromes);
            if degree > RS_DELTA {
                return Err(Error::Uncorrectable);
            }

            let mut positions = [0usize; RS_DELTA];
            let found = Self::find_error_positions(&sigma, &mut positions);
            if found != degree {
                return Err(Error::Uncorrectable);
            }

            let omega = Self::compute_error_evaluator(&sigma, &syndromes);
            Self::correct_errors(&mut codeword, &sigma, &omega, &positions[..found])?;

            if Self::compute_syndromes(&codeword).iter().any(|&s| s != 0) {
                return Err(Error::Uncorrectable);
            }
            debug!(errors = found, "corrected symbol errors");
        }

        let mut msg = Msg::default();
        msg.copy_from_slice(&codeword[..RS_K]);
        Ok(msg)
    }

    /// `S_i = c(alpha^(first + i))` for `i` in `0..2δ`, by Horner over the
    /// codeword bytes (highest degree first).
    fn compute_syndromes(codeword: &RsCodeword) -> Syndromes {
        let mut syndromes = Syndromes::default();
        for (i, s) in syndromes.iter_mut().enumerate() {
            let x = exp(RS_FIRST_ROOT + i);
            *s = codeword.iter().fold(0u8, |acc, &c| gf256::mul(acc, x) ^ c);
        }
        syndromes
    }

    /// Berlekamp–Massey: the shortest LFSR σ(x) generating the syndromes,
    /// together with its length.
    fn compute_elp(syndromes: &Syndromes) -> (ErrorLocatorPoly, usize) {
        let mut sigma = [0u8; RS_PARITY + 1];
        let mut prev = [0u8; RS_PARITY + 1];
        sigma[0] = 1;
        prev[0] = 1;

        let mut degree = 0usize;
        let mut shift = 1usize;
        let mut prev_discrepancy = 1u8;

        for r in 0..RS_PARITY {
            // d = S_r + sum_{i=1}^{L} σ_i S_{r-i}
            let mut d = syndromes[r];
            for i in 1..=degree.min(r) {
                d ^= gf256::mul(sigma[i], syndromes[r - i]);
            }
            if d == 0 {
                shift += 1;
                continue;
            }

            let coef = gf256::mul(d, gf256::inv(prev_discrepancy));
            let saved = sigma;
            for i in 0..(RS_PARITY + 1).saturating_sub(shift) {
                sigma[i + shift] ^= gf256::mul(coef, prev[i]);
            }

            if 2 * degree <= r {
                degree = r + 1 - degree;
                prev = saved;
                prev_discrepancy = d;
                shift = 1;
            } else {
                shift += 1;
            }
        }

        (sigma, degree)
    }

    /// Chien search over the `n1` codeword positions. Position `j` (the
    /// coefficient of `x^j`) is in error iff `σ(alpha^-j) = 0`. Returns how
    /// many positions were written.
    fn find_error_positions(sigma: &ErrorLocatorPoly, positions: &mut [usize; RS_DELTA]) -> usize {
        let mut found = 0;
        for j in 0..RS_N1 {
            if gf256::eval(sigma, exp(255 - j)) == 0 {
                if found == RS_DELTA {
                    return found + 1;
                }
                positions[found] = j;
                found += 1;
            }
        }
        found
    }

    /// Ω(x) = S(x) σ(x) mod x^2δ.
    fn compute_error_evaluator(sigma: &ErrorLocatorPoly, syndromes: &Syndromes) -> ErrorEvaluatorPoly {
        let mut omega = [0u8; RS_PARITY];
        for (k, o) in omega.iter_mut().enumerate() {
            for i in 0..=k {
                *o ^= gf256::mul(syndromes[i], sigma[k - i]);
            }
        }
        omega
    }

    /// Forney: `e_j = X_j^(1 - first) Ω(X_j^-1) / σ'(X_j^-1)` with `X_j = alpha^j`.
    fn correct_errors(
        codeword: &mut RsCodeword,
        sigma: &ErrorLocatorPoly,
        omega: &ErrorEvaluatorPoly,
        positions: &[usize],
    ) -> Result<()> {
        // formal derivative: only odd powers survive in characteristic 2
        let mut sigma_prime = [0u8; RS_PARITY];
        for i in (1..=RS_PARITY).step_by(2) {
            sigma_prime[i - 1] = sigma[i];
        }

        for &j in positions {
            let x_inv = exp(255 - j);
            let denom = gf256::eval(&sigma_prime, x_inv);
            if denom == 0 {
                return Err(Error::Uncorrectable);
            }
            let mut magnitude = gf256::mul(gf256::eval(omega, x_inv), gf256::inv(denom));
            // X_j^(1 - first)
            magnitude = gf256::mul(magnitude, exp((1 + 255 - RS_FIRST_ROOT) * j));
            codeword[RS_N1 - 1 - j] ^= magnitude;
        }
        Ok(())
    }
}

impl SymbolCodec for ReedSolomon {
    fn encode(msg: &Msg) -> RsCodeword {
        Self::encode(msg)
    }

    fn decode(codeword: &RsCodeword) -> Result<Msg> {
        Self::decode(codeword)
    }
}

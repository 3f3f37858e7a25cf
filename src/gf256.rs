//! GF(256) arithmetic with the primitive polynomial x^8 + x^4 + x^3 + x^2 + 1 (0x11D).
//!
//! The exponent and logarithm tables are generated at compile time from the
//! primitive element `alpha = 2`.

use subtle::{ConditionallySelectable, ConstantTimeEq};

/// Primitive polynomial, including the x^8 term.
pub const GF_POLY: u16 = 0x11D;

/// `GF_EXP[i] = alpha^i`, doubled in length so `log a + log b` never needs reducing.
pub const GF_EXP: [u8; 512] = build_exp();

/// `GF_LOG[a] = log_alpha(a)`; entry 0 is unused.
pub const GF_LOG: [u8; 256] = build_log();

const fn build_exp() -> [u8; 512] {
    let mut table = [0u8; 512];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        table[i] = x as u8;
        table[i + 255] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= GF_POLY;
        }
        i += 1;
    }
    table[510] = table[0];
    table[511] = table[1];
    table
}

const fn build_log() -> [u8; 256] {
    let exp = build_exp();
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}

/// Multiplies two elements without hiding zero operands. For tables built at
/// compile time.
pub(crate) const fn mul_vartime(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    GF_EXP[GF_LOG[a as usize] as usize + GF_LOG[b as usize] as usize]
}

/// `alpha^e` for any exponent.
#[inline]
#[must_use]
pub const fn exp(e: usize) -> u8 {
    GF_EXP[e % 255]
}

/// Multiplies two elements in GF(256).
///
/// Uses the `subtle` crate to select between 0 and the table result without branching.
#[must_use]
pub fn mul(a: u8, b: u8) -> u8 {
    let idx = GF_LOG[a as usize] as usize + GF_LOG[b as usize] as usize;
    let result = GF_EXP[idx];
    let either_zero = a.ct_eq(&0) | b.ct_eq(&0);
    u8::conditional_select(&result, &0, either_zero)
}

/// Multiplicative inverse, with `inv(0) = 0`.
#[must_use]
pub fn inv(a: u8) -> u8 {
    let idx = 255 - GF_LOG[a as usize] as usize;
    let result = GF_EXP[idx];
    u8::conditional_select(&result, &0, a.ct_eq(&0))
}

/// Evaluates a polynomial given by ascending coefficients at `x` (Horner).
#[must_use]
pub fn eval(coeffs: &[u8], x: u8) -> u8 {
    coeffs.iter().rev().fold(0u8, |acc, &c| mul(acc, x) ^ c)
}

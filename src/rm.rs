//! Duplicated first-order Reed–Muller code RM(1, 7).
//!
//! One byte becomes a 128-bit RM(1, 7) codeword, packed MSB first into 16
//! bytes, and that block is repeated `mult` times. Decoding sums the copies
//! position by position and correlates the result against every affine
//! function at once through the 128×128 Hadamard matrix.

use alloc::vec::Vec;

use crate::{
    error::{Error, Result},
    param::{RM_BYTES, RM_M, RM_MULTIPLICITY, RM_N, RmCodeword},
};

/// Generator rows of RM(1, 7). Row 0 is all ones; row `k` in `1..=7` holds
/// bit `7 - k` of the column index. Column `y` sits at bit `127 - y`.
pub const FIRST_ORDER_ROWS: [u128; RM_M + 1] = first_order_rows();

const fn first_order_rows() -> [u128; RM_M + 1] {
    let mut rows = [0u128; RM_M + 1];
    rows[0] = u128::MAX;
    let mut y = 0;
    while y < RM_N {
        let mut k = 1;
        while k <= RM_M {
            if (y >> (RM_M - k)) & 1 == 1 {
                rows[k] |= 1u128 << (RM_N - 1 - y);
            }
            k += 1;
        }
        y += 1;
    }
    rows
}

/// Generator matrix of RM(r, 7) for any order `r <= 7`.
///
/// After the first-order rows come, for each `l` in `2..=r`, the products
/// (bitwise AND) of every `l`-subset of rows `1..=7` in lexicographic order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RmGenerator {
    rows: Vec<u128>,
}

impl RmGenerator {
    /// Builds the generator for RM(`order`, 7). Orders above 7 are clamped.
    pub fn new(order: usize) -> Self {
        let order = order.min(RM_M);
        let mut rows = Vec::new();
        rows.push(FIRST_ORDER_ROWS[0]);
        if order >= 1 {
            rows.extend_from_slice(&FIRST_ORDER_ROWS[1..]);
        }
        for l in 2..=order {
            Self::push_products(&mut rows, 1, l, u128::MAX);
        }
        Self { rows }
    }

    fn push_products(rows: &mut Vec<u128>, start: usize, left: usize, acc: u128) {
        if left == 0 {
            rows.push(acc);
            return;
        }
        for i in start..=RM_M {
            Self::push_products(rows, i + 1, left - 1, acc & FIRST_ORDER_ROWS[i]);
        }
    }

    /// Generator rows.
    pub fn rows(&self) -> &[u128] {
        &self.rows
    }

    /// Code dimension, the number of rows.
    pub fn dimension(&self) -> usize {
        self.rows.len()
    }

    /// Multiplies a message by the generator over GF(2). Bit
    /// `dimension - 1 - i` of `msg` selects row `i`, so the most significant
    /// message bit picks the all-ones row.
    pub fn encode(&self, msg: u128) -> u128 {
        let dim = self.rows.len();
        self.rows
            .iter()
            .enumerate()
            .filter(|(i, _)| (msg >> (dim - 1 - i)) & 1 == 1)
            .fold(0u128, |acc, (_, row)| acc ^ row)
    }
}

/// Sylvester Hadamard matrix of order `2^7`, stored row-major in one flat buffer.
pub struct HadamardMatrix {
    entries: [i8; RM_N * RM_N],
}

/// The matrix used by the decoder, built at compile time.
pub static HADAMARD: HadamardMatrix = HadamardMatrix::sylvester();

impl HadamardMatrix {
    /// Iterative doubling: `H(0) = [1]`, `H(k+1) = [[H(k), H(k)], [H(k), -H(k)]]`,
    /// each step filling the three new quadrants in place.
    pub const fn sylvester() -> Self {
        let mut entries = [0i8; RM_N * RM_N];
        entries[0] = 1;
        let mut size = 1;
        while size < RM_N {
            let mut r = 0;
            while r < size {
                let mut c = 0;
                while c < size {
                    let v = entries[r * RM_N + c];
                    entries[r * RM_N + c + size] = v;
                    entries[(r + size) * RM_N + c] = v;
                    entries[(r + size) * RM_N + c + size] = -v;
                    c += 1;
                }
                r += 1;
            }
            size *= 2;
        }
        Self { entries }
    }

    /// Entry at row `r`, column `c`.
    #[inline]
    pub fn entry(&self, r: usize, c: usize) -> i8 {
        self.entries[r * RM_N + c]
    }

    /// Row vector times matrix: `out[j] = sum_y v[y] * H[y][j]`.
    pub fn transform(&self, v: &[i32; RM_N]) -> [i32; RM_N] {
        let mut out = [0i32; RM_N];
        for (y, &vy) in v.iter().enumerate() {
            if vy == 0 {
                continue;
            }
            let row = &self.entries[y * RM_N..(y + 1) * RM_N];
            for (o, &h) in out.iter_mut().zip(row) {
                *o += vy * i32::from(h);
            }
        }
        out
    }
}

/// RM(1, 7) with every block repeated `mult` times.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReedMuller {
    mult: usize,
}

impl Default for ReedMuller {
    fn default() -> Self {
        Self::new(RM_MULTIPLICITY)
    }
}

impl ReedMuller {
    /// Code with repetition factor `mult` (at least 1).
    pub const fn new(mult: usize) -> Self {
        assert!(mult > 0, "repetition factor must be positive");
        Self { mult }
    }

    /// Encoded bytes per message byte.
    pub fn block_bytes(&self) -> usize {
        self.mult * RM_BYTES
    }

    /// Encodes one byte into a single (undistributed) RM(1, 7) block.
    pub fn encode_byte(b: u8) -> RmCodeword {
        let word = FIRST_ORDER_ROWS
            .iter()
            .enumerate()
            .filter(|(i, _)| (b >> (RM_M - i)) & 1 == 1)
            .fold(0u128, |acc, (_, row)| acc ^ row);
        RmCodeword::from(word.to_be_bytes())
    }

    /// Encodes every byte of `msg`, each into `mult` copies of its block.
    pub fn encode(&self, msg: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(msg.len() * self.block_bytes());
        for &b in msg {
            let block = Self::encode_byte(b);
            for _ in 0..self.mult {
                out.extend_from_slice(&block);
            }
        }
        out
    }

    /// Decodes a sequence of `mult * 16`-byte blocks, one byte per block.
    pub fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>> {
        let block_bytes = self.block_bytes();
        if encoded.len() % block_bytes != 0 {
            return Err(Error::InvalidLength {
                expected: encoded.len().next_multiple_of(block_bytes),
                got: encoded.len(),
            });
        }
        Ok(encoded
            .chunks_exact(block_bytes)
            .map(|block| self.decode_block(block))
            .collect())
    }

    /// Maximum-likelihood decoding of one duplicated block.
    ///
    /// # Algorithm
    /// 1. soft[y] = number of copies with bit y set, in `0..=mult`
    /// 2. t = soft × H, then t[0] -= 64 * mult
    /// 3. peak = first index with the largest |t|
    /// 4. byte = peak | 0x80 if t[peak] > 0
    fn decode_block(&self, block: &[u8]) -> u8 {
        let mut soft = [0i32; RM_N];
        for copy in block.chunks_exact(RM_BYTES) {
            for (y, s) in soft.iter_mut().enumerate() {
                *s += i32::from((copy[y / 8] >> (7 - y % 8)) & 1);
            }
        }

        let mut transformed = HADAMARD.transform(&soft);
        transformed[0] -= (RM_N as i32 / 2) * self.mult as i32;

        let (mut peak_abs, mut peak_val, mut peak_pos) = (0i32, 0i32, 0usize);
        for (i, &t) in transformed.iter().enumerate() {
            if t.abs() > peak_abs {
                (peak_abs, peak_val, peak_pos) = (t.abs(), t, i);
            }
        }

        (peak_pos as u8) | (if peak_val > 0 { 0x80 } else { 0 })
    }
}

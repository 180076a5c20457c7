//! Word-level primitives and the blocked boolean multiply kernel

use super::{BitsetMatrix, WORD_BITS};
use crate::config::EstimatorConfig;

/// Set bit `col` of a packed row
#[inline]
pub fn set_bit(row: &mut [u64], col: usize) {
    row[col / WORD_BITS] |= 1u64 << (col % WORD_BITS);
}

/// Test bit `col` of a packed row
#[inline]
pub fn test_bit(row: &[u64], col: usize) -> bool {
    row[col / WORD_BITS] & (1u64 << (col % WORD_BITS)) != 0
}

/// Total number of set bits in a word slice
#[inline]
pub fn popcount(words: &[u64]) -> u64 {
    words.iter().map(|word| word.count_ones() as u64).sum()
}

/// `dst |= src`, word by word
///
/// Unrolled by eight for instruction-level parallelism.
#[inline]
pub fn or_words(src: &[u64], dst: &mut [u64]) {
    debug_assert_eq!(src.len(), dst.len());
    let mut dst_chunks = dst.chunks_exact_mut(8);
    let mut src_chunks = src.chunks_exact(8);
    for (d, s) in (&mut dst_chunks).zip(&mut src_chunks) {
        d[0] |= s[0];
        d[1] |= s[1];
        d[2] |= s[2];
        d[3] |= s[3];
        d[4] |= s[4];
        d[5] |= s[5];
        d[6] |= s[6];
        d[7] |= s[7];
    }
    for (d, s) in dst_chunks.into_remainder().iter_mut().zip(src_chunks.remainder()) {
        *d |= *s;
    }
}

/// Compute output rows `first_row..` of `a x b` into `out`
///
/// `out` holds whole packed output rows and is assumed zeroed. Returns the
/// number of bits set in `out`.
///
/// Loop order is row block, shared-dimension block, column block. Inside a
/// block every set `a(i, t)` ORs the current column segment of `b` row `t`
/// into output row `i`, covering 64 output columns per word operation.
pub fn multiply_rows(
    a: &BitsetMatrix,
    b: &BitsetMatrix,
    out: &mut [u64],
    first_row: usize,
    config: &EstimatorConfig,
) -> u64 {
    let n64 = b.words_per_row;
    if n64 == 0 {
        return 0;
    }
    let shared = a.ncols;
    let rows = out.len() / n64;
    let block_rows = config.block_rows.max(1);
    let block_shared = config.block_shared.max(1);
    let block_words = config.block_cols.div_ceil(WORD_BITS).max(1);

    let mut nnz = 0;
    for bi in (0..rows).step_by(block_rows) {
        let bimin = rows.min(bi + block_rows);
        for bk in (0..shared).step_by(block_shared) {
            let bkmin = shared.min(bk + block_shared);
            for bj in (0..n64).step_by(block_words) {
                let len = n64.min(bj + block_words) - bj;
                for i in bi..bimin {
                    let a_row = a.row_words(first_row + i);
                    let c_seg = &mut out[i * n64 + bj..i * n64 + bj + len];
                    for t in bk..bkmin {
                        // implicit AND
                        if test_bit(a_row, t) {
                            or_words(&b.data[t * n64 + bj..t * n64 + bj + len], c_seg);
                        }
                    }
                }
            }
        }
        // row block is final, count it once
        nnz += popcount(&out[bi * n64..bimin * n64]);
    }
    nnz
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_test_bit() {
        let mut row = [0u64; 2];
        set_bit(&mut row, 0);
        set_bit(&mut row, 63);
        set_bit(&mut row, 64);
        assert_eq!(row, [1 | (1 << 63), 1]);
        assert!(test_bit(&row, 63));
        assert!(!test_bit(&row, 62));
        assert!(test_bit(&row, 64));
    }

    #[test]
    fn test_or_words_with_remainder() {
        for len in [0, 1, 7, 8, 9, 17] {
            let src: Vec<u64> = (0..len as u64).map(|i| 1 << i).collect();
            let mut dst: Vec<u64> = (0..len as u64).map(|i| 1 << (i + 1)).collect();
            or_words(&src, &mut dst);
            for (i, word) in dst.iter().enumerate() {
                assert_eq!(*word, (1 << i) | (1 << (i + 1)), "len {len}, word {i}");
            }
        }
    }

    #[test]
    fn test_popcount() {
        assert_eq!(popcount(&[]), 0);
        assert_eq!(popcount(&[u64::MAX, 0b1011]), 67);
    }
}

//! One growable bitset per row
//!
//! Straightforward boolean matrix used to cross-check the packed kernel.
//! Rows without non-zeros are not allocated.

use spest_core::MatrixBlock;

use super::WORD_BITS;

#[derive(Debug, Clone, Default)]
struct RowBitset {
    words: Vec<u64>,
}

impl RowBitset {
    fn set(&mut self, bit: usize) {
        let word = bit / WORD_BITS;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1 << (bit % WORD_BITS);
    }

    fn get(&self, bit: usize) -> bool {
        self.words
            .get(bit / WORD_BITS)
            .is_some_and(|word| word & (1 << (bit % WORD_BITS)) != 0)
    }

    fn or(&mut self, other: &RowBitset) {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        for (dst, src) in self.words.iter_mut().zip(&other.words) {
            *dst |= *src;
        }
    }

    fn cardinality(&self) -> u64 {
        self.words.iter().map(|w| w.count_ones() as u64).sum()
    }
}

pub(crate) struct RowBitsetMatrix {
    ncols: usize,
    rows: Vec<Option<RowBitset>>,
    nnz: u64,
}

impl RowBitsetMatrix {
    pub(crate) fn from_block<B: MatrixBlock + ?Sized>(block: &B) -> Self {
        let (nrows, ncols) = block.dimensions();
        let rows = (0..nrows)
            .map(|r| {
                let view = block.row(r);
                if view.is_trivially_empty() {
                    return None;
                }
                let mut bits = RowBitset::default();
                view.for_each_nonzero(|c| bits.set(c));
                Some(bits)
            })
            .collect();
        Self {
            ncols,
            rows,
            nnz: block.nnz(),
        }
    }

    pub(crate) fn nnz(&self) -> u64 {
        self.nnz
    }

    pub(crate) fn get(&self, row: usize, col: usize) -> bool {
        self.rows[row].as_ref().is_some_and(|bits| bits.get(col))
    }

    /// IKJ schedule with whole-row ORs
    pub(crate) fn multiply(&self, other: &RowBitsetMatrix) -> RowBitsetMatrix {
        let mut nnz = 0;
        let rows = self
            .rows
            .iter()
            .map(|a| {
                let a = a.as_ref()?;
                let mut c = RowBitset::default();
                for t in 0..self.ncols {
                    if let Some(b) = other.rows[t].as_ref().filter(|_| a.get(t)) {
                        c.or(b);
                    }
                }
                nnz += c.cardinality();
                Some(c)
            })
            .collect();
        RowBitsetMatrix {
            ncols: other.ncols,
            rows,
            nnz,
        }
    }
}

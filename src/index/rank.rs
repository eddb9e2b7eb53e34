//! Rank structure over the BWT
//!
//! Two tables answer every question backward search asks:
//!
//! - [`CTable`]: for each symbol `c`, how many BWT bytes are smaller than `c`
//! - [`OccCheckpoints`]: exact counts of every symbol in `BWT[0, k*K)` for
//!   each checkpoint `k`, one row of `alphabet.size()` counters per row
//!
//! `rank(c, i)` starts from the checkpoint at or below `i` and scans fewer
//! than `K` BWT bytes. A dense table (`K = 1`) costs `alphabet * n` counters;
//! raising `K` divides that memory by `K` and multiplies scan work by `K`.

use crate::index::types::Alphabet;

/// Cumulative symbol counts: `C[c]` = number of BWT bytes strictly less than `c`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CTable {
    /// `alphabet.size() + 1` entries; the last one is the text length
    starts: Vec<usize>,
}

impl CTable {
    /// One frequency pass plus a prefix sum over the alphabet
    pub fn build(bwt: &[u8], alphabet: Alphabet) -> Self {
        let mut counts = vec![0usize; alphabet.size()];
        for &b in bwt {
            counts[b as usize] += 1;
        }

        let mut starts = Vec::with_capacity(alphabet.size() + 1);
        let mut total = 0;
        for count in counts {
            starts.push(total);
            total += count;
        }
        starts.push(total);

        Self { starts }
    }

    /// First suffix array row whose suffix starts with `symbol`.
    ///
    /// Symbols outside the alphabet map to the total, an empty bucket.
    #[inline]
    pub fn get(&self, symbol: u8) -> usize {
        let index = (symbol as usize).min(self.starts.len() - 1);
        self.starts[index]
    }

    /// Occurrences of `symbol` in the whole BWT
    #[inline]
    pub fn count(&self, symbol: u8) -> usize {
        let index = symbol as usize;
        if index + 1 >= self.starts.len() {
            return 0;
        }
        self.starts[index + 1] - self.starts[index]
    }

    /// Total number of symbols
    pub fn total(&self) -> usize {
        self.starts[self.starts.len() - 1]
    }

    pub fn alphabet_size(&self) -> usize {
        self.starts.len() - 1
    }

    pub fn heap_size(&self) -> usize {
        self.starts.capacity() * std::mem::size_of::<usize>()
    }
}

/// Periodic snapshots of per-symbol occurrence counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccCheckpoints {
    interval: usize,
    alphabet_size: usize,
    /// Row `k` holds counts for `BWT[0, k * interval)`, flattened row-major
    rows: Vec<usize>,
}

impl OccCheckpoints {
    /// One left-to-right pass, emitting a snapshot every `interval` positions.
    ///
    /// `interval` must be at least 1.
    pub fn build(bwt: &[u8], alphabet: Alphabet, interval: usize) -> Self {
        let alphabet_size = alphabet.size();
        let row_count = bwt.len() / interval + 1;
        let mut rows = Vec::with_capacity(row_count * alphabet_size);
        let mut running = vec![0usize; alphabet_size];

        rows.extend_from_slice(&running);
        for chunk in bwt.chunks(interval) {
            for &b in chunk {
                running[b as usize] += 1;
            }
            if chunk.len() == interval {
                rows.extend_from_slice(&running);
            }
        }

        Self {
            interval,
            alphabet_size,
            rows,
        }
    }

    /// Exact count of `symbol` in `BWT[0, k * interval)`
    #[inline]
    pub fn at(&self, checkpoint: usize, symbol: u8) -> usize {
        self.rows[checkpoint * self.alphabet_size + symbol as usize]
    }

    pub fn interval(&self) -> usize {
        self.interval
    }

    pub fn checkpoint_count(&self) -> usize {
        self.rows.len() / self.alphabet_size
    }

    pub fn heap_size(&self) -> usize {
        self.rows.capacity() * std::mem::size_of::<usize>()
    }
}

/// BWT plus the tables needed for rank queries and LF-mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankIndex {
    bwt: Vec<u8>,
    alphabet: Alphabet,
    c_table: CTable,
    occ: OccCheckpoints,
}

impl RankIndex {
    /// Build the C-table and checkpoints for `bwt`.
    ///
    /// Every byte of `bwt` must lie in `alphabet` and `checkpoint_interval`
    /// must be at least 1; [`FmIndex`](crate::index::FmIndex) validates both
    /// before calling this.
    pub fn build(bwt: Vec<u8>, alphabet: Alphabet, checkpoint_interval: usize) -> Self {
        let c_table = CTable::build(&bwt, alphabet);
        let occ = OccCheckpoints::build(&bwt, alphabet, checkpoint_interval);

        tracing::debug!(
            n = bwt.len(),
            alphabet = alphabet.size(),
            interval = checkpoint_interval,
            checkpoints = occ.checkpoint_count(),
            "rank index built"
        );

        Self {
            bwt,
            alphabet,
            c_table,
            occ,
        }
    }

    /// Number of occurrences of `symbol` in `BWT[0, k)`.
    ///
    /// `k` must not exceed the BWT length.
    pub fn rank(&self, symbol: u8, k: usize) -> usize {
        if k == 0 || !self.alphabet.contains(symbol) {
            return 0;
        }

        let checkpoint = k / self.occ.interval();
        let start = checkpoint * self.occ.interval();
        let base = self.occ.at(checkpoint, symbol);

        base + memchr::memchr_iter(symbol, &self.bwt[start..k]).count()
    }

    /// LF-mapping: row of the suffix starting one position before the
    /// suffix at `row`
    #[inline]
    pub fn lf(&self, row: usize) -> usize {
        let symbol = self.bwt[row];
        self.c_table.get(symbol) + self.rank(symbol, row)
    }

    pub fn bwt(&self) -> &[u8] {
        &self.bwt
    }

    pub fn c_table(&self) -> &CTable {
        &self.c_table
    }

    pub fn occ(&self) -> &OccCheckpoints {
        &self.occ
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    pub fn len(&self) -> usize {
        self.bwt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bwt.is_empty()
    }
}

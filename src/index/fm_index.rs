//! FM-index: suffix array + BWT + rank structure, and backward search
//!
//! Construction is a strictly sequential pipeline:
//!
//! ```text
//! bytes ──▶ SentinelText ──▶ SuffixArray ──▶ BWT ──▶ RankIndex
//! ```
//!
//! A built [`FmIndex`] is immutable. Queries only read it, so one index can
//! serve any number of threads at once without locking.

use super::bwt::build_bwt;
use super::rank::{CTable, RankIndex};
use super::sentinel::SentinelText;
use super::stats::IndexStats;
use super::suffix_array::{SuffixArray, SuffixArrayBuilder};
use super::types::{IndexConfig, MatchInterval, TextOffset};
use crate::error::Result;
use rayon::prelude::*;

/// Compressed full-text index over a byte sequence
#[derive(Debug, Clone)]
pub struct FmIndex {
    text: SentinelText,
    suffix_array: SuffixArray,
    rank: RankIndex,
    config: IndexConfig,
}

impl FmIndex {
    /// Build an index with the default configuration.
    ///
    /// Fails if `text` contains the sentinel byte anywhere, since the
    /// sentinel is always appended after the last content byte.
    pub fn build(text: &[u8]) -> Result<Self> {
        Self::with_config(text, &IndexConfig::default())
    }

    /// Build an index with an explicit configuration
    pub fn with_config(text: &[u8], config: &IndexConfig) -> Result<Self> {
        config.validate()?;
        config.alphabet.check(text)?;
        let text = SentinelText::new(text, config.sentinel)?;
        Ok(Self::from_sentinel_text(text, config))
    }

    /// Build an index over a text that may already end with the sentinel.
    ///
    /// A trailing sentinel is taken as the terminator instead of content.
    pub fn from_terminated(text: &[u8], config: &IndexConfig) -> Result<Self> {
        config.validate()?;
        config.alphabet.check(text)?;
        let text = SentinelText::from_terminated(text, config.sentinel)?;
        Ok(Self::from_sentinel_text(text, config))
    }

    fn from_sentinel_text(text: SentinelText, config: &IndexConfig) -> Self {
        let suffix_array = SuffixArrayBuilder::from_config(config).build(&text);
        let bwt = build_bwt(text.as_bytes(), &suffix_array);
        let rank = RankIndex::build(bwt, config.alphabet, config.checkpoint_interval);

        tracing::debug!(
            n = text.len(),
            interval = config.checkpoint_interval,
            "fm-index built"
        );

        Self {
            text,
            suffix_array,
            rank,
            config: config.clone(),
        }
    }

    /// Narrow the suffix array interval one pattern byte at a time, from
    /// the last byte to the first.
    ///
    /// The empty pattern matches every row, including the sentinel's.
    pub fn backward_search(&self, pattern: &[u8]) -> MatchInterval {
        let c_table = self.rank.c_table();
        let mut top = 0usize;
        let mut end = self.len();

        for &symbol in pattern.iter().rev() {
            let base = c_table.get(symbol);
            top = base + self.rank.rank(symbol, top);
            end = base + self.rank.rank(symbol, end);

            if top >= end {
                return MatchInterval::EMPTY;
            }
        }

        MatchInterval::from_bounds(top, end)
    }

    /// Number of rows in the suffix array interval of `pattern`
    pub fn count(&self, pattern: &[u8]) -> usize {
        self.backward_search(pattern).len()
    }

    pub fn contains(&self, pattern: &[u8]) -> bool {
        !self.backward_search(pattern).is_empty()
    }

    /// Text offsets of the rows in `interval`, ascending
    pub fn locate(&self, interval: MatchInterval) -> Vec<TextOffset> {
        let mut offsets = self.suffix_array[interval.rows()].to_vec();
        offsets.sort_unstable();
        offsets
    }

    /// Ascending offsets of every occurrence of `pattern` in the original
    /// text.
    ///
    /// Matches are reported only when they lie entirely before the
    /// sentinel, so the sentinel's own suffix is never an occurrence. An
    /// empty pattern occurs at every content offset.
    pub fn search(&self, pattern: &[u8]) -> Vec<TextOffset> {
        let content_len = self.content_len();
        if pattern.len() > content_len {
            return Vec::new();
        }

        let interval = self.backward_search(pattern);
        let mut offsets: Vec<TextOffset> = self.suffix_array[interval.rows()]
            .iter()
            .copied()
            .filter(|&pos| pos + pattern.len() <= content_len && pos < content_len)
            .collect();
        offsets.sort_unstable();
        offsets
    }

    /// Run many queries against this index in parallel
    pub fn search_many<P>(&self, patterns: &[P]) -> Vec<Vec<TextOffset>>
    where
        P: AsRef<[u8]> + Sync,
    {
        patterns
            .par_iter()
            .map(|pattern| self.search(pattern.as_ref()))
            .collect()
    }

    /// Recover the sentinel-terminated text from the BWT alone by walking
    /// LF-mapping backwards from the row of the whole text
    pub fn reconstruct_text(&self) -> Vec<u8> {
        let n = self.len();
        let bwt = self.rank.bwt();
        let sentinel = self.text.sentinel();

        // BWT[row] is the sentinel exactly when row holds the suffix at offset 0
        let Some(mut row) = memchr::memchr(sentinel, bwt) else {
            return Vec::new();
        };

        let mut text = vec![0u8; n];
        for slot in text.iter_mut().rev() {
            *slot = bwt[row];
            row = self.rank.lf(row);
        }
        text
    }

    /// Length of the indexed text, sentinel included
    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Always false: even an empty input is indexed as a lone sentinel
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Length of the original text, sentinel excluded
    #[inline]
    pub fn content_len(&self) -> usize {
        self.text.content_len()
    }

    pub fn text(&self) -> &SentinelText {
        &self.text
    }

    pub fn suffix_array(&self) -> &SuffixArray {
        &self.suffix_array
    }

    pub fn bwt(&self) -> &[u8] {
        self.rank.bwt()
    }

    pub fn c_table(&self) -> &CTable {
        self.rank.c_table()
    }

    pub fn rank_index(&self) -> &RankIndex {
        &self.rank
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Memory and shape summary
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            text_len: self.len(),
            content_len: self.content_len(),
            alphabet_size: self.config.alphabet.size(),
            distinct_symbols: (0..self.config.alphabet.size())
                .filter(|&c| self.c_table().count(c as u8) > 0)
                .count(),
            checkpoint_interval: self.config.checkpoint_interval,
            checkpoint_count: self.rank.occ().checkpoint_count(),
            text_bytes: self.text.as_bytes().len(),
            suffix_array_bytes: self.suffix_array.len() * std::mem::size_of::<TextOffset>(),
            bwt_bytes: self.rank.bwt().len(),
            c_table_bytes: self.c_table().heap_size(),
            occ_bytes: self.rank.occ().heap_size(),
        }
    }
}

//! Suffix array builder
//!
//! Sorts every suffix of a sentinel-terminated text, either with linear-time
//! SA-IS or with a comparison sort that serves as the reference ordering.

use super::sais::sais;
use crate::index::sentinel::SentinelText;
use crate::index::types::{Alphabet, IndexConfig, SuffixArrayAlgorithm, TextOffset};
use rayon::prelude::*;
use std::ops::Deref;

/// Texts longer than this are comparison-sorted in parallel
const PARALLEL_SORT_THRESHOLD: usize = 100_000;

/// Start offsets of all suffixes, in lexicographic order of the suffixes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixArray {
    positions: Vec<TextOffset>,
}

impl SuffixArray {
    pub fn as_slice(&self) -> &[TextOffset] {
        &self.positions
    }

    pub fn into_vec(self) -> Vec<TextOffset> {
        self.positions
    }

    /// Check that this is a permutation of `0..text.len()` whose suffixes
    /// are strictly increasing
    pub fn is_valid_for(&self, text: &[u8]) -> bool {
        if self.positions.len() != text.len() {
            return false;
        }

        let mut seen = vec![false; text.len()];
        for &pos in &self.positions {
            if pos >= text.len() || seen[pos] {
                return false;
            }
            seen[pos] = true;
        }

        self.positions
            .windows(2)
            .all(|pair| text[pair[0]..] < text[pair[1]..])
    }
}

impl Deref for SuffixArray {
    type Target = [TextOffset];

    fn deref(&self) -> &[TextOffset] {
        &self.positions
    }
}

/// Builder for suffix arrays over sentinel-terminated text
#[derive(Debug, Clone, Copy)]
pub struct SuffixArrayBuilder {
    algorithm: SuffixArrayAlgorithm,
    alphabet: Alphabet,
}

impl SuffixArrayBuilder {
    pub fn new(algorithm: SuffixArrayAlgorithm, alphabet: Alphabet) -> Self {
        Self {
            algorithm,
            alphabet,
        }
    }

    pub fn from_config(config: &IndexConfig) -> Self {
        Self::new(config.construction, config.alphabet)
    }

    /// Create a builder with default configuration
    pub fn with_defaults() -> Self {
        Self::from_config(&IndexConfig::default())
    }

    /// Sort all suffixes of `text`.
    ///
    /// The output is deterministic and identical for both algorithms.
    pub fn build(&self, text: &SentinelText) -> SuffixArray {
        let bytes = text.as_bytes();
        let positions = match self.algorithm {
            SuffixArrayAlgorithm::InducedSort => sais(bytes, self.alphabet.size()),
            SuffixArrayAlgorithm::Comparison => build_suffix_array_sorted(bytes),
        };

        tracing::debug!(
            n = bytes.len(),
            algorithm = ?self.algorithm,
            "suffix array built"
        );

        SuffixArray { positions }
    }
}

/// Build suffix array by sorting start positions
///
/// This approach:
/// 1. Creates array of all suffix positions [0, 1, 2, ..., n-1]
/// 2. Sorts positions by comparing the suffixes they point to
/// 3. Uses rayon for parallel sorting on large inputs
///
/// Time: O(n log n) comparisons, each up to O(n) on repetitive text
/// Space: O(n) for the suffix array
fn build_suffix_array_sorted(text: &[u8]) -> Vec<TextOffset> {
    let n = text.len();
    let mut sa: Vec<TextOffset> = (0..n).collect();

    // Suffixes are distinct, so unstable sorting is deterministic
    if n > PARALLEL_SORT_THRESHOLD {
        sa.par_sort_unstable_by(|&a, &b| text[a..].cmp(&text[b..]));
    } else {
        sa.sort_unstable_by(|&a, &b| text[a..].cmp(&text[b..]));
    }

    sa
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_both(text: &[u8], sentinel: u8) -> (SuffixArray, SuffixArray) {
        let text = SentinelText::new(text, sentinel).unwrap();
        let sais = SuffixArrayBuilder::new(SuffixArrayAlgorithm::InducedSort, Alphabet::BYTES)
            .build(&text);
        let sorted = SuffixArrayBuilder::new(SuffixArrayAlgorithm::Comparison, Alphabet::BYTES)
            .build(&text);
        (sais, sorted)
    }

    #[test]
    fn test_suffix_array_correctness() {
        let text = SentinelText::new(b"banana", 0).unwrap();
        let sa = SuffixArrayBuilder::with_defaults().build(&text);

        // Suffix array for "banana\0" should be:
        // 6: \0
        // 5: a\0
        // 3: ana\0
        // 1: anana\0
        // 0: banana\0
        // 4: na\0
        // 2: nana\0
        assert_eq!(sa.as_slice(), &[6, 5, 3, 1, 0, 4, 2]);
        assert!(sa.is_valid_for(text.as_bytes()));
    }

    #[test]
    fn test_sentinel_suffix_first() {
        let text = SentinelText::new(b"mississippi", 0).unwrap();
        let sa = SuffixArrayBuilder::with_defaults().build(&text);
        assert_eq!(sa[0], text.sentinel_position());
    }

    #[test]
    fn test_algorithms_agree() {
        let texts: [&[u8]; 6] = [
            b"",
            b"a",
            b"aaaaaaaa",
            b"mississippi",
            b"abracadabra abracadabra",
            b"tres tristes tigres comen trigo en un trigal",
        ];
        for text in texts {
            let (sais, sorted) = build_both(text, 0);
            assert_eq!(sais, sorted, "mismatch for {:?}", String::from_utf8_lossy(text));

            let (sais, sorted) = build_both(text, b'$');
            assert_eq!(sais, sorted);
        }
    }

    #[test]
    fn test_invalid_suffix_array_detected() {
        let text = b"abc\x00";
        let sa = SuffixArray {
            positions: vec![3, 1, 0, 2],
        };
        assert!(!sa.is_valid_for(text));

        let sa = SuffixArray {
            positions: vec![3, 0, 0, 2],
        };
        assert!(!sa.is_valid_for(text));
    }

    #[test]
    fn test_deterministic() {
        let text = SentinelText::new(b"the quick brown fox jumps over the lazy dog", 0).unwrap();
        let builder = SuffixArrayBuilder::with_defaults();
        assert_eq!(builder.build(&text), builder.build(&text));
    }
}

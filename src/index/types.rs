use crate::error::{IndexError, Result};
use serde::{Deserialize, Serialize};

/// Offset into the sentinel-terminated text
pub type TextOffset = usize;

/// Default sentinel byte. `0x00` sorts before every other byte, so the
/// sentinel's own suffix is always ranked first.
pub const DEFAULT_SENTINEL: u8 = 0x00;

/// Default number of BWT positions between two rank checkpoints
pub const DEFAULT_CHECKPOINT_INTERVAL: usize = 64;

/// Number of distinct byte values
pub const BYTE_ALPHABET_SIZE: usize = 256;

/// The set of symbols an index accepts: every byte value below `size`.
///
/// The C-table and every checkpoint row are sized to the alphabet, so a
/// 7-bit ASCII corpus indexed with `Alphabet::ascii()` halves the memory
/// spent on rank checkpoints compared to the full byte alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Alphabet {
    size: usize,
}

impl Alphabet {
    /// All 256 byte values
    pub const BYTES: Alphabet = Alphabet {
        size: BYTE_ALPHABET_SIZE,
    };

    pub fn new(size: usize) -> Result<Self> {
        if size == 0 || size > BYTE_ALPHABET_SIZE {
            return Err(IndexError::InvalidAlphabet(size));
        }
        Ok(Self { size })
    }

    /// 7-bit ASCII (bytes `0x00..=0x7f`)
    pub fn ascii() -> Self {
        Self { size: 128 }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn contains(&self, byte: u8) -> bool {
        (byte as usize) < self.size
    }

    /// Find the first byte of `text` outside this alphabet
    pub fn check(&self, text: &[u8]) -> Result<()> {
        if self.size == BYTE_ALPHABET_SIZE {
            return Ok(());
        }
        match text.iter().position(|&b| !self.contains(b)) {
            Some(offset) => Err(IndexError::SymbolOutOfAlphabet {
                byte: text[offset],
                offset,
                size: self.size,
            }),
            None => Ok(()),
        }
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::BYTES
    }
}

impl TryFrom<usize> for Alphabet {
    type Error = IndexError;

    fn try_from(size: usize) -> Result<Self> {
        Self::new(size)
    }
}

impl From<Alphabet> for usize {
    fn from(alphabet: Alphabet) -> Self {
        alphabet.size
    }
}

/// Suffix array construction strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuffixArrayAlgorithm {
    /// Linear-time SA-IS with recursion on reduced LMS names
    #[default]
    InducedSort,
    /// O(n log n) comparison sort of suffix start positions
    Comparison,
}

/// Configuration for building an FM-index
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Terminator appended to the text (default: 0x00)
    pub sentinel: u8,
    /// Positions between rank checkpoints. Checkpoint memory shrinks
    /// proportionally to `1 / checkpoint_interval` while each rank query
    /// scans up to `checkpoint_interval - 1` BWT bytes.
    pub checkpoint_interval: usize,
    /// Symbols the text may contain
    pub alphabet: Alphabet,
    /// Suffix array construction strategy
    pub construction: SuffixArrayAlgorithm,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            sentinel: DEFAULT_SENTINEL,
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
            alphabet: Alphabet::BYTES,
            construction: SuffixArrayAlgorithm::InducedSort,
        }
    }
}

impl IndexConfig {
    /// Check settings that do not depend on the text
    pub fn validate(&self) -> Result<()> {
        if self.checkpoint_interval == 0 {
            return Err(IndexError::InvalidCheckpointInterval);
        }
        if !self.alphabet.contains(self.sentinel) {
            return Err(IndexError::SymbolOutOfAlphabet {
                byte: self.sentinel,
                offset: 0,
                size: self.alphabet.size(),
            });
        }
        Ok(())
    }
}

/// Contiguous range `[top, bottom]` of suffix array rows.
///
/// `top > bottom` denotes the empty interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchInterval {
    pub top: usize,
    pub bottom: usize,
}

impl MatchInterval {
    /// The canonical empty interval
    pub const EMPTY: MatchInterval = MatchInterval { top: 1, bottom: 0 };

    /// Interval covering rows `top..end` (exclusive end); empty when `end <= top`
    pub fn from_bounds(top: usize, end: usize) -> Self {
        if end <= top {
            Self::EMPTY
        } else {
            Self {
                top,
                bottom: end - 1,
            }
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.top > self.bottom
    }

    #[inline]
    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.bottom - self.top + 1
        }
    }

    /// Rows as a half-open range, for slicing the suffix array
    pub fn rows(&self) -> std::ops::Range<usize> {
        if self.is_empty() {
            0..0
        } else {
            self.top..self.bottom + 1
        }
    }
}

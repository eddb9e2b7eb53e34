//! Benchmark pattern generation
//!
//! Patterns are either random printable ASCII or substrings sampled from a
//! corpus. Generation is driven by a caller-supplied seed so a benchmark can
//! be repeated on the same inputs.
//!
//! Pattern files store each pattern followed by [`PATTERN_TERMINATOR`]
//! (newline, ASCII file separator, newline), which lets patterns contain
//! plain newlines.

use crate::corpus::Corpus;
use anyhow::{Context, Result, bail, ensure};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Written after every pattern in a pattern file
pub const PATTERN_TERMINATOR: &[u8] = b"\n\x1c\n";

/// Printable ASCII range used for random patterns
const PRINTABLE: std::ops::RangeInclusive<u8> = 32..=126;

/// What kind of patterns to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Random printable ASCII, length drawn from `min_len..=max_len`
    Random { min_len: usize, max_len: usize },
    /// Substrings of the corpus, length drawn from `min_len..=max_len`
    /// and clipped at the end of the sampled file
    Existing { min_len: usize, max_len: usize },
}

impl PatternKind {
    fn lengths(&self) -> (usize, usize) {
        match *self {
            PatternKind::Random { min_len, max_len } | PatternKind::Existing { min_len, max_len } => {
                (min_len, max_len)
            }
        }
    }
}

/// Seedable pattern generator
pub struct PatternGenerator {
    rng: StdRng,
}

impl PatternGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded from the operating system
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Produce `count` patterns. `Existing` needs a corpus with at least
    /// one non-empty file.
    pub fn generate(
        &mut self,
        kind: PatternKind,
        count: usize,
        corpus: Option<&Corpus>,
    ) -> Result<Vec<Vec<u8>>> {
        let (min_len, max_len) = kind.lengths();
        ensure!(min_len >= 1, "minimum pattern length must be at least 1");
        ensure!(
            max_len >= min_len,
            "maximum pattern length ({}) is below the minimum ({})",
            max_len,
            min_len
        );

        match kind {
            PatternKind::Random { .. } => Ok((0..count)
                .map(|_| self.random_pattern(min_len, max_len))
                .collect()),
            PatternKind::Existing { .. } => {
                let Some(corpus) = corpus else {
                    bail!("existing patterns need a source corpus");
                };
                let sources: Vec<&[u8]> = corpus
                    .files()
                    .iter()
                    .map(|span| &corpus.text()[span.start..span.end])
                    .filter(|content| !content.is_empty())
                    .collect();
                ensure!(!sources.is_empty(), "source corpus has no text to sample");

                Ok((0..count)
                    .map(|_| {
                        let content = sources[self.rng.gen_range(0..sources.len())];
                        self.existing_pattern(content, min_len, max_len)
                    })
                    .collect())
            }
        }
    }

    fn random_pattern(&mut self, min_len: usize, max_len: usize) -> Vec<u8> {
        let len = self.rng.gen_range(min_len..=max_len);
        (0..len).map(|_| self.rng.gen_range(PRINTABLE)).collect()
    }

    fn existing_pattern(&mut self, content: &[u8], min_len: usize, max_len: usize) -> Vec<u8> {
        let start = self.rng.gen_range(0..content.len());
        let available = content.len() - start;
        let len = self.rng.gen_range(min_len..=max_len).min(available);
        content[start..start + len].to_vec()
    }
}

/// Write patterns in the terminated pattern-file format
pub fn write_patterns<W: Write>(mut writer: W, patterns: &[Vec<u8>]) -> std::io::Result<()> {
    for pattern in patterns {
        writer.write_all(pattern)?;
        writer.write_all(PATTERN_TERMINATOR)?;
    }
    writer.flush()
}

/// Split pattern-file content back into patterns.
///
/// Trailing bytes without a terminator form a final pattern.
pub fn parse_patterns(content: &[u8]) -> Vec<Vec<u8>> {
    let mut patterns = Vec::new();
    let mut rest = content;

    while !rest.is_empty() {
        match memchr::memmem::find(rest, PATTERN_TERMINATOR) {
            Some(end) => {
                patterns.push(rest[..end].to_vec());
                rest = &rest[end + PATTERN_TERMINATOR.len()..];
            }
            None => {
                patterns.push(rest.to_vec());
                break;
            }
        }
    }

    patterns
}

/// Read a pattern file from disk
pub fn read_pattern_file(path: &Path) -> Result<Vec<Vec<u8>>> {
    let content =
        fs::read(path).with_context(|| format!("Failed to read pattern file {}", path.display()))?;
    Ok(parse_patterns(&content))
}

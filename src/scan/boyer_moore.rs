//! Boyer-Moore scan
//!
//! Compares the pattern right to left and, on a mismatch, shifts by the
//! larger of two heuristics:
//!
//! - bad character: align the mismatched text byte with its last
//!   occurrence in the pattern
//! - good suffix: align the already-matched suffix with its next occurrence
//!   in the pattern, or with the longest pattern prefix that is a suffix of it

use super::Matcher;

/// Bad-character / good-suffix substring scan, sublinear on average
#[derive(Debug, Clone, Copy, Default)]
pub struct BoyerMoore;

impl Matcher for BoyerMoore {
    fn name(&self) -> &'static str {
        "boyer-moore"
    }

    fn find_all(&self, text: &[u8], pattern: &[u8]) -> Vec<usize> {
        let (n, m) = (text.len(), pattern.len());
        if m == 0 {
            return (0..n).collect();
        }
        if m > n {
            return Vec::new();
        }

        let last = last_occurrence(pattern);
        let good_suffix = good_suffix_shifts(pattern);
        let mut matches = Vec::new();
        let mut shift = 0;

        while shift <= n - m {
            // j is one past the rightmost unmatched pattern position
            let mut j = m;
            while j > 0 && pattern[j - 1] == text[shift + j - 1] {
                j -= 1;
            }

            if j == 0 {
                matches.push(shift);
                shift += good_suffix[0].max(1);
            } else {
                let mismatch = j - 1;
                let bad_char = mismatch as isize - last[text[shift + mismatch] as usize];
                shift += good_suffix[j].max(bad_char.max(1) as usize);
            }
        }

        matches
    }
}

/// Rightmost index of each byte in the pattern, -1 when absent
fn last_occurrence(pattern: &[u8]) -> [isize; 256] {
    let mut last = [-1isize; 256];
    for (i, &b) in pattern.iter().enumerate() {
        last[b as usize] = i as isize;
    }
    last
}

/// `shifts[j]` is the safe shift after a mismatch at pattern index `j - 1`;
/// `shifts[0]` is the shift after a full match (the pattern's period).
fn good_suffix_shifts(pattern: &[u8]) -> Vec<usize> {
    let m = pattern.len();
    let mut shifts = vec![0usize; m + 1];
    let mut border = vec![0usize; m + 1];

    // Matched suffix reoccurs elsewhere in the pattern
    let mut i = m;
    let mut j = m + 1;
    border[i] = j;
    while i > 0 {
        while j <= m && pattern[i - 1] != pattern[j - 1] {
            if shifts[j] == 0 {
                shifts[j] = j - i;
            }
            j = border[j];
        }
        i -= 1;
        j -= 1;
        border[i] = j;
    }

    // Only a prefix of the pattern matches part of the suffix
    let mut j = border[0];
    for i in 0..=m {
        if shifts[i] == 0 {
            shifts[i] = j;
        }
        if i == j {
            j = border[j];
        }
    }

    shifts
}

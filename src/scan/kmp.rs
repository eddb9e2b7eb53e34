//! Knuth-Morris-Pratt scan
//!
//! The failure table records, for every pattern prefix, the length of its
//! longest proper border. On a mismatch the scan falls back along borders
//! instead of re-reading text, so every text byte is examined once.

use super::Matcher;

/// Failure-function substring scan, O(n + m)
#[derive(Debug, Clone, Copy, Default)]
pub struct Kmp;

impl Matcher for Kmp {
    fn name(&self) -> &'static str {
        "kmp"
    }

    fn find_all(&self, text: &[u8], pattern: &[u8]) -> Vec<usize> {
        let m = pattern.len();
        if m == 0 {
            return (0..text.len()).collect();
        }
        if m > text.len() {
            return Vec::new();
        }

        let failure = failure_table(pattern);
        let mut matches = Vec::new();
        let mut k = 0;

        for (i, &b) in text.iter().enumerate() {
            while k > 0 && pattern[k] != b {
                k = failure[k - 1];
            }
            if pattern[k] == b {
                k += 1;
            }
            if k == m {
                matches.push(i + 1 - m);
                k = failure[k - 1];
            }
        }

        matches
    }
}

/// `table[i]` = length of the longest proper border of `pattern[..=i]`
fn failure_table(pattern: &[u8]) -> Vec<usize> {
    let mut table = vec![0usize; pattern.len()];
    let mut k = 0;

    for i in 1..pattern.len() {
        while k > 0 && pattern[i] != pattern[k] {
            k = table[k - 1];
        }
        if pattern[i] == pattern[k] {
            k += 1;
        }
        table[i] = k;
    }

    table
}

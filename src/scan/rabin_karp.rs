//! Rabin-Karp scan
//!
//! Keeps a polynomial hash of the current text window, updated in O(1) per
//! step, and verifies byte by byte only when the window hash equals the
//! pattern hash.

use super::Matcher;

const BASE: u64 = 256;
/// Prime modulus; all intermediate products stay below 2^40
const MODULUS: u64 = 1_000_000_007;

/// Rolling-hash substring scan, O(n + m) expected
#[derive(Debug, Clone, Copy, Default)]
pub struct RabinKarp;

impl Matcher for RabinKarp {
    fn name(&self) -> &'static str {
        "rabin-karp"
    }

    fn find_all(&self, text: &[u8], pattern: &[u8]) -> Vec<usize> {
        let (n, m) = (text.len(), pattern.len());
        if m == 0 {
            return (0..n).collect();
        }
        if m > n {
            return Vec::new();
        }

        let pattern_hash = hash(pattern);
        let mut window_hash = hash(&text[..m]);

        // Weight of the byte leaving the window: BASE^(m-1)
        let mut high = 1;
        for _ in 1..m {
            high = high * BASE % MODULUS;
        }

        let mut matches = Vec::new();
        for i in 0..=n - m {
            if window_hash == pattern_hash && &text[i..i + m] == pattern {
                matches.push(i);
            }
            if i < n - m {
                let outgoing = text[i] as u64 * high % MODULUS;
                window_hash = ((window_hash + MODULUS - outgoing) * BASE + text[i + m] as u64) % MODULUS;
            }
        }

        matches
    }
}

fn hash(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(0, |h, &b| (h * BASE + b as u64) % MODULUS)
}

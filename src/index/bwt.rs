//! Burrows-Wheeler transform
//!
//! Row `i` of the BWT is the byte preceding the `i`-th smallest suffix,
//! wrapping around to the sentinel for the suffix starting at offset 0.

use crate::index::types::TextOffset;

/// Derive the BWT of `text` from its suffix array
pub fn build_bwt(text: &[u8], suffix_array: &[TextOffset]) -> Vec<u8> {
    debug_assert_eq!(text.len(), suffix_array.len());
    let n = text.len();

    suffix_array
        .iter()
        .map(|&pos| text[(pos + n - 1) % n])
        .collect()
}

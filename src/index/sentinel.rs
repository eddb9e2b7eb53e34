//! Sentinel-terminated text
//!
//! Every suffix array built by this crate is over a text whose last byte is
//! a sentinel that occurs nowhere else. This module owns that invariant.

use crate::error::{IndexError, Result};

/// Immutable text with exactly one sentinel, positioned last
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentinelText {
    bytes: Vec<u8>,
    sentinel: u8,
}

impl SentinelText {
    /// Terminate `text` with `sentinel`.
    ///
    /// The sentinel is always appended, so every byte of `text` is content.
    /// An empty text becomes the single-sentinel text of length 1. Any
    /// occurrence of the sentinel in `text`, including a trailing one, is
    /// rejected.
    pub fn new(text: &[u8], sentinel: u8) -> Result<Self> {
        if let Some(offset) = memchr::memchr(sentinel, text) {
            return Err(IndexError::SentinelInText { sentinel, offset });
        }
        Ok(Self::terminate(text, sentinel))
    }

    /// Wrap a text the caller has already terminated.
    ///
    /// A trailing sentinel is taken as the terminator and not appended
    /// again. Any earlier occurrence is rejected.
    pub fn from_terminated(text: &[u8], sentinel: u8) -> Result<Self> {
        let content = match text.last() {
            Some(&last) if last == sentinel => &text[..text.len() - 1],
            _ => text,
        };
        Self::new(content, sentinel)
    }

    fn terminate(content: &[u8], sentinel: u8) -> Self {
        let mut bytes = Vec::with_capacity(content.len() + 1);
        bytes.extend_from_slice(content);
        bytes.push(sentinel);
        Self { bytes, sentinel }
    }

    /// Full text including the terminal sentinel
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Text without the terminal sentinel
    #[inline]
    pub fn content(&self) -> &[u8] {
        &self.bytes[..self.bytes.len() - 1]
    }

    /// Length including the sentinel (always at least 1)
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.len() == 1
    }

    #[inline]
    pub fn content_len(&self) -> usize {
        self.bytes.len() - 1
    }

    #[inline]
    pub fn sentinel(&self) -> u8 {
        self.sentinel
    }

    /// Offset of the sentinel, `len() - 1`
    #[inline]
    pub fn sentinel_position(&self) -> usize {
        self.bytes.len() - 1
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_sentinel() {
        let text = SentinelText::new(b"banana", 0).unwrap();
        assert_eq!(text.as_bytes(), b"banana\x00");
        assert_eq!(text.content(), b"banana");
        assert_eq!(text.len(), 7);
        assert_eq!(text.sentinel_position(), 6);
    }

    #[test]
    fn test_trailing_sentinel_is_content() {
        let err = SentinelText::new(b"banana$", b'$').unwrap_err();
        assert_eq!(
            err,
            IndexError::SentinelInText {
                sentinel: b'$',
                offset: 6
            }
        );
        assert!(SentinelText::new(b"\x00", 0).is_err());
    }

    #[test]
    fn test_existing_terminal_sentinel_kept_once() {
        let text = SentinelText::from_terminated(b"banana$", b'$').unwrap();
        assert_eq!(text.as_bytes(), b"banana$");
        assert_eq!(text.content_len(), 6);

        // Unterminated input is terminated as usual
        let text = SentinelText::from_terminated(b"banana", b'$').unwrap();
        assert_eq!(text.as_bytes(), b"banana$");
    }

    #[test]
    fn test_empty_text() {
        let text = SentinelText::new(b"", 0).unwrap();
        assert_eq!(text.as_bytes(), b"\x00");
        assert!(text.is_empty());
        assert_eq!(text.content_len(), 0);
    }

    #[test]
    fn test_rejects_inner_sentinel() {
        let err = SentinelText::new(b"ba$nana", b'$').unwrap_err();
        assert_eq!(
            err,
            IndexError::SentinelInText {
                sentinel: b'$',
                offset: 2
            }
        );

        // Two trailing sentinels: only the last is the terminator
        assert!(SentinelText::from_terminated(b"banana$$", b'$').is_err());
        assert!(SentinelText::from_terminated(b"ba$nana$", b'$').is_err());
    }
}

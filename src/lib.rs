//! # fmgrep - FM-index substring search
//!
//! fmgrep answers exact substring queries over a byte corpus. It builds a
//! compressed full-text index (suffix array, Burrows-Wheeler transform and
//! checkpointed rank tables) once and then counts or locates any pattern
//! in time proportional to the pattern length.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`index`] - FM-index construction (SA-IS, BWT, rank) and backward search
//! - [`scan`] - Index-free scanners (KMP, Boyer-Moore, Rabin-Karp) with the same contract
//! - [`corpus`] - File and folder ingestion, per-file match attribution
//! - [`timing`] - Explicit timing context for benchmarks
//! - [`patterns`] - Benchmark pattern generation and pattern files
//! - [`output`] - Result formatting (colored counts, JSON, CSV)
//!
//! ## Quick Start
//!
//! ```
//! use fmgrep::index::FmIndex;
//!
//! let index = FmIndex::build(b"banana de ana").unwrap();
//! assert_eq!(index.search(b"ana"), vec![1, 3, 10]);
//! assert_eq!(index.count(b"xyz"), 0);
//! ```
//!
//! ## Performance
//!
//! Construction is linear (SA-IS). A query costs two rank lookups per
//! pattern byte; each lookup reads one checkpoint row and scans at most
//! `checkpoint_interval - 1` BWT bytes. A built [`index::FmIndex`] is
//! immutable and can be queried from many threads at once.

pub mod corpus;
pub mod error;
pub mod index;
pub mod output;
pub mod patterns;
pub mod progress;
pub mod scan;
pub mod timing;

pub use error::{IndexError, Result};
pub use index::{FmIndex, IndexConfig, MatchInterval};
pub use scan::{Matcher, Strategy};

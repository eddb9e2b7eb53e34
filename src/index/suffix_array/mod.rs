//! Suffix array construction
//!
//! ## Architecture
//!
//! - `sais`: linear-time induced sorting (SA-IS) with an explicit level stack
//! - `builder`: algorithm selection and the comparison-sort reference
//!
//! Input is always a [`SentinelText`](crate::index::SentinelText): the
//! sentinel occurs exactly once, in the last position.

pub mod builder;
pub mod sais;

// Re-exports for convenience
pub use builder::{SuffixArray, SuffixArrayBuilder};
pub use sais::sais;

//! FM-index construction and backward search
//!
//! ## Architecture
//!
//! - `sentinel`: terminates the text with a unique sentinel byte
//! - `suffix_array`: SA-IS suffix sorting
//! - `bwt`: Burrows-Wheeler transform from text and suffix array
//! - `rank`: C-table and checkpointed occurrence counts
//! - `fm_index`: the assembled index and backward search
//! - `stats`: memory report
//! - `types`: configuration and shared types

pub mod bwt;
pub mod fm_index;
pub mod rank;
pub mod sentinel;
pub mod stats;
pub mod suffix_array;
pub mod types;

pub use fm_index::FmIndex;
pub use rank::{CTable, OccCheckpoints, RankIndex};
pub use sentinel::SentinelText;
pub use stats::IndexStats;
pub use suffix_array::{SuffixArray, SuffixArrayBuilder};
pub use types::*;

//! Substring search strategies.
//!
//! Every strategy satisfies the same contract: given a text and a pattern,
//! return the ascending offsets of all (possibly overlapping) occurrences.
//! The empty pattern occurs at every offset of the text; a pattern longer
//! than the text occurs nowhere.
//!
//! ## Modules
//!
//! - [`kmp`] - failure-function scan
//! - [`boyer_moore`] - bad-character / good-suffix scan
//! - [`rabin_karp`] - rolling-hash scan
//!
//! The FM-index strategy builds an [`FmIndex`] first and then answers the
//! query by backward search; [`Strategy::run`] times the two phases
//! separately.

pub mod boyer_moore;
pub mod kmp;
pub mod rabin_karp;

pub use boyer_moore::BoyerMoore;
pub use kmp::Kmp;
pub use rabin_karp::RabinKarp;

use crate::error::Result;
use crate::index::{FmIndex, IndexConfig};
use crate::timing::TimingContext;
use serde::{Deserialize, Serialize};

/// Label under which index construction is timed
pub const BUILD_LABEL: &str = "build";
/// Label under which the query itself is timed
pub const SEARCH_LABEL: &str = "search";

/// A stateless substring scanner
pub trait Matcher {
    fn name(&self) -> &'static str;

    /// Ascending offsets of every occurrence of `pattern` in `text`
    fn find_all(&self, text: &[u8], pattern: &[u8]) -> Vec<usize>;
}

/// Selectable search strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    Kmp,
    BoyerMoore,
    RabinKarp,
    FmIndex,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Kmp,
        Strategy::BoyerMoore,
        Strategy::RabinKarp,
        Strategy::FmIndex,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Kmp => Kmp.name(),
            Strategy::BoyerMoore => BoyerMoore.name(),
            Strategy::RabinKarp => RabinKarp.name(),
            Strategy::FmIndex => "fm-index",
        }
    }

    /// The scanner behind this strategy, if it needs no index
    pub fn matcher(&self) -> Option<&'static dyn Matcher> {
        match self {
            Strategy::Kmp => Some(&Kmp),
            Strategy::BoyerMoore => Some(&BoyerMoore),
            Strategy::RabinKarp => Some(&RabinKarp),
            Strategy::FmIndex => None,
        }
    }

    /// Search `text` for `pattern`, recording the index build (FM-index
    /// only) and the query in `timing`
    pub fn run(
        &self,
        text: &[u8],
        pattern: &[u8],
        config: &IndexConfig,
        timing: &mut TimingContext,
    ) -> Result<Vec<usize>> {
        match self.matcher() {
            Some(matcher) => Ok(timing.measure(SEARCH_LABEL, || matcher.find_all(text, pattern))),
            None => {
                let index = timing.measure(BUILD_LABEL, || FmIndex::with_config(text, config))?;
                Ok(timing.measure(SEARCH_LABEL, || index.search(pattern)))
            }
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

//! SA-IS: suffix array construction by induced sorting
//!
//! ```text
//! text      b  a  n  a  n  a  $  ⊥
//! type      L  S  L  S  L  L  L  S      (⊥ = virtual terminator)
//! LMS          *     *           *
//! ```
//!
//! 1. Classify positions as S or L type, right to left.
//! 2. Seed LMS positions at the tails of their buckets and induce L types
//!    left to right, then S types right to left. Afterwards the LMS
//!    *substrings* are sorted.
//! 3. Name the LMS substrings. If every name is distinct the LMS suffixes
//!    are sorted too; otherwise the string of names is a smaller instance of
//!    the same problem.
//! 4. Induce the full suffix array from the sorted LMS suffixes.
//!
//! Step 3 recurses in the textbook presentation. Here every reduction is a
//! [`Level`] pushed on an explicit stack: the descent stops at the first
//! level with distinct names, and the ascent induces each parent from the
//! suffix array of its child. Levels shrink at least by half, so the whole
//! stack stays within O(n) memory.
//!
//! The input is mapped to symbols `byte + 1` and extended with a virtual
//! terminator `0`, so the caller's sentinel need not be the smallest byte;
//! it only has to be unique.

const EMPTY: usize = usize::MAX;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum SuffixType {
    /// Suffix is smaller than the one starting one position later
    S,
    /// Suffix is larger than the one starting one position later
    L,
}

/// Outcome of naming the LMS substrings of a level
enum Naming {
    /// All LMS substrings differ; LMS indices in sorted order
    Unique(Vec<usize>),
    /// Some LMS substrings repeat; the names in text order must be sorted
    Repeated { reduced: Vec<usize>, names: usize },
}

/// One instance of the suffix sorting problem
struct Level {
    text: Vec<usize>,
    types: Vec<SuffixType>,
    lms: Vec<usize>,
    bucket_sizes: Vec<usize>,
}

impl Level {
    /// `text` must end with a unique smallest symbol `0`
    fn new(text: Vec<usize>, alphabet_size: usize) -> Self {
        let types = classify(&text);
        let lms = (1..text.len()).filter(|&i| is_lms(&types, i)).collect();

        let mut bucket_sizes = vec![0usize; alphabet_size];
        for &c in &text {
            bucket_sizes[c] += 1;
        }

        Self {
            text,
            types,
            lms,
            bucket_sizes,
        }
    }

    fn len(&self) -> usize {
        self.text.len()
    }

    fn name_lms_substrings(&self) -> Naming {
        let n = self.len();
        let mut sa = vec![EMPTY; n];
        self.induce(&mut sa, self.lms.iter().copied());

        let mut names = vec![EMPTY; n];
        let mut name = 0usize;
        let mut prev: Option<usize> = None;

        for &pos in &sa {
            if pos == EMPTY || !is_lms(&self.types, pos) {
                continue;
            }
            if let Some(prev) = prev {
                if !self.lms_substrings_equal(prev, pos) {
                    name += 1;
                }
            }
            names[pos] = name;
            prev = Some(pos);
        }

        let distinct = name + 1;
        let reduced: Vec<usize> = self.lms.iter().map(|&pos| names[pos]).collect();

        if distinct == self.lms.len() {
            let mut order = vec![0usize; distinct];
            for (index, &name) in reduced.iter().enumerate() {
                order[name] = index;
            }
            Naming::Unique(order)
        } else {
            Naming::Repeated {
                reduced,
                names: distinct,
            }
        }
    }

    /// Build this level's suffix array from its LMS suffixes in sorted
    /// order, given as indices into `self.lms`
    fn induce_from(&self, lms_order: &[usize]) -> Vec<usize> {
        let mut sa = vec![EMPTY; self.len()];
        self.induce(&mut sa, lms_order.iter().map(|&k| self.lms[k]));
        sa
    }

    fn induce(&self, sa: &mut [usize], lms: impl DoubleEndedIterator<Item = usize>) {
        let n = self.len();
        let text = &self.text;

        let mut tails = bucket_tails(&self.bucket_sizes);
        for pos in lms.rev() {
            let c = text[pos];
            tails[c] -= 1;
            sa[tails[c]] = pos;
        }

        let mut heads = bucket_heads(&self.bucket_sizes);
        for i in 0..n {
            let pos = sa[i];
            if pos == EMPTY || pos == 0 {
                continue;
            }
            let j = pos - 1;
            if self.types[j] == SuffixType::L {
                let c = text[j];
                sa[heads[c]] = j;
                heads[c] += 1;
            }
        }

        let mut tails = bucket_tails(&self.bucket_sizes);
        for i in (0..n).rev() {
            let pos = sa[i];
            if pos == EMPTY || pos == 0 {
                continue;
            }
            let j = pos - 1;
            if self.types[j] == SuffixType::S {
                let c = text[j];
                tails[c] -= 1;
                sa[tails[c]] = j;
            }
        }
    }

    /// Compare the LMS substrings starting at `a` and `b`: equal symbols
    /// and types up to and including the next LMS position
    fn lms_substrings_equal(&self, a: usize, b: usize) -> bool {
        let last = self.len() - 1;
        if a == last || b == last {
            return a == b;
        }

        let mut i = 0;
        loop {
            let (x, y) = (a + i, b + i);
            if self.text[x] != self.text[y] || self.types[x] != self.types[y] {
                return false;
            }
            if i > 0 {
                let x_lms = is_lms(&self.types, x);
                let y_lms = is_lms(&self.types, y);
                if x_lms && y_lms {
                    return true;
                }
                if x_lms != y_lms {
                    return false;
                }
            }
            i += 1;
        }
    }
}

/// Sort all suffixes of `text` and return their start offsets in
/// lexicographic order, a proper prefix sorting first.
///
/// `alphabet_size` bounds the byte values of `text`.
pub fn sais(text: &[u8], alphabet_size: usize) -> Vec<usize> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut symbols: Vec<usize> = Vec::with_capacity(text.len() + 1);
    symbols.extend(text.iter().map(|&b| b as usize + 1));
    symbols.push(0);

    let mut pending: Vec<Level> = Vec::new();
    let mut level = Level::new(symbols, alphabet_size + 1);

    let mut sa = loop {
        match level.name_lms_substrings() {
            Naming::Unique(order) => break level.induce_from(&order),
            Naming::Repeated { reduced, names } => {
                let child = Level::new(reduced, names);
                pending.push(std::mem::replace(&mut level, child));
            }
        }
    };

    let depth = pending.len();
    while let Some(parent) = pending.pop() {
        sa = parent.induce_from(&sa);
    }
    tracing::trace!(n = text.len(), depth, "SA-IS reduction levels");

    // Row 0 is the virtual terminator
    sa.remove(0);
    sa
}

fn classify(text: &[usize]) -> Vec<SuffixType> {
    let n = text.len();
    let mut types = vec![SuffixType::S; n];

    for i in (0..n.saturating_sub(1)).rev() {
        types[i] = if text[i] < text[i + 1]
            || (text[i] == text[i + 1] && types[i + 1] == SuffixType::S)
        {
            SuffixType::S
        } else {
            SuffixType::L
        };
    }

    types
}

#[inline]
fn is_lms(types: &[SuffixType], i: usize) -> bool {
    i > 0 && types[i] == SuffixType::S && types[i - 1] == SuffixType::L
}

fn bucket_heads(sizes: &[usize]) -> Vec<usize> {
    let mut heads = Vec::with_capacity(sizes.len());
    let mut sum = 0;
    for &size in sizes {
        heads.push(sum);
        sum += size;
    }
    heads
}

fn bucket_tails(sizes: &[usize]) -> Vec<usize> {
    let mut tails = Vec::with_capacity(sizes.len());
    let mut sum = 0;
    for &size in sizes {
        sum += size;
        tails.push(sum);
    }
    tails
}

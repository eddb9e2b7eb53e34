//! Corpus ingestion
//!
//! Turns a file or a folder into one searchable byte sequence and keeps the
//! bookkeeping needed to attribute match offsets back to files.
//!
//! A folder is walked with the `ignore` crate (hidden and gitignored
//! entries skipped by default), files are read in parallel, and their
//! contents are joined with [`FILE_SEPARATOR`]. A single file is
//! memory-mapped and searched in place. Both paths skip binary and
//! oversized files.

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use memmap2::Mmap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::ops::Deref;
use std::path::{Path, PathBuf};

/// Byte placed between consecutive files (ASCII record separator)
pub const FILE_SEPARATOR: u8 = 0x1E;

/// How much of a file is sampled for binary detection
const BINARY_SAMPLE_SIZE: usize = 8192;

/// Options for loading a corpus
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Stop after this many files (in path order)
    pub max_files: Option<usize>,
    /// Only load files whose path relative to the root matches one of these globs
    pub include: Vec<String>,
    /// Descend into hidden files and directories
    pub hidden: bool,
    /// Honor .gitignore, global git excludes and .git/info/exclude
    pub respect_gitignore: bool,
    /// Skip files larger than this (bytes)
    pub max_file_size: u64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            max_files: None,
            include: Vec::new(),
            hidden: false,
            respect_gitignore: true,
            max_file_size: 64 * 1024 * 1024, // 64MB
        }
    }
}

/// Why a file was left out of the corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Binary,
    TooLarge(u64),
    Unreadable(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Binary => write!(f, "binary content"),
            SkipReason::TooLarge(size) => write!(f, "too large ({} bytes)", size),
            SkipReason::Unreadable(err) => write!(f, "unreadable: {}", err),
        }
    }
}

/// Progress events emitted while loading.
///
/// `FileRead` and `Skipped` may arrive from several threads at once.
#[derive(Debug)]
pub enum LoadProgress<'a> {
    Discovered { files: usize },
    FileRead { path: &'a Path, bytes: usize },
    Skipped { path: &'a Path, reason: &'a SkipReason },
    Finished { files: usize, bytes: usize },
}

/// Callback that ignores progress
pub fn no_progress(_: LoadProgress<'_>) {}

/// Location of one file's content in the corpus text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSpan {
    pub path: PathBuf,
    /// Offset of the first byte (inclusive)
    pub start: usize,
    /// Offset one past the last byte (exclusive, before any separator)
    pub end: usize,
}

impl FileSpan {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// Number of matches attributed to one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileMatches {
    pub path: PathBuf,
    pub count: usize,
}

/// Corpus bytes, either owned or mapped from a single file
enum CorpusText {
    Owned(Vec<u8>),
    Mapped(Mmap),
}

impl Deref for CorpusText {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            CorpusText::Owned(bytes) => bytes,
            CorpusText::Mapped(mmap) => mmap,
        }
    }
}

/// Searchable text plus the file layout inside it
pub struct Corpus {
    text: CorpusText,
    files: Vec<FileSpan>,
    skipped: usize,
}

impl Corpus {
    /// Load a single file or every eligible file below a folder
    pub fn load(
        path: &Path,
        options: &LoadOptions,
        progress: &(dyn Fn(LoadProgress<'_>) + Sync),
    ) -> Result<Self> {
        let metadata = fs::metadata(path)
            .with_context(|| format!("Cannot access {}", path.display()))?;

        if metadata.is_file() {
            Self::load_file(path, options, progress)
        } else {
            Self::load_folder(path, options, progress)
        }
    }

    /// Map one file; the whole text is a single span.
    ///
    /// The file passes the same size and binary checks as a folder entry.
    /// A rejected file yields an empty corpus with one skipped file.
    fn load_file(
        path: &Path,
        options: &LoadOptions,
        progress: &(dyn Fn(LoadProgress<'_>) + Sync),
    ) -> Result<Self> {
        progress(LoadProgress::Discovered { files: 1 });

        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let size = file
            .metadata()
            .with_context(|| format!("Failed to read metadata for {}", path.display()))?
            .len();
        if size > options.max_file_size {
            return Ok(Self::skipped_file(path, SkipReason::TooLarge(size), progress));
        }

        // Zero-length files cannot be mapped on every platform
        let text = if size == 0 {
            CorpusText::Owned(Vec::new())
        } else {
            let mmap = unsafe { Mmap::map(&file) }
                .with_context(|| format!("Failed to map {}", path.display()))?;
            CorpusText::Mapped(mmap)
        };
        if is_binary(&text) {
            return Ok(Self::skipped_file(path, SkipReason::Binary, progress));
        }

        let len = text.len();
        progress(LoadProgress::FileRead { path, bytes: len });
        progress(LoadProgress::Finished {
            files: 1,
            bytes: len,
        });

        Ok(Self {
            text,
            files: vec![FileSpan {
                path: path.to_path_buf(),
                start: 0,
                end: len,
            }],
            skipped: 0,
        })
    }

    fn skipped_file(
        path: &Path,
        reason: SkipReason,
        progress: &(dyn Fn(LoadProgress<'_>) + Sync),
    ) -> Self {
        tracing::warn!(path = %path.display(), %reason, "skipping file");
        progress(LoadProgress::Skipped {
            path,
            reason: &reason,
        });
        progress(LoadProgress::Finished { files: 0, bytes: 0 });

        Self {
            text: CorpusText::Owned(Vec::new()),
            files: Vec::new(),
            skipped: 1,
        }
    }

    fn load_folder(
        root: &Path,
        options: &LoadOptions,
        progress: &(dyn Fn(LoadProgress<'_>) + Sync),
    ) -> Result<Self> {
        let include = build_globset(&options.include)?;
        let mut paths = discover_files(root, options, include.as_ref());
        if let Some(limit) = options.max_files {
            paths.truncate(limit);
        }
        progress(LoadProgress::Discovered { files: paths.len() });

        let contents: Vec<(PathBuf, Result<Vec<u8>, SkipReason>)> = paths
            .into_par_iter()
            .map(|path| {
                let result = read_text_file(&path, options.max_file_size);
                match &result {
                    Ok(bytes) => progress(LoadProgress::FileRead {
                        path: &path,
                        bytes: bytes.len(),
                    }),
                    Err(reason) => {
                        tracing::warn!(path = %path.display(), %reason, "skipping file");
                        progress(LoadProgress::Skipped {
                            path: &path,
                            reason,
                        });
                    }
                }
                (path, result)
            })
            .collect();

        let mut skipped = 0;
        let files: Vec<(PathBuf, Vec<u8>)> = contents
            .into_iter()
            .filter_map(|(path, result)| match result {
                Ok(bytes) => Some((path, bytes)),
                Err(_) => {
                    skipped += 1;
                    None
                }
            })
            .collect();

        let mut corpus = Self::from_files(files);
        corpus.skipped = skipped;

        tracing::info!(
            root = %root.display(),
            files = corpus.files.len(),
            skipped,
            bytes = corpus.len(),
            "corpus loaded"
        );
        progress(LoadProgress::Finished {
            files: corpus.files.len(),
            bytes: corpus.len(),
        });

        Ok(corpus)
    }

    /// Build a corpus from in-memory files, joined by [`FILE_SEPARATOR`]
    pub fn from_files(files: Vec<(PathBuf, Vec<u8>)>) -> Self {
        let total: usize = files.iter().map(|(_, bytes)| bytes.len() + 1).sum();
        let mut text = Vec::with_capacity(total);
        let mut spans = Vec::with_capacity(files.len());

        for (i, (path, bytes)) in files.into_iter().enumerate() {
            if i > 0 {
                text.push(FILE_SEPARATOR);
            }
            let start = text.len();
            text.extend_from_slice(&bytes);
            spans.push(FileSpan {
                path,
                start,
                end: text.len(),
            });
        }

        Self {
            text: CorpusText::Owned(text),
            files: spans,
            skipped: 0,
        }
    }

    pub fn text(&self) -> &[u8] {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn files(&self) -> &[FileSpan] {
        &self.files
    }

    /// Files left out (binary, too large, unreadable)
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Exclusive end offset of every file, in corpus order
    pub fn end_offsets(&self) -> Vec<usize> {
        self.files.iter().map(|span| span.end).collect()
    }

    /// File whose content contains `offset`, by binary search.
    ///
    /// Separator bytes belong to no file.
    pub fn file_for_offset(&self, offset: usize) -> Option<&FileSpan> {
        let idx = self
            .files
            .binary_search_by(|span| {
                if offset < span.start {
                    std::cmp::Ordering::Greater
                } else if offset >= span.end {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .ok()?;

        Some(&self.files[idx])
    }

    /// Count matches per file by merging ascending `offsets` against the
    /// file spans in one pass. Every file is listed, including those
    /// without matches.
    pub fn matches_per_file(&self, offsets: &[usize]) -> Vec<FileMatches> {
        let mut counts: Vec<FileMatches> = self
            .files
            .iter()
            .map(|span| FileMatches {
                path: span.path.clone(),
                count: 0,
            })
            .collect();

        let mut next = 0;
        for (slot, span) in counts.iter_mut().zip(&self.files) {
            while next < offsets.len() && offsets[next] < span.start {
                next += 1;
            }
            while next < offsets.len() && offsets[next] < span.end {
                slot.count += 1;
                next += 1;
            }
        }

        counts
    }
}

fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern).with_context(|| format!("Invalid glob: {}", pattern))?);
    }
    Ok(Some(builder.build()?))
}

/// Walk `root` and return eligible file paths in sorted order
fn discover_files(root: &Path, options: &LoadOptions, include: Option<&GlobSet>) -> Vec<PathBuf> {
    let walker = WalkBuilder::new(root)
        .hidden(!options.hidden)
        .git_ignore(options.respect_gitignore)
        .git_global(options.respect_gitignore)
        .git_exclude(options.respect_gitignore)
        .filter_entry(|entry| entry.file_name() != ".git")
        .build();

    let mut paths: Vec<PathBuf> = walker
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .map(|entry| entry.into_path())
        .filter(|path| match include {
            Some(globs) => path
                .strip_prefix(root)
                .map(|rel| globs.is_match(rel))
                .unwrap_or(false),
            None => true,
        })
        .collect();

    paths.sort();
    paths
}

fn read_text_file(path: &Path, max_file_size: u64) -> Result<Vec<u8>, SkipReason> {
    let size = fs::metadata(path)
        .map_err(|e| SkipReason::Unreadable(e.to_string()))?
        .len();
    if size > max_file_size {
        return Err(SkipReason::TooLarge(size));
    }

    let content = fs::read(path).map_err(|e| SkipReason::Unreadable(e.to_string()))?;
    if is_binary(&content) {
        return Err(SkipReason::Binary);
    }
    Ok(content)
}

/// Check if content is likely binary
///
/// Any NUL byte marks a file as binary (NUL is the default sentinel and
/// would make the corpus unindexable). Otherwise the first 8KB are sampled
/// for a high ratio of control bytes.
pub fn is_binary(content: &[u8]) -> bool {
    if memchr::memchr(0, content).is_some() {
        return true;
    }

    let sample = &content[..content.len().min(BINARY_SAMPLE_SIZE)];
    let non_text_count = sample
        .iter()
        .filter(|&&b| b < 0x20 && b != b'\n' && b != b'\r' && b != b'\t')
        .count();

    non_text_count > sample.len() / 8
}

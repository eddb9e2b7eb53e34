use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use fmgrep::corpus::{Corpus, LoadOptions};
use fmgrep::index::{FmIndex, IndexConfig, stats};
use fmgrep::output::{self, BENCH_CSV_HEADER, BenchRow, ColorWhen, SearchReport};
use fmgrep::patterns::{self, PatternGenerator, PatternKind};
use fmgrep::progress::LoadProgressBar;
use fmgrep::scan::{self, Strategy};
use fmgrep::timing::TimingContext;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fmgrep")]
#[command(about = "Substring search over files with an FM-index and classic scanners")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Hide progress bars
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Count occurrences of a pattern per file
    Search {
        /// Search strategy
        #[arg(value_enum)]
        strategy: Strategy,

        /// File or folder to search
        path: PathBuf,

        /// Pattern to search for
        pattern: String,

        #[command(flatten)]
        index: IndexArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// When to use colors
        #[arg(long, value_enum, default_value_t = ColorWhen::Auto)]
        color: ColorWhen,
    },
    /// Time every pattern of a pattern file and print CSV rows
    Bench {
        /// File or folder to search
        path: PathBuf,

        /// Pattern file (patterns terminated by "\n\x1c\n")
        #[arg(short, long)]
        patterns: PathBuf,

        /// Strategies to run (default: all)
        #[arg(short, long, value_enum)]
        strategy: Vec<Strategy>,

        #[command(flatten)]
        index: IndexArgs,
    },
    /// Generate a pattern file
    Patterns {
        /// Number of patterns
        count: usize,

        /// Random printable ASCII or substrings of a source corpus
        #[arg(value_enum)]
        kind: PatternKindArg,

        /// Corpus to sample from (existing patterns)
        #[arg(long)]
        source: Option<PathBuf>,

        /// Minimum pattern length
        #[arg(long, default_value_t = 1)]
        min_len: usize,

        /// Maximum pattern length
        #[arg(long, default_value_t = 32)]
        max_len: usize,

        /// RNG seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Build the FM-index and show its size
    Stats {
        /// File or folder to index
        path: PathBuf,

        #[command(flatten)]
        index: IndexArgs,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Corpus and index options shared by several subcommands
#[derive(Args)]
struct IndexArgs {
    /// Load at most this many files
    #[arg(short = 'n', long)]
    files: Option<usize>,

    /// Rank checkpoint interval
    #[arg(short = 'k', long)]
    checkpoint: Option<usize>,

    /// Sentinel byte: a single character or a hex value like 0x24
    #[arg(long, value_parser = parse_byte)]
    sentinel: Option<u8>,

    /// JSON file with index configuration
    #[arg(long)]
    config: Option<PathBuf>,
}

impl IndexArgs {
    fn index_config(&self) -> Result<IndexConfig> {
        let mut config = match &self.config {
            Some(path) => read_index_config(path)?,
            None => IndexConfig::default(),
        };
        if let Some(interval) = self.checkpoint {
            config.checkpoint_interval = interval;
        }
        if let Some(sentinel) = self.sentinel {
            config.sentinel = sentinel;
        }
        config.validate()?;
        Ok(config)
    }

    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            max_files: self.files,
            ..Default::default()
        }
    }
}

/// Load an index configuration from a JSON file. Missing fields take defaults.
fn read_index_config(path: &Path) -> Result<IndexConfig> {
    let data = fs::read(path)
        .with_context(|| format!("Failed to read index config {}", path.display()))?;
    serde_json::from_slice(&data)
        .with_context(|| format!("Invalid index config {}", path.display()))
}

#[derive(Clone, Copy, ValueEnum)]
enum PatternKindArg {
    Random,
    Existing,
}

fn parse_byte(value: &str) -> Result<u8, String> {
    if let Some(hex) = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        return u8::from_str_radix(hex, 16).map_err(|e| format!("invalid hex byte: {}", e));
    }
    match value.as_bytes() {
        [byte] => Ok(*byte),
        _ => Err(format!("expected one byte, got {:?}", value)),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Search {
            strategy,
            path,
            pattern,
            index,
            json,
            color,
        } => search(strategy, &path, &pattern, &index, json, color, cli.quiet),
        Commands::Bench {
            path,
            patterns,
            strategy,
            index,
        } => bench(&path, &patterns, &strategy, &index, cli.quiet),
        Commands::Patterns {
            count,
            kind,
            source,
            min_len,
            max_len,
            seed,
            output,
        } => generate_patterns(
            count,
            kind,
            source.as_deref(),
            (min_len, max_len),
            seed,
            output.as_deref(),
            cli.quiet,
        ),
        Commands::Stats { path, index, json } => show_stats(&path, &index, json, cli.quiet),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("FMGREP_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_corpus(path: &Path, options: &LoadOptions, quiet: bool) -> Result<Corpus> {
    let progress = LoadProgressBar::new(quiet);
    Corpus::load(path, options, &|event| progress.observe(event))
}

fn search(
    strategy: Strategy,
    path: &Path,
    pattern: &str,
    args: &IndexArgs,
    json: bool,
    color: ColorWhen,
    quiet: bool,
) -> Result<()> {
    let config = args.index_config()?;
    let corpus = load_corpus(path, &args.load_options(), quiet)?;

    let mut timing = TimingContext::new();
    let offsets = strategy
        .run(corpus.text(), pattern.as_bytes(), &config, &mut timing)
        .with_context(|| format!("Cannot search {}", path.display()))?;

    let report = SearchReport {
        strategy: strategy.name(),
        pattern: pattern.to_string(),
        total_matches: offsets.len(),
        files: corpus.matches_per_file(&offsets),
        timings: timing.measurements(),
    };

    if json {
        output::print_report_json(&report)
    } else {
        output::print_report(&report, color)?;
        Ok(())
    }
}

fn bench(
    path: &Path,
    pattern_file: &Path,
    strategies: &[Strategy],
    args: &IndexArgs,
    quiet: bool,
) -> Result<()> {
    let config = args.index_config()?;
    let patterns = patterns::read_pattern_file(pattern_file)?;
    let corpus = load_corpus(path, &args.load_options(), quiet)?;
    let strategies = if strategies.is_empty() {
        &Strategy::ALL[..]
    } else {
        strategies
    };

    tracing::info!(
        patterns = patterns.len(),
        strategies = strategies.len(),
        bytes = corpus.len(),
        "starting benchmark"
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    writeln!(out, "{}", BENCH_CSV_HEADER)?;

    for &strategy in strategies {
        match strategy.matcher() {
            Some(_) => {
                for pattern in &patterns {
                    let mut timing = TimingContext::new();
                    let found = strategy.run(corpus.text(), pattern, &config, &mut timing)?;
                    let row = BenchRow::from_timing(strategy.name(), pattern.len(), found.len(), &timing);
                    writeln!(out, "{}", row.to_csv())?;
                }
            }
            None => {
                // One build shared by every pattern
                let mut build_timing = TimingContext::new();
                let index = build_timing
                    .measure(scan::BUILD_LABEL, || FmIndex::with_config(corpus.text(), &config))
                    .with_context(|| format!("Cannot index {}", path.display()))?;

                for pattern in &patterns {
                    let mut timing = build_timing.clone();
                    let found = timing.measure(scan::SEARCH_LABEL, || index.search(pattern));
                    let row = BenchRow::from_timing(strategy.name(), pattern.len(), found.len(), &timing);
                    writeln!(out, "{}", row.to_csv())?;
                }
            }
        }
    }

    out.flush()?;
    Ok(())
}

fn generate_patterns(
    count: usize,
    kind: PatternKindArg,
    source: Option<&Path>,
    (min_len, max_len): (usize, usize),
    seed: Option<u64>,
    output: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    let mut generator = match seed {
        Some(seed) => PatternGenerator::new(seed),
        None => PatternGenerator::from_entropy(),
    };

    let generated = match kind {
        PatternKindArg::Random => {
            generator.generate(PatternKind::Random { min_len, max_len }, count, None)?
        }
        PatternKindArg::Existing => {
            let Some(source) = source else {
                bail!("existing patterns need --source <PATH>");
            };
            let corpus = load_corpus(source, &LoadOptions::default(), quiet)?;
            generator.generate(PatternKind::Existing { min_len, max_len }, count, Some(&corpus))?
        }
    };

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            patterns::write_patterns(BufWriter::new(file), &generated)?;
            if !quiet {
                eprintln!("Wrote {} patterns to {}", generated.len(), path.display());
            }
        }
        None => patterns::write_patterns(io::stdout().lock(), &generated)?,
    }

    Ok(())
}

fn show_stats(path: &Path, args: &IndexArgs, json: bool, quiet: bool) -> Result<()> {
    let config = args.index_config()?;
    let corpus = load_corpus(path, &args.load_options(), quiet)?;

    let index = FmIndex::with_config(corpus.text(), &config)
        .with_context(|| format!("Cannot index {}", path.display()))?;
    let index_stats = index.stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&index_stats)?);
    } else {
        println!("Files:            {} ({} skipped)", corpus.files().len(), corpus.skipped());
        stats::show_stats(&index_stats);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_byte() {
        assert_eq!(parse_byte("$"), Ok(b'$'));
        assert_eq!(parse_byte("0x24"), Ok(0x24));
        assert_eq!(parse_byte("0X00"), Ok(0));
        assert!(parse_byte("ab").is_err());
        assert!(parse_byte("0xzz").is_err());
        assert!(parse_byte("").is_err());
    }

    #[test]
    fn test_read_index_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        fs::write(&path, r#"{"sentinel": 36, "checkpoint_interval": 32}"#).unwrap();

        let config = read_index_config(&path).unwrap();
        assert_eq!(config.sentinel, b'$');
        assert_eq!(config.checkpoint_interval, 32);
        assert_eq!(config.alphabet, IndexConfig::default().alphabet);

        fs::write(&path, "{ not json").unwrap();
        let err = read_index_config(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid index config"));

        let err = read_index_config(&dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read index config"));
    }

    #[test]
    fn test_index_args_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        fs::write(&path, r#"{"checkpoint_interval": 0}"#).unwrap();

        let mut args = IndexArgs {
            files: None,
            checkpoint: None,
            sentinel: Some(b'#'),
            config: Some(path),
        };
        assert!(args.index_config().is_err());

        args.checkpoint = Some(8);
        let config = args.index_config().unwrap();
        assert_eq!(config.checkpoint_interval, 8);
        assert_eq!(config.sentinel, b'#');
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

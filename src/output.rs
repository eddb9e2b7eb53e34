//! Output formatting for search reports and benchmark rows

use crate::corpus::FileMatches;
use crate::timing::{Measurement, TimingContext};
use serde::Serialize;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// When to use colors on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ColorWhen {
    #[default]
    Auto,
    Always,
    Never,
}

impl From<ColorWhen> for ColorChoice {
    fn from(when: ColorWhen) -> Self {
        match when {
            ColorWhen::Auto => ColorChoice::Auto,
            ColorWhen::Always => ColorChoice::Always,
            ColorWhen::Never => ColorChoice::Never,
        }
    }
}

/// Everything `search` reports about one query
#[derive(Debug, Serialize)]
pub struct SearchReport<'a> {
    pub strategy: &'a str,
    pub pattern: String,
    pub total_matches: usize,
    pub files: Vec<FileMatches>,
    pub timings: &'a [Measurement],
}

/// Print match count per file, then the total and the timings
pub fn print_report(report: &SearchReport<'_>, color: ColorWhen) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(color.into());
    write_report(&mut stdout, report)
}

fn write_report<W: WriteColor>(out: &mut W, report: &SearchReport<'_>) -> io::Result<()> {
    for file in report.files.iter().filter(|f| f.count > 0) {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        write!(out, "{}", file.path.display())?;
        out.reset()?;
        write!(out, ":")?;
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        writeln!(out, "{}", file.count)?;
        out.reset()?;
    }

    out.set_color(ColorSpec::new().set_bold(true))?;
    writeln!(
        out,
        "{} matches for {:?} ({})",
        report.total_matches, report.pattern, report.strategy
    )?;
    out.reset()?;

    for m in report.timings {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        write!(out, "{}", m.label)?;
        out.reset()?;
        writeln!(out, ": {} ns", m.nanos())?;
    }

    Ok(())
}

/// Print the report as a single JSON document
pub fn print_report_json(report: &SearchReport<'_>) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    serde_json::to_writer_pretty(&mut lock, report)?;
    writeln!(lock)?;
    Ok(())
}

/// Column header for `bench` output
pub const BENCH_CSV_HEADER: &str = "strategy,pattern_len,matches,build_ns,search_ns";

/// One benchmark measurement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenchRow {
    pub strategy: &'static str,
    pub pattern_len: usize,
    pub matches: usize,
    /// Zero for strategies without an index
    pub build_ns: u128,
    pub search_ns: u128,
}

impl BenchRow {
    pub fn from_timing(
        strategy: &'static str,
        pattern_len: usize,
        matches: usize,
        timing: &TimingContext,
    ) -> Self {
        let nanos = |label: &str| timing.get(label).map(Measurement::nanos).unwrap_or(0);
        Self {
            strategy,
            pattern_len,
            matches,
            build_ns: nanos(crate::scan::BUILD_LABEL),
            search_ns: nanos(crate::scan::SEARCH_LABEL),
        }
    }

    pub fn to_csv(&self) -> String {
        format!(
            "{},{},{},{},{}",
            self.strategy, self.pattern_len, self.matches, self.build_ns, self.search_ns
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;
    use termcolor::NoColor;

    #[test]
    fn test_write_report_plain() {
        let timings = vec![Measurement {
            label: "search".to_string(),
            elapsed: Duration::from_nanos(420),
        }];
        let report = SearchReport {
            strategy: "kmp",
            pattern: "tr".to_string(),
            total_matches: 3,
            files: vec![
                FileMatches {
                    path: PathBuf::from("a.txt"),
                    count: 3,
                },
                FileMatches {
                    path: PathBuf::from("b.txt"),
                    count: 0,
                },
            ],
            timings: &timings,
        };

        let mut out = NoColor::new(Vec::new());
        write_report(&mut out, &report).unwrap();
        let text = String::from_utf8(out.into_inner()).unwrap();

        assert_eq!(text, "a.txt:3\n3 matches for \"tr\" (kmp)\nsearch: 420 ns\n");
    }

    #[test]
    fn test_report_json_shape() {
        let report = SearchReport {
            strategy: "fm-index",
            pattern: "ana".to_string(),
            total_matches: 0,
            files: Vec::new(),
            timings: &[],
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["strategy"], "fm-index");
        assert_eq!(value["total_matches"], 0);
        assert!(value["files"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_bench_row_csv() {
        let mut timing = TimingContext::new();
        timing.measure(crate::scan::SEARCH_LABEL, || ());
        let row = BenchRow::from_timing("kmp", 4, 2, &timing);
        assert_eq!(row.build_ns, 0);
        assert_eq!(
            row.to_csv(),
            format!("kmp,4,2,0,{}", row.search_ns)
        );
        assert_eq!(BENCH_CSV_HEADER.split(',').count(), 5);
    }
}

//! Integration tests driving the fmgrep binary.
//!
//! Each test builds a small fixture folder, runs a subcommand and checks
//! its stdout.

use fmgrep::patterns::parse_patterns;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Create a fixture folder with known content
fn create_fixture_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create fixture dir");

    fs::write(dir.path().join("a.txt"), "tres tristes tigres").unwrap();
    fs::write(dir.path().join("b.txt"), "comen trigo en un trigal").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub").join("c.md"), "no match here").unwrap();
    // Binary files are skipped
    fs::write(dir.path().join("blob.bin"), [0u8, 159, 146, 150, 0, 1]).unwrap();

    dir
}

fn run_fmgrep(args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_fmgrep"))
        .args(args)
        .arg("--quiet")
        .output()
        .expect("Failed to run fmgrep");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

/// Extract (file name, count) pairs from `path:count` lines
fn extract_counts(output: &str) -> Vec<(String, usize)> {
    output
        .lines()
        .filter_map(|line| {
            let (path, count) = line.rsplit_once(':')?;
            let count = count.trim().parse().ok()?;
            let name = Path::new(path).file_name()?.to_string_lossy().into_owned();
            Some((name, count))
        })
        .collect()
}

#[test]
fn test_search_counts_per_file_for_every_strategy() {
    let dir = create_fixture_dir();

    for strategy in ["kmp", "boyer-moore", "rabin-karp", "fm-index"] {
        let (stdout, stderr, success) = run_fmgrep(&[
            "search",
            strategy,
            path_arg(dir.path()),
            "tr",
            "--color",
            "never",
        ]);
        assert!(success, "{} failed: {}", strategy, stderr);

        let counts = extract_counts(&stdout);
        assert_eq!(
            counts,
            vec![("a.txt".to_string(), 2), ("b.txt".to_string(), 2)],
            "{}",
            strategy
        );
        assert!(
            stdout.contains(&format!("4 matches for \"tr\" ({})", strategy)),
            "{}",
            stdout
        );
        assert!(stdout.contains("search: "), "{}", stdout);
    }
}

#[test]
fn test_fm_index_reports_build_time() {
    let dir = create_fixture_dir();
    let (stdout, _, success) = run_fmgrep(&[
        "search",
        "fm-index",
        path_arg(dir.path()),
        "ana",
        "--color",
        "never",
    ]);
    assert!(success);
    assert!(stdout.contains("build: "), "{}", stdout);
}

#[test]
fn test_search_file_limit() {
    let dir = create_fixture_dir();
    let (stdout, _, success) = run_fmgrep(&[
        "search",
        "kmp",
        path_arg(dir.path()),
        "tr",
        "--files",
        "1",
        "--color",
        "never",
    ]);
    assert!(success);
    assert_eq!(extract_counts(&stdout), vec![("a.txt".to_string(), 2)]);
}

#[test]
fn test_search_json() {
    let dir = create_fixture_dir();
    let (stdout, _, success) = run_fmgrep(&[
        "search",
        "fm-index",
        path_arg(dir.path()),
        "tri",
        "--json",
    ]);
    assert!(success);

    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["strategy"], "fm-index");
    assert_eq!(report["pattern"], "tri");
    assert_eq!(report["total_matches"], 3);
    assert_eq!(report["files"].as_array().unwrap().len(), 3);
    let labels: Vec<&str> = report["timings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["build", "search"]);
}

#[test]
fn test_search_single_file() {
    let dir = create_fixture_dir();
    let file = dir.path().join("b.txt");
    let (stdout, _, success) = run_fmgrep(&[
        "search",
        "boyer-moore",
        path_arg(&file),
        "trig",
        "--color",
        "never",
    ]);
    assert!(success);
    assert_eq!(extract_counts(&stdout), vec![("b.txt".to_string(), 2)]);
}

#[test]
fn test_search_single_binary_file_is_skipped() {
    let dir = create_fixture_dir();
    let file = dir.path().join("blob.bin");

    for strategy in ["kmp", "fm-index"] {
        let (stdout, stderr, success) =
            run_fmgrep(&["search", strategy, path_arg(&file), "ab", "--color", "never"]);
        assert!(success, "{} failed: {}", strategy, stderr);
        assert!(extract_counts(&stdout).is_empty(), "{}", stdout);
        assert!(stdout.contains("0 matches"), "{}", stdout);
    }

    let (stdout, _, success) = run_fmgrep(&["stats", path_arg(&file)]);
    assert!(success);
    assert!(stdout.contains("Files:            0 (1 skipped)"), "{}", stdout);
}

#[test]
fn test_sentinel_in_text_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("price.txt");
    fs::write(&file, "costs $5 today").unwrap();

    let (_, stderr, success) = run_fmgrep(&[
        "search",
        "fm-index",
        path_arg(&file),
        "5",
        "--sentinel",
        "$",
    ]);
    assert!(!success);
    assert!(stderr.contains("sentinel"), "{}", stderr);

    // The scanners do not need a sentinel
    let (_, _, success) = run_fmgrep(&["search", "kmp", path_arg(&file), "5", "--sentinel", "$"]);
    assert!(success);
}

#[test]
fn test_trailing_sentinel_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("echo.txt");
    fs::write(&file, "echo cost 5$").unwrap();

    let (stdout, _, success) =
        run_fmgrep(&["search", "kmp", path_arg(&file), "5$", "--sentinel", "$", "--color", "never"]);
    assert!(success);
    assert_eq!(extract_counts(&stdout), vec![("echo.txt".to_string(), 1)]);

    // The last byte is content, so the index cannot take it as the terminator
    let (_, stderr, success) =
        run_fmgrep(&["search", "fm-index", path_arg(&file), "5$", "--sentinel", "$"]);
    assert!(!success);
    assert!(stderr.contains("offset 11"), "{}", stderr);
}

#[test]
fn test_invalid_checkpoint_is_rejected() {
    let dir = create_fixture_dir();
    let (_, stderr, success) = run_fmgrep(&[
        "search",
        "fm-index",
        path_arg(dir.path()),
        "tr",
        "--checkpoint",
        "0",
    ]);
    assert!(!success);
    assert!(stderr.contains("checkpoint"), "{}", stderr);
}

#[test]
fn test_bench_csv() {
    let dir = create_fixture_dir();
    let pattern_file = dir.path().join("patterns.bin");
    fs::write(&pattern_file, "tr\n\x1c\nxyz\n\x1c\n").unwrap();
    let corpus = dir.path().join("sub");

    let (stdout, stderr, success) = run_fmgrep(&[
        "bench",
        path_arg(&corpus),
        "--patterns",
        path_arg(&pattern_file),
        "--strategy",
        "kmp",
        "--strategy",
        "fm-index",
    ]);
    assert!(success, "{}", stderr);

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "strategy,pattern_len,matches,build_ns,search_ns");
    assert_eq!(lines.len(), 5);

    let rows: Vec<Vec<&str>> = lines[1..].iter().map(|l| l.split(',').collect()).collect();
    assert_eq!(rows[0][..4], ["kmp", "2", "0", "0"]);
    assert_eq!(rows[1][..3], ["kmp", "3", "0"]);
    assert_eq!(rows[2][..3], ["fm-index", "2", "0"]);
    assert_eq!(rows[3][..3], ["fm-index", "3", "0"]);
    // The FM-index rows share one build
    assert_eq!(rows[2][3], rows[3][3]);
}

#[test]
fn test_patterns_random_is_reproducible() {
    let args = [
        "patterns", "5", "random", "--seed", "3", "--min-len", "2", "--max-len", "4",
    ];
    let (first, _, success) = run_fmgrep(&args);
    assert!(success);
    let (second, _, _) = run_fmgrep(&args);
    assert_eq!(first, second);

    let patterns = parse_patterns(first.as_bytes());
    assert_eq!(patterns.len(), 5);
    assert!(patterns.iter().all(|p| (2..=4).contains(&p.len())));
}

#[test]
fn test_patterns_existing_to_file() {
    let dir = create_fixture_dir();
    let output = dir.path().join("out.patterns");

    let (_, stderr, success) = run_fmgrep(&[
        "patterns",
        "10",
        "existing",
        "--source",
        path_arg(&dir.path().join("a.txt")),
        "--max-len",
        "5",
        "--seed",
        "1",
        "--output",
        path_arg(&output),
    ]);
    assert!(success, "{}", stderr);

    let patterns = parse_patterns(&fs::read(&output).unwrap());
    assert_eq!(patterns.len(), 10);
    for pattern in patterns {
        let text = b"tres tristes tigres";
        assert!(text.windows(pattern.len()).any(|w| w == pattern.as_slice()));
    }
}

#[test]
fn test_patterns_existing_needs_source() {
    let (_, stderr, success) = run_fmgrep(&["patterns", "3", "existing"]);
    assert!(!success);
    assert!(stderr.contains("--source"), "{}", stderr);
}

#[test]
fn test_stats_json() {
    let dir = create_fixture_dir();
    let (stdout, _, success) = run_fmgrep(&["stats", path_arg(dir.path()), "--json", "-k", "8"]);
    assert!(success);

    let stats: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    // 19 + 1 + 24 + 1 + 13 bytes of content, joined by separators
    assert_eq!(stats["content_len"], 58);
    assert_eq!(stats["text_len"], 59);
    assert_eq!(stats["checkpoint_interval"], 8);
}

#[test]
fn test_stats_table() {
    let dir = create_fixture_dir();
    let (stdout, _, success) = run_fmgrep(&["stats", path_arg(dir.path())]);
    assert!(success);
    assert!(stdout.contains("Files:            3 (1 skipped)"), "{}", stdout);
    assert!(stdout.contains("Index Statistics"));
}

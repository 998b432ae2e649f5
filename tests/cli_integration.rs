//! Tests for the CLI helpers and JSON output.

use std::fs;
use std::path::PathBuf;

use stdinfer::cli::{self, AnalyzeArgs, ValidateArgs, EXIT_ERROR, EXIT_FAILED, EXIT_SUCCESS};
use stdinfer::report::{build_json_report, JsonReport};
use stdinfer::{AnalysisContext, Config, Language};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn analyze_testdata() -> JsonReport {
    let root = testdata_path();
    let config = Config::default();
    let files = cli::collect_files(&root, &config).expect("should walk testdata");
    let ctx = AnalysisContext::new(&root, config);
    let analyses = ctx.analyze_files_parallel(&files);
    build_json_report(&root.to_string_lossy(), &analyses)
}

#[test]
fn test_collect_files_finds_every_fixture() {
    let files = cli::collect_files(&testdata_path(), &Config::default()).unwrap();
    assert_eq!(files.len(), 9);
    for file in &files {
        let ext = file.extension().and_then(|e| e.to_str()).unwrap();
        assert!(Language::from_extension(ext).is_some());
    }
}

#[test]
fn test_json_report_covers_all_languages() {
    let report = analyze_testdata();
    assert_eq!(report.files_analyzed, 9);

    let mut languages: Vec<_> = report
        .files
        .iter()
        .filter_map(|f| f.language.clone())
        .collect();
    languages.sort();
    let mut expected: Vec<_> = Language::ALL.iter().map(|l| l.as_str().to_string()).collect();
    expected.sort();
    assert_eq!(languages, expected);

    for file in &report.files {
        assert!(file.format.errors.is_empty(), "{}: {:?}", file.path, file.format.errors);
        assert!(file.hints.starts_with("Line 1: "), "{}", file.path);
    }
}

#[test]
fn test_json_report_paths_are_sorted_and_relative() {
    let report = analyze_testdata();
    let paths: Vec<_> = report.files.iter().map(|f| f.path.clone()).collect();
    let mut sorted = paths.clone();
    sorted.sort();
    assert_eq!(paths, sorted);
    assert!(paths.contains(&"solution.py".to_string()));
}

#[test]
fn test_json_round_trips_through_serde() {
    let report = analyze_testdata();
    let json = serde_json::to_string(&report).unwrap();
    let parsed: JsonReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.files.len(), report.files.len());
    assert_eq!(parsed.files[0].format, report.files[0].format);
}

#[test]
fn test_config_changes_analysis() {
    let temp = tempfile::tempdir().unwrap();
    let config_path = temp.path().join("stdinfer.yaml");
    fs::write(&config_path, "confidence:\n  py: 0.4\nexamples: 1\n").unwrap();

    let (config, found) = Config::load(Some(&config_path)).unwrap();
    assert!(found.is_some());

    let ctx = AnalysisContext::new(testdata_path(), config);
    let analysis = ctx.analyze_file("solution.py").unwrap();
    assert_eq!(analysis.format.confidence, 0.4);
    assert_eq!(analysis.format.examples.len(), 1);
}

#[test]
fn test_run_analyze_exit_codes() {
    let ok = AnalyzeArgs {
        path: testdata_path().join("solution.py"),
        lang: None,
        format: "json".to_string(),
    };
    assert_eq!(cli::run_analyze(&ok, Config::default()).unwrap(), EXIT_SUCCESS);

    let bad_lang = AnalyzeArgs {
        lang: Some("cobol".to_string()),
        ..ok
    };
    assert_eq!(cli::run_analyze(&bad_lang, Config::default()).unwrap(), EXIT_ERROR);

    let temp = tempfile::tempdir().unwrap();
    let quiet = temp.path().join("quiet.py");
    fs::write(&quiet, "print('no input here')\n").unwrap();
    let no_reads = AnalyzeArgs {
        path: quiet,
        lang: None,
        format: "json".to_string(),
    };
    assert_eq!(cli::run_analyze(&no_reads, Config::default()).unwrap(), EXIT_FAILED);
}

#[test]
fn test_run_validate_with_input_file() {
    let temp = tempfile::tempdir().unwrap();
    let source = temp.path().join("main.c");
    fs::write(&source, "int n;\nscanf(\"%d\", &n);\n").unwrap();

    let good = temp.path().join("good.txt");
    fs::write(&good, "42\n").unwrap();
    let args = ValidateArgs {
        source: source.clone(),
        input: Some(good),
        lang: None,
        format: "json".to_string(),
    };
    assert_eq!(cli::run_validate(&args, Config::default()).unwrap(), EXIT_SUCCESS);

    let bad = temp.path().join("bad.txt");
    fs::write(&bad, "forty-two\n").unwrap();
    let args = ValidateArgs {
        input: Some(bad),
        ..args
    };
    assert_eq!(cli::run_validate(&args, Config::default()).unwrap(), EXIT_FAILED);
}

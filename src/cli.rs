//! Command-line interface for stdinfer.

use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use walkdir::WalkDir;

use crate::analysis::{AnalysisContext, AnalysisError, FileAnalysis, Language};
use crate::config::{self, Config};
use crate::debounce::{DebounceConfig, Debouncer};
use crate::generate::generate_sample_input;
use crate::hints::generate_input_hints;
use crate::report::{self, OutputFormat};
use crate::validate::validate_input;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Infer the stdin format a program expects.
///
/// stdinfer reads a source file, recognizes the standard-input idioms of
/// its language, and reports what the program will read: one entry per
/// read, with its type and whether it is a whitespace-separated list.
/// It can also generate sample input and validate input you provide.
#[derive(Parser)]
#[command(name = "stdinfer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Infer the input format of a file or every source file in a directory
    Analyze(AnalyzeArgs),
    /// Check input against the format a source file expects
    #[command(visible_alias = "check")]
    Validate(ValidateArgs),
    /// Print sample input for a source file
    Sample(SourceArgs),
    /// Print line-by-line input hints for a source file
    Hints(SourceArgs),
    /// Reanalyze a source file whenever it changes
    Watch(WatchArgs),
    /// List supported languages and their tags
    Languages,
    /// Create a stdinfer config file from the template
    Init(InitArgs),
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Path to analyze (file or directory)
    pub path: PathBuf,

    /// Language tag, overriding detection by extension
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the validate command.
#[derive(Parser)]
pub struct ValidateArgs {
    /// Source file whose input format is checked against
    pub source: PathBuf,

    /// File holding the candidate input ("-" or omitted: read stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Language tag, overriding detection by extension
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for commands that take a single source file.
#[derive(Parser)]
pub struct SourceArgs {
    pub source: PathBuf,

    /// Language tag, overriding detection by extension
    #[arg(short, long)]
    pub lang: Option<String>,
}

/// Arguments for the watch command.
#[derive(Parser)]
pub struct WatchArgs {
    pub source: PathBuf,

    /// Language tag, overriding detection by extension
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Output format: pretty or json (one object per line)
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// How often to check the file for changes, in milliseconds
    #[arg(long, default_value_t = 200)]
    pub poll_ms: u64,

    /// Exit after this many analyses have been printed
    #[arg(long)]
    pub max_updates: Option<usize>,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "stdinfer.yaml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Dispatch a parsed command line.
pub fn run(cli: &Cli) -> anyhow::Result<i32> {
    if let Commands::Init(args) = &cli.command {
        return run_init(args);
    }

    let config = match Config::load(cli.config.as_deref()) {
        Ok((config, _)) => config,
        Err(e) => {
            eprintln!("Error: invalid config: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    match &cli.command {
        Commands::Analyze(args) => run_analyze(args, config),
        Commands::Validate(args) => run_validate(args, config),
        Commands::Sample(args) => run_sample(args, config),
        Commands::Hints(args) => run_hints(args, config),
        Commands::Watch(args) => run_watch(args, config),
        Commands::Languages => run_languages(&config),
        Commands::Init(args) => run_init(args),
    }
}

/// Resolve an optional `--lang` tag.
///
/// `Ok(None)` means the language should be taken from the file extension.
pub fn resolve_language(tag: Option<&str>) -> Result<Option<Language>, AnalysisError> {
    match tag {
        None => Ok(None),
        Some(tag) => Language::from_tag(tag)
            .map(Some)
            .ok_or_else(|| AnalysisError::UnsupportedLanguage(tag.to_string())),
    }
}

/// Collect source files under `root` in a supported language.
///
/// Hidden directories and paths matching the config's `excluded_paths`
/// are skipped. The result is sorted.
pub fn collect_files(root: &Path, config: &Config) -> anyhow::Result<Vec<PathBuf>> {
    let excluded = config.excluded_set()?;
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            if e.depth() > 0 && e.file_type().is_dir() && name.starts_with('.') {
                return false;
            }
            let rel = e.path().strip_prefix(root).unwrap_or(e.path());
            !excluded.is_match(rel) && !excluded.is_match(e.path())
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if Language::from_extension(ext).is_some() {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

fn parse_format(format: &str) -> Option<OutputFormat> {
    match format.parse::<OutputFormat>() {
        Ok(f) => Some(f),
        Err(e) => {
            eprintln!("Error: {}", e);
            None
        }
    }
}

/// Analyze a single source file, reporting problems on stderr.
fn analyze_source(
    source: &Path,
    lang: Option<&str>,
    config: Config,
) -> Result<FileAnalysis, i32> {
    let language = match resolve_language(lang) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(EXIT_ERROR);
        }
    };

    let ctx = AnalysisContext::new(".", config);
    let analysis = match ctx.analyze_file_as(source, language) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: cannot read {}: {}", source.display(), e);
            return Err(EXIT_ERROR);
        }
    };

    if let Some(error) = analysis.format.errors.first() {
        eprintln!("Error: {}", error);
        return Err(EXIT_ERROR);
    }
    Ok(analysis)
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs, config: Config) -> anyhow::Result<i32> {
    let Some(format) = parse_format(&args.format) else {
        return Ok(EXIT_ERROR);
    };

    let language = match resolve_language(args.lang.as_deref()) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let metadata = match std::fs::metadata(&args.path) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    let analyses = if metadata.is_dir() {
        let root = args.path.canonicalize()?;
        let files = collect_files(&root, &config)?;
        if files.is_empty() {
            eprintln!("Warning: no source files to analyze");
            return Ok(EXIT_SUCCESS);
        }
        tracing::debug!(count = files.len(), "analyzing directory");
        let ctx = AnalysisContext::new(&root, config);
        ctx.analyze_files_parallel(&files)
    } else {
        let ctx = AnalysisContext::new(".", config);
        vec![ctx.analyze_file_as(&args.path, language)?]
    };

    let path_str = args.path.to_string_lossy().to_string();
    match format {
        OutputFormat::Json => report::write_json(&path_str, &analyses)?,
        OutputFormat::Pretty => report::write_pretty(&path_str, &analyses),
    }

    if analyses.iter().any(|a| a.format.has_errors()) {
        Ok(EXIT_ERROR)
    } else if analyses.iter().any(|a| a.format.has_requirements()) {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

/// Run the validate command.
pub fn run_validate(args: &ValidateArgs, config: Config) -> anyhow::Result<i32> {
    let Some(format) = parse_format(&args.format) else {
        return Ok(EXIT_ERROR);
    };

    let analysis = match analyze_source(&args.source, args.lang.as_deref(), config) {
        Ok(a) => a,
        Err(code) => return Ok(code),
    };

    let candidate = match &args.input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)?,
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let result = validate_input(&candidate, &analysis.format);
    let source_str = args.source.to_string_lossy().to_string();
    match format {
        OutputFormat::Json => report::write_validation_json(&source_str, &result)?,
        OutputFormat::Pretty => report::write_validation_pretty(&source_str, &result),
    }

    Ok(if result.is_valid {
        EXIT_SUCCESS
    } else {
        EXIT_FAILED
    })
}

/// Run the sample command.
pub fn run_sample(args: &SourceArgs, config: Config) -> anyhow::Result<i32> {
    let analysis = match analyze_source(&args.source, args.lang.as_deref(), config) {
        Ok(a) => a,
        Err(code) => return Ok(code),
    };

    if !analysis.format.has_requirements() {
        eprintln!("No stdin reads detected in {}", args.source.display());
        return Ok(EXIT_FAILED);
    }

    println!("{}", generate_sample_input(&analysis.format));
    Ok(EXIT_SUCCESS)
}

/// Run the hints command.
pub fn run_hints(args: &SourceArgs, config: Config) -> anyhow::Result<i32> {
    let analysis = match analyze_source(&args.source, args.lang.as_deref(), config) {
        Ok(a) => a,
        Err(code) => return Ok(code),
    };

    println!("{}", generate_input_hints(&analysis.format));
    Ok(if analysis.format.has_requirements() {
        EXIT_SUCCESS
    } else {
        EXIT_FAILED
    })
}

/// Run the watch command.
pub fn run_watch(args: &WatchArgs, config: Config) -> anyhow::Result<i32> {
    let Some(format) = parse_format(&args.format) else {
        return Ok(EXIT_ERROR);
    };

    let language = match resolve_language(args.lang.as_deref()) {
        Ok(Some(l)) => l,
        Ok(None) => {
            let ext = args
                .source
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("");
            match Language::from_extension(ext) {
                Some(l) => l,
                None => {
                    eprintln!(
                        "Error: cannot infer language of {}; pass --lang",
                        args.source.display()
                    );
                    return Ok(EXIT_ERROR);
                }
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    crate::init();
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(watch_source(args, language, format, config))
}

async fn watch_source(
    args: &WatchArgs,
    language: Language,
    format: OutputFormat,
    config: Config,
) -> anyhow::Result<i32> {
    let debouncer = Debouncer::spawn(DebounceConfig::from_config(config));
    let mut snapshots = debouncer.subscribe();
    let mut ticker = tokio::time::interval(Duration::from_millis(args.poll_ms.max(1)));
    let mut last_content: Option<String> = None;
    let mut printed = 0usize;
    let path_str = args.source.to_string_lossy().to_string();

    eprintln!("Watching {} ({})", path_str, language);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let content = match std::fs::read_to_string(&args.source) {
                    Ok(c) => c,
                    Err(e) => {
                        tracing::debug!(error = %e, "cannot read watched file");
                        continue;
                    }
                };
                if last_content.as_deref() != Some(content.as_str()) {
                    debouncer.submit(content.clone(), language.as_str());
                    last_content = Some(content);
                }
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                let analysis = FileAnalysis {
                    path: path_str.clone(),
                    language: Some(language),
                    format: snapshot.format,
                };
                match format {
                    OutputFormat::Json => {
                        let report = report::build_json_report(&path_str, &[analysis]);
                        println!("{}", serde_json::to_string(&report)?);
                    }
                    OutputFormat::Pretty => {
                        println!("--- revision {} ---", snapshot.revision);
                        report::write_pretty(&path_str, &[analysis]);
                    }
                }
                printed += 1;
                if args.max_updates.is_some_and(|max| printed >= max) {
                    break;
                }
            }
        }
    }

    debouncer.stop().await;
    Ok(EXIT_SUCCESS)
}

/// Run the languages command.
pub fn run_languages(config: &Config) -> anyhow::Result<i32> {
    println!("Supported languages:");
    println!();
    for lang in Language::ALL {
        println!(
            "  {:<12} {:<6.2} {}",
            lang.as_str(),
            config.confidence_for(lang),
            lang.aliases().join(", ")
        );
    }
    Ok(EXIT_SUCCESS)
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    if args.output.exists() && !args.force {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it, pass --force, or use --output to choose another path");
        return Ok(EXIT_ERROR);
    }

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = std::fs::write(&args.output, config::TEMPLATE) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to tune confidence weights and exclusions", args.output.display());
    println!("  2. Run: stdinfer analyze . --config {}", args.output.display());

    Ok(EXIT_SUCCESS)
}

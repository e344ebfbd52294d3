//! Command-line interface for codeshape.

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::analysis::{supported_extensions, Analyzer};
use crate::config::{self, Config};
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Directory names never descended into in directory mode.
const SKIPPED_DIRS: &[&str] = &["node_modules", "vendor", "target", "__pycache__"];

/// Structural code analyzer.
///
/// Reports the classes and functions of a source file, the cyclomatic
/// complexity of each function, and the call and inheritance edges found
/// inside them.
#[derive(Parser)]
#[command(name = "codeshape")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a source file or every supported file under a directory
    Analyze(AnalyzeArgs),
    /// Write a default configuration file
    Init(InitArgs),
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// File or directory to analyze
    pub path: PathBuf,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: json or pretty
    #[arg(short, long, default_value = "json")]
    pub format: String,

    /// Directory of <language>.scm capture queries (overrides config)
    #[arg(long)]
    pub query_dir: Option<PathBuf>,

    /// Maximum calls listed per container (overrides config)
    #[arg(long)]
    pub max_calls: Option<usize>,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "codeshape.yaml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Collect supported files under `root`, sorted by path.
pub fn collect_files(root: &Path, config: &Config) -> anyhow::Result<Vec<PathBuf>> {
    let extensions = supported_extensions();
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            if !e.file_type().is_dir() || e.depth() == 0 {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            // Skip hidden and dependency directories
            !name.starts_with('.') && !SKIPPED_DIRS.contains(&&*name)
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !extensions.contains(&ext) {
            continue;
        }

        let rel = path.strip_prefix(root).unwrap_or(path);
        if config.is_path_excluded(rel) {
            tracing::debug!(path = %rel.display(), "excluded by config");
            continue;
        }

        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<i32> {
    // Validate format
    if args.format != "json" && args.format != "pretty" {
        eprintln!(
            "Error: invalid format {:?}, must be 'json' or 'pretty'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let cwd = std::env::current_dir()?;
    let mut config = match Config::load(args.config.as_deref(), &cwd) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return Ok(EXIT_ERROR);
        }
    };
    if let Some(dir) = &args.query_dir {
        config.query_dir = Some(dir.clone());
    }
    if let Some(max_calls) = args.max_calls {
        config.max_calls = max_calls;
    }
    if let Err(e) = config::validate(&config) {
        eprintln!("Error: {}", e);
        return Ok(EXIT_ERROR);
    }

    let analyzer = Analyzer::from_config(&config);

    if !args.path.is_dir() {
        let output = analyzer.analyze_file(&args.path);
        match args.format.as_str() {
            "pretty" => print!("{}", report::to_pretty(&args.path.to_string_lossy(), &output)),
            _ => println!("{}", report::to_json(&output)?),
        }
        return Ok(if output.is_error() {
            EXIT_FAILED
        } else {
            EXIT_SUCCESS
        });
    }

    let files = collect_files(&args.path, &config)?;
    if files.is_empty() {
        tracing::warn!(path = %args.path.display(), "no supported files to analyze");
    }
    tracing::info!(files = files.len(), "analyzing directory");

    let outputs = analyzer.analyze_files(&files);
    let failed = outputs.values().filter(|o| o.is_error()).count();
    for (path, output) in &outputs {
        if let report::AnalysisOutput::Error(e) = output {
            tracing::warn!(path = %path, error = %e.error, "file not analyzed");
        }
    }

    match args.format.as_str() {
        "pretty" => {
            for (path, output) in &outputs {
                print!("{}", report::to_pretty(path, output));
            }
        }
        _ => println!("{}", report::to_json_map(&outputs)?),
    }

    Ok(if failed > 0 { EXIT_FAILED } else { EXIT_SUCCESS })
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    if args.output.exists() && !args.force {
        eprintln!(
            "Error: {} exists (pass --force to overwrite)",
            args.output.display()
        );
        return Ok(EXIT_ERROR);
    }

    let dir = args.output.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(dir) = dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    std::fs::write(&args.output, config::DEFAULT_TEMPLATE)
        .with_context(|| format!("writing {}", args.output.display()))?;
    tracing::info!(path = %args.output.display(), "wrote default config");

    println!("Created {}", args.output.display());
    println!(
        "Analyze with: codeshape analyze <path> --config {}",
        args.output.display()
    );

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_collect_files_skips_hidden_and_unsupported() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::write(root.join("src/b.py"), "").unwrap();
        fs::write(root.join("src/a.go"), "").unwrap();
        fs::write(root.join("README.md"), "").unwrap();
        fs::write(root.join(".git/hook.py"), "").unwrap();
        fs::write(root.join("node_modules/pkg/index.js"), "").unwrap();

        let files = collect_files(root, &Config::default()).unwrap();
        assert_eq!(files, vec![root.join("src/a.go"), root.join("src/b.py")]);
    }

    #[test]
    fn test_collect_files_honors_excluded_paths() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("gen")).unwrap();
        fs::write(root.join("gen/api.ts"), "").unwrap();
        fs::write(root.join("main.ts"), "").unwrap();

        let config = Config {
            excluded_paths: vec!["gen/**".to_string()],
            ..Config::default()
        };
        let files = collect_files(root, &config).unwrap();
        assert_eq!(files, vec![root.join("main.ts")]);
    }

    #[test]
    fn test_cli_parses_analyze() {
        let cli = Cli::try_parse_from([
            "codeshape", "-vv", "analyze", "src", "--format", "pretty", "--max-calls", "5",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.path, PathBuf::from("src"));
                assert_eq!(args.format, "pretty");
                assert_eq!(args.max_calls, Some(5));
                assert!(args.query_dir.is_none());
            }
            Commands::Init(_) => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_init_refuses_overwrite_without_force() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("conf/codeshape.yaml");
        let mut args = InitArgs {
            output: output.clone(),
            force: false,
        };

        assert_eq!(run_init(&args).unwrap(), EXIT_SUCCESS);
        assert_eq!(fs::read_to_string(&output).unwrap(), config::DEFAULT_TEMPLATE);
        assert_eq!(run_init(&args).unwrap(), EXIT_ERROR);

        fs::write(&output, "max_calls: 3\n").unwrap();
        args.force = true;
        assert_eq!(run_init(&args).unwrap(), EXIT_SUCCESS);
        assert_eq!(fs::read_to_string(&output).unwrap(), config::DEFAULT_TEMPLATE);
    }
}

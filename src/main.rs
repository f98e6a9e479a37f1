use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use depscope::analysis::{analyze, AnalysisOutcome};
use depscope::config::{
    parse_list, ExternalEdgePolicy, ScanConfig, DEFAULT_EXCLUDES, DEFAULT_EXTENSIONS,
};
use depscope::export::{export, export_to_file, ExportFormat};
use depscope::logging::{init_logging, parse_level, LoggingConfig};

#[derive(Parser)]
#[command(name = "depscope")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version = "0.1.0")]
#[command(about = "Generate a module dependency graph for JavaScript/TypeScript applications", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Print every import found and resolved
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a project and write its dependency graph
    Analyze(AnalyzeArgs),
    /// Show version information
    Version,
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Root directory or entry file of the application
    path: PathBuf,

    /// Output JSON file path
    #[arg(short, long, default_value = "dependency-graph.json")]
    output: PathBuf,

    /// Attempt to analyze deployment modes
    #[arg(short = 'm', long)]
    analyze_modes: bool,

    /// Comma-separated list of file extensions to scan
    #[arg(short, long, default_value = DEFAULT_EXTENSIONS)]
    extensions: String,

    /// Comma-separated list of directories to exclude
    #[arg(short = 'x', long, default_value = DEFAULT_EXCLUDES)]
    exclude: String,

    /// Maximum depth of dependency traversal
    #[arg(short = 'd', long)]
    max_depth: Option<usize>,

    /// Which unresolved references become external edges (strict, lenient)
    #[arg(long, default_value_t = ExternalEdgePolicy::Strict)]
    external: ExternalEdgePolicy,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(logging_config(&cli)?);

    match cli.command {
        Some(Commands::Analyze(args)) => run_analyze(&args),
        Some(Commands::Version) => {
            println!("depscope v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        None => {
            println!("depscope - JavaScript/TypeScript Dependency Graph Scanner");
            println!("Run 'depscope analyze <path>' to scan a project");
            println!("Run 'depscope --help' for more information");
            Ok(())
        }
    }
}

fn logging_config(cli: &Cli) -> Result<LoggingConfig> {
    let mut config = if cli.verbose {
        LoggingConfig::verbose()
    } else {
        LoggingConfig::default()
    };

    if let Some(level) = &cli.log_level {
        config.level = parse_level(level)
            .with_context(|| format!("Invalid log level '{}'", level))?;
    }
    config.use_json = cli.log_json;

    Ok(config)
}

fn scan_config(args: &AnalyzeArgs) -> ScanConfig {
    ScanConfig::for_target(&args.path)
        .with_extensions(parse_list(&args.extensions))
        .with_exclude_dirs(parse_list(&args.exclude))
        .with_max_depth(args.max_depth)
        .with_external_edges(args.external)
        .with_mode_analysis(args.analyze_modes)
}

fn run_analyze(args: &AnalyzeArgs) -> Result<()> {
    let config = scan_config(args);

    println!("Will scan for files with extensions: {}", config.extensions.join(","));
    println!("Will exclude directories: {}", config.exclude_dirs.join(","));
    match &config.start_file {
        Some(_) => println!("Analyzing single file: {}", args.path.display()),
        None => println!("Scanning dependencies in directory: {}", config.root.display()),
    }
    if let Some(depth) = config.max_depth {
        println!("Maximum dependency depth: {}", depth);
    }

    let outcome = analyze(&config).context("Failed to prepare import analysis")?;

    write_report(&outcome, &args.output)?;
    println!("Dependency graph saved to {}", args.output.display());

    export(ExportFormat::Summary, &outcome, &mut io::stdout().lock())
        .context("Failed to print summary")?;

    Ok(())
}

fn write_report(outcome: &AnalysisOutcome, output: &Path) -> Result<()> {
    export_to_file(ExportFormat::Json, outcome, output)
        .with_context(|| format!("Failed to write dependency graph to {}", output.display()))
}

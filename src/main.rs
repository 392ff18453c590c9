//! brscov - BrightScript coverage instrumenter
//!
//! Command-line interface: instruments a project in place.

use clap::Parser;
use std::path::PathBuf;
use std::process;

use brscov::config::ProcessorConfig;
use brscov::error::{CoverageError, Result};
use brscov::processor::CoverageProcessor;

/// brscov - line and branch coverage for BrightScript
#[derive(Parser, Debug)]
#[command(name = "brscov")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Project root (default: current directory, or the config file's)
    #[arg(value_name = "PROJECT")]
    project: Option<PathBuf>,

    /// Source file glob, relative to the project root; `!` excludes (repeatable)
    #[arg(short, long = "pattern", value_name = "GLOB")]
    patterns: Vec<String>,

    /// Prefix of the generated reporting functions
    #[arg(long, value_name = "NAME")]
    prefix: Option<String>,

    /// Directory with runtime templates overriding the built-in ones
    #[arg(long, value_name = "DIR")]
    templates: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Run the whole pipeline without writing any file
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        if let CoverageError::Parse { errors, .. } = &e {
            for error in errors {
                eprintln!("  {}", error);
            }
        }
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => ProcessorConfig::from_file(path)?,
        None => ProcessorConfig::default(),
    };

    if let Some(project) = args.project {
        config.project_path = project;
    }
    if !args.patterns.is_empty() {
        config.source_file_patterns = args.patterns;
    }
    if let Some(prefix) = args.prefix {
        config.report_prefix = prefix;
    }
    if let Some(templates) = args.templates {
        config.template_dir = Some(templates);
    }

    let dry_run = args.dry_run;
    let mut processor = CoverageProcessor::new(config).dry_run(dry_run);
    let summary = processor.process()?;

    if dry_run {
        println!("{}", summary);
        for output in &summary.outputs {
            println!("  would write {}", output.display());
        }
    }
    Ok(())
}

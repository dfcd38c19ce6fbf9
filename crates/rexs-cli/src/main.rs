//! # rexs-cli
//!
//! Command line front end for loading, validating and converting REXS
//! models in XML and JSON.

use anyhow::Context;
use clap::{Parser, Subcommand};
use rexs_adapter_json::{JsonModelLoader, JsonSerializer};
use rexs_adapter_xml::{XmlModelLoader, XmlSerializer};
use rexs_database::ModelRegistry;
use rexs_loader::{FileSink, Format, LoadOutcome, LoaderConfig, ModelLoader, ModelSerializer};
use rexs_validation::{LoadResult, Mode, Severity};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rexs")]
#[command(about = "REXS model validation and conversion")]
#[command(version)]
struct Cli {
    /// Path to a YAML loader configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory with the database catalog files
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Downgrade errors to warnings
    #[arg(long, global = true)]
    relaxed: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a model and report every issue
    Validate {
        /// Input model (.rexs, .xml, .rexsj or .json)
        input: PathBuf,
    },

    /// Load a model and write it in the format of the output extension
    Convert {
        /// Input model
        input: PathBuf,

        /// Output model
        output: PathBuf,
    },
}

/// Outcome of a command, mapped onto the process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Clean,
    Warnings,
    Failed,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Clean => ExitCode::SUCCESS,
            Status::Warnings => ExitCode::from(1),
            Status::Failed => ExitCode::from(2),
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(status) => status.into(),
        Err(e) => {
            eprintln!("error: {e:#}");
            Status::Failed.into()
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<Status> {
    let config = settings(cli)?;
    tracing::debug!(database = %config.database_path.display(), mode = %config.mode, "loader settings");
    let registry = config.registry().with_context(|| {
        format!(
            "failed to load database from {}",
            config.database_path.display()
        )
    })?;

    match &cli.command {
        Commands::Validate { input } => validate(&registry, input, config.mode),
        Commands::Convert { input, output } => convert(&registry, input, output, config.mode),
    }
}

/// Configuration file values, overridden by explicit flags
fn settings(cli: &Cli) -> anyhow::Result<LoaderConfig> {
    let mut config = match &cli.config {
        Some(path) => LoaderConfig::from_file(path)
            .with_context(|| format!("failed to read configuration {}", path.display()))?,
        None => LoaderConfig::default(),
    };
    if let Some(database) = &cli.database {
        config.database_path.clone_from(database);
    }
    if cli.relaxed {
        config.mode = Mode::Relaxed;
    }
    Ok(config)
}

fn format_of(path: &Path) -> anyhow::Result<Format> {
    Ok(Format::detect(path)?)
}

fn load(registry: &ModelRegistry, input: &Path, mode: Mode) -> anyhow::Result<LoadOutcome> {
    let outcome = match format_of(input)? {
        Format::Xml => XmlModelLoader::new(registry).load_from_file(input, mode),
        Format::Json => JsonModelLoader::new(registry).load_from_file(input, mode),
    };
    outcome.with_context(|| format!("failed to load {}", input.display()))
}

fn failures(result: &LoadResult) -> usize {
    result.errors().count() + result.with_severity(Severity::Critical).count()
}

fn validate(registry: &ModelRegistry, input: &Path, mode: Mode) -> anyhow::Result<Status> {
    let (_, result) = load(registry, input, mode)?;

    for issue in result.issues() {
        println!("{issue}");
    }
    println!("Errors: {}", failures(&result));
    println!("Warnings: {}", result.warnings().count());

    let status = if !result.is_success() {
        println!("Validation failed.");
        Status::Failed
    } else if result.has_issues() {
        println!("Validation passed with warnings.");
        Status::Warnings
    } else {
        println!("Validation passed with no warnings.");
        Status::Clean
    };
    Ok(status)
}

fn convert(
    registry: &ModelRegistry,
    input: &Path,
    output: &Path,
    mode: Mode,
) -> anyhow::Result<Status> {
    let target = format_of(output)?;
    let (model, result) = load(registry, input, mode)?;

    for issue in result.issues() {
        eprintln!("{issue}");
    }
    let Some(model) = model.filter(|_| result.is_success()) else {
        eprintln!("Conversion aborted: {} failed to load.", input.display());
        return Ok(Status::Failed);
    };

    let mut sink = FileSink::new(output);
    let written = match target {
        Format::Xml => XmlSerializer::new().serialize(&model, &mut sink),
        Format::Json => JsonSerializer::new().serialize(&model, &mut sink),
    };
    written.with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "Converted {} -> {} ({target})",
        input.display(),
        output.display()
    );
    Ok(if result.has_issues() {
        Status::Warnings
    } else {
        Status::Clean
    })
}

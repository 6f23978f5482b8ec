//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};

use agentsmd_artifacts::ArtifactMeta;
use agentsmd_core::ProgressReporter;
use agentsmd_shared::{AgentsMdError, AppConfig, init_config, load_config, load_config_from};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// agentsmd: build and check AGENTS.md navigation indexes.
#[derive(Parser)]
#[command(
    name = "agentsmd",
    version,
    about = "Analyze documentation folders and validate generated AGENTS.md indexes.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.agentsmd/agentsmd.toml.
    #[arg(long, global = true, env = "AGENTSMD_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Validation report format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum ReportFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Analyze a folder and write `<folder>_analysis.json`.
    Analyze {
        /// Folder containing the markdown files.
        folder: PathBuf,

        /// Output directory (defaults to the current directory).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Extract per-file metadata and key concepts into `<folder>_context.json`.
    Extract {
        /// Folder containing the markdown files.
        folder: PathBuf,

        /// Analysis artifact to reuse; the folder is analyzed in-process otherwise.
        #[arg(short, long)]
        analysis: Option<PathBuf>,

        /// Output directory (defaults to the current directory).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Validate a generated AGENTS.md against its folder.
    Validate {
        /// The generated index file.
        agents_md: PathBuf,

        /// Folder the index describes.
        folder: PathBuf,

        /// Report format.
        #[arg(long, default_value = "text")]
        format: ReportFormat,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "agentsmd=info",
        1 => "agentsmd=debug",
        _ => "agentsmd=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<ExitCode> {
    report_input_error(dispatch(cli))
}

fn dispatch(cli: Cli) -> Result<ExitCode> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Analyze { folder, out } => {
            cmd_analyze(&folder, out.as_deref(), &resolve_config(config_path)?)
        }
        Command::Extract {
            folder,
            analysis,
            out,
        } => cmd_extract(
            &folder,
            analysis.as_deref(),
            out.as_deref(),
            &resolve_config(config_path)?,
        ),
        Command::Validate {
            agents_md,
            folder,
            format,
        } => cmd_validate(&agents_md, &folder, format, &resolve_config(config_path)?),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(config_path),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

/// Bad input (a missing folder or file, a folder without markdown) gets a
/// one-line diagnostic and exit code 1. Other errors go to color-eyre.
fn report_input_error(result: Result<ExitCode>) -> Result<ExitCode> {
    let report = match result {
        Ok(code) => return Ok(code),
        Err(report) => report,
    };
    match report.downcast_ref::<AgentsMdError>() {
        Some(err) if err.is_input_error() => {
            error!(error = %err, "invalid input");
            eprintln!("error: {err}");
            Ok(ExitCode::FAILURE)
        }
        _ => Err(report),
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

fn output_dir(out: Option<&Path>) -> PathBuf {
    out.map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

fn print_artifact(meta: &ArtifactMeta) {
    println!("  Path:   {}", meta.path.display());
    println!("  Size:   {} bytes", meta.size_bytes);
    println!("  SHA256: {}", meta.sha256);
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_analyze(folder: &Path, out: Option<&Path>, config: &AppConfig) -> Result<ExitCode> {
    info!(folder = %folder.display(), "analyzing folder");

    let reporter = CliProgress::new();
    let result = agentsmd_core::analyze_folder(folder, &config.analysis, &reporter);
    reporter.finish();
    let analysis = result?;

    let meta = agentsmd_artifacts::write_analysis(&output_dir(out), &analysis)?;

    println!();
    println!("  Analysis complete!");
    println!("  Files:  {}", analysis.file_count);
    println!("  Words:  {}", analysis.total_words);
    print_artifact(&meta);
    println!();
    Ok(ExitCode::SUCCESS)
}

fn cmd_extract(
    folder: &Path,
    analysis_file: Option<&Path>,
    out: Option<&Path>,
    config: &AppConfig,
) -> Result<ExitCode> {
    info!(folder = %folder.display(), "extracting context");

    let analysis = analysis_file
        .map(|path| {
            agentsmd_artifacts::read_analysis(path)
                .wrap_err_with(|| format!("cannot load analysis from {}", path.display()))
        })
        .transpose()?;

    let reporter = CliProgress::new();
    let result =
        agentsmd_core::extract_context(folder, analysis.as_ref(), &config.analysis, &reporter);
    reporter.finish();
    let metadata = result?;

    let meta = agentsmd_artifacts::write_context(&output_dir(out), &metadata)?;

    println!();
    println!("  Context extraction complete!");
    println!("  Files:    {}", metadata.file_count);
    println!("  Concepts: {}", metadata.key_concepts.len());
    print_artifact(&meta);
    println!();
    Ok(ExitCode::SUCCESS)
}

fn cmd_validate(
    agents_md: &Path,
    folder: &Path,
    format: ReportFormat,
    config: &AppConfig,
) -> Result<ExitCode> {
    let report = agentsmd_validator::validate_path(agents_md, folder, config)?;

    match format {
        ReportFormat::Text => println!("{report}"),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report.to_json())?),
    }

    Ok(if report.is_pass() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn cmd_config_init(path: Option<&Path>) -> Result<ExitCode> {
    let path = match path {
        Some(p) => {
            let content = toml::to_string_pretty(&AppConfig::default())?;
            if let Some(parent) = p.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(p, content)
                .wrap_err_with(|| format!("cannot write config to {}", p.display()))?;
            p.to_path_buf()
        }
        None => init_config()?,
    };
    println!("Config initialized at: {}", path.display());
    Ok(ExitCode::SUCCESS)
}

fn cmd_config_show(path: Option<&Path>) -> Result<ExitCode> {
    let config = resolve_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(ExitCode::SUCCESS)
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner on stderr.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn file_processed(&self, name: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("[{current}/{total}] {name}"));
    }
}

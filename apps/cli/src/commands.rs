//! CLI command definitions, routing, and tracing setup.

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use napcite_core::{ProgressReporter, Stage, WorkflowResult, list_reports, read_report};
use napcite_shared::{AppConfig, init_config, load_config};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// napcite — local business citation research and generation.
#[derive(Parser)]
#[command(
    name = "napcite",
    version,
    about = "Research a business's directory presence and generate NAP citations.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run the full citation workflow for a map-listing URL.
    Run {
        /// Map-listing URL to process. Prompted for interactively if omitted.
        url: Option<String>,
    },

    /// List previously generated reports, newest first.
    History {
        /// Print the full content of the newest N reports.
        #[arg(long, default_value = "0")]
        show: usize,
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

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "napcite=info",
        1 => "napcite=debug",
        _ => "napcite=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run { url } => cmd_run(url.as_deref()).await,
        Command::History { show } => cmd_history(show).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

async fn cmd_run(url: Option<&str>) -> Result<()> {
    let config = load_config()?;

    let url = match url {
        Some(u) => u.trim().to_string(),
        None => prompt_for_url()?,
    };

    info!(url = %url, "starting citation workflow");

    let reporter = CliProgress::new();
    let result = napcite_core::run_workflow(&url, &config, &reporter).await?;

    println!();
    println!("  Citation report generated!");
    println!("  Business:  {}", result.business.name);
    println!("  Address:   {}", result.business.address);
    println!("  Phone:     {}", result.business.phone);
    println!(
        "  Checked:   {} directories",
        result.research.directories_checked.len()
    );
    println!(
        "  Missing:   {} directories",
        result.research.missing_directories.len()
    );
    println!("  Citations: {}", result.citations.len());
    println!("  Summary:   {} words", result.summary_word_count);
    println!("  Report:    {}", result.report_path.display());
    println!("  Time:      {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

/// Read a URL from stdin when none was given on the command line.
fn prompt_for_url() -> Result<String> {
    print!("Enter the map-listing URL for the business: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;

    let url = line.trim().to_string();
    if url.is_empty() {
        return Err(eyre!("no URL provided"));
    }
    Ok(url)
}

async fn cmd_history(show: usize) -> Result<()> {
    let config = load_config()?;
    let output_dir = PathBuf::from(&config.output.directory);
    let entries = list_reports(&output_dir)?;

    if entries.is_empty() {
        println!("No reports found in {}", output_dir.display());
        return Ok(());
    }

    println!("Reports in {} (newest first):", output_dir.display());
    for entry in &entries {
        println!("  {}", entry.file_name);
    }

    for entry in entries.iter().take(show) {
        println!();
        println!("===== {} =====", entry.file_name);
        println!("{}", read_report(&entry.path)?);
    }

    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn stage(&self, stage: Stage) {
        let label = match stage {
            Stage::Validation => "Validating input...",
            Stage::Extraction => "Extracting business information...",
            Stage::Research => "Checking business directories...",
            Stage::CitationBuilding => "Building citations...",
            Stage::Summary => "Generating summary...",
            Stage::Output => "Writing report...",
        };
        self.spinner.set_message(label);
    }

    fn done(&self, _result: &WorkflowResult) {
        self.spinner.finish_and_clear();
    }
}

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, shells};
use riskdash::commands::analyze::{self, AnalyzeOptions};
use riskdash::commands::{config_cmd, dashboard, sample};
use riskdash::config::{Config, ConfigOverrides};
use riskdash::logging::{init_tracing, LogTarget};

#[derive(Parser)]
#[command(name = "riskdash")]
#[command(about = "Clinical note readmission risk dashboard", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (default: <config dir>/riskdash/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Base URL of the prediction service
    #[arg(long, global = true, value_name = "URL")]
    endpoint: Option<String>,

    /// Minimum time an analysis stays in progress, in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    settle_ms: Option<u64>,

    /// Response deadline in seconds (0 waits forever)
    #[arg(long, global = true, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Write logs to this file (the dashboard logs nowhere otherwise)
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive dashboard (default)
    Dashboard,

    /// Analyze a note and print the verdict
    Analyze {
        /// Note file; reads stdin when omitted or `-`
        file: Option<PathBuf>,

        /// Analyze the built-in sample note
        #[arg(long, conflicts_with = "file")]
        sample: bool,

        /// Skip the settle delay
        #[arg(long)]
        no_delay: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the built-in sample note
    Sample,

    /// Print the effective configuration as TOML
    Config,

    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Shell {
    Bash,
    Zsh,
    Fish,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Dashboard);

    if let Commands::Completions { shell } = command {
        generate_completions(shell);
        return Ok(());
    }

    // The dashboard owns the terminal; only a log file is safe there.
    let log_target = match (&command, cli.log_file) {
        (_, Some(path)) => LogTarget::File(path),
        (Commands::Dashboard, None) => LogTarget::Disabled,
        (_, None) => LogTarget::Stderr,
    };
    init_tracing(log_target)?;

    let overrides = ConfigOverrides {
        endpoint: cli.endpoint,
        settle_delay_ms: cli.settle_ms,
        response_timeout_secs: cli.timeout_secs,
    };
    let config = Config::load(cli.config.as_deref())
        .and_then(|config| config.with_overrides(&overrides))
        .context("Failed to load configuration")?;

    match command {
        Commands::Dashboard => dashboard::execute(&config),
        Commands::Analyze {
            file,
            sample,
            no_delay,
            json,
        } => analyze::execute(
            &config,
            &AnalyzeOptions {
                file,
                sample,
                no_delay,
                json,
            },
        ),
        Commands::Sample => sample::execute(),
        Commands::Config => config_cmd::show(&config),
        Commands::Completions { .. } => Ok(()),
    }
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    match shell {
        Shell::Bash => generate(shells::Bash, &mut cmd, bin_name, &mut io::stdout()),
        Shell::Zsh => generate(shells::Zsh, &mut cmd, bin_name, &mut io::stdout()),
        Shell::Fish => generate(shells::Fish, &mut cmd, bin_name, &mut io::stdout()),
    }
}

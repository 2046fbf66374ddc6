//! OpenPay CLI
//!
//! Administers the alias directory and drives the interactive payment demo.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use openpay_lib::OpenpayConfig;

mod commands;
mod ui;

#[derive(Parser)]
#[command(name = "openpay")]
#[command(
    about = "OpenPay CLI - manage wallet aliases and run the payment demo",
    long_about = None
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory file (overrides the configuration file)
    #[arg(long, global = true, env = "OPENPAY_DIRECTORY")]
    directory: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, global = true, env = "OPENPAY_CONFIG", default_value = "openpay.json")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the directory and load the default aliases
    Init,

    /// List every alias
    List,

    /// Add an alias
    Add {
        /// Alias (public name)
        alias: String,

        /// Wallet URL the alias points at
        url: String,
    },

    /// Delete an alias
    Del {
        /// Alias to delete
        alias: String,
    },

    /// Point an alias at a new wallet URL
    Mod {
        /// Alias to modify
        alias: String,

        /// New wallet URL
        url: String,
    },

    /// Resolve an alias and show its wallet details
    Resolve {
        /// Alias to resolve
        alias: String,
    },

    /// Run the interactive payment sequence against a counterpart service
    Pay {
        /// Counterpart service base URL
        #[arg(long, env = "OPENPAY_COUNTERPART_URL")]
        base_url: Option<String>,

        /// Skip the grant approval prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the status of an outgoing payment
    Status {
        /// Outgoing payment id
        id: String,

        /// Counterpart service base URL
        #[arg(long, env = "OPENPAY_COUNTERPART_URL")]
        base_url: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "openpay_demo_cli=debug,openpay_lib=debug"
    } else {
        "openpay_demo_cli=info,openpay_lib=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<OpenpayConfig> {
    let mut config = OpenpayConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(directory) = &cli.directory {
        config = config.with_directory_path(directory);
    }
    Ok(config)
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(&cli)?;
    let verbose = cli.verbose;

    match cli.command {
        Commands::Init => commands::directory::init(&config, verbose).await,
        Commands::List => commands::list::run(&config, verbose).await,
        Commands::Add { alias, url } => {
            commands::directory::add(&config, &alias, &url, verbose).await
        }
        Commands::Del { alias } => commands::directory::delete(&config, &alias, verbose).await,
        Commands::Mod { alias, url } => {
            commands::directory::modify(&config, &alias, &url, verbose).await
        }
        Commands::Resolve { alias } => commands::resolve::run(&config, &alias, verbose).await,
        Commands::Pay { base_url, yes } => {
            if let Some(url) = base_url {
                config = config.with_counterpart_url(url);
            }
            commands::pay::run(&config, yes, verbose).await
        }
        Commands::Status { id, base_url } => {
            if let Some(url) = base_url {
                config = config.with_counterpart_url(url);
            }
            commands::status::run(&config, &id, verbose).await
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        ui::error(&format!("{:#}", e));
        std::process::exit(1);
    }
    Ok(())
}

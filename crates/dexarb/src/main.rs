use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dexarb_models::config::DexArbConfig;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "config/dexarb.toml";

#[derive(Parser, Debug)]
#[command(name = "dexarb", about = "Two-pool DEX arbitrage advisor")]
struct Cli {
    /// Path to configuration file (defaults to config/dexarb.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Override the configured bind address
        #[arg(long)]
        bind: Option<String>,
    },
    /// Evaluate once and print the report JSON to stdout
    Check {
        /// Question to pass along to the generator
        #[arg(short, long)]
        question: Option<String>,

        /// Pretty-print the output JSON
        #[arg(long)]
        pretty: bool,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<&Path>) -> Result<DexArbConfig> {
    let path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => Some(PathBuf::from(DEFAULT_CONFIG)).filter(|p| p.exists()),
    };

    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?
        }
        None => {
            tracing::info!("No config file, using defaults");
            DexArbConfig::default()
        }
    };

    if let Ok(url) = std::env::var("RPC_URL") {
        if !url.trim().is_empty() {
            config.rpc.url = url;
        }
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = load_config(cli.config.as_deref())?;
    let service = dexarb::build_service(&config).context("Failed to build service")?;

    match cli.command {
        Command::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            let cancel = CancellationToken::new();

            let token = cancel.clone();
            tokio::spawn(async move {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Received shutdown signal");
                token.cancel();
            });

            dexarb::serve(Arc::new(service), &bind, cancel)
                .await
                .with_context(|| format!("Server error on {bind}"))?;
        }
        Command::Check { question, pretty } => {
            let report = service
                .arbitrage(question.as_deref())
                .await
                .context("Evaluation failed")?;

            let output = if pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{output}");
        }
    }

    Ok(())
}

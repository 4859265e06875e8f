// Copyright 2026 Pagelift Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::sync::Arc;

use pagelift::browser::chromium::{find_chromium, ChromiumSessionManager};
use pagelift::config::ScrapeConfig;
use pagelift::pipeline::{ScrapeOutcome, Scraper};
use pagelift::rest::{self, SharedState};

#[derive(Parser)]
#[command(
    name = "pagelift",
    about = "Pagelift — fetch a rendered chapter page and extract its ordered images",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape one page and print the image list as JSON
    Scrape {
        /// Fully qualified page address
        url: String,
        /// Abort navigation after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Identity string sent with the request
        #[arg(long)]
        user_agent: Option<String>,
    },
    /// Start the HTTP REST API
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "3107")]
        port: u16,
    },
    /// Check whether a Chromium binary can be found
    Doctor,
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Scrape {
            url,
            timeout_ms,
            user_agent,
        } => {
            url::Url::parse(&url).with_context(|| format!("invalid url {url:?}"))?;

            let config = ScrapeConfig::default().with_overrides(timeout_ms, user_agent);
            let sessions = Arc::new(ChromiumSessionManager::new());
            let scraper = Scraper::new(sessions, config);

            match scraper.run(&url).await {
                ScrapeOutcome::Success(images) => {
                    println!("{}", serde_json::to_string_pretty(&images)?);
                }
                ScrapeOutcome::Failure(error) => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&serde_json::json!({ "error": error }))?
                    );
                    std::process::exit(1);
                }
            }
        }

        Commands::Serve { port } => {
            let state = Arc::new(SharedState::new(
                Arc::new(ChromiumSessionManager::new()),
                ScrapeConfig::default(),
            ));
            rest::start(port, state).await?;
        }

        Commands::Doctor => {
            println!("Pagelift Doctor");
            println!("===============");
            println!("OS:   {}", std::env::consts::OS);
            println!("Arch: {}", std::env::consts::ARCH);
            match find_chromium() {
                Some(path) => println!("[OK] Chromium found: {}", path.display()),
                None => {
                    println!(
                        "[!!] Chromium NOT found. Set PAGELIFT_CHROMIUM_PATH or install google-chrome."
                    );
                    std::process::exit(1);
                }
            }
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "pagelift", &mut std::io::stdout());
        }
    }

    Ok(())
}

//! # Headline Hub
//!
//! Binary entrypoint: parses the command line, initializes tracing, and runs
//! one of
//!
//! - `serve` (default): the JSON API on a local address
//! - `scrape`: a cache-aware one-shot fetch cycle, printed as JSON
//! - `search`: a keyword search over fresh headlines, optionally exported
//!
//! ## Usage
//!
//! ```sh
//! headline_hub serve --bind 127.0.0.1:8000
//! ```

use clap::Parser;
use headline_hub::cli::{Cli, Command};
use headline_hub::utils::write_json_atomic;
use headline_hub::{AppState, api};
use std::error::Error;
use std::net::SocketAddr;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let cli = Cli::parse();
    let settings = cli.settings();
    debug!(?settings, "Parsed CLI arguments");

    let state = AppState::from_settings(&settings).await?;

    match cli.command() {
        Command::Serve { bind } => serve(state, bind).await?,
        Command::Scrape { force } => {
            let entry = state.fresh_or_refresh(force).await?;
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        Command::Search {
            keyword,
            whole_word,
            export,
        } => {
            let entry = state.fresh_or_refresh(false).await?;
            let mode = whole_word.then_some(headline_hub::search::MatchMode::WholeWord);
            let outcome = state.search_in(&entry.headlines, &keyword, mode);

            if let Some(path) = export {
                write_json_atomic(&path, &outcome.results).await?;
                info!(path = %path.display(), found = outcome.found, "Exported matching headlines");
            }
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }

    Ok(())
}

/// Bind and serve until the process is stopped. Failing to bind is fatal.
#[instrument(level = "info", skip(state))]
async fn serve(state: AppState, bind: SocketAddr) -> Result<(), Box<dyn Error>> {
    let listener = match tokio::net::TcpListener::bind(bind).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%bind, error = %e, "Failed to bind listener");
            return Err(e.into());
        }
    };

    info!(addr = %listener.local_addr()?, "News API server started");
    axum::serve(listener, api::router(state)).await?;
    Ok(())
}

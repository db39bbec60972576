use anyhow::{Context, Result};
use jiranote::{Config, Credentials, Dispatcher, JiraClient, Outcome};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "warn";

fn main() -> ExitCode {
    init_tracing();

    let config = Config::parse();

    match run(&config) {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<Outcome> {
    let workdir = std::env::current_dir().context("Failed to determine working directory")?;
    jiranote::load_env_files(&workdir);

    let dispatcher = Dispatcher::new(workdir, jiranote::default_issue_key(), || {
        let credentials = Credentials::from_env()?;
        tracing::debug!(?credentials, "connecting to tracker");
        JiraClient::new(&credentials)
    });

    dispatcher.run(config)
}

/// Sends diagnostics to stderr, filtered by `RUST_LOG`.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

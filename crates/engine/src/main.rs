//! Can't Stop Engine - Main entry point.
//!
//! Reads JSON command envelopes line by line from a file given as the first
//! argument, or from stdin, and writes one JSON reply per line to stdout.

use std::sync::Arc;

use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cantstop_engine::infrastructure::{
    clock::{SystemClock, SystemRandom},
    settings::GameSettings,
};
use cantstop_engine::{runner, App};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    // Logs go to stderr; stdout carries replies
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cantstop_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = GameSettings::from_env();
    tracing::info!(
        roll_cost = settings.roll_cost,
        retries = settings.command_retries,
        "Starting Can't Stop engine"
    );

    let app = App::in_memory(
        settings,
        Arc::new(SystemClock::new()),
        Arc::new(SystemRandom::new()),
    );

    let stdout = tokio::io::stdout();
    let stats = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!(path = %path, "Reading commands from file");
            let file = tokio::fs::File::open(&path).await?;
            runner::run(&app, BufReader::new(file), stdout).await?
        }
        None => runner::run(&app, BufReader::new(tokio::io::stdin()), stdout).await?,
    };

    tracing::info!(commands = stats.commands, "Shutting down");
    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

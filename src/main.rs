use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use session_reaper::{run_reclamation, Config, FatalError, HttpDirectory, RunResponse};
use tracing::info;

/// Terminates sessions that have been connected too long and idle too long,
/// then reports per-session outcomes as JSON on stdout.
#[derive(Debug, Parser)]
#[command(name = "session-reaper", version)]
struct Cli {
    /// Path to a config file (env vars with the REAPER_ prefix override it)
    #[arg(short, long)]
    config: Option<String>,

    /// Directory scope to query (overrides the configured one)
    #[arg(long)]
    scope: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut cfg = Config::load(cli.config.as_deref())?;
    if let Some(scope) = cli.scope {
        cfg.directory_scope = scope;
    }
    cfg.validate()?;

    info!(
        "session-reaper starting: scope {}, active threshold {}h, idle threshold {}h",
        cfg.directory_scope, cfg.active_threshold_hours, cfg.idle_threshold_hours
    );

    // Missing credentials surface through the same fatal envelope as every
    // other top-level failure.
    let result = match HttpDirectory::new(&cfg.endpoint(), &cfg.directory_scope) {
        Ok(api) => run_reclamation(Arc::new(api), &cfg).await,
        Err(e) => Err(FatalError::from(e)),
    };

    let response = RunResponse::from_run(result);
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}

//! Literature digest: binary entrypoint.
//! Loads `.env`, configures tracing, runs one refresh against PubMed and
//! injects the result into the page.

use std::process::ExitCode;

use literature_digest::{pipeline, CategoryConfig, RunConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact logs by default; `LOG_FORMAT=json` switches to JSON lines.
/// Level comes from `RUST_LOG` (default `info`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // No-op when there is no .env file.
    let _ = dotenvy::dotenv();
    init_tracing();

    let categories = match CategoryConfig::load_default() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = ?e, "invalid category config");
            return ExitCode::FAILURE;
        }
    };
    let run_cfg = RunConfig::from_env();
    tracing::info!(
        categories = categories.categories.len(),
        page = %run_cfg.page_path.display(),
        history = %run_cfg.history_path.display(),
        days_back = run_cfg.days_back,
        "starting literature refresh"
    );

    match pipeline::run(&categories, &run_cfg).await {
        Ok(changed) => {
            println!("Updated: {changed}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = ?e, "literature refresh failed");
            ExitCode::FAILURE
        }
    }
}

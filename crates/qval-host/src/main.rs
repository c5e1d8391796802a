use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use qval_engine::EngineConfig;
use qval_host::ServerConfig;
use qval_host::http::{AppState, serve};
use qval_host::sessions::SessionRegistry;
use qval_llm::GeminiValuationClient;

/// Q-Val synthetic illiquid asset pricing service.
#[derive(Debug, Parser)]
#[command(name = "qval-host", version)]
struct Args {
    /// Address to bind the HTTP server on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Artificial staging pause before the completion call, in milliseconds.
    /// Zero skips the pause.
    #[arg(long, default_value_t = 500)]
    staging_delay_ms: u64,

    /// Deadline for one completion call, in seconds.
    #[arg(long, default_value_t = 60)]
    request_timeout_secs: u64,
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    setup_logging();
    let args = Args::parse();

    // Fail fast on a missing credential rather than letting every request
    // surface it as a generic ERROR.
    let client = GeminiValuationClient::from_env()
        .context("completion client setup (is GEMINI_API_KEY set?)")?;

    let config = ServerConfig {
        bind: args.bind,
        engine: EngineConfig {
            staging_delay: Duration::from_millis(args.staging_delay_ms),
            request_timeout: Duration::from_secs(args.request_timeout_secs),
        },
    };
    let registry = Arc::new(SessionRegistry::new(Arc::new(client), config.engine.clone()));
    let state = AppState::new(registry);

    serve(config.bind, state)
        .await
        .map_err(|e| anyhow::anyhow!(e))
}

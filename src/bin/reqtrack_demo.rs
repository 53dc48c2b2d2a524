//! Demo server: an echo endpoint behind the tracking middleware.
//!
//! ```sh
//! reqtrack-demo --port 8080 --config tracker.toml
//! curl -d '{"hello":"world"}' -H 'content-type: application/json' localhost:8080/echo
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::routing::{get, post};
use axum::{middleware, Router};
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use reqtrack::middleware::track_requests;
use reqtrack::{RequestTracker, TrackerConfig, TracingSink};

#[derive(Parser)]
#[command(name = "reqtrack-demo", about = "Echo server with request tracking")]
struct Cli {
    /// Path to a TOML tracker configuration (defaults apply when omitted)
    #[arg(long, env = "REQTRACK_DEMO_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(long, env = "REQTRACK_DEMO_PORT", default_value_t = 8080)]
    port: u16,

    /// Log format: pretty or json
    #[arg(long, env = "REQTRACK_DEMO_LOG_FORMAT", default_value = "pretty")]
    log_format: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_format)?;

    let config = TrackerConfig::load(cli.config.as_deref())?.with_env_overrides();
    let tracker = Arc::new(RequestTracker::new(config, Arc::new(TracingSink))?);
    tracing::info!(
        enabled = tracker.config().enabled,
        body_max_length = tracker.config().body_max_length,
        "tracker configured"
    );

    let app = Router::new()
        .route("/", get(|| async { "reqtrack demo" }))
        .route("/echo", post(echo))
        .layer(middleware::from_fn_with_state(tracker, track_requests))
        .layer(TraceLayer::new_for_http());

    let address = SocketAddr::from(([0, 0, 0, 0], cli.port));
    let listener = tokio::net::TcpListener::bind(address).await?;
    tracing::info!(%address, "reqtrack demo listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn echo(body: String) -> String {
    body
}


fn init_tracing(format: &str) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?,
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()?,
    }

    Ok(())
}

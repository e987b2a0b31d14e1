//! # Event Portal
//!
//! Runs the API proxy that the portal's fetch client talks to.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! UPSTREAM_BASE_URL=https://gateway.example.net RUST_LOG=info cargo run
//! ```
//!
//! See [`event_portal::config`] for every setting.

use event_portal::config::Config;
use event_portal::lifecycle::setup_tracing;
use event_portal::proxy::start_server;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = Config::load().map_err(|e| {
        error!("{e}");
        e.to_string()
    })?;
    info!(
        port = config.port,
        upstream = %config.upstream_base_url,
        api_key = config.upstream_api_key.is_some(),
        "Configuration loaded"
    );

    let span = tracing::info_span!("proxy");
    start_server(&config)
        .instrument(span)
        .await
        .map_err(|e| {
            error!("Server failed: {e}");
            e.to_string()
        })
}

//! # Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging with the `tracing` crate.
//! The format is compact and hides the module prefix (`with_target(false)`);
//! the level comes from `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **Fetch actor**: startup, shutdown, entries created and destroyed, stale completions
//! - **Clients**: a span per subscription and per mail request
//! - **Overlay and sign-up**: close scheduling, validation failures, mail outcomes
//! - **Proxy**: bind address, forwarded requests, rejected methods and payloads
//!
//! ## Usage Examples
//!
//! ```bash
//! # Lifecycle events only
//! RUST_LOG=info cargo run
//!
//! # Keys, generations and forwarded paths
//! RUST_LOG=debug cargo run
//!
//! # Only the fetch cache
//! RUST_LOG=event_portal::framework=debug cargo run
//! ```
//!
//! With `RUST_LOG=debug`, subscribing to one event shows the request flow:
//!
//! ```text
//! INFO Fetch actor started
//! DEBUG watch{id=Some("e1")}: Subscribing
//! INFO Created key=/api/events/e1 size=1
//! DEBUG Dispatch key=/api/events/e1 generation=1
//! INFO Fetched key=/api/events/e1
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}

//! Runtime orchestration and lifecycle management.
//!
//! - **Actor lifecycle management**: starting, wiring, and shutting down the fetch actor
//! - **Observability setup**: initializing tracing and logging
//!
//! # Main Components
//!
//! - [`PortalSystem`] - Owns the fetch actor and hands out domain clients
//! - [`setup_tracing`] - Initializes the tracing/logging infrastructure

pub mod portal_system;
pub mod tracing;

pub use portal_system::*;
pub use self::tracing::setup_tracing;

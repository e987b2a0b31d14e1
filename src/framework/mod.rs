//! Keyed, de-duplicating fetch cache for path-addressed resources.
//!
//! This module provides the read path (subscribe to a key, observe its
//! loading/error/data state) and the write path (post a body, decode a reply).
//!
//! # Main Components
//!
//! - [`Resource`] - Trait that resource shapes implement to be fetched
//! - [`FetchActor`] - Actor that owns the keyed cache
//! - [`FetchClient`] - Handle for subscribing, focus revalidation and writes
//! - [`Subscription`] - Typed, reference-counted view over one key
//! - [`Transport`] - Network seam, with [`HttpTransport`] for real requests
//! - [`FetchError`] - Every failure the read and write paths can report
//!
//! # Testing
//!
//! See [`mock`] module for utilities to test without a network.

pub mod core;
pub mod error;
pub mod mock;
pub mod transport;

// Re-export core types for convenience
pub use self::core::*;
pub use error::FetchError;
pub use transport::{HttpTransport, Transport};

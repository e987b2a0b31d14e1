//! # Fetch Errors
//!
//! Every failure on the read or write path collapses into a [`FetchError`].
//! The type is `Clone + PartialEq` because one error value is shared by every
//! observer of a key.

/// Errors that can occur while fetching or posting a resource.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("Network error: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// The body could not be decoded into the expected shape.
    #[error("Malformed response: {0}")]
    Decode(String),

    /// The body was valid JSON but neither an object nor an array.
    #[error("Invalid API response format")]
    InvalidFormat,

    /// The fetch actor is no longer running.
    #[error("Fetch actor closed")]
    ActorClosed,

    /// The fetch actor dropped the response channel.
    #[error("Fetch actor dropped response channel")]
    ActorDropped,
}

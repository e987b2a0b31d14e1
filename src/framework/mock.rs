//! # Mock Framework
//!
//! Utilities for testing the fetch cache and everything built on it without a network.
//!
//! Use [`MockTransport`] in place of an HTTP transport, queue responses with
//! [`MockTransport::expect_get`] / [`MockTransport::expect_post`], then assert on
//! [`MockTransport::calls`] and [`MockTransport::verify`].
//!
//! [`RecordingNavigator`] plays the same role for the overlay's history capability.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::framework::{FetchError, Transport};
use crate::overlay::Navigator;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// HTTP method of a recorded or expected call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockMethod {
    Get,
    Post,
}

/// A call observed by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: MockMethod,
    pub path: String,
    pub body: Option<Value>,
}

type Queue = VecDeque<Result<Value, FetchError>>;

/// A transport with per-path expectation queues.
///
/// # Example
/// ```ignore
/// let transport = Arc::new(MockTransport::new());
/// transport.expect_get("/api/events/e1").return_ok(json!({ "id": "e1", "title": "Launch" }));
///
/// let (actor, client) = FetchActor::new(16, transport.clone());
/// // Use client in tests...
/// transport.verify(); // Ensures all expectations were met
/// ```
///
/// A call with no queued response resolves to a transport error rather than
/// panicking, so a missing expectation shows up as an error state.
#[derive(Default)]
pub struct MockTransport {
    expectations: Mutex<HashMap<(MockMethod, String), Queue>>,
    calls: Mutex<Vec<RecordedCall>>,
    latency: Option<Duration>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTransport {
    /// Creates a new mock transport with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every response, so concurrent callers overlap in flight.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Expects a GET of `path`.
    pub fn expect_get(&self, path: &str) -> ExpectationBuilder<'_> {
        ExpectationBuilder {
            transport: self,
            method: MockMethod::Get,
            path: path.to_string(),
        }
    }

    /// Expects a POST to `path`.
    pub fn expect_post(&self, path: &str) -> ExpectationBuilder<'_> {
        ExpectationBuilder {
            transport: self,
            method: MockMethod::Post,
            path: path.to_string(),
        }
    }

    /// Every call observed so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Number of calls (any method) made to `path`.
    pub fn call_count(&self, path: &str) -> usize {
        lock(&self.calls).iter().filter(|c| c.path == path).count()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining: usize = lock(&self.expectations).values().map(VecDeque::len).sum();
        if remaining > 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }

    async fn respond(
        &self,
        method: MockMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, FetchError> {
        lock(&self.calls).push(RecordedCall {
            method,
            path: path.to_string(),
            body,
        });

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let queued = lock(&self.expectations)
            .get_mut(&(method, path.to_string()))
            .and_then(VecDeque::pop_front);
        queued.unwrap_or_else(|| Err(FetchError::Transport(format!("unexpected {method:?} {path}"))))
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, path: &str) -> Result<Value, FetchError> {
        self.respond(MockMethod::Get, path, None).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, FetchError> {
        self.respond(MockMethod::Post, path, Some(body)).await
    }
}

/// Builder for one queued response.
pub struct ExpectationBuilder<'a> {
    transport: &'a MockTransport,
    method: MockMethod,
    path: String,
}

impl ExpectationBuilder<'_> {
    /// Sets the expectation to return a successful body.
    pub fn return_ok(self, value: Value) {
        self.push(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FetchError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<Value, FetchError>) {
        lock(&self.transport.expectations)
            .entry((self.method, self.path))
            .or_default()
            .push_back(response);
    }
}

// =============================================================================
// NAVIGATION
// =============================================================================

/// [`Navigator`] that counts backward navigations.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    backs: AtomicUsize,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn back_count(&self) -> usize {
        self.backs.load(Ordering::SeqCst)
    }
}

impl Navigator for RecordingNavigator {
    fn back(&self) {
        self.backs.fetch_add(1, Ordering::SeqCst);
    }
}

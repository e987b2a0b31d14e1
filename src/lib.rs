//! # Event Portal
//!
//! > **Event discovery and sign-up, with a keyed fetch cache at its core.**
//!
//! Users browse events, open one in a modal overlay, see its image and location
//! resolved through small proxy endpoints, and sign up for one of its packages
//! by email.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Why an actor for the cache?
//!
//! Every view that shows a resource declares a key and renders whatever state
//! that key is in. Many views ask for the same key at once (a card and an
//! overlay for the same event, two cards sharing a location), so the cache must
//! de-duplicate requests and keep one state per key. A single [`FetchActor`](framework::FetchActor)
//! owns that map and processes messages sequentially: no locks, and an in-flight
//! request can never race another for the same key.
//!
//! ### Views are data
//!
//! There is no markup here. Each component owns its subscriptions and exposes
//! an explicit `render()` returning a typed view: what a browser would draw,
//! minus the drawing.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Errors are values
//! Transport failures never escape the fetch or write boundary. The read path
//! folds them into [`FetchState::error`](framework::FetchState); the write path
//! folds them into an unsuccessful [`SubmissionResult`](model::SubmissionResult).
//!
//! ### 2. One precedence for every view
//! [`render::resolve`] maps `(is_loading, error, data, should_fetch)` to exactly
//! one of loading, error, empty or success.
//!
//! ### 3. Deferred navigation
//! Closing the overlay hides it at once and navigates back after the exit
//! animation. The navigation is a task owned by the overlay and aborted if the
//! overlay is dropped first.
//!
//! ### 4. Observability
//! `tracing` everywhere, with structured fields. See [`lifecycle::tracing`].
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! - **Role**: keyed, reference-counted, de-duplicating fetch cache and its transport seam.
//! - **Key items**: [`FetchActor`](framework::FetchActor), [`FetchClient`](framework::FetchClient), [`Subscription`](framework::Subscription), [`Resource`](framework::Resource).
//!
//! ### 2. The Interface ([`clients`], [`model`])
//! - **Role**: domain clients over the shared cache and the resource shapes they decode.
//! - **Key items**: [`EventClient`](clients::EventClient), [`MailClient`](clients::MailClient), [`EventData`](model::EventData).
//!
//! ### 3. The Screens ([`render`], [`views`], [`overlay`], [`signup`])
//! - **Role**: state-to-view selection, event cards and grids, the detail overlay and the sign-up sub-flow.
//! - **Key items**: [`EventGrid`](views::EventGrid), [`EventOverlay`](overlay::EventOverlay), [`SignupFlow`](signup::SignupFlow).
//!
//! ### 4. The Boundary ([`proxy`])
//! - **Role**: the axum server forwarding read and write endpoints to the upstream backend.
//!
//! ### 5. The Orchestrator ([`lifecycle`], [`config`])
//! - **Role**: spawns and shuts down the fetch actor, initializes tracing, loads settings.
//! - **Key items**: [`PortalSystem`](lifecycle::PortalSystem), [`Config`](config::Config).
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the proxy with info logs
//! RUST_LOG=info cargo run
//!
//! # Run the tests
//! cargo test
//! ```

pub mod clients;
pub mod config;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod overlay;
pub mod proxy;
pub mod render;
pub mod signup;
pub mod views;

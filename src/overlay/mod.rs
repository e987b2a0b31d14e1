//! # Modal Overlay
//!
//! An overlay is bound to a route parameter and dismissed with a deferred
//! backward navigation:
//!
//! ```text
//! Open --request_close--> Closing --(close delay)--> Closed (navigator.back())
//! ```
//!
//! Content hides as soon as `Closing` is entered; the navigation waits for the
//! exit animation. Dropping the overlay before the delay elapses cancels the
//! navigation.
//!
//! History access is the injected [`Navigator`] capability, so tests can
//! substitute [`RecordingNavigator`](crate::framework::mock::RecordingNavigator).

pub mod controller;
pub mod event_overlay;

pub use controller::*;
pub use event_overlay::*;

/// Browser-history capability used to leave the overlay's route.
pub trait Navigator: Send + Sync + 'static {
    fn back(&self);
}

//! Explicit render functions for the event browsing screens.
//!
//! A view here is plain data describing what to display. Components own the
//! subscriptions their views read from; dropping a component releases them.

pub mod event_card;
pub mod event_grid;
pub mod format;
pub mod image;
pub mod location;

pub use event_card::*;
pub use event_grid::*;
pub use format::*;
pub use image::*;
pub use location::*;

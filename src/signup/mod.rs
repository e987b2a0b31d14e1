//! # Sign-up Sub-flow
//!
//! Package selection, email collection and the confirmation mail sent for
//! one sign-up. The flow lives inside the event overlay and is reset when the
//! overlay closes.
//!
//! - [`validation`]: the ordered email field rules.
//! - [`template`]: subject and body of the confirmation mail.
//! - [`flow`]: the `Browsing` / `Collecting` state machine and its view.

pub mod flow;
pub mod template;
pub mod validation;

pub use flow::*;
pub use template::*;
pub use validation::*;

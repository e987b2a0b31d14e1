//! Resource shapes consumed from the upstream service.
//!
//! None of these are owned by the portal: they are decoded from the proxy's
//! read endpoints and rendered, or encoded for the mail write endpoint.

pub mod event;
pub mod image;
pub mod location;
pub mod mail;

pub use event::*;
pub use image::*;
pub use location::*;
pub use mail::*;

/// Collection and member prefix for events.
pub const EVENTS_PATH: &str = "/api/events";
/// Collection and member prefix for images.
pub const IMAGES_PATH: &str = "/api/Image";
/// Member prefix for locations.
pub const LOCATIONS_PATH: &str = "/api/Nexuspoint";
/// Write endpoint for confirmation emails.
pub const MAIL_SEND_PATH: &str = "/api/mail/send";

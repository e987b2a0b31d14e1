//! Type-safe wrappers around [`FetchClient`](crate::framework::FetchClient).

pub mod event_client;
pub mod image_client;
pub mod location_client;
pub mod mail_client;
pub mod resource_fetcher;

pub use event_client::*;
pub use image_client::*;
pub use location_client::*;
pub use mail_client::*;
pub use resource_fetcher::*;

use crate::framework::FetchClient;

/// Every domain client, sharing one fetch cache.
#[derive(Clone)]
pub struct PortalClients {
    pub events: EventClient,
    pub images: ImageClient,
    pub locations: LocationClient,
    pub mail: MailClient,
}

impl PortalClients {
    pub fn new(inner: FetchClient) -> Self {
        Self {
            events: EventClient::new(inner.clone()),
            images: ImageClient::new(inner.clone()),
            locations: LocationClient::new(inner.clone()),
            mail: MailClient::new(inner),
        }
    }
}

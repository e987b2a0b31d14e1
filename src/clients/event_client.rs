use crate::clients::resource_fetcher::ResourceFetcher;
use crate::framework::{FetchClient, ResourceKey, Subscription};
use crate::model::{EventData, EventList, EVENTS_PATH};
use tracing::{debug, instrument};

/// Client for events and the event collection.
#[derive(Clone)]
pub struct EventClient {
    inner: FetchClient,
}

impl EventClient {
    pub fn new(inner: FetchClient) -> Self {
        Self { inner }
    }

    pub async fn list(&self) -> Subscription<EventList> {
        self.list_at(EVENTS_PATH).await
    }

    /// Subscribe to an event collection served at `endpoint`.
    #[instrument(skip(self))]
    pub async fn list_at(&self, endpoint: &str) -> Subscription<EventList> {
        debug!("Subscribing");
        self.inner
            .watch(Some(ResourceKey::collection(endpoint)))
            .await
    }
}

impl ResourceFetcher<EventData> for EventClient {
    fn inner(&self) -> &FetchClient {
        &self.inner
    }
}

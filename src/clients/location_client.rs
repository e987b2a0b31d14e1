use crate::clients::resource_fetcher::ResourceFetcher;
use crate::framework::FetchClient;
use crate::model::EventLocationData;

/// Client for event locations.
#[derive(Clone)]
pub struct LocationClient {
    inner: FetchClient,
}

impl LocationClient {
    pub fn new(inner: FetchClient) -> Self {
        Self { inner }
    }
}

impl ResourceFetcher<EventLocationData> for LocationClient {
    fn inner(&self) -> &FetchClient {
        &self.inner
    }
}

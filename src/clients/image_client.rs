use crate::clients::resource_fetcher::ResourceFetcher;
use crate::framework::{FetchClient, Subscription};
use crate::model::{EventImageData, ImageList};
use tracing::{debug, instrument};

/// Client for image metadata.
#[derive(Clone)]
pub struct ImageClient {
    inner: FetchClient,
}

impl ImageClient {
    pub fn new(inner: FetchClient) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn all(&self) -> Subscription<ImageList> {
        debug!("Subscribing");
        self.inner.watch(Some(ImageList::key())).await
    }
}

impl ResourceFetcher<EventImageData> for ImageClient {
    fn inner(&self) -> &FetchClient {
        &self.inner
    }
}

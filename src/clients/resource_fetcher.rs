use crate::framework::{FetchClient, Resource, Subscription};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit the keyed read path.
///
/// Implementors only say which [`FetchClient`] they wrap; key construction,
/// guard-value handling and de-duplication come from the default method.
#[async_trait]
pub trait ResourceFetcher<T: Resource>: Send + Sync {
    /// Access the shared fetch client.
    fn inner(&self) -> &FetchClient;

    /// Subscribe to the member of `T`'s collection identified by `id`.
    ///
    /// A missing, blank or guard id yields an idle subscription and no request.
    #[tracing::instrument(skip(self))]
    async fn watch(&self, id: Option<&str>) -> Subscription<T> {
        tracing::debug!("Subscribing");
        self.inner().watch::<T>(T::key(id)).await
    }
}

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::clients::PortalClients;
use crate::config::Config;
use crate::framework::{FetchActor, FetchClient, HttpTransport, Transport};
use crate::overlay::{EventOverlay, Navigator};
use crate::views::{EventGrid, EventGridOptions};

/// Mailbox size of the fetch actor.
pub const FETCH_BUFFER: usize = 64;

#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("Fetch actor task failed: {0}")]
    ActorTask(#[from] tokio::task::JoinError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Runtime orchestrator for the portal's client side.
///
/// `PortalSystem` is responsible for:
/// - **Lifecycle Management**: starting and stopping the fetch actor
/// - **Dependency Wiring**: handing every domain client the same cache
///
/// # Example
///
/// ```ignore
/// let system = PortalSystem::new(Arc::new(HttpTransport::new("http://localhost:3000")));
///
/// let mut overlay = system.overlay(Some("e1"), navigator).await;
/// overlay.settle().await;
///
/// drop(overlay);
/// system.shutdown().await?;
/// ```
pub struct PortalSystem {
    pub clients: PortalClients,
    fetch: FetchClient,
    close_delay: Duration,
    handle: JoinHandle<()>,
}

impl PortalSystem {
    /// Spawns the fetch actor over `transport`.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let (actor, fetch) = FetchActor::new(FETCH_BUFFER, transport);
        let handle = tokio::spawn(actor.run());

        Self {
            clients: PortalClients::new(fetch.clone()),
            fetch,
            close_delay: crate::overlay::DEFAULT_CLOSE_DELAY,
            handle,
        }
    }

    /// Spawns the fetch actor over HTTP, resolving keys against `portal_base_url`.
    pub fn with_http(config: &Config) -> Result<Self, LifecycleError> {
        let client = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .build()?;
        let transport = HttpTransport::with_client(client, config.portal_base_url.clone());
        Ok(Self::new(Arc::new(transport)).with_close_delay(config.overlay_close_delay))
    }

    pub fn with_close_delay(mut self, close_delay: Duration) -> Self {
        self.close_delay = close_delay;
        self
    }

    pub fn fetch_client(&self) -> &FetchClient {
        &self.fetch
    }

    /// Mounts the event overlay for the `event_id` route parameter.
    pub async fn overlay(&self, event_id: Option<&str>, navigator: Arc<dyn Navigator>) -> EventOverlay {
        EventOverlay::mount(event_id, self.clients.clone(), navigator, self.close_delay).await
    }

    /// Mounts an event grid.
    pub async fn event_grid(&self, options: EventGridOptions) -> EventGrid {
        EventGrid::mount(self.clients.clone(), options).await
    }

    /// The application regained focus.
    pub async fn focus(&self) {
        if let Err(e) = self.fetch.focus().await {
            error!("Focus revalidation failed: {e}");
        }
    }

    /// Gracefully shuts down the fetch actor.
    ///
    /// The actor exits once every client and subscription is gone, so views
    /// mounted from this system must be dropped first.
    pub async fn shutdown(self) -> Result<(), LifecycleError> {
        info!("Shutting down system...");

        drop(self.clients);
        drop(self.fetch);

        if let Err(e) = self.handle.await {
            error!("Actor task failed: {:?}", e);
            return Err(e.into());
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

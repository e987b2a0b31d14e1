//! # API Proxy
//!
//! Thin axum server in front of the upstream backend. Every read endpoint
//! forwards one GET to a fixed upstream path and caches the body for the
//! endpoint's duration; the mail endpoint forwards one POST and maps the
//! upstream delivery status to a [`SubmissionResult`](crate::model::SubmissionResult).
//!
//! | Route | Upstream | Cache |
//! |---|---|---|
//! | `GET /api/events` | `/forge/api/event/GetAllEvents` | 60s |
//! | `GET /api/events/{id}` | `/forge/api/event/{id}` | 60s |
//! | `GET /api/Image` | `/cloakvision/api/image/GetAllImages` | 60s |
//! | `GET /api/Image/{id}` | `/cloakvision/api/Image/{id}` | none |
//! | `GET /api/Nexuspoint/{id}` | `/nexuspoint/api/Location/{id}` | 60s |
//! | `POST /api/mail/send` | `/voidmail/api/Mail/send` | none |
//!
//! Any other method on these routes is answered with `405`.

use std::{sync::Arc, time::Duration};

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, signal};
#[cfg(unix)]
use tokio::signal::unix::{signal as unix_signal, SignalKind};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

pub mod cache;
pub mod error;
pub mod routes;
pub mod upstream;

pub use cache::ResponseCache;
pub use error::{AppError, ServeError};
pub use upstream::Upstream;

use crate::config::Config;
use routes::{
    get_event, get_image, get_location, list_events, list_images, method_not_allowed, send_mail,
};

/// Shared by every handler.
pub struct ProxyState {
    pub upstream: Upstream,
    pub cache: ResponseCache,
}

impl ProxyState {
    pub fn new(config: &Config) -> Result<Arc<Self>, ServeError> {
        let upstream = Upstream::new(
            &config.upstream_base_url,
            config.upstream_api_key.clone(),
            config.upstream_timeout,
        )?;
        Ok(Arc::new(Self {
            upstream,
            cache: ResponseCache::new(),
        }))
    }
}

pub fn router(state: Arc<ProxyState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/events", get(list_events).fallback(method_not_allowed))
        .route("/api/events/:event_id", get(get_event).fallback(method_not_allowed))
        .route("/api/Image", get(list_images).fallback(method_not_allowed))
        .route("/api/Image/:image_id", get(get_image).fallback(method_not_allowed))
        .route(
            "/api/Nexuspoint/:location_id",
            get(get_location).fallback(method_not_allowed),
        )
        .route("/api/mail/send", post(send_mail).fallback(method_not_allowed))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn start_server(config: &Config) -> Result<(), ServeError> {
    info!("Initializing state...");
    let state = ProxyState::new(config)?;

    info!("Starting server...");
    let app = router(state);

    let address = format!("0.0.0.0:{}", config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| ServeError::Bind {
            address: address.clone(),
            source,
        })?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match unix_signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header::CACHE_CONTROL, Method, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::model::{EmailSendRequest, SubmissionResult};

use super::error::AppError;
use super::ProxyState;

/// One GET passthrough: a fixed upstream path template and a cache duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadEndpoint {
    /// Upstream path; `{id}` is replaced by the route identifier.
    pub upstream: &'static str,
    pub cache_ttl: Duration,
}

impl ReadEndpoint {
    pub const fn new(upstream: &'static str, cache_secs: u64) -> Self {
        Self {
            upstream,
            cache_ttl: Duration::from_secs(cache_secs),
        }
    }

    pub fn upstream_path(&self, id: Option<&str>) -> String {
        match id {
            Some(id) => self.upstream.replace("{id}", id),
            None => self.upstream.to_string(),
        }
    }

    pub fn cache_control(&self) -> String {
        if self.cache_ttl.is_zero() {
            "no-store".to_string()
        } else {
            format!("public, s-maxage={}", self.cache_ttl.as_secs())
        }
    }
}

pub const EVENTS: ReadEndpoint = ReadEndpoint::new("/forge/api/event/GetAllEvents", 60);
pub const EVENT: ReadEndpoint = ReadEndpoint::new("/forge/api/event/{id}", 60);
pub const IMAGES: ReadEndpoint = ReadEndpoint::new("/cloakvision/api/image/GetAllImages", 60);
// Signed URLs expire upstream.
pub const IMAGE: ReadEndpoint = ReadEndpoint::new("/cloakvision/api/Image/{id}", 0);
pub const LOCATION: ReadEndpoint = ReadEndpoint::new("/nexuspoint/api/Location/{id}", 60);

pub const MAIL_SEND_UPSTREAM: &str = "/voidmail/api/Mail/send";

fn validate_id(id: &str) -> Result<&str, AppError> {
    let id = id.trim();
    if id.is_empty() || id.contains(['/', '?', '#', '\\']) || id.contains("..") {
        warn!(id, "Rejected identifier");
        return Err(AppError::MalformedPayload);
    }
    Ok(id)
}

async fn forward_get(
    state: &ProxyState,
    endpoint: &ReadEndpoint,
    id: Option<&str>,
) -> Result<Response, AppError> {
    let id = id.map(validate_id).transpose()?;
    let path = endpoint.upstream_path(id);

    let cached = if endpoint.cache_ttl.is_zero() {
        None
    } else {
        state.cache.get(&path).await
    };
    let body = match cached {
        Some(body) => {
            debug!(path, "Cache hit");
            body
        }
        None => {
            let body = state.upstream.get(&path).await?;
            state.cache.insert(&path, body.clone(), endpoint.cache_ttl).await;
            body
        }
    };

    Ok(([(CACHE_CONTROL, endpoint.cache_control())], Json(body)).into_response())
}

pub async fn list_events(State(state): State<Arc<ProxyState>>) -> Result<Response, AppError> {
    forward_get(&state, &EVENTS, None).await
}

pub async fn get_event(
    State(state): State<Arc<ProxyState>>,
    Path(event_id): Path<String>,
) -> Result<Response, AppError> {
    forward_get(&state, &EVENT, Some(&event_id)).await
}

pub async fn list_images(State(state): State<Arc<ProxyState>>) -> Result<Response, AppError> {
    forward_get(&state, &IMAGES, None).await
}

pub async fn get_image(
    State(state): State<Arc<ProxyState>>,
    Path(image_id): Path<String>,
) -> Result<Response, AppError> {
    forward_get(&state, &IMAGE, Some(&image_id)).await
}

pub async fn get_location(
    State(state): State<Arc<ProxyState>>,
    Path(location_id): Path<String>,
) -> Result<Response, AppError> {
    forward_get(&state, &LOCATION, Some(&location_id)).await
}

/// Raw reply of the upstream mail service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailDelivery {
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

const SUCCESS_STATUSES: [&str; 3] = ["sent", "queued", "Success"];

impl MailDelivery {
    pub fn is_success(&self) -> bool {
        SUCCESS_STATUSES.contains(&self.status.as_str())
    }
}

impl From<MailDelivery> for SubmissionResult {
    fn from(delivery: MailDelivery) -> Self {
        let success = delivery.is_success();
        let message = [&delivery.details, &delivery.error]
            .into_iter()
            .flatten()
            .find(|text| !text.is_empty())
            .cloned()
            .unwrap_or_else(|| {
                if success {
                    "Email processed successfully.".to_string()
                } else {
                    format!("Email status: {}", delivery.status)
                }
            });
        SubmissionResult { success, message }
    }
}

pub async fn send_mail(
    State(state): State<Arc<ProxyState>>,
    payload: Result<Json<EmailSendRequest>, JsonRejection>,
) -> Result<Json<SubmissionResult>, AppError> {
    let Json(request) = payload.map_err(|e| {
        warn!(error = %e, "Rejected mail payload");
        AppError::MalformedPayload
    })?;
    debug!(to = %request.to, subject = %request.subject, "Mail request");

    let body = serde_json::to_value(&request).map_err(|_| AppError::MalformedPayload)?;
    let reply = state.upstream.post(MAIL_SEND_UPSTREAM, &body).await?;
    let delivery: MailDelivery =
        serde_json::from_value(reply).map_err(|e| AppError::Upstream(e.to_string()))?;

    let result = SubmissionResult::from(delivery);
    if result.success {
        info!(to = %request.to, "Mail delivered upstream");
    } else {
        warn!(to = %request.to, message = %result.message, "Mail rejected upstream");
    }
    Ok(Json(result))
}

pub async fn method_not_allowed(method: Method, uri: Uri) -> AppError {
    warn!(%method, path = %uri.path(), "Method not allowed");
    AppError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delivery(status: &str, details: Option<&str>, error: Option<&str>) -> SubmissionResult {
        SubmissionResult::from(MailDelivery {
            message_id: None,
            status: status.to_string(),
            details: details.map(str::to_string),
            error: error.map(str::to_string),
        })
    }

    #[test]
    fn test_success_tokens() {
        for status in ["sent", "queued", "Success"] {
            assert_eq!(
                delivery(status, None, None),
                SubmissionResult {
                    success: true,
                    message: "Email processed successfully.".into()
                }
            );
        }
        assert!(!delivery("SENT", None, None).success);
    }

    #[test]
    fn test_failure_message_precedence() {
        assert_eq!(
            delivery("failed", None, Some("bad address")),
            SubmissionResult::failed("bad address")
        );
        assert_eq!(
            delivery("failed", Some("mailbox full"), Some("bad address")).message,
            "mailbox full"
        );
        assert_eq!(delivery("bounced", None, None).message, "Email status: bounced");
        assert_eq!(delivery("queued", Some("in 5 min"), None).message, "in 5 min");
    }

    #[test]
    fn test_endpoint_paths_and_cache_headers() {
        assert_eq!(EVENT.upstream_path(Some("e1")), "/forge/api/event/e1");
        assert_eq!(EVENTS.upstream_path(None), "/forge/api/event/GetAllEvents");
        assert_eq!(IMAGE.cache_control(), "no-store");
        assert_eq!(LOCATION.cache_control(), "public, s-maxage=60");
    }

    #[test]
    fn test_identifier_validation() {
        assert_eq!(validate_id(" e1 ").ok(), Some("e1"));
        assert!(validate_id("").is_err());
        assert!(validate_id("../admin").is_err());
        assert!(validate_id("a/b").is_err());
    }
}

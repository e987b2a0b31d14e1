#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use event_portal::config::Config;
use event_portal::framework::NIL_ID;
use event_portal::proxy::{router, ProxyState};

/// In-process stand-in for the upstream backend.
#[derive(Default)]
pub struct UpstreamStub {
    hits: Mutex<HashMap<String, usize>>,
    api_keys: Mutex<Vec<Option<String>>>,
    mail: Mutex<Vec<Value>>,
}

impl UpstreamStub {
    pub fn hits(&self, path: &str) -> usize {
        self.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    pub fn api_keys(&self) -> Vec<Option<String>> {
        self.api_keys.lock().unwrap().clone()
    }

    pub fn mail(&self) -> Vec<Value> {
        self.mail.lock().unwrap().clone()
    }

    fn record(&self, path: &str, headers: &HeaderMap) -> usize {
        let key = headers
            .get("Ocp-Apim-Subscription-Key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.api_keys.lock().unwrap().push(key);
        let mut hits = self.hits.lock().unwrap();
        let count = hits.entry(path.to_string()).or_default();
        *count += 1;
        *count
    }
}

pub fn starcraft_event() -> Value {
    json!({
        "id": "e1",
        "title": "Starcraft Event",
        "imageId": NIL_ID,
        "location": "loc1",
        "price": 100,
        "dateTime": "2025-03-05T18:00:00Z",
        "description": "LAN party",
        "packages": [
            { "id": "p1", "title": "Gold", "description": "", "perks": ["Front row"], "price": 49.5, "currency": "USD" }
        ]
    })
}

async fn handle(
    State(stub): State<Arc<UpstreamStub>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let hit = stub.record(&path, &headers);

    match (method.as_str(), path.as_str()) {
        ("GET", "/forge/api/event/GetAllEvents") => Json(json!([
            starcraft_event(),
            { "id": "e2", "title": "Chess Night", "imageId": "img2", "price": "Free" }
        ]))
        .into_response(),
        ("GET", "/forge/api/event/e1") => Json(starcraft_event()).into_response(),
        ("GET", "/cloakvision/api/Image/img2") => Json(json!({
            "id": "img2",
            "name": "Board",
            "path": format!("https://cdn.example.com/img2.png?sig={hit}"),
            "altText": "A chess board"
        }))
        .into_response(),
        ("GET", "/nexuspoint/api/Location/loc1") => Json(json!({
            "id": "loc1", "streetName": "Main St 1", "city": "Springfield", "state": "IL"
        }))
        .into_response(),
        ("GET", "/forge/api/event/text") => "plain text".into_response(),
        ("POST", "/voidmail/api/Mail/send") => {
            let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
            stub.mail.lock().unwrap().push(body.clone());
            let to = body["to"].as_str().unwrap_or_default();
            if to.starts_with("bad") {
                Json(json!({ "status": "failed", "error": "bad address" })).into_response()
            } else {
                Json(json!({ "messageId": "m1", "status": "queued" })).into_response()
            }
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{address}")
}

pub async fn spawn_upstream() -> (String, Arc<UpstreamStub>) {
    let stub = Arc::new(UpstreamStub::default());
    let app = Router::new().fallback(handle).with_state(stub.clone());
    (serve(app).await, stub)
}

/// Upstream stub plus the real proxy in front of it. Returns the proxy URL.
pub async fn spawn_proxy(api_key: Option<&str>) -> (String, Arc<UpstreamStub>) {
    let (upstream_url, stub) = spawn_upstream().await;
    let config = Config {
        upstream_base_url: upstream_url,
        upstream_api_key: api_key.map(str::to_string),
        ..Config::default()
    };
    let state = ProxyState::new(&config).unwrap();
    (serve(router(state)).await, stub)
}

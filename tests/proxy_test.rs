mod common;

use reqwest::Client;
use serde_json::{json, Value};

use common::spawn_proxy;

#[tokio::test]
async fn test_event_endpoints_pass_through_and_cache() {
    let (proxy, upstream) = spawn_proxy(None).await;
    let client = Client::new();

    for _ in 0..2 {
        let response = client.get(format!("{proxy}/api/events")).send().await.unwrap();
        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(
            response.headers()["cache-control"].to_str().unwrap(),
            "public, s-maxage=60"
        );
        let body: Value = response.json().await.unwrap();
        assert_eq!(body.as_array().map(Vec::len), Some(2));
    }
    assert_eq!(upstream.hits("/forge/api/event/GetAllEvents"), 1);

    let event: Value = client
        .get(format!("{proxy}/api/events/e1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(event["title"], json!("Starcraft Event"));
}

#[tokio::test]
async fn test_signed_image_urls_are_never_cached() {
    let (proxy, upstream) = spawn_proxy(None).await;
    let client = Client::new();

    let mut paths = Vec::new();
    for _ in 0..2 {
        let response = client.get(format!("{proxy}/api/Image/img2")).send().await.unwrap();
        assert_eq!(response.headers()["cache-control"].to_str().unwrap(), "no-store");
        let body: Value = response.json().await.unwrap();
        paths.push(body["path"].as_str().unwrap().to_string());
    }
    assert_eq!(upstream.hits("/cloakvision/api/Image/img2"), 2);
    assert_ne!(paths[0], paths[1]);
}

#[tokio::test]
async fn test_wrong_methods_are_rejected() {
    let (proxy, upstream) = spawn_proxy(None).await;
    let client = Client::new();

    let post_read = client.post(format!("{proxy}/api/events")).send().await.unwrap();
    assert_eq!(post_read.status().as_u16(), 405);

    let delete_member = client
        .delete(format!("{proxy}/api/Nexuspoint/loc1"))
        .send()
        .await
        .unwrap();
    assert_eq!(delete_member.status().as_u16(), 405);

    let get_write = client.get(format!("{proxy}/api/mail/send")).send().await.unwrap();
    assert_eq!(get_write.status().as_u16(), 405);

    assert_eq!(upstream.hits("/forge/api/event/GetAllEvents"), 0);
    assert_eq!(upstream.hits("/voidmail/api/Mail/send"), 0);
}

#[tokio::test]
async fn test_upstream_status_is_forwarded() {
    let (proxy, _upstream) = spawn_proxy(None).await;
    let response = Client::new()
        .get(format!("{proxy}/api/events/missing"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn test_non_json_upstream_body_is_bad_gateway() {
    let (proxy, _upstream) = spawn_proxy(None).await;
    let response = Client::new()
        .get(format!("{proxy}/api/events/text"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 502);
}

#[tokio::test]
async fn test_mail_status_mapping() {
    let (proxy, upstream) = spawn_proxy(None).await;
    let client = Client::new();

    let queued: Value = client
        .post(format!("{proxy}/api/mail/send"))
        .json(&json!({ "to": "fan@example.com", "subject": "Hi", "htmlBody": "<p>Hi</p>" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        queued,
        json!({ "success": true, "message": "Email processed successfully." })
    );

    let failed: Value = client
        .post(format!("{proxy}/api/mail/send"))
        .json(&json!({ "to": "bad@example.com", "subject": "Hi", "htmlBody": "<p>Hi</p>", "plainTextBody": "Hi" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(failed, json!({ "success": false, "message": "bad address" }));

    let forwarded = upstream.mail();
    assert_eq!(forwarded.len(), 2);
    assert_eq!(forwarded[0]["htmlBody"], json!("<p>Hi</p>"));
    assert_eq!(forwarded[0].get("plainTextBody"), None);
    assert_eq!(forwarded[1]["plainTextBody"], json!("Hi"));
}

#[tokio::test]
async fn test_malformed_mail_payload_is_bad_request() {
    let (proxy, upstream) = spawn_proxy(None).await;
    let response = Client::new()
        .post(format!("{proxy}/api/mail/send"))
        .json(&json!({ "to": "fan@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(upstream.hits("/voidmail/api/Mail/send"), 0);
}

#[tokio::test]
async fn test_api_key_is_forwarded() {
    let (proxy, upstream) = spawn_proxy(Some("secret")).await;
    Client::new()
        .get(format!("{proxy}/api/Nexuspoint/loc1"))
        .send()
        .await
        .unwrap();
    assert_eq!(upstream.api_keys(), vec![Some("secret".to_string())]);
}

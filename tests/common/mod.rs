// Shared helpers for integration tests.
//
// News sites are simulated with tiny axum servers bound to 127.0.0.1:0, and
// all persisted state lives in a per-test temp dir.

#![allow(dead_code)]

use axum::{
    Router,
    body::{self, Body},
    http::{Request, StatusCode},
};
use headline_hub::Settings;
use headline_hub::models::SourceDescriptor;
use serde_json::Value;
use std::net::SocketAddr;
use std::path::Path;
use tower::ServiceExt as _;

const BODY_LIMIT: usize = 1024 * 1024;

/// Serve `site` on an ephemeral loopback port and return its base URL.
pub async fn spawn_site(site: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test site");
    let addr: SocketAddr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, site).await.expect("serve test site");
    });
    format!("http://{addr}/")
}

pub fn source(id: u64, name: &str, url: &str, selector: &str) -> SourceDescriptor {
    SourceDescriptor {
        id,
        name: name.to_string(),
        url: url.to_string(),
        selector: selector.to_string(),
        enabled: true,
    }
}

/// Settings rooted in `dir` with the registry pre-populated with `sources`.
pub fn settings_with_sources(dir: &Path, sources: &[SourceDescriptor]) -> Settings {
    let settings = Settings::in_dir(dir);
    std::fs::write(
        &settings.sources_path,
        serde_json::to_string(sources).expect("serialize sources"),
    )
    .expect("write sources file");
    settings
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.expect("router response");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build GET");
    send(app, req).await
}

pub async fn post_json(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("build POST");
    send(app, req).await
}

//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sori_archive::config::{Config, ServerConfig, StorageConfig};
use sori_archive::{api, AppState};
use tower::ServiceExt;

pub const ADMIN_KEY: &str = "integration-admin-key";
pub const BOUNDARY: &str = "sori-test-boundary";
pub const MAX_UPLOAD: u64 = 64 * 1024;

/// Router plus the state behind it, rooted in `dir`.
pub async fn build_test_app(dir: &tempfile::TempDir) -> (Router, Arc<AppState>) {
    let config = Config {
        server: ServerConfig {
            bind_address: "127.0.0.1:0".to_string(),
            public_dir: dir.path().join("public").to_string_lossy().to_string(),
        },
        storage: StorageConfig {
            data_dir: dir.path().join("data").to_string_lossy().to_string(),
            upload_dir: dir.path().join("uploads").to_string_lossy().to_string(),
        },
        admin_key: ADMIN_KEY.to_string(),
        max_upload_size: MAX_UPLOAD,
    };
    let state = Arc::new(AppState::open(config).await.expect("state should open"));
    (api::create_router(Arc::clone(&state)), state)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Hand-built multipart/form-data body.
pub fn multipart_body(fields: &[(&str, &str)], audio: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, data)) = audio {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"audio\"; filename=\"{filename}\"\r\nContent-Type: audio/webm\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn submit_request(body: Vec<u8>) -> Request<Body> {
    Request::post("/api/submit")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Submit a recording and return the JSON response body.
pub async fn submit(app: &Router, word: &str, description: &str) -> serde_json::Value {
    let body = multipart_body(
        &[("word", word), ("description", description)],
        Some(("recording.webm", &b"\x1aE\xdf\xa3 fake webm"[..])),
    );
    let response = send(app, submit_request(body)).await;
    assert_eq!(response.status(), 200);
    body_json(response).await
}

//! End-to-end tests driving the router with in-memory requests.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{
    body_bytes, body_json, build_test_app, get, multipart_body, send, submit, submit_request,
    ADMIN_KEY, MAX_UPLOAD,
};
use serde_json::json;

fn content_request(key: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::post("/api/content").header("content-type", "application/json");
    if let Some(key) = key {
        builder = builder.header("x-admin-key", key);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn delete_request(id: &str, key: Option<&str>) -> Request<Body> {
    let mut builder = Request::delete(format!("/api/entry/{id}"));
    if let Some(key) = key {
        builder = builder.header("x-admin-key", key);
    }
    builder.body(Body::empty()).unwrap()
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submit_then_list_contains_entry_once() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _state) = build_test_app(&dir).await;

    let submitted = submit(&app, "  사각사각  ", "  연필 소리  ").await;
    assert_eq!(submitted["ok"], true);
    let id = submitted["id"].as_str().unwrap().to_string();
    let audio_path = submitted["audio_path"].as_str().unwrap().to_string();
    assert!(audio_path.starts_with("/uploads/"));
    assert!(audio_path.ends_with(".webm"));

    let listed = body_json(get(&app, "/api/list").await).await;
    assert_eq!(listed["ok"], true);
    let items = listed["items"].as_array().unwrap();
    let matching: Vec<_> = items.iter().filter(|e| e["id"] == id.as_str()).collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0]["word"], "사각사각");
    assert_eq!(matching[0]["description"], "연필 소리");
    assert_eq!(matching[0]["audio_path"], audio_path.as_str());
    assert_eq!(matching[0]["category"], "기타");
}

#[tokio::test]
async fn submitted_audio_is_served() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _state) = build_test_app(&dir).await;

    let submitted = submit(&app, "딸랑", "bell").await;
    let audio_path = submitted["audio_path"].as_str().unwrap();

    let response = get(&app, audio_path).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "audio/webm");
    assert_eq!(body_bytes(response).await, b"\x1aE\xdf\xa3 fake webm");

    let missing = get(&app, "/uploads/does-not-exist.webm").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn submit_missing_fields_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (app, state) = build_test_app(&dir).await;
    let audio = Some(("a.webm", &b"data"[..]));

    let cases = vec![
        multipart_body(&[("word", ""), ("description", "desc")], audio),
        multipart_body(&[("word", "   "), ("description", "desc")], audio),
        multipart_body(&[("word", "word"), ("description", "")], audio),
        multipart_body(&[("description", "desc")], audio),
        multipart_body(&[("word", "word"), ("description", "desc")], None),
    ];

    for body in cases {
        let response = send(&app, submit_request(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["ok"], false);
        assert!(json["error"].is_string());
    }

    assert_eq!(state.db.entry_count().unwrap(), 0);
}

#[tokio::test]
async fn submit_without_multipart_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _state) = build_test_app(&dir).await;

    let request = Request::post("/api/submit")
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn submit_oversized_audio_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (app, state) = build_test_app(&dir).await;

    let big = vec![0u8; MAX_UPLOAD as usize + 1];
    let body = multipart_body(
        &[("word", "우르르"), ("description", "thunder")],
        Some(("big.webm", &big)),
    );
    let response = send(&app, submit_request(body)).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(state.db.entry_count().unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_filters_by_exact_word() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _state) = build_test_app(&dir).await;

    submit(&app, "보글", "one").await;
    submit(&app, "보글보글", "two").await;
    submit(&app, "보글", "three").await;

    let listed = body_json(get(&app, "/api/list?word=%EB%B3%B4%EA%B8%80").await).await;
    let items = listed["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|e| e["word"] == "보글"));
    assert_eq!(items[0]["description"], "three");
}

#[tokio::test]
async fn list_page_size_is_applied() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _state) = build_test_app(&dir).await;

    for i in 0..4 {
        submit(&app, "톡톡", &format!("tap {i}")).await;
    }

    let listed = body_json(get(&app, "/api/list?pageSize=2").await).await;
    assert_eq!(listed["items"].as_array().unwrap().len(), 2);

    let bad = get(&app, "/api/list?pageSize=lots").await;
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn words_and_gallery_aggregate_entries() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _state) = build_test_app(&dir).await;

    submit(&app, "멍멍", "dog one").await;
    submit(&app, "멍멍", "dog two").await;
    submit(&app, "야옹", "cat").await;

    let words = body_json(get(&app, "/api/words").await).await;
    assert_eq!(words["ok"], true);
    let words = words["words"].as_array().unwrap();
    assert_eq!(words.len(), 2);
    let dog = words.iter().find(|w| w["word"] == "멍멍").unwrap();
    assert_eq!(dog["count"], 2);
    assert!(dog["latest"].is_string());

    let gallery = body_json(get(&app, "/api/gallery").await).await;
    let groups = gallery["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    let dogs = groups.iter().find(|g| g["word"] == "멍멍").unwrap();
    let items = dogs["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["description"], "dog two");
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_requires_admin_key() {
    let dir = tempfile::tempdir().unwrap();
    let (app, state) = build_test_app(&dir).await;

    let id = submit(&app, "퐁당", "splash").await["id"]
        .as_str()
        .unwrap()
        .to_string();

    for key in [None, Some("wrong")] {
        let response = send(&app, delete_request(&id, key)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["ok"], false);
    }
    assert!(state.db.get_entry(&id).unwrap().is_some());
}

#[tokio::test]
async fn delete_removes_entry_and_audio() {
    let dir = tempfile::tempdir().unwrap();
    let (app, state) = build_test_app(&dir).await;

    let submitted = submit(&app, "퐁당", "splash").await;
    let id = submitted["id"].as_str().unwrap();
    let audio_path = submitted["audio_path"].as_str().unwrap();

    let response = send(&app, delete_request(id, Some(ADMIN_KEY))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "ok": true, "id": id }));

    let listed = body_json(get(&app, "/api/list").await).await;
    assert!(listed["items"].as_array().unwrap().is_empty());
    assert_eq!(get(&app, audio_path).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(state.db.entry_count().unwrap(), 0);
}

#[tokio::test]
async fn delete_unknown_id_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let (app, state) = build_test_app(&dir).await;
    submit(&app, "쿵", "thud").await;

    let response = send(&app, delete_request("no-such-id", Some(ADMIN_KEY))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(state.db.entry_count().unwrap(), 1);
}

// ---------------------------------------------------------------------------
// Content and auth
// ---------------------------------------------------------------------------

#[tokio::test]
async fn auth_checks_admin_key() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _state) = build_test_app(&dir).await;

    let ok = Request::post("/api/auth")
        .header("x-admin-key", ADMIN_KEY)
        .body(Body::empty())
        .unwrap();
    let response = send(&app, ok).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "ok": true }));

    let bad = Request::post("/api/auth").body(Body::empty()).unwrap();
    let response = send(&app, bad).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["ok"], false);
}

#[tokio::test]
async fn content_save_merges_recognized_keys() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _state) = build_test_app(&dir).await;

    let before = body_json(get(&app, "/api/content").await).await;

    let response = send(
        &app,
        content_request(
            Some(ADMIN_KEY),
            json!({ "texts": { "title": "X", "unknown": "ignored" } }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let saved = body_json(response).await;
    assert_eq!(saved["ok"], true);

    let after = body_json(get(&app, "/api/content").await).await;
    assert_eq!(after, saved["content"]);
    assert_eq!(after["texts"]["title"], "X");
    assert!(after["texts"].get("unknown").is_none());
    assert_eq!(after["styles"], before["styles"]);
    for key in ["subtitle", "participateTitle", "galleryTitle", "footer"] {
        assert_eq!(after["texts"][key], before["texts"][key]);
    }
}

#[tokio::test]
async fn content_save_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _state) = build_test_app(&dir).await;
    let payload = json!({ "styles": { "title": { "size": "3rem", "color": "#111" } } });

    let first = body_json(send(&app, content_request(Some(ADMIN_KEY), payload.clone())).await).await;
    let second = body_json(send(&app, content_request(Some(ADMIN_KEY), payload)).await).await;
    assert_eq!(first, second);
    assert_eq!(second["content"]["styles"]["title"]["size"], "3rem");
    assert_eq!(second["content"]["styles"]["title"]["align"], "");
}

#[tokio::test]
async fn content_save_with_wrong_key_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _state) = build_test_app(&dir).await;
    let before = body_json(get(&app, "/api/content").await).await;

    let response = send(
        &app,
        content_request(Some("guess"), json!({ "texts": { "title": "hacked" } })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let after = body_json(get(&app, "/api/content").await).await;
    assert_eq!(before, after);
}

#[tokio::test]
async fn content_save_checks_key_before_reading_body() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _state) = build_test_app(&dir).await;

    let no_body = Request::post("/api/content")
        .header("x-admin-key", "wrong")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, no_body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["ok"], false);

    let malformed = Request::post("/api/content")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = send(&app, malformed).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let malformed = Request::post("/api/content")
        .header("content-type", "application/json")
        .header("x-admin-key", ADMIN_KEY)
        .body(Body::from("{not json"))
        .unwrap();
    let response = send(&app, malformed).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn content_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    {
        let (app, _state) = build_test_app(&dir).await;
        send(
            &app,
            content_request(Some(ADMIN_KEY), json!({ "texts": { "footer": "kept" } })),
        )
        .await;
    }

    let (app, _state) = build_test_app(&dir).await;
    let content = body_json(get(&app, "/api/content").await).await;
    assert_eq!(content["texts"]["footer"], "kept");
}

// ---------------------------------------------------------------------------
// Misc
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_ok() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _state) = build_test_app(&dir).await;

    let json = body_json(get(&app, "/_internal/health").await).await;
    assert_eq!(json["ok"], true);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn static_pages_are_served_from_public_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("public")).unwrap();
    std::fs::write(dir.path().join("public/index.html"), "<h1>소리</h1>").unwrap();
    let (app, _state) = build_test_app(&dir).await;

    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, "<h1>소리</h1>".as_bytes());
}

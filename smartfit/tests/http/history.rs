//! History list, detail and delete against the fake service

use axum::extract::{Multipart, Query};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use smartfit::{HistoryBackend, HistoryList, StyleError};

use crate::server::{self, Recorder};

const HISTORY: &str = r##"{
    "prediction_data": {
        "k1": {"user_uid": "u1", "seasonal_color_label": "Spring", "timestamp": "2024-10-01T09:00:00Z"},
        "k2": {"user_uid": "u1", "seasonal_color_label": "Summer", "timestamp": "2024-11-01T09:00:00Z"},
        "k3": {"user_uid": "u1", "seasonal_color_label": "Autumn", "timestamp": "2024-12-01T09:00:00Z",
               "color_palette": {"dark_colors": ["#402A1B"], "light_colors": ["#F5DEB3"]}}
    }
}"##;

const DETAIL: &str = r##"{
    "prediction_data": {
        "user_uid": "u1",
        "seasonal_color_label": "Autumn",
        "skin_tone_hex": "#C68642",
        "clothing_type": "formal-men",
        "amazon_products": [{"asin": "B0TEST", "title": "Wool blazer", "price": "$89.00"}]
    }
}"##;

/// Router serving the list and recording which uid was asked for
fn list_app(body: &'static str, uids: Arc<Mutex<Vec<String>>>) -> Router {
    Router::new().route(
        "/get_prediction_history_list",
        get(move |Query(params): Query<HashMap<String, String>>| async move {
            uids.lock()
                .unwrap()
                .push(params.get("uid").cloned().unwrap_or_default());
            (StatusCode::OK, body)
        }),
    )
}

fn delete_route(recorder: &Recorder, status: StatusCode) -> Router {
    let recorder = recorder.clone();
    Router::new().route(
        "/delete_prediction_history",
        post(move |multipart: Multipart| async move {
            recorder.capture(multipart).await;
            (status, r#"{"message": "done"}"#)
        }),
    )
}

#[tokio::test]
async fn test_list_is_most_recent_first() {
    let uids = Arc::new(Mutex::new(Vec::new()));
    let client = server::client(&server::serve(list_app(HISTORY, Arc::clone(&uids))).await);

    let entries = client.list_history("u1").await.unwrap();

    let keys: Vec<&str> = entries.iter().map(|e| e.prediction_key.as_str()).collect();
    assert_eq!(keys, ["k3", "k2", "k1"]);
    assert_eq!(entries[0].result.seasonal_color_label, "Autumn");
    assert!(!entries[0].result.color_palette.is_empty());
    assert!(entries[1].result.color_palette.is_empty());
    assert_eq!(*uids.lock().unwrap(), ["u1"]);
}

#[tokio::test]
async fn test_empty_history() {
    let uids = Arc::new(Mutex::new(Vec::new()));
    let client = server::client(&server::serve(list_app(r#"{"prediction_data": {}}"#, uids)).await);

    let list = HistoryList::fetch(&client, "u1").await;
    assert!(list.is_empty());
}

#[tokio::test]
async fn test_list_failure_shows_empty() {
    let app = Router::new().route(
        "/get_prediction_history_list",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
    );
    let client = server::client(&server::serve(app).await);

    assert!(client.list_history("u1").await.unwrap_err().status() == Some(503));
    let list = HistoryList::fetch(&client, "u1").await;
    assert!(list.is_empty());
}

#[tokio::test]
async fn test_detail_is_idempotent() {
    let recorder = Recorder::default();
    let capture = recorder.clone();
    let app = Router::new().route(
        "/get_prediction_history_detail",
        post(move |multipart: Multipart| async move {
            capture.capture(multipart).await;
            (StatusCode::OK, DETAIL)
        }),
    );
    let client = server::client(&server::serve(app).await);

    let first = client.get_detail("u1", "k3").await.unwrap();
    let second = client.get_detail("u1", "k3").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.prediction_key, "k3");
    assert_eq!(first.user_uid, "u1");
    assert_eq!(first.result.clothing_type, "formal-men");
    assert_eq!(first.result.amazon_products[0].price.as_deref(), Some("$89.00"));

    assert_eq!(recorder.count(), 2);
    assert_eq!(recorder.field(0, "uid").as_deref(), Some("u1"));
    assert_eq!(recorder.field(0, "prediction_key").as_deref(), Some("k3"));
}

#[tokio::test]
async fn test_detail_not_found() {
    let app = Router::new().route(
        "/get_prediction_history_detail",
        post(|| async { (StatusCode::NOT_FOUND, r#"{"error": "not found"}"#) }),
    );
    let client = server::client(&server::serve(app).await);

    let err = client.get_detail("u1", "missing").await.unwrap_err();
    assert!(matches!(err, StyleError::ServerRejected { status: 404, .. }));
}

#[tokio::test]
async fn test_delete_failure_keeps_entry() {
    let uids = Arc::new(Mutex::new(Vec::new()));
    let recorder = Recorder::default();
    let app = list_app(HISTORY, uids).merge(delete_route(&recorder, StatusCode::NOT_FOUND));
    let client = server::client(&server::serve(app).await);

    let mut list = HistoryList::fetch(&client, "u1").await;
    assert_eq!(list.len(), 3);

    let err = list.delete(&client, "k1").await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(list.len(), 3);
    assert!(list.get("k1").is_some());
    assert_eq!(recorder.field(0, "uid").as_deref(), Some("u1"));
    assert_eq!(recorder.field(0, "prediction_key").as_deref(), Some("k1"));
}

#[tokio::test]
async fn test_delete_success_removes_entry() {
    let uids = Arc::new(Mutex::new(Vec::new()));
    let recorder = Recorder::default();
    let app = list_app(HISTORY, uids).merge(delete_route(&recorder, StatusCode::OK));
    let client = server::client(&server::serve(app).await);

    let mut list = HistoryList::fetch(&client, "u1").await;
    list.delete(&client, "k2").await.unwrap();

    let keys: Vec<&str> = list.entries().iter().map(|e| e.prediction_key.as_str()).collect();
    assert_eq!(keys, ["k3", "k1"]);
    assert_eq!(recorder.count(), 1);
}

#[tokio::test]
async fn test_rejection_with_truncated_body_keeps_status() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = vec![0u8; 8192];
        let _ = socket.read(&mut request).await;
        // promises 100 bytes, sends 7, then hangs up
        socket
            .write_all(b"HTTP/1.1 500 Internal Server Error\r\ncontent-length: 100\r\n\r\npartial")
            .await
            .unwrap();
    });
    let client = server::client(&format!("http://{}", addr));

    let err = client.list_history("u1").await.unwrap_err();

    match err {
        StyleError::ServerRejected { status, body } => {
            assert_eq!(status, 500);
            assert!(body.is_empty(), "{body}");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

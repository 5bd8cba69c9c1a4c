//! News search against a fake news API

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::Router;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use smartfit::config::NewsConfig;
use smartfit::{NewsClient, NewsQuery, StyleError};

use crate::server;

const ARTICLES: &str = r#"{
    "status": "ok",
    "totalResults": 2,
    "articles": [
        {"source": {"id": null, "name": "Vogue"}, "title": "Autumn palettes", "url": "https://example.com/a",
         "publishedAt": "2024-12-01T08:00:00Z"},
        {"title": "Trench coats are back", "url": "https://example.com/b"}
    ]
}"#;

fn news_config(base_url: &str) -> NewsConfig {
    NewsConfig {
        base_url: base_url.to_string(),
        api_key: "test-key".to_string(),
        ..NewsConfig::default()
    }
}

#[tokio::test]
async fn test_search_sends_query_and_key() {
    let seen = Arc::new(Mutex::new(HashMap::new()));
    let keys = Arc::new(Mutex::new(Vec::new()));
    let (record, record_key) = (Arc::clone(&seen), Arc::clone(&keys));
    let app = Router::new().route(
        "/everything",
        get(
            move |headers: HeaderMap, Query(params): Query<HashMap<String, String>>| async move {
                *record.lock().unwrap() = params;
                if let Some(key) = headers.get("x-api-key").and_then(|v| v.to_str().ok()) {
                    record_key.lock().unwrap().push(key.to_string());
                }
                (StatusCode::OK, ARTICLES)
            },
        ),
    );
    let config = news_config(&server::serve(app).await);
    let client = NewsClient::new(&config).unwrap();
    assert!(client.is_available());

    let today = NaiveDate::from_ymd_opt(2024, 12, 15).unwrap();
    let results = client.search(&NewsQuery::recent(&config, today)).await.unwrap();

    assert_eq!(results.query, "fashion");
    assert_eq!(results.total, Some(2));
    assert_eq!(results.articles.len(), 2);
    assert_eq!(results.articles[0].title, "Autumn palettes");
    assert_eq!(results.articles[1].published_at, None);

    let params = seen.lock().unwrap().clone();
    assert_eq!(params.get("q").map(String::as_str), Some("fashion"));
    assert_eq!(params.get("from").map(String::as_str), Some("2024-11-25"));
    assert_eq!(params.get("to").map(String::as_str), Some("2024-12-15"));
    assert_eq!(params.get("sortBy").map(String::as_str), Some("relevance"));
    assert!(!params.contains_key("apiKey"));
    assert_eq!(*keys.lock().unwrap(), ["test-key"]);
}

#[tokio::test]
async fn test_transport_error_hides_api_key() {
    let config = NewsConfig {
        api_key: "SUPERSECRETKEY".to_string(),
        ..news_config(&server::closed_port().await)
    };
    let client = NewsClient::new(&config).unwrap();

    let today = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
    let err = client
        .search(&NewsQuery::recent(&config, today))
        .await
        .unwrap_err();

    assert!(matches!(err, StyleError::Transport(_)), "{err:?}");
    assert!(!err.to_string().contains("SUPERSECRETKEY"), "{err}");
}

#[tokio::test]
async fn test_rejected_key() {
    let app = Router::new().route(
        "/everything",
        get(|| async {
            (
                StatusCode::UNAUTHORIZED,
                r#"{"status": "error", "code": "apiKeyInvalid"}"#,
            )
        }),
    );
    let config = news_config(&server::serve(app).await);
    let client = NewsClient::new(&config).unwrap();

    let today = NaiveDate::from_ymd_opt(2024, 12, 15).unwrap();
    let err = client
        .search(&NewsQuery::recent(&config, today))
        .await
        .unwrap_err();

    match err {
        StyleError::ServerRejected { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("apiKeyInvalid"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

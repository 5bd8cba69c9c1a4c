//! Scan submission against the fake service

use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use smartfit::{
    ClothingStyle, Dispatcher, FlowOptions, Gender, Liveness, Operation, RequestKey, ScanFlow,
    ScanState, StyleBackend, StyleError, StyleRequest,
};

use crate::server::{self, Recorder, AUTUMN};

/// Router answering every scan with `status` and `body`
fn style_app(recorder: &Recorder, status: StatusCode, body: &'static str) -> Router {
    let recorder = recorder.clone();
    Router::new().route(
        "/style_recommendation",
        post(move |multipart: Multipart| async move {
            recorder.capture(multipart).await;
            (status, body)
        }),
    )
}

#[tokio::test]
async fn test_successful_prediction() {
    let recorder = Recorder::default();
    let base_url = server::serve(style_app(&recorder, StatusCode::OK, AUTUMN)).await;
    let client = server::client(&base_url);
    let (_dir, path) = server::image();

    let payload = StyleRequest::new(&path, Some("u1"), Some("formal-men"))
        .build()
        .unwrap();
    let result = client.submit(payload).await.unwrap();

    assert_eq!(result.seasonal_color_label, "Autumn");
    assert_eq!(result.color_palette.dark_colors(), ["#402A1B"]);
    assert_eq!(result.color_palette.light_colors(), ["#F5DEB3"]);
    assert_eq!(result.outfit_recommendations.len(), 1);
    assert!(result.amazon_products.is_empty());
    assert_eq!(result.seasonal_probability, 87.5);
    assert_eq!(result.skin_tone_color().to_string(), "#C68642");
}

#[tokio::test]
async fn test_multipart_field_names() {
    let recorder = Recorder::default();
    let base_url = server::serve(style_app(&recorder, StatusCode::OK, AUTUMN)).await;
    let client = server::client(&base_url);
    let (_dir, path) = server::image();

    let payload = StyleRequest::new(&path, Some("u1"), Some("formal-men"))
        .build()
        .unwrap();
    client.submit(payload).await.unwrap();

    assert_eq!(recorder.count(), 1);
    let parts = recorder.request(0);
    let names: Vec<&str> = parts.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["image", "uid", "clothing_type"]);

    let image = &parts[0];
    assert_eq!(image.file_name.as_deref(), Some("crop.jpg"));
    assert_eq!(image.content_type.as_deref(), Some("image/jpeg"));
    assert_eq!(image.bytes, std::fs::read(&path).unwrap());

    assert_eq!(recorder.field(0, "uid").as_deref(), Some("u1"));
    assert_eq!(recorder.field(0, "clothing_type").as_deref(), Some("formal-men"));
}

#[tokio::test]
async fn test_base_url_with_path_prefix() {
    let recorder = Recorder::default();
    let app = Router::new().nest("/api", style_app(&recorder, StatusCode::OK, AUTUMN));
    let base_url = server::serve(app).await;
    let client = server::client(&format!("{}/api", base_url));
    let (_dir, path) = server::image();

    let payload = StyleRequest::new(&path, None, None).build().unwrap();
    client.submit(payload).await.unwrap();

    assert_eq!(recorder.field(0, "uid").as_deref(), Some("unknown_user"));
    assert_eq!(recorder.field(0, "clothing_type").as_deref(), Some("streetwear"));
}

#[tokio::test]
async fn test_server_error_reaches_callback_once() {
    let recorder = Recorder::default();
    let app = style_app(
        &recorder,
        StatusCode::INTERNAL_SERVER_ERROR,
        r#"{"error": "Prediction failed"}"#,
    );
    let client = Arc::new(server::client(&server::serve(app).await));
    let (_dir, path) = server::image();
    let payload = StyleRequest::new(&path, Some("u1"), None).build().unwrap();

    let dispatcher = Dispatcher::default();
    let liveness = Liveness::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let worker = Arc::clone(&client);

    let handle = dispatcher
        .dispatch(
            RequestKey::new(Operation::Submit, "u1"),
            &liveness,
            async move { worker.submit(payload).await },
            move |outcome| {
                match outcome {
                    Err(StyleError::ServerRejected { status, body }) => {
                        assert_eq!(status, 500);
                        assert!(body.contains("Prediction failed"));
                    }
                    other => panic!("unexpected outcome {other:?}"),
                }
                seen.fetch_add(1, Ordering::SeqCst);
            },
        )
        .unwrap();

    assert!(handle.await.unwrap());
    server::settle().await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(recorder.count(), 1, "no automatic retry");
    assert!(dispatcher.registry().is_empty());
}

#[tokio::test]
async fn test_duplicate_submit_rejected_while_in_flight() {
    let app = Router::new().route(
        "/style_recommendation",
        post(|| async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            (StatusCode::OK, AUTUMN)
        }),
    );
    let client = Arc::new(server::client(&server::serve(app).await));
    let (_dir, path) = server::image();
    let request = StyleRequest::new(&path, Some("u1"), None);

    let dispatcher = Dispatcher::default();
    let liveness = Liveness::new();
    let key = RequestKey::new(Operation::Submit, "u1");

    let first = {
        let client = Arc::clone(&client);
        let payload = request.build().unwrap();
        dispatcher
            .dispatch(key.clone(), &liveness, async move { client.submit(payload).await }, |_| {})
            .unwrap()
    };

    let second = {
        let client = Arc::clone(&client);
        let payload = request.build().unwrap();
        dispatcher.dispatch(key, &liveness, async move { client.submit(payload).await }, |_| {})
    };
    assert!(matches!(second, Err(StyleError::AlreadyInFlight(_))));

    assert!(first.await.unwrap());
}

#[tokio::test]
async fn test_malformed_body() {
    let recorder = Recorder::default();
    let app = style_app(&recorder, StatusCode::OK, "<html>gateway</html>");
    let client = server::client(&server::serve(app).await);
    let (_dir, path) = server::image();

    let payload = StyleRequest::new(&path, Some("u1"), None).build().unwrap();
    let err = client.submit(payload).await.unwrap_err();

    assert!(matches!(err, StyleError::MalformedResponse(_)), "{err:?}");
}

#[tokio::test]
async fn test_transport_failure() {
    let client = server::client(&server::closed_port().await);
    let (_dir, path) = server::image();

    let payload = StyleRequest::new(&path, Some("u1"), None).build().unwrap();
    let err = client.submit(payload).await.unwrap_err();

    assert!(matches!(err, StyleError::Transport(_)), "{err:?}");
    assert_eq!(err.status(), None);
    assert!(!err.is_local());
}

#[tokio::test]
async fn test_slow_server_times_out_as_transport() {
    let app = Router::new().route(
        "/style_recommendation",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            (StatusCode::OK, AUTUMN)
        }),
    );
    let client = server::client_with_timeouts(&server::serve(app).await, 1, 1, 1);
    let (_dir, path) = server::image();

    let payload = StyleRequest::new(&path, Some("u1"), None).build().unwrap();
    let started = Instant::now();
    let err = client.submit(payload).await.unwrap_err();

    assert!(matches!(err, StyleError::Transport(_)), "{err:?}");
    assert!(!err.is_local());
    assert!(started.elapsed() < Duration::from_secs(4), "{:?}", started.elapsed());
}

#[tokio::test]
async fn test_flow_against_service() {
    let recorder = Recorder::default();
    let base_url = server::serve(style_app(&recorder, StatusCode::OK, AUTUMN)).await;
    let client = server::client(&base_url);
    let (_dir, path) = server::image();

    let mut flow = ScanFlow::new(FlowOptions::default(), Some("u1".to_string()));
    flow.select_image(&path).unwrap();
    flow.choose_gender(Gender::Women).unwrap();
    flow.choose_style(ClothingStyle::Casual).unwrap();
    flow.submit(&client).await.unwrap();

    assert!(matches!(flow.state(), ScanState::Showing(_)));
    assert_eq!(
        recorder.field(0, "clothing_type").as_deref(),
        Some("casual-women")
    );
}

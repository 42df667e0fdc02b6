use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use futures::StreamExt;
use serde_json::{json, Value};
use tokio::time::timeout;
use tower::ServiceExt;

use countdown_server::{create_router, AppState, CountdownSettings};

fn app(minutes: u8, seconds: u8) -> (Arc<AppState>, Router) {
    let settings = CountdownSettings::new(minutes, seconds).unwrap();
    let state = Arc::new(AppState::new(
        20554,
        "127.0.0.1".to_string(),
        settings,
        Duration::from_millis(500),
    ));
    (Arc::clone(&state), create_router(state))
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn status_reports_idle_default_countdown() {
    let (_, app) = app(25, 0);

    let (status, body) = call(&app, "GET", "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["countdown"]["status"], "idle");
    assert_eq!(body["countdown"]["display"], "25:00");
    assert_eq!(body["countdown"]["done"], false);
    assert_eq!(body["port"], 20554);
    assert_eq!(body["last_action"], Value::Null);
}

#[tokio::test]
async fn health_reports_ok() {
    let (_, app) = app(25, 0);
    let (status, body) = call(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test(start_paused = true)]
async fn start_pause_and_resume() {
    let (_, app) = app(0, 10);

    let (status, body) = call(&app, "POST", "/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["countdown"]["status"], "running");

    tokio::time::sleep(Duration::from_millis(3_250)).await;

    let (status, body) = call(&app, "POST", "/pause", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["countdown"]["status"], "paused");
    assert_eq!(body["countdown"]["remaining_millis"], 6_750);
    assert_eq!(body["countdown"]["display"], "0:07");

    let (_, body) = call(&app, "GET", "/status", None).await;
    assert_eq!(body["last_action"], "pause");

    let (status, body) = call(&app, "POST", "/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["countdown"]["remaining_millis"], 6_750);
}

#[tokio::test(start_paused = true)]
async fn double_start_is_a_conflict() {
    let (_, app) = app(0, 10);

    call(&app, "POST", "/start", None).await;
    let (status, body) = call(&app, "POST", "/start", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "cannot start while countdown is running");
}

#[tokio::test(start_paused = true)]
async fn reset_and_settings_are_refused_while_running() {
    let (_, app) = app(0, 10);
    call(&app, "POST", "/start", None).await;

    let (status, _) = call(&app, "POST", "/reset", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = call(&app, "POST", "/settings", Some(json!({"minutes": 1, "seconds": 0}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn pause_while_idle_is_a_conflict() {
    let (_, app) = app(0, 10);
    let (status, body) = call(&app, "POST", "/pause", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "cannot pause while countdown is idle");
}

#[tokio::test]
async fn settings_accept_numbers_and_text() {
    let (_, app) = app(25, 0);

    let (status, body) = call(&app, "POST", "/settings", Some(json!({"minutes": "1", "seconds": 5}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["countdown"]["display"], "1:05");
    assert_eq!(body["countdown"]["configured"], "1:05");
    assert_eq!(body["countdown"]["configured_minutes"], 1);
    assert_eq!(body["countdown"]["configured_seconds"], 5);

    let (status, body) = call(&app, "POST", "/settings", Some(json!({"minutes": "2.0", "seconds": 0.0}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["countdown"]["display"], "2:00");
}

#[tokio::test]
async fn invalid_settings_are_rejected() {
    let (state, app) = app(25, 0);

    for body in [
        json!({"minutes": 60, "seconds": 0}),
        json!({"minutes": 1, "seconds": -1}),
        json!({"minutes": "ten", "seconds": 0}),
        json!({"minutes": 1.5, "seconds": 0}),
        json!({"seconds": 0}),
    ] {
        let (status, response) = call(&app, "POST", "/settings", Some(body.clone())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "accepted {}", body);
        assert_eq!(response["status"], "error");
    }

    assert_eq!(state.snapshot().display, "25:00");
}

#[tokio::test(start_paused = true)]
async fn reconfigure_after_pause_discards_progress() {
    let (_, app) = app(0, 20);

    call(&app, "POST", "/start", None).await;
    tokio::time::sleep(Duration::from_secs(10)).await;
    let (_, body) = call(&app, "POST", "/pause", None).await;
    assert_eq!(body["countdown"]["display"], "0:10");

    let (status, body) = call(&app, "POST", "/settings", Some(json!({"minutes": 1, "seconds": 0}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["countdown"]["display"], "1:00");
    assert_eq!(body["countdown"]["status"], "idle");
}

#[tokio::test(start_paused = true)]
async fn expired_countdown_is_done_until_reset() {
    let (state, app) = app(0, 1);
    let mut expiry = state.subscribe_expiry();

    call(&app, "POST", "/toggle", None).await;
    tokio::time::sleep(Duration::from_millis(1_600)).await;

    let (_, body) = call(&app, "GET", "/status", None).await;
    assert_eq!(body["countdown"]["status"], "idle");
    assert_eq!(body["countdown"]["done"], true);
    assert_eq!(body["countdown"]["display"], "0:00");
    assert!(expiry.try_recv().is_ok());
    assert!(expiry.try_recv().is_err());

    let (status, _) = call(&app, "POST", "/start", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = call(&app, "POST", "/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["countdown"]["display"], "0:01");
    assert_eq!(body["countdown"]["done"], false);
}

/// Split buffered server-sent event text into (event name, data) pairs,
/// skipping keep-alive comments
fn drain_events(buffer: &mut String) -> Vec<(String, Value)> {
    let mut events = Vec::new();
    while let Some(end) = buffer.find("\n\n") {
        let block: String = buffer.drain(..end + 2).collect();
        let mut name = None;
        let mut data = None;
        for line in block.lines() {
            if let Some(rest) = line.strip_prefix("event:") {
                name = Some(rest.trim().to_string());
            } else if let Some(rest) = line.strip_prefix("data:") {
                data = Some(serde_json::from_str(rest.trim()).unwrap());
            }
        }
        if let (Some(name), Some(data)) = (name, data) {
            events.push((name, data));
        }
    }
    events
}

#[tokio::test(start_paused = true)]
async fn events_endpoint_streams_ticks_and_expiry() {
    let (_, app) = app(0, 1);

    let request = Request::builder().uri("/events").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");

    let mut body = response.into_body().into_data_stream();
    let mut buffer = String::new();
    let mut events = Vec::new();

    // Current snapshot is sent as soon as the client connects
    while events.is_empty() {
        let chunk = timeout(Duration::from_secs(1), body.next()).await.unwrap().unwrap().unwrap();
        buffer.push_str(std::str::from_utf8(&chunk).unwrap());
        events.extend(drain_events(&mut buffer));
    }
    assert_eq!(events[0].0, "tick");
    assert_eq!(events[0].1["status"], "idle");
    assert_eq!(events[0].1["display"], "0:01");

    let (status, _) = call(&app, "POST", "/start", None).await;
    assert_eq!(status, StatusCode::OK);

    let mut saw_running = false;
    let mut saw_done = false;
    let mut expirations = 0;
    while !(saw_done && expirations > 0) {
        let chunk = timeout(Duration::from_secs(5), body.next()).await.unwrap().unwrap().unwrap();
        buffer.push_str(std::str::from_utf8(&chunk).unwrap());
        for (name, data) in drain_events(&mut buffer) {
            match name.as_str() {
                "tick" if data["status"] == "running" => {
                    assert_eq!(data["done"], false);
                    saw_running = true;
                }
                "tick" => {
                    assert_eq!(data["status"], "idle");
                    assert_eq!(data["done"], true);
                    saw_done = true;
                }
                "expired" => {
                    assert_eq!(data["configured"]["secs"], 1);
                    expirations += 1;
                }
                other => panic!("unexpected event {}", other),
            }
        }
    }

    assert!(saw_running);
    assert_eq!(expirations, 1);
}

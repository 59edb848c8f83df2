// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Router tests: profile API, health, and the scheduler-only task route.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use powerlifting_profile::config::Config;
use powerlifting_profile::db::SnapshotStore;
use powerlifting_profile::services::ViewState;
use serde_json::Value;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{create_test_app, create_test_app_with_config, wait_for_state};

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn refresh_request(auth: Option<&str>, scheduler_header: bool) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/tasks/refresh");
    if let Some(token) = auth {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    if scheduler_header {
        builder = builder.header("x-cloudscheduler", "true");
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_reports_view_state() {
    let (app, _, _) = create_test_app(None);

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert!(["loading", "error"].contains(&body["profile"].as_str().unwrap()));
}

#[tokio::test]
async fn test_profile_without_snapshot_is_error_state() {
    let (app, state, _) = create_test_app(None);
    wait_for_state(&state.profile_view, |s| matches!(s, ViewState::Error(_))).await;

    let response = app.oneshot(get("/api/profile")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "No data found.");
}

#[tokio::test]
async fn test_profile_renders_stored_snapshot() {
    let (app, state, store) = create_test_app(None);
    store
        .set("powerlifting/user_data", common::sample_snapshot())
        .await
        .unwrap();
    wait_for_state(&state.profile_view, |s| matches!(s, ViewState::Ready(_))).await;

    let response = app
        .oneshot(get("/api/profile?unit=kg&raw_only=false"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ready");
    assert_eq!(body["name"], "Calvin Le");
    assert_eq!(body["unit"], "kg");
    assert_eq!(body["personal_bests"].as_array().unwrap().len(), 2);
    assert_eq!(body["competitions"][1]["total"], "408.2 kg");
}

#[tokio::test]
async fn test_profile_rejects_unknown_unit() {
    let (app, _, _) = create_test_app(None);

    let response = app.oneshot(get("/api/profile?unit=stone")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_profile_stream_is_event_stream() {
    let (app, _, _) = create_test_app(None);

    let response = app.oneshot(get("/api/profile/stream")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/event-stream"
    );
}

#[tokio::test]
async fn test_refresh_requires_scheduler_token() {
    let (app, _, store) = create_test_app(None);

    let response = app.clone().oneshot(refresh_request(None, false)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // With a token configured, the marker header alone is not enough.
    let response = app.clone().oneshot(refresh_request(None, true)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(refresh_request(Some("wrong"), false))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_refresh_accepts_scheduler_header_without_token() {
    let config = Config {
        scheduler_token: None,
        closepl_api_key: None,
        ..Config::test_default()
    };
    let (app, _, _) = create_test_app_with_config(config);

    let response = app.clone().oneshot(refresh_request(None, false)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Passes the guard, then fails on the missing API key.
    let response = app.oneshot(refresh_request(None, true)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "configuration_error");
}

#[tokio::test]
async fn test_refresh_stores_snapshot_and_updates_view() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/testlifter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::sample_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let (app, state, store) = create_test_app(Some(format!("{}/api", server.uri())));

    let response = app
        .oneshot(refresh_request(Some("test_scheduler_token"), false))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("cache-control").unwrap(), "no-store");

    let body = body_json(response).await;
    assert_eq!(body["path"], "powerlifting/user_data");
    assert_eq!(store.write_count(), 1);

    let view_state =
        wait_for_state(&state.profile_view, |s| matches!(s, ViewState::Ready(_))).await;
    match view_state {
        ViewState::Ready(profile) => {
            assert_eq!(profile.last_updated.as_deref(), body["last_updated"].as_str())
        }
        other => panic!("unexpected state {other:?}"),
    }
}

#[tokio::test]
async fn test_refresh_upstream_failure_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (app, _, store) = create_test_app(Some(format!("{}/api", server.uri())));

    let response = app
        .oneshot(refresh_request(Some("test_scheduler_token"), false))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(store.write_count(), 0);
}

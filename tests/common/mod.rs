//! Shared test utilities for reqtrack integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{middleware, Router};
use reqtrack::middleware::track_requests;
use reqtrack::{MemorySink, RequestTracker, TrackedRequest, TrackerConfig};

/// Build a tracker wired to an in-memory sink that the test can inspect.
pub fn make_tracker(config: TrackerConfig) -> (Arc<RequestTracker>, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let tracker =
        Arc::new(RequestTracker::new(config, sink.clone()).expect("valid test configuration"));
    (tracker, sink)
}

/// Minimal tracked request; `target` is `path` or `path?query`.
pub fn make_request(method: &str, target: &str) -> TrackedRequest {
    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path.to_string(), format!("?{query}")),
        None => (target.to_string(), String::new()),
    };

    TrackedRequest {
        method: method.to_string(),
        scheme: "http".to_string(),
        host: "localhost".to_string(),
        path,
        query,
        protocol: "HTTP/1.1".to_string(),
        content_type: None,
        headers: HeaderMap::new(),
        remote_address: None,
    }
}

/// Echo app with the tracking middleware installed.
pub fn make_app(tracker: Arc<RequestTracker>) -> Router {
    Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/echo", post(|body: String| async move { body }))
        .fallback(|body: String| async move { body })
        .layer(middleware::from_fn_with_state(tracker, track_requests))
}

//! Axum middleware adapter for the tracker.
//!
//! Tracking is best-effort: a request that fails capture still completes
//! normally through the hosting pipeline, and untracked requests pay for
//! nothing beyond the gate itself.

use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::tracker::{RequestTracker, TrackedRequest};

/// Track the request, then hand it - body intact - to the inner service.
///
/// Wire it up with [`axum::middleware::from_fn_with_state`]:
///
/// ```no_run
/// use axum::{middleware, routing::post, Router};
/// use reqtrack::{middleware::track_requests, RequestTracker, TrackerConfig, TracingSink};
/// use std::sync::Arc;
///
/// # fn build() -> Result<Router, reqtrack::ConfigError> {
/// let tracker = Arc::new(RequestTracker::new(
///     TrackerConfig::default(),
///     Arc::new(TracingSink),
/// )?);
/// let app: Router = Router::new()
///     .route("/submit", post(|| async { "ok" }))
///     .layer(middleware::from_fn_with_state(tracker, track_requests));
/// # Ok(app)
/// # }
/// ```
///
/// When a body capture is due, the body is buffered so the captured prefix
/// can be read from a rewindable window and the untouched bytes handed to
/// the inner service - the axum rendition of read-then-restore.
pub async fn track_requests(
    State(tracker): State<Arc<RequestTracker>>,
    request: Request,
    next: Next,
) -> Response {
    // Gate on the borrowed request line first; untracked requests never pay
    // for the header clone behind the full tracked view.
    let uri = request.uri();
    let path_and_query = uri.path_and_query().map_or(uri.path(), |pq| pq.as_str());
    if !tracker.should_track_parts(request.method().as_str(), path_and_query) {
        return next.run(request).await;
    }

    let remote_address = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());
    let tracked = TrackedRequest::from_http(&request, remote_address);

    if !tracker.should_capture_body(&tracked) {
        tracker.emit(&tracker.build_record(&tracked));
        return next.run(request).await;
    }

    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            // The body never arrived; the inner service could not have read
            // it either. Tracking stays silent about it beyond a debug line.
            tracing::debug!(target: "reqtrack", %error, "failed to buffer request body");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let mut window = Cursor::new(bytes.clone());
    match tracker.build_record_with_body(&tracked, &mut window).await {
        Ok(record) => tracker.emit(&record),
        Err(error) => {
            // Capture failure must not alter the request's outcome; fall
            // back to the bodiless record.
            tracing::debug!(target: "reqtrack", %error, "request body capture failed");
            tracker.emit(&tracker.build_record(&tracked));
        }
    }

    let request = Request::from_parts(parts, Body::from(bytes));
    next.run(request).await
}

//! Reqtrack - selective HTTP request tracking
//!
//! This library decides which inbound requests deserve a structured log
//! record, assembles that record with every field bounded in length, and
//! hands it to a pluggable sink. A thin axum middleware adapter wires the
//! pipeline into a hosting server.

pub mod body;
pub mod config;
pub mod encoding;
pub mod middleware;
pub mod record;
pub mod rules;
pub mod sink;
pub mod tracker;
pub mod truncate;

pub use config::{ConfigError, TrackerConfig};
pub use record::LogRecord;
pub use sink::{MemorySink, RecordSink, TracingSink, REQUEST_LOG_EVENT_ID};
pub use tracker::{RequestTracker, TrackedRequest};

//! The tracking decision pipeline.
//!
//! Per request the pipeline is linear: gate on method, then on URL, and stop
//! there for untracked requests. For tracked requests the assembler builds
//! one [`LogRecord`] with every field length-bounded, optionally captures a
//! bounded body prefix, and emits the finished record to the sink.

use std::sync::Arc;

use axum::http::{header, HeaderMap};
use indexmap::IndexMap;
use regex::Regex;
use tokio::io::{AsyncRead, AsyncSeek};

use crate::body::capture_body;
use crate::config::{ConfigError, TrackerConfig};
use crate::encoding::resolve_encoding;
use crate::record::LogRecord;
use crate::rules::{self, IncludeExclude};
use crate::sink::RecordSink;
use crate::truncate::truncate;

/// Truncation bound for the logged method; longest registered HTTP methods
/// fit within it.
const METHOD_MAX_LENGTH: usize = 10;

/// Everything the tracker needs to know about one inbound request.
///
/// Built by the hosting HTTP layer (see [`crate::middleware`]); the body is
/// deliberately not part of this value so the untracked path never touches
/// the body stream.
#[derive(Debug, Clone)]
pub struct TrackedRequest {
    pub method: String,
    pub scheme: String,
    pub host: String,
    /// Path portion of the request target.
    pub path: String,
    /// Query string including its leading `?`, or empty.
    pub query: String,
    pub protocol: String,
    pub content_type: Option<String>,
    pub headers: HeaderMap,
    pub remote_address: Option<String>,
}

impl TrackedRequest {
    /// Extract the tracked view of an `http` request.
    pub fn from_http<B>(request: &axum::http::Request<B>, remote_address: Option<String>) -> Self {
        let uri = request.uri();
        let headers = request.headers().clone();
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let host = uri
            .authority()
            .map(|authority| authority.to_string())
            .or_else(|| {
                headers
                    .get(header::HOST)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string)
            })
            .unwrap_or_default();

        Self {
            method: request.method().to_string(),
            scheme: uri.scheme_str().unwrap_or("http").to_string(),
            host,
            path: uri.path().to_string(),
            query: uri
                .query()
                .map(|query| format!("?{query}"))
                .unwrap_or_default(),
            protocol: format!("{:?}", request.version()),
            content_type,
            headers,
            remote_address,
        }
    }

    /// The portion the URL rules are evaluated against.
    fn path_and_query(&self) -> String {
        format!("{}{}", self.path, self.query)
    }

    /// The full URL as recorded, before truncation.
    fn full_url(&self) -> String {
        format!("{}://{}{}{}", self.scheme, self.host, self.path, self.query)
    }
}

/// Decides which requests get tracked and assembles their log records.
///
/// Constructed once at process start; all patterns are compiled here and
/// reused read-only for the process lifetime, so a tracker can be shared
/// across arbitrarily many in-flight requests without synchronization.
pub struct RequestTracker {
    config: TrackerConfig,
    method_rule: IncludeExclude,
    url_rule: IncludeExclude,
    body_content_type: Regex,
    body_exclude_url: Option<Regex>,
    sink: Arc<dyn RecordSink>,
}

impl RequestTracker {
    /// Compile the configured patterns and build a tracker emitting to `sink`.
    ///
    /// Fails fast on any invalid pattern; nothing is compiled per request.
    pub fn new(config: TrackerConfig, sink: Arc<dyn RecordSink>) -> Result<Self, ConfigError> {
        let method_rule = IncludeExclude::from_compiled(
            compile_field("exclude_method", config.exclude_method.as_deref())?,
            compile_field("include_method", config.include_method.as_deref())?,
        );
        let url_rule = IncludeExclude::from_compiled(
            compile_field("exclude_url", config.exclude_url.as_deref())?,
            compile_field("include_url", config.include_url.as_deref())?,
        );
        let body_content_type =
            rules::compile(&config.body_content_type).map_err(|source| {
                ConfigError::InvalidPattern {
                    field: "body_content_type",
                    source,
                }
            })?;
        let body_exclude_url =
            compile_field("body_exclude_url", config.body_exclude_url.as_deref())?;

        Ok(Self {
            config,
            method_rule,
            url_rule,
            body_content_type,
            body_exclude_url,
            sink,
        })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Decide whether this request gets a log record at all.
    ///
    /// Disabled trackers answer false without evaluating any pattern, and a
    /// failing method rule short-circuits before the URL rule runs.
    pub fn should_track(&self, request: &TrackedRequest) -> bool {
        self.gate(&request.method, || request.path_and_query())
    }

    /// The same gate evaluated on borrowed request-line parts, letting hosts
    /// decide before materializing a [`TrackedRequest`] at all.
    pub fn should_track_parts(&self, method: &str, path_and_query: &str) -> bool {
        self.gate(method, || path_and_query.to_string())
    }

    /// The URL input is taken lazily: when the tracker is disabled or the
    /// method rule fails, `path_and_query` is never built and the URL rule
    /// never runs.
    fn gate(&self, method: &str, path_and_query: impl FnOnce() -> String) -> bool {
        if !self.config.enabled {
            return false;
        }
        if !self.method_rule.matches(method) {
            return false;
        }
        self.url_rule.matches(&path_and_query())
    }

    /// Decide whether the request body is eligible for capture.
    ///
    /// Requires a content type matching the configured pattern, and the path
    /// must not be excluded from body capture.
    pub fn should_capture_body(&self, request: &TrackedRequest) -> bool {
        let content_type = match request.content_type.as_deref() {
            None | Some("") => return false,
            Some(content_type) => content_type,
        };

        self.body_content_type.is_match(content_type)
            && self
                .body_exclude_url
                .as_ref()
                .map_or(true, |pattern| !pattern.is_match(&request.path))
    }

    /// Assemble a record without body capture.
    ///
    /// Callers are expected to have consulted [`Self::should_track`] first.
    pub fn build_record(&self, request: &TrackedRequest) -> LogRecord {
        let mut headers = IndexMap::with_capacity(request.headers.len());
        for (name, value) in &request.headers {
            headers.insert(
                truncate(name.as_str(), self.config.header_name_max_length),
                truncate(
                    &String::from_utf8_lossy(value.as_bytes()),
                    self.config.header_value_max_length,
                ),
            );
        }

        LogRecord {
            method: truncate(&request.method, METHOD_MAX_LENGTH),
            headers,
            body: None,
            protocol: request.protocol.clone(),
            url: truncate(&request.full_url(), self.config.url_max_length),
            remote_address: request.remote_address.clone(),
        }
    }

    /// Assemble a record, capturing a bounded body prefix when the request
    /// is eligible.
    ///
    /// `body` must be positioned at the start of the request body and is
    /// rewound there before this returns, so the real handler still reads
    /// the full body afterward. The charset declared in the content type is
    /// used when it resolves; otherwise UTF-8.
    pub async fn build_record_with_body<R>(
        &self,
        request: &TrackedRequest,
        body: &mut R,
    ) -> std::io::Result<LogRecord>
    where
        R: AsyncRead + AsyncSeek + Unpin,
    {
        let mut record = self.build_record(request);

        if self.should_capture_body(request) {
            let encoding = request
                .content_type
                .as_deref()
                .and_then(resolve_encoding)
                .unwrap_or(encoding_rs::UTF_8);
            record.body = Some(capture_body(body, encoding, self.config.body_max_length).await?);
        }

        Ok(record)
    }

    /// Hand one finished record to the sink.
    pub fn emit(&self, record: &LogRecord) {
        self.sink.emit(record);
    }
}

fn compile_field(
    field: &'static str,
    pattern: Option<&str>,
) -> Result<Option<Regex>, ConfigError> {
    pattern
        .map(|p| {
            rules::compile(p).map_err(|source| ConfigError::InvalidPattern { field, source })
        })
        .transpose()
}

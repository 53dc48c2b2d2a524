//! Structured request log records.

use indexmap::IndexMap;
use serde::Serialize;

/// One tracked request, assembled once, handed to the sink, then discarded.
///
/// Every string field has already been length-bounded by the assembler;
/// `remote_address` is the exception and is carried verbatim. Header order
/// is insertion order; a name that collides after truncation overwrites the
/// earlier value, matching plain mapping semantics.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub method: String,
    pub headers: IndexMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub protocol: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_without_absent_fields() {
        let record = LogRecord {
            method: "GET".to_string(),
            headers: IndexMap::new(),
            body: None,
            protocol: "HTTP/1.1".to_string(),
            url: "http://localhost/".to_string(),
            remote_address: None,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("body").is_none());
        assert!(json.get("remote_address").is_none());
        assert_eq!(json["method"], "GET");
    }

    #[test]
    fn header_order_is_preserved() {
        let mut headers = IndexMap::new();
        headers.insert("z-first".to_string(), "1".to_string());
        headers.insert("a-second".to_string(), "2".to_string());

        let keys: Vec<&String> = headers.keys().collect();
        assert_eq!(keys, ["z-first", "a-second"]);
    }
}

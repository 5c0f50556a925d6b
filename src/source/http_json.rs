//! Generic JSON-over-HTTP source.
//!
//! Covers media servers, weather providers and appliance status APIs that
//! answer a GET with a JSON document. A pointer narrows the document to the
//! part the dashboard renders.

use super::{Snapshot, SourceAdapter, SourceError};
use crate::config::HttpJsonConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Upstream error bodies are cut to this many characters in error messages.
const MAX_ERROR_BODY_CHARS: usize = 200;

pub struct HttpJsonSource {
    url: String,
    pointer: Option<String>,
    headers: HeaderMap,
    timeout: Duration,
    truncate_fields: Vec<String>,
    max_field_chars: usize,
    client: Arc<Client>,
}

impl HttpJsonSource {
    pub fn new(config: &HttpJsonConfig, client: Arc<Client>) -> Result<Self, SourceError> {
        if !(config.url.starts_with("http://") || config.url.starts_with("https://")) {
            return Err(SourceError::Configuration(format!(
                "url must start with http:// or https://, got '{}'",
                config.url
            )));
        }
        if let Some(pointer) = &config.pointer {
            if !pointer.is_empty() && !pointer.starts_with('/') {
                return Err(SourceError::Configuration(format!(
                    "pointer must be empty or start with '/', got '{}'",
                    pointer
                )));
            }
        }
        if config.timeout_seconds == 0 {
            return Err(SourceError::Configuration(
                "timeout_seconds must be non-zero".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                SourceError::Configuration(format!("invalid header name '{}': {}", name, e))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                SourceError::Configuration(format!("invalid value for header '{}': {}", name, e))
            })?;
            headers.insert(name, value);
        }

        Ok(Self {
            url: config.url.clone(),
            pointer: config.pointer.clone(),
            headers,
            timeout: Duration::from_secs(config.timeout_seconds),
            truncate_fields: config.truncate_fields.clone(),
            max_field_chars: config.max_field_chars,
            client,
        })
    }

    /// Narrow the document to the configured pointer.
    ///
    /// A missing target means the upstream has nothing to list (an idle media
    /// server omits its session array entirely), so it maps to an empty
    /// snapshot rather than an error.
    fn select(&self, document: Value) -> Value {
        match &self.pointer {
            Some(pointer) if !pointer.is_empty() => document
                .pointer(pointer)
                .cloned()
                .unwrap_or_else(|| Value::Array(Vec::new())),
            _ => document,
        }
    }

    fn trim_long_fields(&self, value: &mut Value) {
        if self.truncate_fields.is_empty() {
            return;
        }
        match value {
            Value::Object(_) => self.trim_object(value),
            Value::Array(items) => {
                for item in items.iter_mut() {
                    self.trim_object(item);
                }
            }
            _ => {}
        }
    }

    fn trim_object(&self, value: &mut Value) {
        let Value::Object(fields) = value else {
            return;
        };
        for name in &self.truncate_fields {
            if let Some(Value::String(text)) = fields.get_mut(name) {
                if let Some(short) = truncate_chars(text, self.max_field_chars) {
                    *text = short;
                }
            }
        }
    }
}

/// Cut `text` to `max` characters followed by "...", or None if it already fits.
pub(crate) fn truncate_chars(text: &str, max: usize) -> Option<String> {
    let (cut, _) = text.char_indices().nth(max)?;
    Some(format!("{}...", &text[..cut]))
}

#[async_trait]
impl SourceAdapter for HttpJsonSource {
    fn kind(&self) -> &'static str {
        "http_json"
    }

    async fn fetch(&self) -> Result<Snapshot, SourceError> {
        let timeout_ms = self.timeout.as_millis() as u64;

        let response = self
            .client
            .get(&self.url)
            .headers(self.headers.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| SourceError::from_reqwest(e, timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = truncate_chars(&body, MAX_ERROR_BODY_CHARS).unwrap_or(body);
            return Err(SourceError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::from_reqwest(e, timeout_ms))?;

        let document: Value = serde_json::from_str(&body).map_err(|e| {
            SourceError::InvalidResponse(format!("Failed to parse JSON body: {}", e))
        })?;

        let mut selected = self.select(document);
        self.trim_long_fields(&mut selected);

        Ok(Snapshot::new(selected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn config(url: &str) -> HttpJsonConfig {
        HttpJsonConfig {
            url: url.to_string(),
            pointer: None,
            headers: HashMap::new(),
            timeout_seconds: 5,
            truncate_fields: vec![],
            max_field_chars: 800,
        }
    }

    #[test]
    fn test_rejects_non_http_url() {
        let result = HttpJsonSource::new(&config("ftp://media.local"), Arc::new(Client::new()));
        assert!(matches!(result, Err(SourceError::Configuration(_))));
    }

    #[test]
    fn test_rejects_relative_pointer() {
        let mut cfg = config("http://media.local");
        cfg.pointer = Some("MediaContainer".to_string());
        let result = HttpJsonSource::new(&cfg, Arc::new(Client::new()));
        assert!(matches!(result, Err(SourceError::Configuration(_))));
    }

    #[test]
    fn test_rejects_bad_header_name() {
        let mut cfg = config("http://media.local");
        cfg.headers.insert("bad header".to_string(), "x".to_string());
        let result = HttpJsonSource::new(&cfg, Arc::new(Client::new()));
        assert!(matches!(result, Err(SourceError::Configuration(_))));
    }

    #[test]
    fn test_select_missing_pointer_is_empty() {
        let mut cfg = config("http://media.local");
        cfg.pointer = Some("/MediaContainer/Metadata".to_string());
        let source = HttpJsonSource::new(&cfg, Arc::new(Client::new())).unwrap();

        let selected = source.select(json!({"MediaContainer": {"size": 0}}));
        assert_eq!(selected, json!([]));
    }

    #[test]
    fn test_trim_long_fields_in_array() {
        let mut cfg = config("http://media.local");
        cfg.truncate_fields = vec!["summary".to_string()];
        cfg.max_field_chars = 5;
        let source = HttpJsonSource::new(&cfg, Arc::new(Client::new())).unwrap();

        let mut value = json!([
            {"title": "Heat", "summary": "A group of professional bank robbers"},
            {"title": "Up", "summary": "Short"},
        ]);
        source.trim_long_fields(&mut value);

        assert_eq!(value[0]["summary"], "A gro...");
        assert_eq!(value[1]["summary"], "Short");
        assert_eq!(value[0]["title"], "Heat");
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo wörld", 4).as_deref(), Some("héll..."));
        assert_eq!(truncate_chars("short", 5), None);
        assert_eq!(truncate_chars("", 0), None);
    }
}

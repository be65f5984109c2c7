//! The normalized log record that flows into every formatter.

use crate::level::{channel_label, Level};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// HTTP verbs honored in `extra.http_method`; anything else is dropped.
pub const HTTP_VERBS: [&str; 9] = [
    "GET", "HEAD", "POST", "PUT", "DELETE", "CONNECT", "OPTIONS", "TRACE", "PATCH",
];

/// A normalized log event.
///
/// Constructed upstream, passed once through a formatter, and
/// discarded. Formatters never mutate a record; reshaping happens on
/// clones of the `context`/`extra` maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Event instant (UTC).
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    /// Severity; serialized as its Monolog integer.
    pub level: Level,
    /// Logical source category key ("plugin", "db", "php", ...).
    /// Resolved through the channel table at render time.
    #[serde(default = "default_channel")]
    pub channel: String,
    /// Free-form message. May contain a pilcrow (`¶`) marking where
    /// some formatters splice a severity label or error code.
    pub message: String,
    /// Classification fields: class, component, version, code,
    /// traceID, instance.
    #[serde(default)]
    pub context: Map<String, Value>,
    /// Richer origin/request/user fields: file, line, function, class,
    /// ip, http_method, url, referrer, userid, username, usersession,
    /// server, siteid, sitename, sitedomain, ua, trace.
    #[serde(default)]
    pub extra: Map<String, Value>,
}

fn default_channel() -> String {
    "unknown".to_string()
}

impl LogRecord {
    pub fn new(level: Level, channel: &str, message: &str) -> Self {
        LogRecord {
            timestamp: Utc::now(),
            level,
            channel: channel.to_string(),
            message: message.to_string(),
            context: Map::new(),
            extra: Map::new(),
        }
    }

    /// Add a context field (builder style, used heavily in tests).
    pub fn with_context(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }

    /// Add an extra field (builder style).
    pub fn with_extra(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    /// Display name of this record's channel ("UNKNOWN" fallback).
    pub fn channel_label(&self) -> &'static str {
        channel_label(&self.channel)
    }

    pub fn context_str(&self, key: &str) -> Option<&str> {
        self.context.get(key).and_then(Value::as_str)
    }

    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }

    pub fn extra_u64(&self, key: &str) -> Option<u64> {
        self.extra.get(key).and_then(Value::as_u64)
    }

    /// `context.code` rendered as a string, whether it arrived as an
    /// integer or a string.
    pub fn code(&self) -> Option<String> {
        match self.context.get("code") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    /// `extra.http_method`, honored only when it case-insensitively
    /// matches the fixed verb set; returned uppercased.
    pub fn http_method(&self) -> Option<String> {
        let raw = self.extra_str("http_method")?;
        let upper = raw.to_ascii_uppercase();
        HTTP_VERBS.contains(&upper.as_str()).then_some(upper)
    }

    /// `extra.ip`, only when it parses as a v4/v6 address. Invalid and
    /// pseudonymized values are dropped (the HTML formatter renders
    /// pseudonymized IPs itself, as "obfuscated").
    pub fn client_ip(&self) -> Option<&str> {
        self.extra_str("ip")
            .filter(|ip| ip.parse::<std::net::IpAddr>().is_ok())
    }
}

/// Values beginning with `{` are pseudonymized identifiers: opaque,
/// never geo-enriched, never leaked into output.
pub fn is_pseudonymized(value: &str) -> bool {
    value.starts_with('{')
}

/// Render an identifier, masking pseudonymized values.
pub fn opaque(value: &str) -> &str {
    if is_pseudonymized(value) {
        "obfuscated"
    } else {
        value
    }
}

/// Char-count truncation (never rejection) to a destination's field cap.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        text.chars().take(max).collect()
    }
}

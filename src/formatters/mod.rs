//! One formatter per destination family, behind a single contract.

use crate::record::{is_pseudonymized, truncate, LogRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

pub mod bugsnag;
pub mod datadog;
pub mod elastic;
pub mod fluentd;
pub mod ganalytics;
pub mod html;
pub mod loki;
pub mod newrelic;
pub mod plain;
pub mod raygun;
pub mod sematext;
pub mod stackdriver;

/// Trait for turning records into a destination's wire shape.
///
/// Formatters are total over their input: missing or malformed
/// optional fields degrade to documented defaults, never errors.
pub trait RecordFormatter {
    fn format(&self, record: &LogRecord) -> Value;

    /// Batch output, per-record results in input order. The default is
    /// a JSON array; line-oriented destinations override this with
    /// newline-delimited concatenation.
    fn format_batch(&self, records: &[LogRecord]) -> Value {
        Value::Array(records.iter().map(|r| self.format(r)).collect())
    }
}

/// Field caps documented by the destinations that enforce them.
pub(crate) const MESSAGE_MAX: usize = 1000;
pub(crate) const URL_MAX: usize = 2083;
pub(crate) const REFERRER_MAX: usize = 250;
pub(crate) const USERNAME_MAX: usize = 250;

/// Injection point some formatters splice a label or code into.
pub(crate) const SEVERITY_MARK: char = '¶';

/// Presence-gated object builder: only populated fields and non-empty
/// sub-objects ever reach the output, replacing per-field existence
/// checks with one mechanical rule.
pub(crate) struct Obj(Map<String, Value>);

impl Obj {
    pub(crate) fn new() -> Self {
        Obj(Map::new())
    }

    pub(crate) fn from_map(map: Map<String, Value>) -> Self {
        Obj(map)
    }

    pub(crate) fn put(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub(crate) fn put_opt(self, key: &str, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(v) => self.put(key, v),
            None => self,
        }
    }

    /// Attach a sub-object only when it has at least one field.
    pub(crate) fn put_if(self, key: &str, obj: Obj) -> Self {
        if obj.0.is_empty() {
            self
        } else {
            self.put(key, Value::Object(obj.0))
        }
    }

    pub(crate) fn build(self) -> Value {
        Value::Object(self.0)
    }
}

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_ .\-]").unwrap());

/// Strip a component/class name down to a token safe for error-class
/// and exception-description fields.
pub(crate) fn sanitize_token(name: &str) -> String {
    TOKEN_RE.replace_all(name, "").trim().to_string()
}

/// Synthetic stack-frame method from the record's origin fields:
/// `Class::function`, `<function>` without a class, the bare class
/// without a function, or "unknown".
pub(crate) fn origin_method(record: &LogRecord) -> String {
    match (record.extra_str("class"), record.extra_str("function")) {
        (Some(class), Some(function)) => format!("{}::{}", class, function),
        (None, Some(function)) => format!("<{}>", function),
        (Some(class), None) => class.to_string(),
        (None, None) => "unknown".to_string(),
    }
}

/// User identity tri-state shared by the Raygun and HTML formatters.
#[derive(Debug, PartialEq)]
pub(crate) enum UserState {
    Anonymous,
    Pseudonymized,
    Resolved {
        id: Option<String>,
        name: Option<String>,
    },
    Absent,
}

pub(crate) fn user_state(record: &LogRecord) -> UserState {
    let userid = record.extra_str("userid");
    let username = record.extra_str("username");
    match (userid, username) {
        (None, None) => UserState::Absent,
        (_, Some("anonymous")) => UserState::Anonymous,
        (Some(id), _) if is_pseudonymized(id) => UserState::Pseudonymized,
        (_, Some(name)) if is_pseudonymized(name) => UserState::Pseudonymized,
        (id, name) => UserState::Resolved {
            id: id.map(str::to_string),
            name: name.map(str::to_string),
        },
    }
}

/// Copy of the extra map with the shared field rules applied: the HTTP
/// verb gate, pseudonymized-identifier masking, and the per-field caps.
/// Formatters that embed or flatten the map wholesale go through here
/// so raw values never ride past the rules.
pub(crate) fn sanitized_extra(record: &LogRecord) -> Map<String, Value> {
    let mut extra = record.extra.clone();

    match record.http_method() {
        Some(verb) => {
            extra.insert("http_method".to_string(), Value::from(verb));
        }
        None => {
            extra.remove("http_method");
        }
    }

    for key in ["userid", "username", "usersession", "ip"] {
        let masked = matches!(extra.get(key), Some(Value::String(s)) if is_pseudonymized(s));
        if masked {
            extra.insert(key.to_string(), Value::from("obfuscated"));
        }
    }

    for (key, max) in [
        ("url", URL_MAX),
        ("referrer", REFERRER_MAX),
        ("username", USERNAME_MAX),
    ] {
        let capped = match extra.get(key) {
            Some(Value::String(s)) if s.chars().count() > max => Some(truncate(s, max)),
            _ => None,
        };
        if let Some(capped) = capped {
            extra.insert(key.to_string(), Value::from(capped));
        }
    }

    extra
}

/// Newline-delimited batch framing for the line-oriented destinations:
/// concatenation of per-record JSON lines, not a JSON array.
pub(crate) fn json_lines(formatter: &dyn RecordFormatter, records: &[LogRecord]) -> Value {
    let lines: Vec<String> = records.iter().map(|r| formatter.format(r).to_string()).collect();
    Value::String(lines.join("\n"))
}

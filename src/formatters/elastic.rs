//! Elastic Cloud shape: Elastic Common Schema nesting.
//!
//! Every source field promoted into its ECS location is removed from
//! the context/extra map it came from, so no value ever appears under
//! two keys. Residual fields ride along unpromoted.

use crate::config::FormatterConfig;
use crate::formatters::{Obj, RecordFormatter, REFERRER_MAX, URL_MAX, USERNAME_MAX};
use crate::record::{opaque, truncate, LogRecord, HTTP_VERBS};
use serde_json::{Map, Value};

pub struct ElasticFormatter {
    index: String,
    product: String,
}

impl ElasticFormatter {
    pub fn new(config: &FormatterConfig) -> Self {
        ElasticFormatter {
            index: config.index.clone(),
            product: config.product.to_lowercase(),
        }
    }
}

/// Remove a key and keep it only when it held a string.
pub(crate) fn take_str(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    map.remove(key)
        .and_then(|v| v.as_str().map(str::to_string))
}

/// Remove a key, keeping string or integer values rendered as strings.
pub(crate) fn take_scalar(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key) {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Split a URL into (domain, path) without a URL parser: scheme
/// stripped, host up to the first slash.
fn split_url(url: &str) -> (Option<String>, Option<String>) {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    match rest.find('/') {
        Some(idx) => (
            Some(rest[..idx].to_string()),
            Some(truncate(&rest[idx..], URL_MAX)),
        ),
        None => (Some(rest.to_string()), None),
    }
}

impl RecordFormatter for ElasticFormatter {
    fn format(&self, record: &LogRecord) -> Value {
        let mut context = record.context.clone();
        let mut extra = record.extra.clone();

        let component = take_str(&mut context, "component");
        let class = take_str(&mut context, "class");
        let code = take_scalar(&mut context, "code");
        let trace_id = take_str(&mut context, "traceID");
        let instance = take_str(&mut context, "instance");

        let server = take_str(&mut extra, "server");
        let session = take_str(&mut extra, "usersession");
        let ip = take_str(&mut extra, "ip")
            .filter(|ip| ip.parse::<std::net::IpAddr>().is_ok());
        let method = take_str(&mut extra, "http_method")
            .map(|m| m.to_ascii_uppercase())
            .filter(|m| HTTP_VERBS.contains(&m.as_str()));
        let referrer = take_str(&mut extra, "referrer").map(|r| truncate(&r, REFERRER_MAX));
        let userid = take_scalar(&mut extra, "userid");
        let username = take_str(&mut extra, "username")
            .map(|u| truncate(opaque(&u), USERNAME_MAX));
        let (url_domain, url_path) = match take_str(&mut extra, "url") {
            Some(url) => split_url(&url),
            None => (None, None),
        };
        let ua = take_str(&mut extra, "ua");
        let site_domain = take_str(&mut extra, "sitedomain");
        let site_id = take_scalar(&mut extra, "siteid");
        let site_name = take_str(&mut extra, "sitename");

        Obj::new()
            .put("_index", self.index.as_str())
            .put("_type", "_doc")
            .put(
                "@timestamp",
                record
                    .timestamp
                    .to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
            )
            .put("message", record.message.as_str())
            .put(
                "log",
                Obj::new()
                    .put("level", record.level.name().to_lowercase())
                    .put(
                        "syslog",
                        Obj::new()
                            .put(
                                "severity",
                                Obj::new()
                                    .put("name", record.level.syslog_name())
                                    .put("number", record.level.syslog_severity())
                                    .build(),
                            )
                            .build(),
                    )
                    .build(),
            )
            .put(
                "event",
                Obj::new()
                    .put("kind", "event")
                    .put("category", "process")
                    .put(
                        "dataset",
                        format!("{}.{}", self.product, record.channel_label().to_lowercase()),
                    )
                    .put_opt("module", component)
                    .put_opt("provider", class)
                    .put_opt("code", code)
                    .build(),
            )
            .put_if("trace", Obj::new().put_opt("id", trace_id))
            .put_if(
                "host",
                Obj::new()
                    .put_opt("name", instance)
                    .put_opt("hostname", server),
            )
            .put_if("session", Obj::new().put_opt("id", session))
            .put_if(
                "client",
                Obj::new()
                    .put_opt("address", ip.clone())
                    .put_opt("ip", ip),
            )
            .put_if(
                "http",
                Obj::new().put_if(
                    "request",
                    Obj::new()
                        .put_opt("method", method)
                        .put_opt("referrer", referrer),
                ),
            )
            .put_if(
                "user",
                Obj::new()
                    .put_opt("id", userid.as_deref().map(opaque))
                    .put_if("name", Obj::new().put_opt("text", username)),
            )
            .put_if(
                "url",
                Obj::new()
                    .put_opt("domain", url_domain)
                    .put_opt("path", url_path),
            )
            .put_if("user_agent", Obj::new().put_opt("original", ua))
            .put_if("server", Obj::new().put_opt("domain", site_domain))
            .put_if(
                "site",
                Obj::new().put_opt("id", site_id).put_opt("name", site_name),
            )
            .put_if("context", Obj::from_map(context))
            .put_if("extra", Obj::from_map(extra))
            .build()
    }
}

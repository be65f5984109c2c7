//! Raygun crash-report shape.

use crate::config::FormatterConfig;
use crate::enrich::UserAgentInfo;
use crate::formatters::{
    origin_method, sanitize_token, user_state, Obj, RecordFormatter, UserState, MESSAGE_MAX,
    REFERRER_MAX, URL_MAX, USERNAME_MAX,
};
use crate::record::{truncate, LogRecord};
use serde_json::Value;
use std::sync::Arc;

pub struct RaygunFormatter {
    product: String,
    version: String,
    hostname: String,
    site_url: String,
    device: Option<Arc<dyn UserAgentInfo>>,
}

impl RaygunFormatter {
    pub fn new(config: &FormatterConfig) -> Self {
        RaygunFormatter {
            product: config.product.clone(),
            version: config.version.clone(),
            hostname: config.hostname.clone(),
            site_url: config.site_url.clone(),
            device: None,
        }
    }

    pub fn with_device(mut self, device: Arc<dyn UserAgentInfo>) -> Self {
        self.device = Some(device);
        self
    }

    fn error_class(&self, record: &LogRecord) -> String {
        let component = record
            .context_str("component")
            .map(sanitize_token)
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());
        format!(
            "{} {} {}",
            component,
            record.level.emoji(),
            record.level.incident_label()
        )
    }

    fn environment_block(&self, record: &LogRecord) -> Obj {
        let info = self
            .device
            .as_ref()
            .zip(record.extra_str("ua"))
            .and_then(|(device, ua)| device.classify(ua));
        match info {
            Some(info) => Obj::new()
                .put_opt("osVersion", match (info.os_name, info.os_version) {
                    (Some(name), Some(version)) => Some(format!("{} {}", name, version)),
                    (Some(name), None) => Some(name),
                    _ => None,
                })
                .put_opt("browserName", info.client_name)
                .put_opt("browserVersion", info.client_version)
                .put_opt("platform", info.brand)
                .put_opt("deviceName", info.model),
            None => Obj::new(),
        }
    }

    /// Tri-state user block: anonymous, pseudonymized (no identifier
    /// leaked), or resolved.
    fn user_block(&self, record: &LogRecord) -> Obj {
        match user_state(record) {
            UserState::Anonymous => Obj::new()
                .put("isAnonymous", true)
                .put("fullName", "Anonymous user"),
            UserState::Pseudonymized => Obj::new()
                .put("isAnonymous", false)
                .put("fullName", "Pseudonymized user"),
            UserState::Resolved { id, name } => Obj::new()
                .put("isAnonymous", false)
                .put_opt("identifier", id)
                .put_opt("fullName", name.map(|n| truncate(&n, USERNAME_MAX))),
            UserState::Absent => Obj::new(),
        }
    }
}

impl RecordFormatter for RaygunFormatter {
    fn format(&self, record: &LogRecord) -> Value {
        let error = Obj::new()
            .put("className", self.error_class(record))
            .put("message", truncate(&record.message, MESSAGE_MAX))
            .put(
                "stackTrace",
                Value::Array(vec![Obj::new()
                    .put("fileName", record.extra_str("file").unwrap_or("unknown"))
                    .put("lineNumber", record.extra_u64("line").unwrap_or(0))
                    .put("methodName", origin_method(record))
                    .build()]),
            )
            .build();

        let details = Obj::new()
            .put("machineName", self.hostname.as_str())
            .put(
                "version",
                record.context_str("version").unwrap_or(&self.version),
            )
            .put(
                "client",
                Obj::new()
                    .put("name", self.product.as_str())
                    .put("version", self.version.as_str())
                    .put("clientUrl", self.site_url.as_str())
                    .build(),
            )
            .put("error", error)
            .put(
                "tags",
                Value::Array(vec![
                    Value::from(record.channel_label()),
                    Value::from(record.level.bucket().as_str()),
                ]),
            )
            .put_if("environment", self.environment_block(record))
            .put_if(
                "request",
                Obj::new()
                    .put_opt("hostName", record.extra_str("server"))
                    .put_opt(
                        "url",
                        record.extra_str("url").map(|u| truncate(u, URL_MAX)),
                    )
                    .put_opt("httpMethod", record.http_method())
                    .put_opt("ipAddress", record.client_ip())
                    .put_if(
                        "headers",
                        Obj::new()
                            .put_opt(
                                "Referer",
                                record
                                    .extra_str("referrer")
                                    .map(|r| truncate(r, REFERRER_MAX)),
                            )
                            .put_opt("User-Agent", record.extra_str("ua")),
                    ),
            )
            .put_if("user", self.user_block(record));

        Obj::new()
            .put(
                "occurredOn",
                record
                    .timestamp
                    .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            )
            .put("details", details.build())
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;

    fn formatter() -> RaygunFormatter {
        RaygunFormatter::new(&FormatterConfig::default())
    }

    #[test]
    fn test_details_block() {
        let record = LogRecord::new(Level::Critical, "plugin", "white screen")
            .with_context("component", "Jetpack")
            .with_extra("file", "class.jetpack.php")
            .with_extra("line", 210u64)
            .with_extra("class", "Jetpack")
            .with_extra("function", "init");
        let out = formatter().format(&record);
        let details = &out["details"];
        assert_eq!(details["error"]["className"], "Jetpack 🔥 Error");
        assert_eq!(
            details["error"]["stackTrace"][0]["methodName"],
            "Jetpack::init"
        );
        assert_eq!(details["tags"][0], "Plugin");
        assert_eq!(details["tags"][1], "error");
        assert_eq!(details["client"]["name"], "logwire");
    }

    #[test]
    fn test_pseudonymized_user_not_leaked() {
        let record = LogRecord::new(Level::Error, "core", "m")
            .with_extra("userid", "{abcd1234}")
            .with_extra("username", "{abcd1234}");
        let out = formatter().format(&record);
        let user = &out["details"]["user"];
        assert_eq!(user["isAnonymous"], false);
        assert_eq!(user["fullName"], "Pseudonymized user");
        assert!(user.get("identifier").is_none());
        assert!(!out.to_string().contains("abcd1234"));
    }

    #[test]
    fn test_anonymous_user() {
        let record =
            LogRecord::new(Level::Error, "core", "m").with_extra("username", "anonymous");
        let out = formatter().format(&record);
        let user = &out["details"]["user"];
        assert_eq!(user["isAnonymous"], true);
        assert_eq!(user["fullName"], "Anonymous user");
    }

    #[test]
    fn test_resolved_user() {
        let record = LogRecord::new(Level::Error, "core", "m")
            .with_extra("userid", "12")
            .with_extra("username", "alice");
        let out = formatter().format(&record);
        let user = &out["details"]["user"];
        assert_eq!(user["identifier"], "12");
        assert_eq!(user["fullName"], "alice");
        assert_eq!(user["isAnonymous"], false);
    }

    #[test]
    fn test_user_block_absent_without_fields() {
        let record = LogRecord::new(Level::Error, "core", "m");
        let out = formatter().format(&record);
        assert!(out["details"].get("user").is_none());
        assert!(out["details"].get("request").is_none());
        assert!(out["details"].get("environment").is_none());
    }
}

//! Bugsnag event shape.

use crate::config::{app_id, FormatterConfig};
use crate::enrich::UserAgentInfo;
use crate::formatters::{
    origin_method, sanitize_token, Obj, RecordFormatter, MESSAGE_MAX, REFERRER_MAX, URL_MAX,
    USERNAME_MAX,
};
use crate::record::{opaque, truncate, LogRecord};
use serde_json::Value;
use std::sync::Arc;

pub struct BugsnagFormatter {
    stage: String,
    app_id: String,
    version: String,
    hostname: String,
    device: Option<Arc<dyn UserAgentInfo>>,
}

impl BugsnagFormatter {
    pub fn new(config: &FormatterConfig) -> Self {
        BugsnagFormatter {
            stage: config.stage.clone(),
            app_id: app_id(&config.site_url),
            version: config.version.clone(),
            hostname: config.hostname.clone(),
            device: None,
        }
    }

    /// Attach the user-agent classification capability; without it the
    /// device sub-object is omitted.
    pub fn with_device(mut self, device: Arc<dyn UserAgentInfo>) -> Self {
        self.device = Some(device);
        self
    }

    /// Error class: sanitized component plus the emoji and 4-bucket
    /// incident label ("MyPlugin ⚠ Warning").
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

    fn device_block(&self, record: &LogRecord) -> Obj {
        let info = self
            .device
            .as_ref()
            .zip(record.extra_str("ua"))
            .and_then(|(device, ua)| device.classify(ua));
        match info {
            Some(info) => Obj::new()
                .put_opt("osName", info.os_name)
                .put_opt("osVersion", info.os_version)
                .put_opt("browserName", info.client_name)
                .put_opt("browserVersion", info.client_version)
                .put_opt("manufacturer", info.brand)
                .put_opt("model", info.model),
            None => Obj::new(),
        }
    }

    fn stack_frame(&self, record: &LogRecord) -> Value {
        Obj::new()
            .put("file", record.extra_str("file").unwrap_or("unknown"))
            .put("lineNumber", record.extra_u64("line").unwrap_or(0))
            .put("method", origin_method(record))
            .build()
    }
}

impl RecordFormatter for BugsnagFormatter {
    fn format(&self, record: &LogRecord) -> Value {
        let exception = Obj::new()
            .put("errorClass", self.error_class(record))
            .put("message", truncate(&record.message, MESSAGE_MAX))
            .put("stacktrace", Value::Array(vec![self.stack_frame(record)]))
            .build();

        Obj::new()
            .put("payloadVersion", "5")
            .put("severity", record.level.bucket().as_str())
            .put("unhandled", record.level >= crate::level::Level::Error)
            .put("context", record.channel_label())
            .put(
                "app",
                Obj::new()
                    .put("releaseStage", self.stage.as_str())
                    .put("id", self.app_id.as_str())
                    .put(
                        "version",
                        record.context_str("version").unwrap_or(&self.version),
                    )
                    .put("host", self.hostname.as_str())
                    .build(),
            )
            .put("exceptions", Value::Array(vec![exception]))
            .put_if("device", self.device_block(record))
            .put_if(
                "request",
                Obj::new()
                    .put_opt("httpMethod", record.http_method())
                    .put_opt(
                        "url",
                        record.extra_str("url").map(|u| truncate(u, URL_MAX)),
                    )
                    .put_opt(
                        "referer",
                        record
                            .extra_str("referrer")
                            .map(|r| truncate(r, REFERRER_MAX)),
                    )
                    .put_opt("clientIp", record.client_ip()),
            )
            .put_if(
                "user",
                Obj::new()
                    .put_opt("id", record.extra_str("userid").map(opaque))
                    .put_opt(
                        "name",
                        record
                            .extra_str("username")
                            .map(|u| truncate(opaque(u), USERNAME_MAX)),
                    ),
            )
            .put_if(
                "metaData",
                Obj::new()
                    .put_opt("component", record.context_str("component"))
                    .put_opt("version", record.context_str("version"))
                    .put_opt("code", record.code())
                    .put_opt("traceID", record.context_str("traceID")),
            )
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::DeviceInfo;
    use crate::level::Level;

    struct FakeDevice;

    impl UserAgentInfo for FakeDevice {
        fn classify(&self, _ua: &str) -> Option<DeviceInfo> {
            Some(DeviceInfo {
                is_desktop: true,
                client_name: Some("Firefox".to_string()),
                client_version: Some("128".to_string()),
                os_name: Some("Linux".to_string()),
                ..DeviceInfo::default()
            })
        }
    }

    fn formatter() -> BugsnagFormatter {
        let config = FormatterConfig {
            site_url: "https://example.com/blog".to_string(),
            ..FormatterConfig::default()
        };
        BugsnagFormatter::new(&config)
    }

    #[test]
    fn test_message_truncated_to_cap() {
        let long = "x".repeat(5000);
        let record = LogRecord::new(Level::Error, "plugin", &long);
        let out = formatter().format(&record);
        let message = out["exceptions"][0]["message"].as_str().unwrap();
        assert_eq!(message.chars().count(), 1000);

        let exact = "y".repeat(1000);
        let record = LogRecord::new(Level::Error, "plugin", &exact);
        let out = formatter().format(&record);
        assert_eq!(out["exceptions"][0]["message"], exact);
    }

    #[test]
    fn test_error_class_and_app_block() {
        let record = LogRecord::new(Level::Warning, "plugin", "m")
            .with_context("component", "My<Plugin>")
            .with_context("version", "2.1.0");
        let out = formatter().format(&record);
        assert_eq!(out["exceptions"][0]["errorClass"], "MyPlugin ⚠ Warning");
        assert_eq!(out["app"]["id"], "example.com_blog");
        assert_eq!(out["app"]["version"], "2.1.0");
        assert_eq!(out["severity"], "warning");
        assert_eq!(out["unhandled"], false);
    }

    #[test]
    fn test_synthetic_stack_frame_defaults() {
        let record = LogRecord::new(Level::Error, "php", "m");
        let out = formatter().format(&record);
        let frame = &out["exceptions"][0]["stacktrace"][0];
        assert_eq!(frame["file"], "unknown");
        assert_eq!(frame["lineNumber"], 0);
        assert_eq!(frame["method"], "unknown");
    }

    #[test]
    fn test_device_block_requires_capability() {
        let record =
            LogRecord::new(Level::Error, "core", "m").with_extra("ua", "Mozilla/5.0 (X11)");
        let out = formatter().format(&record);
        assert!(out.get("device").is_none());

        let out = formatter()
            .with_device(Arc::new(FakeDevice))
            .format(&record);
        assert_eq!(out["device"]["browserName"], "Firefox");
        assert_eq!(out["device"]["osName"], "Linux");
    }

    #[test]
    fn test_empty_sub_objects_never_emitted() {
        let record = LogRecord::new(Level::Info, "core", "m");
        let out = formatter().format(&record);
        assert!(out.get("request").is_none());
        assert!(out.get("user").is_none());
        assert!(out.get("metaData").is_none());
    }

    #[test]
    fn test_batch_serializes_sequence() {
        let records = vec![
            LogRecord::new(Level::Info, "core", "a"),
            LogRecord::new(Level::Info, "core", "b"),
        ];
        let out = formatter().format_batch(&records);
        let events = out.as_array().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["exceptions"][0]["message"], "a");
        assert_eq!(events[1]["exceptions"][0]["message"], "b");
    }
}

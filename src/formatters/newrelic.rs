//! New Relic Logs shape: flat objects with dotted key names.

use crate::config::FormatterConfig;
use crate::formatters::{
    json_lines, Obj, RecordFormatter, REFERRER_MAX, URL_MAX, USERNAME_MAX,
};
use crate::record::{opaque, truncate, LogRecord};
use serde_json::Value;

pub struct NewRelicFormatter {
    product: String,
    version: String,
    stage: String,
    hostname: String,
}

impl NewRelicFormatter {
    pub fn new(config: &FormatterConfig) -> Self {
        NewRelicFormatter {
            product: config.product.clone(),
            version: config.version.clone(),
            stage: config.stage.clone(),
            hostname: config.hostname.clone(),
        }
    }
}

impl RecordFormatter for NewRelicFormatter {
    fn format(&self, record: &LogRecord) -> Value {
        Obj::new()
            .put("timestamp", record.timestamp.timestamp_millis())
            .put("message", record.message.as_str())
            .put("log.level", record.level.name())
            .put("logtype", record.channel_label())
            .put("service.name", self.product.as_str())
            .put("service.version", self.version.as_str())
            .put("hostname", self.hostname.as_str())
            .put("Environment.stage", self.stage.as_str())
            .put_opt("trace.id", record.context_str("traceID"))
            .put_opt("Component.class", record.context_str("class"))
            .put_opt("Component.name", record.context_str("component"))
            .put_opt("Component.version", record.context_str("version"))
            .put_opt("Error.code", record.code())
            .put_opt("Request.verb", record.http_method())
            .put_opt(
                "Request.url",
                record.extra_str("url").map(|u| truncate(u, URL_MAX)),
            )
            .put_opt(
                "Request.referer",
                record
                    .extra_str("referrer")
                    .map(|r| truncate(r, REFERRER_MAX)),
            )
            .put_opt("Request.ip", record.client_ip())
            .put_opt("User.id", record.extra_str("userid").map(opaque))
            .put_opt(
                "User.name",
                record
                    .extra_str("username")
                    .map(|u| truncate(opaque(u), USERNAME_MAX)),
            )
            .put_opt("User.session", record.extra_str("usersession").map(opaque))
            .put_opt("Origin.file", record.extra_str("file"))
            .put_opt("Origin.line", record.extra_u64("line"))
            .put_opt("Origin.function", record.extra_str("function"))
            .put_opt("Origin.class", record.extra_str("class"))
            .build()
    }

    fn format_batch(&self, records: &[LogRecord]) -> Value {
        json_lines(self, records)
    }
}

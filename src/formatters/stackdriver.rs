//! Google Cloud Logging (Stackdriver) shape: `[tag, unixtime, entry]`
//! triples with `logging.googleapis.com/*` structured keys.

use crate::config::FormatterConfig;
use crate::formatters::{json_lines, Obj, RecordFormatter, REFERRER_MAX, URL_MAX};
use crate::record::{truncate, LogRecord};
use serde_json::Value;

pub struct StackdriverFormatter {
    tag: String,
    product: String,
    version: String,
}

impl StackdriverFormatter {
    pub fn new(config: &FormatterConfig) -> Self {
        StackdriverFormatter {
            tag: config.job.clone(),
            product: config.product.clone(),
            version: config.version.clone(),
        }
    }
}

impl RecordFormatter for StackdriverFormatter {
    fn format(&self, record: &LogRecord) -> Value {
        // The labels block is unconditional; the request block is
        // assembled only from present and valid fields.
        let labels = Obj::new()
            .put("logger", self.product.as_str())
            .put("version", self.version.as_str())
            .put("channel", record.channel_label())
            .put_opt("class", record.context_str("class"))
            .put_opt("component", record.context_str("component"));

        let entry = Obj::new()
            .put("message", record.message.as_str())
            .put("severity", record.level.name().to_uppercase())
            .put("timestamp", record.timestamp.to_rfc3339())
            .put_if(
                "httpRequest",
                Obj::new()
                    .put_opt("remoteIp", record.client_ip())
                    .put_opt(
                        "requestUrl",
                        record.extra_str("url").map(|u| truncate(u, URL_MAX)),
                    )
                    .put_opt("requestMethod", record.http_method())
                    .put_opt(
                        "referer",
                        record
                            .extra_str("referrer")
                            .map(|r| truncate(r, REFERRER_MAX)),
                    )
                    .put_opt("userAgent", record.extra_str("ua"))
                    .put_opt("status", record.extra_u64("status")),
            )
            .put("logging.googleapis.com/labels", labels.build())
            .put_if(
                "logging.googleapis.com/sourceLocation",
                Obj::new()
                    .put_opt("file", record.extra_str("file"))
                    .put_opt("line", record.extra_u64("line"))
                    .put_opt("function", record.extra_str("function")),
            )
            .put_opt(
                "logging.googleapis.com/trace",
                record.context_str("traceID"),
            )
            .build();

        Value::Array(vec![
            Value::from(self.tag.as_str()),
            Value::from(record.timestamp.timestamp()),
            entry,
        ])
    }

    fn format_batch(&self, records: &[LogRecord]) -> Value {
        json_lines(self, records)
    }
}

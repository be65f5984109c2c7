//! Fluentd forward shape: `[tag, unixtime, payload]` triples.

use crate::config::FormatterConfig;
use crate::formatters::{json_lines, sanitized_extra, Obj, RecordFormatter};
use crate::record::LogRecord;
use serde_json::Value;

pub struct FluentdFormatter {
    tag: String,
}

impl FluentdFormatter {
    pub fn new(config: &FormatterConfig) -> Self {
        FluentdFormatter {
            tag: config.job.clone(),
        }
    }
}

impl RecordFormatter for FluentdFormatter {
    fn format(&self, record: &LogRecord) -> Value {
        let payload = Obj::new()
            .put("message", record.message.as_str())
            .put("level", record.level.name())
            .put("channel", record.channel_label())
            .put("timestamp", record.timestamp.to_rfc3339())
            .put_if("context", Obj::from_map(record.context.clone()))
            .put_if("extra", Obj::from_map(sanitized_extra(record)))
            .build();

        Value::Array(vec![
            Value::from(self.tag.as_str()),
            Value::from(record.timestamp.timestamp()),
            payload,
        ])
    }

    fn format_batch(&self, records: &[LogRecord]) -> Value {
        json_lines(self, records)
    }
}

//! Datadog log-intake shape: one JSON object per record, batches as
//! newline-delimited lines.

use crate::config::FormatterConfig;
use crate::formatters::{json_lines, sanitized_extra, Obj, RecordFormatter, SEVERITY_MARK};
use crate::record::LogRecord;
use serde_json::Value;

pub struct DatadogFormatter {
    service: String,
    source: String,
    hostname: String,
    version: String,
}

impl DatadogFormatter {
    pub fn new(config: &FormatterConfig) -> Self {
        DatadogFormatter {
            service: config.product.clone(),
            source: config.product.to_lowercase(),
            hostname: config.hostname.clone(),
            version: config.version.clone(),
        }
    }

    /// Message with the emoji + severity label prefix and the error
    /// code spliced in: at the pilcrow when the message carries one,
    /// otherwise between the label and the message.
    fn message(&self, record: &LogRecord) -> String {
        let prefix = format!("{} {}", record.level.emoji(), record.level.name());
        let code_tag = record.code().map(|c| format!("[{}]", c));

        if record.message.contains(SEVERITY_MARK) {
            let spliced = match code_tag {
                Some(tag) => record.message.replace(SEVERITY_MARK, &tag),
                // No code: drop the mark and the one space it would
                // leave doubled, touching nothing else in the message.
                None => record
                    .message
                    .replace(&format!(" {} ", SEVERITY_MARK), " ")
                    .replace(&format!("{} ", SEVERITY_MARK), "")
                    .replace(&format!(" {}", SEVERITY_MARK), "")
                    .replace(SEVERITY_MARK, ""),
            };
            format!("{} {}", prefix, spliced)
        } else {
            match code_tag {
                Some(tag) => format!("{} {} {}", prefix, tag, record.message),
                None => format!("{} {}", prefix, record.message),
            }
        }
    }
}

impl RecordFormatter for DatadogFormatter {
    fn format(&self, record: &LogRecord) -> Value {
        let mut context = record.context.clone();
        // Internal-only routing field, must never reach the intake.
        context.remove("phase");
        let trace_id = context
            .remove("traceID")
            .and_then(|v| v.as_str().map(str::to_string));

        Obj::new()
            .put("timestamp", record.timestamp.timestamp_millis())
            .put("message", self.message(record))
            .put("status", record.level.bucket().as_str())
            .put("service", self.service.as_str())
            .put("hostname", self.hostname.as_str())
            .put("ddsource", self.source.as_str())
            .put(
                "ddtags",
                format!(
                    "version:{},channel:{}",
                    self.version,
                    record.channel_label().to_lowercase()
                ),
            )
            .put_opt("dd.trace_id", trace_id)
            .put_if("context", Obj::from_map(context))
            .put_if("extra", Obj::from_map(sanitized_extra(record)))
            .build()
    }

    fn format_batch(&self, records: &[LogRecord]) -> Value {
        json_lines(self, records)
    }
}

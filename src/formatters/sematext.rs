//! Sematext Logsene shape: flat documents (no ECS nesting), sharing
//! the promote-and-remove rule for `traceID` and `usersession`.

use crate::config::FormatterConfig;
use crate::formatters::elastic::take_str;
use crate::formatters::{sanitized_extra, Obj, RecordFormatter};
use crate::record::LogRecord;
use serde_json::Value;

pub struct SematextFormatter {
    index: String,
}

impl SematextFormatter {
    pub fn new(config: &FormatterConfig) -> Self {
        SematextFormatter {
            index: config.index.clone(),
        }
    }
}

impl RecordFormatter for SematextFormatter {
    fn format(&self, record: &LogRecord) -> Value {
        let mut context = record.context.clone();
        let mut extra = sanitized_extra(record);

        let trace_id = take_str(&mut context, "traceID");
        let session = take_str(&mut extra, "usersession");

        let mut doc = Obj::new()
            .put("_index", self.index.as_str())
            .put("_type", "_doc")
            .put(
                "@timestamp",
                record
                    .timestamp
                    .to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
            )
            .put("severity", record.level.name())
            .put("channel", record.channel_label())
            .put("message", record.message.as_str())
            .put_opt("traceID", trace_id)
            .put_opt("usersession", session);

        // Residual fields ride flat on the document; on a key collision
        // the extra value wins (insertion order is context then extra).
        for (key, value) in context.into_iter().chain(extra) {
            doc = doc.put(&key, value);
        }
        doc.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;

    fn formatter() -> SematextFormatter {
        SematextFormatter::new(&FormatterConfig::default())
    }

    #[test]
    fn test_promote_and_remove() {
        let record = LogRecord::new(Level::Alert, "php", "fatal")
            .with_context("traceID", "abc")
            .with_extra("usersession", "s-1")
            .with_extra("file", "index.php");
        let out = formatter().format(&record);
        assert_eq!(out["traceID"], "abc");
        assert_eq!(out["usersession"], "s-1");
        assert_eq!(out["severity"], "Alert");
        assert_eq!(out["channel"], "PHP");
        // Residuals flat, promoted fields not duplicated anywhere.
        assert_eq!(out["file"], "index.php");
        assert!(out.get("context").is_none());
        assert!(out.get("extra").is_none());
    }

    #[test]
    fn test_routing_from_construction() {
        let config = FormatterConfig {
            index: "wp-prod".to_string(),
            ..FormatterConfig::default()
        };
        let out = SematextFormatter::new(&config).format(&LogRecord::new(
            Level::Info,
            "core",
            "m",
        ));
        assert_eq!(out["_index"], "wp-prod");
        assert_eq!(out["_type"], "_doc");
    }
}

//! Plain-text diagnostic formatters: the WordPress debug-log line and
//! the minimal newline-terminated rendering.

use crate::formatters::{RecordFormatter, SEVERITY_MARK};
use crate::record::LogRecord;
use serde_json::Value;

/// Compact single-line `key:value` rendering for the WordPress debug
/// log.
pub struct WordpressFormatter;

impl WordpressFormatter {
    pub fn new() -> Self {
        WordpressFormatter
    }

    fn line(&self, record: &LogRecord) -> String {
        let mut line = format!(
            "{} [{}] {}",
            record.level.name().to_uppercase(),
            record.channel_label(),
            record.message
        );
        for key in ["class", "component", "version", "code", "traceID"] {
            if let Some(value) = record.context.get(key) {
                line.push_str(&format!(" {}:{}", key, render_scalar(value)));
            }
        }
        if let Some(file) = record.extra_str("file") {
            line.push_str(&format!(
                " at:{}:{}",
                file,
                record.extra_u64("line").unwrap_or(0)
            ));
        }
        line
    }
}

impl Default for WordpressFormatter {
    fn default() -> Self {
        WordpressFormatter::new()
    }
}

impl RecordFormatter for WordpressFormatter {
    fn format(&self, record: &LogRecord) -> Value {
        Value::String(self.line(record))
    }

    fn format_batch(&self, records: &[LogRecord]) -> Value {
        let lines: Vec<String> = records.iter().map(|r| self.line(r)).collect();
        Value::String(lines.join("\n"))
    }
}

/// Bare message rendering: the severity label is spliced at the
/// pilcrow when the message carries one, otherwise prefixed. Each
/// record ends with a newline so batches concatenate directly.
pub struct NewlineFormatter;

impl NewlineFormatter {
    pub fn new() -> Self {
        NewlineFormatter
    }

    fn line(&self, record: &LogRecord) -> String {
        let name = record.level.name();
        if record.message.contains(SEVERITY_MARK) {
            format!("{}\n", record.message.replace(SEVERITY_MARK, name))
        } else {
            format!("{}: {}\n", name, record.message)
        }
    }
}

impl Default for NewlineFormatter {
    fn default() -> Self {
        NewlineFormatter::new()
    }
}

impl RecordFormatter for NewlineFormatter {
    fn format(&self, record: &LogRecord) -> Value {
        Value::String(self.line(record))
    }

    fn format_batch(&self, records: &[LogRecord]) -> Value {
        let text: String = records.iter().map(|r| self.line(r)).collect();
        Value::String(text)
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;

    #[test]
    fn test_wordpress_line() {
        let record = LogRecord::new(Level::Warning, "plugin", "deprecated call")
            .with_context("component", "Jetpack")
            .with_context("code", 8192)
            .with_extra("file", "functions.php")
            .with_extra("line", 12u64);
        let out = WordpressFormatter::new().format(&record);
        assert_eq!(
            out,
            Value::String(
                "WARNING [Plugin] deprecated call component:Jetpack code:8192 at:functions.php:12"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_wordpress_unknown_channel() {
        let record = LogRecord::new(Level::Info, "mystery", "m");
        let out = WordpressFormatter::new().format(&record);
        assert!(out.as_str().unwrap().contains("[UNKNOWN]"));
    }

    #[test]
    fn test_newline_pilcrow_splice() {
        let record = LogRecord::new(Level::Critical, "php", "PHP ¶ raised in request");
        let out = NewlineFormatter::new().format(&record);
        assert_eq!(out, Value::String("PHP Critical raised in request\n".to_string()));
    }

    #[test]
    fn test_newline_prefix_without_pilcrow() {
        let record = LogRecord::new(Level::Debug, "core", "cache warmed");
        let out = NewlineFormatter::new().format(&record);
        assert_eq!(out, Value::String("Debug: cache warmed\n".to_string()));
    }

    #[test]
    fn test_newline_batch_concatenation() {
        let records = vec![
            LogRecord::new(Level::Info, "core", "a"),
            LogRecord::new(Level::Info, "core", "b"),
        ];
        let out = NewlineFormatter::new().format_batch(&records);
        assert_eq!(out, Value::String("Info: a\nInfo: b\n".to_string()));
    }
}

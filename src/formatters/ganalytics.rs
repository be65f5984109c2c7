//! Google Analytics exception-hit shape: a flat map of string
//! parameters.

use crate::config::FormatterConfig;
use crate::formatters::{sanitize_token, Obj, RecordFormatter, URL_MAX};
use crate::record::{truncate, LogRecord};
use serde_json::Value;

pub struct GoogleAnalyticsFormatter {
    product: String,
    version: String,
}

impl GoogleAnalyticsFormatter {
    pub fn new(config: &FormatterConfig) -> Self {
        GoogleAnalyticsFormatter {
            product: config.product.clone(),
            version: config.version.clone(),
        }
    }

    /// Exception description: sanitized class + resolved level name.
    /// Class defaults to the empty string when `context.class` is
    /// absent.
    fn exception_description(&self, record: &LogRecord) -> String {
        let class = record
            .context_str("class")
            .map(sanitize_token)
            .unwrap_or_default();
        if class.is_empty() {
            record.level.name().to_string()
        } else {
            format!("{} {}", class, record.level.name())
        }
    }
}

impl RecordFormatter for GoogleAnalyticsFormatter {
    fn format(&self, record: &LogRecord) -> Value {
        let fatal = record
            .context_str("class")
            .map(|c| c.eq_ignore_ascii_case("php"))
            .unwrap_or(false);

        Obj::new()
            .put("t", "exception")
            .put("cid", record.extra_str("usersession").unwrap_or("0"))
            .put("an", self.product.as_str())
            .put(
                "av",
                record.context_str("version").unwrap_or(&self.version),
            )
            .put_opt(
                "dl",
                record.extra_str("url").map(|u| truncate(u, URL_MAX)),
            )
            .put("cd", record.channel_label())
            .put("exd", self.exception_description(record))
            .put("exf", if fatal { "1" } else { "0" })
            .put_opt("uip", record.client_ip())
            .put_opt("ua", record.extra_str("ua"))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;

    fn formatter() -> GoogleAnalyticsFormatter {
        GoogleAnalyticsFormatter::new(&FormatterConfig::default())
    }

    #[test]
    fn test_exception_description() {
        let record =
            LogRecord::new(Level::Error, "php", "m").with_context("class", "php");
        let out = formatter().format(&record);
        assert_eq!(out["exd"], "php Error");
        assert_eq!(out["exf"], "1");
    }

    #[test]
    fn test_class_defaults_to_empty() {
        // No context.class: exd is just the level name, never fatal.
        let record = LogRecord::new(Level::Warning, "plugin", "m");
        let out = formatter().format(&record);
        assert_eq!(out["exd"], "Warning");
        assert_eq!(out["exf"], "0");
    }

    #[test]
    fn test_hit_fields() {
        let record = LogRecord::new(Level::Error, "plugin", "m")
            .with_extra("usersession", "s-77")
            .with_extra("url", "https://example.com/cart")
            .with_extra("ip", "192.0.2.9")
            .with_extra("ua", "Mozilla/5.0");
        let out = formatter().format(&record);
        assert_eq!(out["t"], "exception");
        assert_eq!(out["cid"], "s-77");
        assert_eq!(out["an"], "logwire");
        assert_eq!(out["dl"], "https://example.com/cart");
        assert_eq!(out["cd"], "Plugin");
        assert_eq!(out["uip"], "192.0.2.9");
        assert_eq!(out["ua"], "Mozilla/5.0");
    }
}

//! Level and channel lookup tables shared by every formatter.
//!
//! These tables are the single source of truth for severity vocabulary:
//! formatters never re-derive names, so the same level renders to the
//! same label across destinations (modulo each destination's own
//! bucket collapse).

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Log severity on the Monolog integer scale.
///
/// The domain is closed: an invalid level cannot be constructed, so
/// formatters never need a defensive lookup. Numeric input from
/// outside the process goes through [`Level::from_monolog_lossy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug,
    Info,
    Notice,
    Warning,
    Error,
    Critical,
    Alert,
    Emergency,
}

/// 3-bucket severity collapse used by several destinations
/// (Datadog `status`, Bugsnag `severity`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl Level {
    /// All levels, ascending severity.
    pub const ALL: [Level; 8] = [
        Level::Debug,
        Level::Info,
        Level::Notice,
        Level::Warning,
        Level::Error,
        Level::Critical,
        Level::Alert,
        Level::Emergency,
    ];

    /// Monolog integer value for this level.
    pub fn as_monolog(self) -> u16 {
        match self {
            Level::Debug => 100,
            Level::Info => 200,
            Level::Notice => 250,
            Level::Warning => 300,
            Level::Error => 400,
            Level::Critical => 500,
            Level::Alert => 550,
            Level::Emergency => 600,
        }
    }

    /// Exact lookup of a Monolog integer.
    pub fn from_monolog(value: u16) -> Option<Level> {
        match value {
            100 => Some(Level::Debug),
            200 => Some(Level::Info),
            250 => Some(Level::Notice),
            300 => Some(Level::Warning),
            400 => Some(Level::Error),
            500 => Some(Level::Critical),
            550 => Some(Level::Alert),
            600 => Some(Level::Emergency),
            _ => None,
        }
    }

    /// Total lookup: off-scale values are bucketed into the nearest
    /// lower level. This is the documented "never throw" fallback for
    /// records arriving from outside the process.
    pub fn from_monolog_lossy(value: u16) -> Level {
        match value {
            0..=199 => Level::Debug,
            200..=249 => Level::Info,
            250..=299 => Level::Notice,
            300..=399 => Level::Warning,
            400..=499 => Level::Error,
            500..=549 => Level::Critical,
            550..=599 => Level::Alert,
            _ => Level::Emergency,
        }
    }

    /// Human label ("Debug" .. "Emergency").
    pub fn name(self) -> &'static str {
        match self {
            Level::Debug => "Debug",
            Level::Info => "Info",
            Level::Notice => "Notice",
            Level::Warning => "Warning",
            Level::Error => "Error",
            Level::Critical => "Critical",
            Level::Alert => "Alert",
            Level::Emergency => "Emergency",
        }
    }

    /// Emoji marker used in rendered messages.
    pub fn emoji(self) -> &'static str {
        match self {
            Level::Debug => "🔹",
            Level::Info => "ℹ",
            Level::Notice => "📌",
            Level::Warning => "⚠",
            Level::Error => "❌",
            Level::Critical => "🔥",
            Level::Alert => "🚨",
            Level::Emergency => "💀",
        }
    }

    /// 3-bucket collapse.
    pub fn bucket(self) -> Severity {
        match self {
            Level::Debug | Level::Info | Level::Notice => Severity::Info,
            Level::Warning => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// 4-bucket class used by the incident trackers (Bugsnag, Raygun)
    /// when composing error class names.
    pub fn incident_label(self) -> &'static str {
        match self {
            Level::Debug => "Debug",
            Level::Info | Level::Notice => "Event",
            Level::Warning => "Warning",
            _ => "Error",
        }
    }

    /// RFC 5424 severity keyword.
    pub fn syslog_name(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "informational",
            Level::Notice => "notice",
            Level::Warning => "warning",
            Level::Error => "error",
            Level::Critical => "critical",
            Level::Alert => "alert",
            Level::Emergency => "emergency",
        }
    }

    /// RFC 5424 numeric severity (0 = emergency .. 7 = debug).
    pub fn syslog_severity(self) -> u8 {
        match self {
            Level::Debug => 7,
            Level::Info => 6,
            Level::Notice => 5,
            Level::Warning => 4,
            Level::Error => 3,
            Level::Critical => 2,
            Level::Alert => 1,
            Level::Emergency => 0,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.as_monolog())
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u16::deserialize(deserializer)?;
        Ok(Level::from_monolog_lossy(value))
    }
}

/// Display name for a channel key; unknown keys fall back to the
/// "UNKNOWN" bucket rather than leaking the raw key.
pub fn channel_label(channel: &str) -> &'static str {
    match channel.to_ascii_lowercase().as_str() {
        "core" => "Core",
        "plugin" => "Plugin",
        "theme" => "Theme",
        "library" => "Library",
        "db" => "Database",
        "php" => "PHP",
        "api" => "API",
        "cron" => "Cron",
        "trace" => "Tracing",
        "prom" => "Metrics",
        "psr3" => "PSR-3",
        _ => "UNKNOWN",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monolog_round_trip() {
        for level in Level::ALL {
            assert_eq!(Level::from_monolog(level.as_monolog()), Some(level));
            assert_eq!(Level::from_monolog_lossy(level.as_monolog()), level);
        }
    }

    #[test]
    fn test_lossy_bucketing() {
        assert_eq!(Level::from_monolog_lossy(0), Level::Debug);
        assert_eq!(Level::from_monolog_lossy(150), Level::Debug);
        assert_eq!(Level::from_monolog_lossy(320), Level::Warning);
        assert_eq!(Level::from_monolog_lossy(599), Level::Alert);
        assert_eq!(Level::from_monolog_lossy(9000), Level::Emergency);
    }

    #[test]
    fn test_bucket_collapse() {
        assert_eq!(Level::Debug.bucket(), Severity::Info);
        assert_eq!(Level::Notice.bucket(), Severity::Info);
        assert_eq!(Level::Warning.bucket(), Severity::Warning);
        assert_eq!(Level::Error.bucket(), Severity::Error);
        assert_eq!(Level::Emergency.bucket(), Severity::Error);
    }

    #[test]
    fn test_incident_labels() {
        assert_eq!(Level::Debug.incident_label(), "Debug");
        assert_eq!(Level::Info.incident_label(), "Event");
        assert_eq!(Level::Notice.incident_label(), "Event");
        assert_eq!(Level::Warning.incident_label(), "Warning");
        assert_eq!(Level::Critical.incident_label(), "Error");
    }

    #[test]
    fn test_channel_fallback() {
        assert_eq!(channel_label("plugin"), "Plugin");
        assert_eq!(channel_label("DB"), "Database");
        assert_eq!(channel_label("no-such-channel"), "UNKNOWN");
        assert_eq!(channel_label(""), "UNKNOWN");
    }

    #[test]
    fn test_syslog_table() {
        assert_eq!(Level::Emergency.syslog_severity(), 0);
        assert_eq!(Level::Debug.syslog_severity(), 7);
        assert_eq!(Level::Info.syslog_name(), "informational");
    }
}

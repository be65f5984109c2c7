// src/lib.rs
pub mod config;
pub mod destination;
pub mod enrich;
pub mod error;
pub mod flatten;
pub mod formatters;
pub mod level;
pub mod record;

pub use config::FormatterConfig;
pub use destination::Destination;
pub use error::FormatError;
pub use level::{channel_label, Level, Severity};
pub use record::LogRecord;

pub use enrich::{DeviceInfo, GeoLookup, UserAgentInfo};
pub use formatters::html::DetailLevel;
pub use formatters::loki::LabelTemplate;
pub use formatters::RecordFormatter;

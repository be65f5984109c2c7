//! Grafana Loki push shape: `{streams:[{stream, values}]}` envelopes.
//!
//! The label set is fixed at construction by a closed template
//! enumeration; the log line is the recursive flattening of the
//! record body (see [`crate::flatten`]).

use crate::config::FormatterConfig;
use crate::error::FormatError;
use crate::flatten::flatten;
use crate::formatters::{sanitized_extra, Obj, RecordFormatter};
use crate::record::LogRecord;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Which record/config fields become stream labels. Closed enumeration;
/// ids 1..=5 match the wire-facing template selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelTemplate {
    /// 1: job + instance + level
    JobInstanceLevel,
    /// 2: 1 + environment
    JobInstanceLevelEnv,
    /// 3: 2 + version
    JobInstanceLevelEnvVersion,
    /// 4: 3 + site
    JobInstanceLevelEnvVersionSite,
    /// 5: job + instance only (the default)
    #[default]
    JobInstance,
}

impl LabelTemplate {
    pub fn from_id(id: u8) -> Result<LabelTemplate, FormatError> {
        match id {
            1 => Ok(LabelTemplate::JobInstanceLevel),
            2 => Ok(LabelTemplate::JobInstanceLevelEnv),
            3 => Ok(LabelTemplate::JobInstanceLevelEnvVersion),
            4 => Ok(LabelTemplate::JobInstanceLevelEnvVersionSite),
            5 => Ok(LabelTemplate::JobInstance),
            other => Err(FormatError::UnknownLabelTemplate(other)),
        }
    }

    pub fn id(self) -> u8 {
        match self {
            LabelTemplate::JobInstanceLevel => 1,
            LabelTemplate::JobInstanceLevelEnv => 2,
            LabelTemplate::JobInstanceLevelEnvVersion => 3,
            LabelTemplate::JobInstanceLevelEnvVersionSite => 4,
            LabelTemplate::JobInstance => 5,
        }
    }

    fn has_level(self) -> bool {
        !matches!(self, LabelTemplate::JobInstance)
    }

    fn has_env(self) -> bool {
        matches!(
            self,
            LabelTemplate::JobInstanceLevelEnv
                | LabelTemplate::JobInstanceLevelEnvVersion
                | LabelTemplate::JobInstanceLevelEnvVersionSite
        )
    }

    fn has_version(self) -> bool {
        matches!(
            self,
            LabelTemplate::JobInstanceLevelEnvVersion
                | LabelTemplate::JobInstanceLevelEnvVersionSite
        )
    }

    fn has_site(self) -> bool {
        matches!(self, LabelTemplate::JobInstanceLevelEnvVersionSite)
    }
}

pub struct LokiFormatter {
    template: LabelTemplate,
    job: String,
    hostname: String,
    env: String,
    version: String,
}

impl LokiFormatter {
    pub fn new(config: &FormatterConfig) -> Self {
        LokiFormatter {
            template: config.label_template,
            job: config.job.clone(),
            hostname: config.hostname.clone(),
            env: config.stage.clone(),
            version: config.version.clone(),
        }
    }

    /// Stream labels for one record, in template order.
    fn labels(&self, record: &LogRecord) -> IndexMap<String, String> {
        let mut labels = IndexMap::new();
        labels.insert("job".to_string(), self.job.clone());
        let instance = record
            .context_str("instance")
            .unwrap_or(&self.hostname)
            .to_string();
        labels.insert("instance".to_string(), instance);
        if self.template.has_level() {
            labels.insert("level".to_string(), record.level.name().to_lowercase());
        }
        if self.template.has_env() {
            labels.insert("env".to_string(), self.env.clone());
        }
        if self.template.has_version() {
            labels.insert("version".to_string(), self.version.clone());
        }
        if self.template.has_site() {
            let site = record.extra_str("siteid").unwrap_or("0").to_string();
            labels.insert("site".to_string(), site);
        }
        labels
    }

    /// The log line: the record body flattened into `key=value` pairs
    /// with `_`-joined nested keys.
    fn log_line(&self, record: &LogRecord) -> String {
        let body = Obj::new()
            .put("message", record.message.as_str())
            .put("level", record.level.name())
            .put("channel", record.channel_label())
            .put_if("context", Obj::from_map(record.context.clone()))
            .put_if("extra", Obj::from_map(sanitized_extra(record)))
            .build();
        flatten(&body, "", "_")
    }

    fn value_pair(&self, record: &LogRecord) -> Value {
        let ns = record.timestamp.timestamp_nanos_opt().unwrap_or_default();
        Value::Array(vec![
            Value::from(ns.to_string()),
            Value::from(self.log_line(record)),
        ])
    }

    fn labels_value(labels: IndexMap<String, String>) -> Value {
        let mut map = Map::new();
        for (k, v) in labels {
            map.insert(k, Value::from(v));
        }
        Value::Object(map)
    }

    fn envelope(streams: Vec<Value>) -> Value {
        Obj::new().put("streams", Value::Array(streams)).build()
    }
}

impl RecordFormatter for LokiFormatter {
    fn format(&self, record: &LogRecord) -> Value {
        let stream = Obj::new()
            .put("stream", Self::labels_value(self.labels(record)))
            .put("values", Value::Array(vec![self.value_pair(record)]))
            .build();
        Self::envelope(vec![stream])
    }

    /// Records with identical label sets share one stream; streams
    /// appear in first-seen order, values in input order.
    fn format_batch(&self, records: &[LogRecord]) -> Value {
        let mut streams: IndexMap<String, (Value, Vec<Value>)> = IndexMap::new();
        for record in records {
            let labels = Self::labels_value(self.labels(record));
            let key = labels.to_string();
            streams
                .entry(key)
                .or_insert_with(|| (labels, Vec::new()))
                .1
                .push(self.value_pair(record));
        }
        let streams = streams
            .into_values()
            .map(|(labels, values)| {
                Obj::new()
                    .put("stream", labels)
                    .put("values", Value::Array(values))
                    .build()
            })
            .collect();
        Self::envelope(streams)
    }
}

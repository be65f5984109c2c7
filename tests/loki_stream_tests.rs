//! Loki envelope behavior through the public API.

use logwire::{flatten::flatten, FormatterConfig, LabelTemplate, Level, LogRecord, RecordFormatter};
use logwire::formatters::loki::LokiFormatter;
use serde_json::json;

fn config(template: LabelTemplate) -> FormatterConfig {
    FormatterConfig {
        job: "myapp".to_string(),
        hostname: "web-1".to_string(),
        label_template: template,
        ..FormatterConfig::default()
    }
}

#[test]
fn test_flatten_scalar_contract() {
    // The documented contract for the line-building flattener.
    let data = json!({"a": {"b": 1, "c": "x"}});
    assert_eq!(flatten(&data, "", "_"), r#"a_b=1 a_c="x""#);
}

#[test]
fn test_template_one_scenario() {
    let formatter = LokiFormatter::new(&config(LabelTemplate::from_id(1).unwrap()));
    let record = LogRecord::new(Level::Error, "plugin", "boom");
    let out = formatter.format(&record);
    assert_eq!(
        out["streams"][0]["stream"],
        json!({"job": "myapp", "instance": "web-1", "level": "error"})
    );
}

#[test]
fn test_instance_label_prefers_record_context() {
    let formatter = LokiFormatter::new(&config(LabelTemplate::JobInstance));
    let record =
        LogRecord::new(Level::Info, "core", "m").with_context("instance", "web-override");
    let out = formatter.format(&record);
    assert_eq!(out["streams"][0]["stream"]["instance"], "web-override");
}

#[test]
fn test_full_template_labels() {
    let formatter = LokiFormatter::new(&config(LabelTemplate::from_id(4).unwrap()));
    let record = LogRecord::new(Level::Warning, "db", "m").with_extra("siteid", "3");
    let out = formatter.format(&record);
    let stream = &out["streams"][0]["stream"];
    assert_eq!(stream["env"], "production");
    assert_eq!(stream["site"], "3");
    assert_eq!(stream["level"], "warning");
    assert!(stream.get("version").is_some());
}

#[test]
fn test_values_are_string_pairs() {
    let formatter = LokiFormatter::new(&config(LabelTemplate::JobInstance));
    let record = LogRecord::new(Level::Info, "core", "hello");
    let out = formatter.format(&record);
    let pair = out["streams"][0]["values"][0].as_array().unwrap();
    assert!(pair[0].is_string());
    assert!(pair[1].is_string());
    assert!(pair[1].as_str().unwrap().contains(r#"message="hello""#));
}

#[test]
fn test_batch_single_stream_when_labels_match() {
    let formatter = LokiFormatter::new(&config(LabelTemplate::JobInstance));
    let records = vec![
        LogRecord::new(Level::Error, "db", "one"),
        LogRecord::new(Level::Info, "db", "two"),
    ];
    // Without the level label the two records share one stream.
    let out = formatter.format_batch(&records);
    let streams = out["streams"].as_array().unwrap();
    assert_eq!(streams.len(), 1);
    assert_eq!(streams[0]["values"].as_array().unwrap().len(), 2);
}

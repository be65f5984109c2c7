//! Message-level shaping rules: severity prefixes, code splicing,
//! truncation caps, synthetic stack frames.

use logwire::{Destination, FormatterConfig, Level, LogRecord, RecordFormatter};

#[test]
fn test_datadog_warning_scenario() {
    // level=300, channel=plugin, code=42 -> emoji + label + spliced code.
    let record =
        LogRecord::new(Level::Warning, "plugin", "Disk usage high").with_context("code", 42);
    let out = Destination::Datadog
        .build(&FormatterConfig::default())
        .format(&record);
    assert_eq!(out["message"], "⚠ Warning [42] Disk usage high");
    assert_eq!(out["status"], "warning");
}

#[test]
fn test_incident_trackers_cap_message_at_1000() {
    let config = FormatterConfig::default();
    for length in [999usize, 1000, 1001, 5000] {
        let message = "m".repeat(length);
        let record = LogRecord::new(Level::Error, "plugin", &message);

        let bugsnag = Destination::Bugsnag.build(&config).format(&record);
        let rendered = bugsnag["exceptions"][0]["message"].as_str().unwrap();
        assert_eq!(rendered.chars().count(), length.min(1000));

        let raygun = Destination::Raygun.build(&config).format(&record);
        let rendered = raygun["details"]["error"]["message"].as_str().unwrap();
        assert_eq!(rendered.chars().count(), length.min(1000));
    }
}

#[test]
fn test_synthetic_frame_method_shapes() {
    let config = FormatterConfig::default();
    let with_class = LogRecord::new(Level::Error, "php", "m")
        .with_extra("class", "WP_Hook")
        .with_extra("function", "apply_filters");
    let out = Destination::Bugsnag.build(&config).format(&with_class);
    assert_eq!(
        out["exceptions"][0]["stacktrace"][0]["method"],
        "WP_Hook::apply_filters"
    );

    let function_only =
        LogRecord::new(Level::Error, "php", "m").with_extra("function", "do_action");
    let out = Destination::Raygun.build(&config).format(&function_only);
    assert_eq!(
        out["details"]["error"]["stackTrace"][0]["methodName"],
        "<do_action>"
    );
}

#[test]
fn test_app_id_derived_from_site_url() {
    let config = FormatterConfig {
        site_url: "https://example.com/site/blog/".to_string(),
        ..FormatterConfig::default()
    };
    let out = Destination::Bugsnag
        .build(&config)
        .format(&LogRecord::new(Level::Info, "core", "m"));
    assert_eq!(out["app"]["id"], "example.com_site_blog");
}

#[test]
fn test_newline_severity_injection() {
    let config = FormatterConfig::default();
    let record = LogRecord::new(Level::Alert, "php", "PHP ¶ while rendering");
    let out = Destination::Newline.build(&config).format(&record);
    assert_eq!(out.as_str().unwrap(), "PHP Alert while rendering\n");
}

#[test]
fn test_ganalytics_fatal_flag_only_for_php_class() {
    let config = FormatterConfig::default();
    let php = LogRecord::new(Level::Error, "php", "m").with_context("class", "PHP");
    let out = Destination::GoogleAnalytics.build(&config).format(&php);
    assert_eq!(out["exf"], "1");

    let plugin = LogRecord::new(Level::Error, "plugin", "m").with_context("class", "plugin");
    let out = Destination::GoogleAnalytics.build(&config).format(&plugin);
    assert_eq!(out["exf"], "0");
}

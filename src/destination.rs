//! Destination selection by name and formatter construction.

use crate::config::FormatterConfig;
use crate::error::FormatError;
use crate::formatters::bugsnag::BugsnagFormatter;
use crate::formatters::datadog::DatadogFormatter;
use crate::formatters::elastic::ElasticFormatter;
use crate::formatters::fluentd::FluentdFormatter;
use crate::formatters::ganalytics::GoogleAnalyticsFormatter;
use crate::formatters::html::HtmlFormatter;
use crate::formatters::loki::LokiFormatter;
use crate::formatters::newrelic::NewRelicFormatter;
use crate::formatters::plain::{NewlineFormatter, WordpressFormatter};
use crate::formatters::raygun::RaygunFormatter;
use crate::formatters::sematext::SematextFormatter;
use crate::formatters::stackdriver::StackdriverFormatter;
use crate::formatters::RecordFormatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    Bugsnag,
    Datadog,
    ElasticCloud,
    Fluentd,
    GoogleAnalytics,
    Html,
    Loki,
    Newline,
    NewRelic,
    Raygun,
    Sematext,
    Stackdriver,
    Wordpress,
}

impl Destination {
    /// All destinations, useful for cross-formatter property checks.
    pub const ALL: [Destination; 13] = [
        Destination::Bugsnag,
        Destination::Datadog,
        Destination::ElasticCloud,
        Destination::Fluentd,
        Destination::GoogleAnalytics,
        Destination::Html,
        Destination::Loki,
        Destination::Newline,
        Destination::NewRelic,
        Destination::Raygun,
        Destination::Sematext,
        Destination::Stackdriver,
        Destination::Wordpress,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Destination::Bugsnag => "bugsnag",
            Destination::Datadog => "datadog",
            Destination::ElasticCloud => "elastic",
            Destination::Fluentd => "fluentd",
            Destination::GoogleAnalytics => "ganalytics",
            Destination::Html => "html",
            Destination::Loki => "loki",
            Destination::Newline => "newline",
            Destination::NewRelic => "newrelic",
            Destination::Raygun => "raygun",
            Destination::Sematext => "sematext",
            Destination::Stackdriver => "stackdriver",
            Destination::Wordpress => "wordpress",
        }
    }

    /// Build the formatter for this destination. Capability-consuming
    /// formatters (Bugsnag, Raygun, HTML) come back without device/geo
    /// enrichment; construct them directly to wire capabilities in.
    pub fn build(self, config: &FormatterConfig) -> Box<dyn RecordFormatter> {
        match self {
            Destination::Bugsnag => Box::new(BugsnagFormatter::new(config)),
            Destination::Datadog => Box::new(DatadogFormatter::new(config)),
            Destination::ElasticCloud => Box::new(ElasticFormatter::new(config)),
            Destination::Fluentd => Box::new(FluentdFormatter::new(config)),
            Destination::GoogleAnalytics => Box::new(GoogleAnalyticsFormatter::new(config)),
            Destination::Html => Box::new(HtmlFormatter::new(config)),
            Destination::Loki => Box::new(LokiFormatter::new(config)),
            Destination::Newline => Box::new(NewlineFormatter::new()),
            Destination::NewRelic => Box::new(NewRelicFormatter::new(config)),
            Destination::Raygun => Box::new(RaygunFormatter::new(config)),
            Destination::Sematext => Box::new(SematextFormatter::new(config)),
            Destination::Stackdriver => Box::new(StackdriverFormatter::new(config)),
            Destination::Wordpress => Box::new(WordpressFormatter::new()),
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Destination {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bugsnag" => Ok(Destination::Bugsnag),
            "datadog" => Ok(Destination::Datadog),
            "elastic" | "elasticcloud" => Ok(Destination::ElasticCloud),
            "fluentd" => Ok(Destination::Fluentd),
            "ganalytics" | "googleanalytics" => Ok(Destination::GoogleAnalytics),
            "html" => Ok(Destination::Html),
            "loki" => Ok(Destination::Loki),
            "newline" => Ok(Destination::Newline),
            "newrelic" => Ok(Destination::NewRelic),
            "raygun" => Ok(Destination::Raygun),
            "sematext" => Ok(Destination::Sematext),
            "stackdriver" => Ok(Destination::Stackdriver),
            "wordpress" => Ok(Destination::Wordpress),
            other => Err(FormatError::UnknownDestination(other.to_string())),
        }
    }
}

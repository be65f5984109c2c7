use crate::formatters::html::DetailLevel;
use crate::formatters::loki::LabelTemplate;

/// Construction-time identity shared by all formatters.
///
/// Formatters copy what they need out of this at construction and
/// never mutate it afterwards, which is what makes instances freely
/// shareable across threads.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Product name injected into service-identity blocks.
    pub product: String,
    /// Product version (overridden per record by `context.version`
    /// where a destination carries an app version).
    pub version: String,
    /// Release stage / environment name ("production", "staging", ...).
    pub stage: String,
    /// Host identity; per-record `context.instance` takes precedence.
    pub hostname: String,
    /// Site URL; the incident trackers derive their app id from it.
    pub site_url: String,
    /// Index routing for the Elastic-family formatters.
    pub index: String,
    /// Job name / tag for Loki, Fluentd and Stackdriver.
    pub job: String,
    /// Loki stream label template.
    pub label_template: LabelTemplate,
    /// Verbosity model for the HTML formatter.
    pub detail: DetailLevel,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        FormatterConfig {
            product: "logwire".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            stage: "production".to_string(),
            hostname: "localhost".to_string(),
            site_url: "https://localhost".to_string(),
            index: "logs".to_string(),
            job: "logwire".to_string(),
            label_template: LabelTemplate::default(),
            detail: DetailLevel::default(),
        }
    }
}

/// App id derived from a site URL: scheme stripped, `/` → `_`.
pub(crate) fn app_id(site_url: &str) -> String {
    let stripped = site_url
        .strip_prefix("https://")
        .or_else(|| site_url.strip_prefix("http://"))
        .unwrap_or(site_url);
    stripped.trim_end_matches('/').replace('/', "_")
}

//! Diagnostic HTML rendering: a `<div>` per record with nested
//! `<details>` sections, each emitted only when its triggering fields
//! are present.

use crate::config::FormatterConfig;
use crate::enrich::{flag_emoji, GeoLookup, UserAgentInfo};
use crate::formatters::{origin_method, user_state, RecordFormatter, UserState};
use crate::record::{is_pseudonymized, LogRecord};
use serde_json::Value;
use std::fmt::Write;
use std::sync::Arc;

/// Verbosity model fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum DetailLevel {
    /// Header and user line only.
    Minimal,
    /// Plus HTTP request and introspection sections.
    #[default]
    Standard,
    /// Plus device and backtrace sections.
    Full,
}

pub struct HtmlFormatter {
    detail: DetailLevel,
    device: Option<Arc<dyn UserAgentInfo>>,
    geo: Option<Arc<dyn GeoLookup>>,
}

impl HtmlFormatter {
    pub fn new(config: &FormatterConfig) -> Self {
        HtmlFormatter {
            detail: config.detail,
            device: None,
            geo: None,
        }
    }

    pub fn with_device(mut self, device: Arc<dyn UserAgentInfo>) -> Self {
        self.device = Some(device);
        self
    }

    pub fn with_geo(mut self, geo: Arc<dyn GeoLookup>) -> Self {
        self.geo = Some(geo);
        self
    }

    fn render(&self, record: &LogRecord) -> String {
        let mut html = String::new();
        let _ = write!(
            html,
            r#"<div class="logwire-event logwire-{}">"#,
            record.level.bucket().as_str()
        );
        let _ = write!(
            html,
            r#"<span class="logwire-head">{} {} · {} · {}</span>"#,
            record.level.emoji(),
            record.level.name(),
            escape(record.channel_label()),
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
        );
        let _ = write!(
            html,
            r#"<span class="logwire-message">{}</span>"#,
            escape(&record.message)
        );
        self.render_user(&mut html, record);
        if self.detail >= DetailLevel::Standard {
            self.render_request(&mut html, record);
            self.render_introspection(&mut html, record);
        }
        if self.detail >= DetailLevel::Full {
            self.render_device(&mut html, record);
            self.render_trace(&mut html, record);
        }
        html.push_str("</div>");
        html
    }

    /// Tri-state identity line: anonymous, pseudonymized, or resolved.
    fn render_user(&self, html: &mut String, record: &LogRecord) {
        let text = match user_state(record) {
            UserState::Anonymous => "Anonymous user".to_string(),
            UserState::Pseudonymized => "Pseudonymized user".to_string(),
            UserState::Resolved { id, name } => match (name, id) {
                (Some(name), Some(id)) => format!("{} (#{})", escape(&name), escape(&id)),
                (Some(name), None) => escape(&name),
                (None, Some(id)) => format!("User #{}", escape(&id)),
                (None, None) => return,
            },
            UserState::Absent => return,
        };
        let _ = write!(html, r#"<span class="logwire-user">{}</span>"#, text);
    }

    fn render_request(&self, html: &mut String, record: &LogRecord) {
        let verb = record.http_method();
        let url = record.extra_str("url");
        let referrer = record.extra_str("referrer");
        let ip = record.extra_str("ip");
        if verb.is_none() && url.is_none() && referrer.is_none() && ip.is_none() {
            return;
        }
        html.push_str("<details><summary>HTTP request</summary>");
        if verb.is_some() || url.is_some() {
            let _ = write!(
                html,
                "<div>{} {}</div>",
                verb.as_deref().unwrap_or("-"),
                escape(url.unwrap_or("-"))
            );
        }
        if let Some(referrer) = referrer {
            let _ = write!(html, "<div>Referrer: {}</div>", escape(referrer));
        }
        if let Some(ip) = ip {
            let _ = write!(html, "<div>From: {}</div>", self.render_ip(ip));
        }
        html.push_str("</details>");
    }

    /// IP line: pseudonymized values render as "obfuscated"; valid
    /// addresses get a country flag prefix when geo lookup is wired.
    fn render_ip(&self, ip: &str) -> String {
        if is_pseudonymized(ip) {
            return "obfuscated".to_string();
        }
        if ip.parse::<std::net::IpAddr>().is_err() {
            return escape(ip);
        }
        let flag = self
            .geo
            .as_ref()
            .and_then(|geo| geo.country(ip))
            .and_then(|country| flag_emoji(&country));
        match flag {
            Some(flag) => format!("{} {}", flag, escape(ip)),
            None => escape(ip),
        }
    }

    fn render_introspection(&self, html: &mut String, record: &LogRecord) {
        let file = record.extra_str("file");
        let function = record.extra_str("function");
        let class = record.extra_str("class");
        if file.is_none() && function.is_none() && class.is_none() {
            return;
        }
        html.push_str("<details><summary>PHP introspection</summary>");
        if let Some(file) = file {
            let _ = write!(
                html,
                "<div>{}:{}</div>",
                escape(file),
                record.extra_u64("line").unwrap_or(0)
            );
        }
        if function.is_some() || class.is_some() {
            let _ = write!(html, "<div>{}</div>", escape(&origin_method(record)));
        }
        html.push_str("</details>");
    }

    fn render_device(&self, html: &mut String, record: &LogRecord) {
        let info = self
            .device
            .as_ref()
            .zip(record.extra_str("ua"))
            .and_then(|(device, ua)| device.classify(ua));
        let Some(info) = info else { return };
        html.push_str("<details><summary>Device</summary>");
        if info.is_bot {
            let _ = write!(
                html,
                "<div>Bot: {}</div>",
                escape(info.bot_name.as_deref().unwrap_or("unknown"))
            );
        } else {
            if let Some(client) = &info.client_name {
                let _ = write!(
                    html,
                    "<div>Client: {} {}</div>",
                    escape(client),
                    escape(info.client_version.as_deref().unwrap_or(""))
                );
            }
            if let Some(os) = &info.os_name {
                let _ = write!(
                    html,
                    "<div>OS: {} {}</div>",
                    escape(os),
                    escape(info.os_version.as_deref().unwrap_or(""))
                );
            }
            let _ = write!(html, "<div>Class: {}</div>", info.class_label());
        }
        html.push_str("</details>");
    }

    fn render_trace(&self, html: &mut String, record: &LogRecord) {
        let Some(trace) = record.extra.get("trace") else {
            return;
        };
        let text = match trace {
            Value::String(s) => s.clone(),
            other => serde_json::to_string_pretty(other).unwrap_or_default(),
        };
        let _ = write!(
            html,
            "<details><summary>Backtrace</summary><pre>{}</pre></details>",
            escape(&text)
        );
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl RecordFormatter for HtmlFormatter {
    fn format(&self, record: &LogRecord) -> Value {
        Value::String(self.render(record))
    }

    fn format_batch(&self, records: &[LogRecord]) -> Value {
        let html: String = records.iter().map(|r| self.render(r)).collect();
        Value::String(html)
    }
}

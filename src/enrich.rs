//! Capability seams for device and geo enrichment.
//!
//! Real classification lives in external collaborators; formatters
//! depend only on these traits. When a capability is absent, every
//! dependent output section is simply omitted.

/// Classification of a raw user-agent string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceInfo {
    pub is_bot: bool,
    pub is_desktop: bool,
    pub is_mobile: bool,
    pub bot_name: Option<String>,
    pub client_name: Option<String>,
    pub client_version: Option<String>,
    pub os_name: Option<String>,
    pub os_version: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
}

impl DeviceInfo {
    /// Coarse device class label for display.
    pub fn class_label(&self) -> &'static str {
        if self.is_bot {
            "bot"
        } else if self.is_mobile {
            "mobile"
        } else if self.is_desktop {
            "desktop"
        } else {
            "other"
        }
    }
}

/// User-agent classification capability.
pub trait UserAgentInfo: Send + Sync {
    /// Classify a raw user-agent string; `None` when the string is
    /// unrecognizable.
    fn classify(&self, user_agent: &str) -> Option<DeviceInfo>;
}

/// IP-to-country capability (ISO 3166-1 alpha-2 codes).
pub trait GeoLookup: Send + Sync {
    fn country(&self, ip: &str) -> Option<String>;
}

/// Regional-indicator flag glyph for an ISO 3166-1 alpha-2 code.
pub fn flag_emoji(country: &str) -> Option<String> {
    let code = country.trim().to_ascii_uppercase();
    if code.len() != 2 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
        return None;
    }
    Some(
        code.chars()
            .map(|c| char::from_u32(0x1F1E6 + (c as u32 - 'A' as u32)).unwrap_or(c))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_emoji() {
        assert_eq!(flag_emoji("fr"), Some("🇫🇷".to_string()));
        assert_eq!(flag_emoji("US"), Some("🇺🇸".to_string()));
        assert_eq!(flag_emoji(""), None);
        assert_eq!(flag_emoji("FRA"), None);
        assert_eq!(flag_emoji("1!"), None);
    }

    #[test]
    fn test_class_label() {
        let bot = DeviceInfo {
            is_bot: true,
            ..DeviceInfo::default()
        };
        assert_eq!(bot.class_label(), "bot");
        assert_eq!(DeviceInfo::default().class_label(), "other");
    }
}

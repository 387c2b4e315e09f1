//! Real-time channel and logging settings.

use serde::{Deserialize, Serialize};

/// Shared multi-tenant push endpoint.
pub const DEFAULT_SHARED_ENDPOINT: &str = "wss://ws-lb.crowdin.com/";

/// Dedicated enterprise push endpoint.
pub const DEFAULT_ENTERPRISE_ENDPOINT: &str = "wss://enterprise.crowdin.com/wsproxy";

/// Application-defined normal-closure status sent when the channel is closed.
/// Fixed by the push service, so it is not configurable.
pub const NORMAL_CLOSURE_STATUS: u16 = 0x3E9;

/// Real-time update channel settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RealtimeSettings {
    /// Whether the channel may be opened at all.
    pub enabled: bool,
    /// Endpoint used when no organization is configured.
    pub shared_endpoint: String,
    /// Endpoint used when an organization is configured.
    pub enterprise_endpoint: String,
}

impl Default for RealtimeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            shared_endpoint: DEFAULT_SHARED_ENDPOINT.to_string(),
            enterprise_endpoint: DEFAULT_ENTERPRISE_ENDPOINT.to_string(),
        }
    }
}

/// Logging settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Minimum level for the stderr subscriber.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_code_is_1001() {
        assert_eq!(NORMAL_CLOSURE_STATUS, 1001);
    }

    #[test]
    fn close_code_cannot_be_configured() {
        let settings: RealtimeSettings =
            serde_json::from_str(r#"{"enabled": false, "closeCode": 1000}"#).unwrap();
        assert!(!settings.enabled);
        let json = serde_json::to_value(&settings).unwrap();
        assert!(json.get("closeCode").is_none());
    }

    #[test]
    fn realtime_json_is_camel_case() {
        let json = serde_json::to_value(RealtimeSettings::default()).unwrap();
        assert_eq!(json["sharedEndpoint"], DEFAULT_SHARED_ENDPOINT);
        assert_eq!(json["enterpriseEndpoint"], DEFAULT_ENTERPRISE_ENDPOINT);
        assert!(json.get("closeCode").is_none());
    }
}

//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and `#[serde(default)]`,
//! so partial JSON files deserialize with production defaults filling the
//! gaps.

mod realtime;

pub use realtime::*;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::{Result, SettingsError};

/// Root settings type.
///
/// ```json
/// {
///   "sourceLanguage": "en",
///   "targetLanguage": "uk",
///   "organization": "acme",
///   "realtime": { "enabled": true }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LivetextSettings {
    /// Language the local resource keys are authored in.
    pub source_language: String,
    /// Language pushed translations are requested for.
    pub target_language: String,
    /// Enterprise organization name. `None` selects the shared endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    /// Real-time update channel settings.
    pub realtime: RealtimeSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl Default for LivetextSettings {
    fn default() -> Self {
        Self {
            source_language: "en".to_string(),
            target_language: "en".to_string(),
            organization: None,
            realtime: RealtimeSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl LivetextSettings {
    /// Reject values no connection could be built from.
    ///
    /// Called automatically during loading.
    pub fn validate(&self) -> Result<()> {
        if self.source_language.trim().is_empty() {
            return Err(SettingsError::InvalidValue(
                "sourceLanguage is empty".into(),
            ));
        }
        if self.target_language.trim().is_empty() {
            return Err(SettingsError::InvalidValue(
                "targetLanguage is empty".into(),
            ));
        }
        validate_ws_url("realtime.sharedEndpoint", &self.realtime.shared_endpoint)?;
        validate_ws_url(
            "realtime.enterpriseEndpoint",
            &self.realtime.enterprise_endpoint,
        )?;
        Ok(())
    }

    /// Organization name, treating blank strings as absent.
    pub fn organization(&self) -> Option<&str> {
        self.organization
            .as_deref()
            .map(str::trim)
            .filter(|o| !o.is_empty())
    }
}

fn validate_ws_url(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value)
        .map_err(|e| SettingsError::InvalidValue(format!("{field}: {e}")))?;
    match url.scheme() {
        "ws" | "wss" => Ok(()),
        other => Err(SettingsError::InvalidValue(format!(
            "{field}: scheme '{other}' is not ws or wss"
        ))),
    }
}

//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`LivetextSettings::default()`]
//! 2. If `~/.livetext/settings.json` exists, deep-merge user values over defaults
//! 3. Apply `LIVETEXT_*` environment variable overrides (highest priority)
//! 4. Validate
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::LivetextSettings;

/// Resolve the path to the settings file (`~/.livetext/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".livetext").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<LivetextSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// A missing file yields defaults; invalid JSON or invalid values are errors.
pub fn load_settings_from_path(path: &Path) -> Result<LivetextSettings> {
    load_with_overrides(path, |name| std::env::var(name).ok())
}

/// Load settings from `path`, reading overrides through `lookup`.
pub fn load_with_overrides(
    path: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<LivetextSettings> {
    let defaults = serde_json::to_value(LivetextSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: LivetextSettings = serde_json::from_value(merged)?;
    apply_overrides(&mut settings, lookup);
    settings.validate()?;
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `LIVETEXT_*` overrides from the process environment.
pub fn apply_env_overrides(settings: &mut LivetextSettings) {
    apply_overrides(settings, |name| std::env::var(name).ok());
}

/// Apply overrides read through `lookup`.
///
/// Empty strings count as unset. Invalid booleans are ignored with a warning.
pub fn apply_overrides(settings: &mut LivetextSettings, lookup: impl Fn(&str) -> Option<String>) {
    let read = |name: &str| lookup(name).filter(|v| !v.is_empty());

    if let Some(v) = read("LIVETEXT_SOURCE_LANGUAGE") {
        settings.source_language = v;
    }
    if let Some(v) = read("LIVETEXT_TARGET_LANGUAGE") {
        settings.target_language = v;
    }
    if let Some(v) = read("LIVETEXT_ORGANIZATION") {
        settings.organization = Some(v);
    }
    if let Some(v) = read("LIVETEXT_REALTIME_ENABLED") {
        match parse_bool(&v) {
            Some(b) => settings.realtime.enabled = b,
            None => {
                tracing::warn!(key = "LIVETEXT_REALTIME_ENABLED", value = %v, "invalid boolean env var, ignoring");
            }
        }
    }
    if let Some(v) = read("LIVETEXT_SHARED_ENDPOINT") {
        settings.realtime.shared_endpoint = v;
    }
    if let Some(v) = read("LIVETEXT_ENTERPRISE_ENDPOINT") {
        settings.realtime.enterprise_endpoint = v;
    }
    if let Some(v) = read("LIVETEXT_LOG_LEVEL") {
        settings.logging.level = v;
    }
}

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::errors::SettingsError;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    // ── deep_merge ──────────────────────────────────────────────────

    #[test]
    fn merge_nested_override() {
        let target = serde_json::json!({"realtime": {"enabled": true, "sharedEndpoint": "ws://a/"}});
        let source = serde_json::json!({"realtime": {"enabled": false}});
        let merged = deep_merge(target, source);
        assert_eq!(merged["realtime"]["enabled"], false);
        assert_eq!(merged["realtime"]["sharedEndpoint"], "ws://a/");
    }

    #[test]
    fn merge_null_preserves_target() {
        let target = serde_json::json!({"a": 1});
        let merged = deep_merge(target, serde_json::json!({"a": null}));
        assert_eq!(merged["a"], 1);
    }

    #[test]
    fn merge_array_replace() {
        let target = serde_json::json!({"items": [1, 2, 3]});
        let merged = deep_merge(target, serde_json::json!({"items": [4]}));
        assert_eq!(merged["items"], serde_json::json!([4]));
    }

    // ── load_with_overrides ─────────────────────────────────────────

    #[test]
    fn load_missing_file_returns_defaults() {
        let settings =
            load_with_overrides(Path::new("/nonexistent/settings.json"), env(&[])).unwrap();
        assert_eq!(settings, LivetextSettings::default());
    }

    #[test]
    fn load_partial_json_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"targetLanguage": "uk", "realtime": {"enabled": false}}"#,
        )
        .unwrap();

        let settings = load_with_overrides(&path, env(&[])).unwrap();
        assert_eq!(settings.target_language, "uk");
        assert!(!settings.realtime.enabled);
        assert_eq!(settings.source_language, "en");
        assert!(settings.organization.is_none());
    }

    #[test]
    fn load_invalid_json_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not valid json").unwrap();

        let result = load_with_overrides(&path, env(&[]));
        assert!(matches!(result, Err(SettingsError::Json(_))));
    }

    #[test]
    fn load_invalid_endpoint_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"realtime": {"sharedEndpoint": "ftp://x"}}"#).unwrap();

        let result = load_with_overrides(&path, env(&[]));
        assert!(matches!(result, Err(SettingsError::InvalidValue(_))));
    }

    #[test]
    fn env_beats_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"organization": "from-file"}"#).unwrap();

        let settings =
            load_with_overrides(&path, env(&[("LIVETEXT_ORGANIZATION", "from-env")])).unwrap();
        assert_eq!(settings.organization.as_deref(), Some("from-env"));
    }

    // ── apply_overrides ─────────────────────────────────────────────

    #[test]
    fn overrides_applied() {
        let mut settings = LivetextSettings::default();
        apply_overrides(
            &mut settings,
            env(&[
                ("LIVETEXT_SOURCE_LANGUAGE", "de"),
                ("LIVETEXT_TARGET_LANGUAGE", "fr"),
                ("LIVETEXT_REALTIME_ENABLED", "off"),
                ("LIVETEXT_SHARED_ENDPOINT", "ws://127.0.0.1:9000/"),
                ("LIVETEXT_LOG_LEVEL", "debug"),
            ]),
        );
        assert_eq!(settings.source_language, "de");
        assert_eq!(settings.target_language, "fr");
        assert!(!settings.realtime.enabled);
        assert_eq!(settings.realtime.shared_endpoint, "ws://127.0.0.1:9000/");
        assert_eq!(settings.logging.level, "debug");
    }

    #[test]
    fn empty_override_ignored() {
        let mut settings = LivetextSettings::default();
        apply_overrides(&mut settings, env(&[("LIVETEXT_SOURCE_LANGUAGE", "")]));
        assert_eq!(settings.source_language, "en");
    }

    #[test]
    fn invalid_bool_override_ignored() {
        let mut settings = LivetextSettings::default();
        apply_overrides(&mut settings, env(&[("LIVETEXT_REALTIME_ENABLED", "maybe")]));
        assert!(settings.realtime.enabled);
    }

    // ── parse_bool ──────────────────────────────────────────────────

    #[test]
    fn parse_bool_variants() {
        for val in &["true", "1", "yes", "on", "TRUE", "Yes"] {
            assert_eq!(parse_bool(val), Some(true), "failed for {val}");
        }
        for val in &["false", "0", "no", "off", "OFF"] {
            assert_eq!(parse_bool(val), Some(false), "failed for {val}");
        }
        assert_eq!(parse_bool("2"), None);
    }
}

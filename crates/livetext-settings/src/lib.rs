//! # livetext-settings
//!
//! Configuration management with layered sources.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`LivetextSettings::default()`]
//! 2. **User file**: `~/.livetext/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `LIVETEXT_*` overrides (highest priority)
//!
//! There is no process-wide settings singleton: the host loads a
//! [`LivetextSettings`] once and hands it to the components that need it.
//!
//! # Usage
//!
//! ```no_run
//! use livetext_settings::load_settings;
//!
//! let settings = load_settings().unwrap_or_default();
//! println!("source language: {}", settings.source_language);
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    apply_env_overrides, apply_overrides, deep_merge, load_settings, load_settings_from_path,
    load_with_overrides, settings_path,
};
pub use types::*;

//! Local key → remote mapping id table.

use std::collections::HashMap;

use livetext_core::{TextTarget, TranslationMetadata};
use serde::{Deserialize, Serialize};

/// Mapping ids for one source language.
///
/// Strings and plurals live in separate namespaces: a plural `items` and a
/// string `items` may map to different ids.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MappingTable {
    /// Source language the table was produced for.
    pub language: String,
    /// String key → mapping id.
    pub strings: HashMap<String, String>,
    /// Plural name → mapping id.
    pub plurals: HashMap<String, String>,
}

impl MappingTable {
    /// Empty table for `language`.
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            ..Self::default()
        }
    }

    /// Builder-style string mapping.
    #[must_use]
    pub fn with_string(mut self, key: impl Into<String>, id: impl Into<String>) -> Self {
        let _ = self.strings.insert(key.into(), id.into());
        self
    }

    /// Builder-style plural mapping.
    #[must_use]
    pub fn with_plural(mut self, name: impl Into<String>, id: impl Into<String>) -> Self {
        let _ = self.plurals.insert(name.into(), id.into());
        self
    }

    /// Mapping id of a string key.
    pub fn string_id(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }

    /// Mapping id of a plural name.
    pub fn plural_id(&self, name: &str) -> Option<&str> {
        self.plurals.get(name).map(String::as_str)
    }

    /// Mapping id of the field `target` of a subject with `metadata`.
    ///
    /// Only the primary text can be a plural; hints always use string ids.
    pub fn id_for(&self, metadata: &TranslationMetadata, target: TextTarget) -> Option<&str> {
        let key = metadata.key_for(target)?;
        match target {
            TextTarget::Text if metadata.is_plural() => self.plural_id(key),
            _ => self.string_id(key),
        }
    }

    /// Every mapping id referenced by `metadata`.
    pub fn ids_for<'a>(
        &'a self,
        metadata: &'a TranslationMetadata,
    ) -> impl Iterator<Item = (TextTarget, &'a str)> + 'a {
        [TextTarget::Text, TextTarget::Hint]
            .into_iter()
            .filter_map(move |target| self.id_for(metadata, target).map(|id| (target, id)))
    }

    /// Whether no keys are mapped.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty() && self.plurals.is_empty()
    }
}

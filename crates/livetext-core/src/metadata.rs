//! Translation metadata attached to subjects.
//!
//! Metadata is immutable once attached. Stores hold it as
//! `Arc<TranslationMetadata>` and replace the whole record on update; the
//! `with_*` builders return a new value instead of mutating.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ids::SubjectId;
use crate::subject::SubjectKind;

/// Wire spelling of [`PluralForm::None`].
pub const PLURAL_NONE: &str = "none";

/// CLDR plural category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluralCategory {
    /// `zero`
    Zero,
    /// `one`
    One,
    /// `two`
    Two,
    /// `few`
    Few,
    /// `many`
    Many,
    /// `other`
    Other,
}

impl PluralCategory {
    /// Lowercase CLDR name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::Two => "two",
            Self::Few => "few",
            Self::Many => "many",
            Self::Other => "other",
        }
    }
}

/// Plural handling for a subject: the `none` sentinel or a category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum PluralForm {
    /// No plural handling.
    #[default]
    None,
    /// Rendered with this plural category.
    Category(PluralCategory),
}

impl PluralForm {
    /// Wire spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => PLURAL_NONE,
            Self::Category(c) => c.as_str(),
        }
    }
}

impl fmt::Display for PluralForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PluralForm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let category = match s {
            PLURAL_NONE => return Ok(Self::None),
            "zero" => PluralCategory::Zero,
            "one" => PluralCategory::One,
            "two" => PluralCategory::Two,
            "few" => PluralCategory::Few,
            "many" => PluralCategory::Many,
            "other" => PluralCategory::Other,
            other => return Err(format!("unknown plural form '{other}'")),
        };
        Ok(Self::Category(category))
    }
}

impl From<PluralForm> for String {
    fn from(form: PluralForm) -> Self {
        form.as_str().to_owned()
    }
}

impl TryFrom<String> for PluralForm {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Which displayed field a key drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextTarget {
    /// Primary text (or toolbar title).
    Text,
    /// Hint (or toolbar subtitle).
    Hint,
}

/// Translation metadata a transformer records for one subject.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslationMetadata {
    /// Resource key driving the primary text (string key or plural name).
    pub text_key: Option<String>,
    /// Resource key driving the hint.
    pub hint_key: Option<String>,
    /// Plural category of the primary text, `none` for plain strings.
    pub plural: PluralForm,
    /// Quantity the plural was rendered for.
    pub plural_quantity: Option<i64>,
    /// Positional arguments substituted into pushed text.
    pub format_args: Vec<String>,
    /// Pushed text currently on screen, if any update has been applied.
    pub applied_text: Option<String>,
}

impl TranslationMetadata {
    /// Metadata for a subject whose primary text comes from `key`.
    pub fn for_text(key: impl Into<String>) -> Self {
        Self {
            text_key: Some(key.into()),
            ..Self::default()
        }
    }

    /// Metadata for a subject whose hint comes from `key`.
    pub fn for_hint(key: impl Into<String>) -> Self {
        Self {
            hint_key: Some(key.into()),
            ..Self::default()
        }
    }

    /// Copy with a hint key.
    #[must_use]
    pub fn with_hint_key(mut self, key: impl Into<String>) -> Self {
        self.hint_key = Some(key.into());
        self
    }

    /// Copy rendered as plural `category` for `quantity`.
    #[must_use]
    pub fn with_plural(mut self, category: PluralCategory, quantity: i64) -> Self {
        self.plural = PluralForm::Category(category);
        self.plural_quantity = Some(quantity);
        self
    }

    /// Copy with format arguments.
    #[must_use]
    pub fn with_format_args(mut self, args: Vec<String>) -> Self {
        self.format_args = args;
        self
    }

    /// Copy recording pushed text as applied.
    #[must_use]
    pub fn with_applied_text(&self, text: impl Into<String>) -> Self {
        Self {
            applied_text: Some(text.into()),
            ..self.clone()
        }
    }

    /// Copy with all pushed text discarded.
    #[must_use]
    pub fn without_applied_text(&self) -> Self {
        Self {
            applied_text: None,
            ..self.clone()
        }
    }

    /// Key recorded for `target`.
    pub fn key_for(&self, target: TextTarget) -> Option<&str> {
        match target {
            TextTarget::Text => self.text_key.as_deref(),
            TextTarget::Hint => self.hint_key.as_deref(),
        }
    }

    /// Whether the primary text is a plural.
    pub fn is_plural(&self) -> bool {
        self.plural != PluralForm::None
    }

    /// Whether pushed content for `form` applies to this subject.
    ///
    /// Plain strings take `none` updates; plurals take only their own category.
    pub fn accepts_plural(&self, form: PluralForm) -> bool {
        self.plural == form
    }
}

/// One row of the visible-metadata export.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleMetadata {
    /// Subject the metadata belongs to.
    pub subject: SubjectId,
    /// Kind of the subject.
    pub kind: SubjectKind,
    /// Currently attached metadata.
    pub metadata: Arc<TranslationMetadata>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plural_form_parse() {
        assert_eq!("none".parse::<PluralForm>(), Ok(PluralForm::None));
        assert_eq!(
            "few".parse::<PluralForm>(),
            Ok(PluralForm::Category(PluralCategory::Few))
        );
        assert!("several".parse::<PluralForm>().is_err());
    }

    #[test]
    fn plural_form_serde_is_plain_string() {
        let json = serde_json::to_string(&PluralForm::Category(PluralCategory::One)).unwrap();
        assert_eq!(json, "\"one\"");
        let back: PluralForm = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(back, PluralForm::None);
    }

    #[test]
    fn default_metadata_has_no_plural() {
        let meta = TranslationMetadata::for_text("app_name");
        assert_eq!(meta.plural, PluralForm::None);
        assert!(!meta.is_plural());
        assert_eq!(meta.key_for(TextTarget::Text), Some("app_name"));
        assert_eq!(meta.key_for(TextTarget::Hint), None);
    }

    #[test]
    fn with_applied_text_leaves_original_untouched() {
        let original = TranslationMetadata::for_text("greeting");
        let updated = original.with_applied_text("Hola");
        assert!(original.applied_text.is_none());
        assert_eq!(updated.applied_text.as_deref(), Some("Hola"));
        assert_eq!(updated.text_key, original.text_key);
        assert!(updated.without_applied_text().applied_text.is_none());
    }

    #[test]
    fn accepts_plural_matches_exactly() {
        let plain = TranslationMetadata::for_text("title");
        assert!(plain.accepts_plural(PluralForm::None));
        assert!(!plain.accepts_plural(PluralForm::Category(PluralCategory::One)));

        let plural = TranslationMetadata::for_text("items").with_plural(PluralCategory::Other, 3);
        assert!(plural.accepts_plural(PluralForm::Category(PluralCategory::Other)));
        assert!(!plural.accepts_plural(PluralForm::Category(PluralCategory::One)));
        assert!(!plural.accepts_plural(PluralForm::None));
    }

    #[test]
    fn metadata_json_is_camel_case() {
        let meta = TranslationMetadata::for_text("k").with_plural(PluralCategory::One, 1);
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["textKey"], "k");
        assert_eq!(json["plural"], "one");
        assert_eq!(json["pluralQuantity"], 1);
    }
}

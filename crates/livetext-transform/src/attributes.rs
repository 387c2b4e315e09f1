//! Creation-time attributes passed by the host with each subject.
//!
//! Attribute values either reference a resource (`@string/key`,
//! `@plurals/name`) or carry literal text.

use indexmap::IndexMap;

use crate::errors::TransformError;

/// Primary text attribute.
pub const ATTR_TEXT: &str = "text";
/// Hint attribute.
pub const ATTR_HINT: &str = "hint";
/// Toolbar title attribute.
pub const ATTR_TITLE: &str = "title";
/// Toolbar subtitle attribute.
pub const ATTR_SUBTITLE: &str = "subtitle";
/// Quantity used to pick a plural form.
pub const ATTR_QUANTITY: &str = "quantity";
/// Comma-separated format arguments.
pub const ATTR_FORMAT_ARGS: &str = "formatArgs";

/// A parsed attribute value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceRef<'a> {
    /// `@string/<key>`
    String(&'a str),
    /// `@plurals/<name>`
    Plural(&'a str),
    /// Anything else, shown as-is.
    Literal(&'a str),
}

impl<'a> ResourceRef<'a> {
    /// Parse an attribute value.
    pub fn parse(value: &'a str) -> Self {
        if let Some(key) = value.strip_prefix("@string/") {
            Self::String(key)
        } else if let Some(name) = value.strip_prefix("@plurals/") {
            Self::Plural(name)
        } else {
            Self::Literal(value)
        }
    }
}

/// Ordered attribute set for one subject.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attributes {
    values: IndexMap<String, String>,
}

impl Attributes {
    /// Empty attribute set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.values.insert(name.into(), value.into());
        self
    }

    /// Insert or replace an attribute.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let _ = self.values.insert(name.into(), value.into());
    }

    /// Raw attribute value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Parsed attribute value.
    pub fn resource(&self, name: &str) -> Option<ResourceRef<'_>> {
        self.get(name).map(ResourceRef::parse)
    }

    /// Plural quantity, if present.
    pub fn quantity(&self) -> Result<Option<i64>, TransformError> {
        self.get(ATTR_QUANTITY)
            .map(|raw| {
                raw.trim()
                    .parse::<i64>()
                    .map_err(|e| TransformError::InvalidAttribute {
                        name: ATTR_QUANTITY.into(),
                        reason: e.to_string(),
                    })
            })
            .transpose()
    }

    /// Format arguments, split on commas. Empty when absent.
    pub fn format_args(&self) -> Vec<String> {
        self.get(ATTR_FORMAT_ARGS)
            .filter(|raw| !raw.is_empty())
            .map(|raw| raw.split(',').map(|a| a.trim().to_owned()).collect())
            .unwrap_or_default()
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parse_references() {
        assert_eq!(ResourceRef::parse("@string/app_name"), ResourceRef::String("app_name"));
        assert_eq!(ResourceRef::parse("@plurals/items"), ResourceRef::Plural("items"));
        assert_eq!(ResourceRef::parse("Hello"), ResourceRef::Literal("Hello"));
    }

    #[test]
    fn builder_and_lookup() {
        let attrs = Attributes::new()
            .with(ATTR_TEXT, "@string/title")
            .with(ATTR_HINT, "Type here");
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.resource(ATTR_TEXT), Some(ResourceRef::String("title")));
        assert_eq!(attrs.resource(ATTR_HINT), Some(ResourceRef::Literal("Type here")));
        assert_eq!(attrs.resource(ATTR_TITLE), None);
    }

    #[test]
    fn quantity_parsing() {
        assert_eq!(Attributes::new().quantity(), Ok(None));
        assert_eq!(Attributes::new().with(ATTR_QUANTITY, " 3 ").quantity(), Ok(Some(3)));
        assert_matches!(
            Attributes::new().with(ATTR_QUANTITY, "three").quantity(),
            Err(TransformError::InvalidAttribute { name, .. }) if name == ATTR_QUANTITY
        );
    }

    #[test]
    fn format_args_split_and_trimmed() {
        let attrs = Attributes::new().with(ATTR_FORMAT_ARGS, "Ana, 3");
        assert_eq!(attrs.format_args(), vec!["Ana".to_string(), "3".to_string()]);
        assert!(Attributes::new().format_args().is_empty());
        assert!(Attributes::new().with(ATTR_FORMAT_ARGS, "").format_args().is_empty());
    }

    #[test]
    fn from_iterator() {
        let attrs: Attributes = [("text", "@string/a"), ("hint", "@string/b")]
            .into_iter()
            .collect();
        assert_eq!(attrs.get("hint"), Some("@string/b"));
    }
}

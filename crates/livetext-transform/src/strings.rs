//! Translated string lookup used by the built-in transformers.
//!
//! Plural selection is language-neutral: only the exact-quantity categories
//! `zero`, `one` and `two` are picked by quantity, everything else renders as
//! `other`. `few` and `many` can be stored and receive pushed updates, but
//! [`select_category`] never chooses them; a repository backed by CLDR rules
//! can return them from [`StringRepository::plural`] directly.

use std::collections::HashMap;

use livetext_core::PluralCategory;
use parking_lot::RwLock;

/// Source of translated strings and plurals.
pub trait StringRepository: Send + Sync {
    /// Template for a string key.
    fn string(&self, key: &str) -> Option<String>;

    /// Category and template of plural `name` for `quantity`.
    fn plural(&self, name: &str, quantity: i64) -> Option<(PluralCategory, String)>;
}

#[derive(Default)]
struct Tables {
    strings: HashMap<String, String>,
    plurals: HashMap<String, HashMap<PluralCategory, String>>,
}

/// In-memory, reloadable [`StringRepository`].
#[derive(Default)]
pub struct StringTable {
    tables: RwLock<Tables>,
}

impl StringTable {
    /// Empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style string insert.
    #[must_use]
    pub fn with_string(self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.set_string(key, text);
        self
    }

    /// Builder-style plural form insert.
    #[must_use]
    pub fn with_plural(
        self,
        name: impl Into<String>,
        category: PluralCategory,
        text: impl Into<String>,
    ) -> Self {
        self.set_plural(name, category, text);
        self
    }

    /// Insert or replace a string.
    pub fn set_string(&self, key: impl Into<String>, text: impl Into<String>) {
        let _ = self.tables.write().strings.insert(key.into(), text.into());
    }

    /// Insert or replace one plural form.
    pub fn set_plural(
        &self,
        name: impl Into<String>,
        category: PluralCategory,
        text: impl Into<String>,
    ) {
        let _ = self
            .tables
            .write()
            .plurals
            .entry(name.into())
            .or_default()
            .insert(category, text.into());
    }
}

/// Pick the plural category for `quantity` among the `available` forms.
///
/// Exact-quantity categories (`zero`, `one`, `two`) win when present;
/// everything else falls back to `other`.
pub fn select_category(
    quantity: i64,
    available: impl Fn(PluralCategory) -> bool,
) -> Option<PluralCategory> {
    let exact = match quantity {
        0 => Some(PluralCategory::Zero),
        1 => Some(PluralCategory::One),
        2 => Some(PluralCategory::Two),
        _ => None,
    };
    exact
        .filter(|c| available(*c))
        .or_else(|| available(PluralCategory::Other).then_some(PluralCategory::Other))
}

impl StringRepository for StringTable {
    fn string(&self, key: &str) -> Option<String> {
        self.tables.read().strings.get(key).cloned()
    }

    fn plural(&self, name: &str, quantity: i64) -> Option<(PluralCategory, String)> {
        let tables = self.tables.read();
        let forms = tables.plurals.get(name)?;
        let category = select_category(quantity, |c| forms.contains_key(&c))?;
        forms.get(&category).map(|text| (category, text.clone()))
    }
}

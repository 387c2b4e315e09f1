//! Transformer for text-bearing subjects (labels, buttons, text inputs).
//!
//! Reads the `text` and `hint` attributes, resolving `@string/` and
//! `@plurals/` references through a [`StringRepository`]. `quantity` picks
//! the plural form and `formatArgs` fills positional placeholders. Subjects
//! with at least one resource reference are tracked for live updates.

use std::sync::Arc;

use livetext_core::{SubjectId, SubjectStore, TranslationMetadata, VisibleMetadata};

use crate::attributes::{ATTR_HINT, ATTR_TEXT, Attributes};
use crate::capability::Capability;
use crate::errors::TransformError;
use crate::listener::ChangeListener;
use crate::strings::StringRepository;
use crate::tracked::TrackedText;
use crate::transformer::Transformer;

/// Built-in transformer for [`Capability::Text`] subjects.
pub struct TextTransformer {
    inner: TrackedText,
}

impl TextTransformer {
    /// Transformer rendering subjects of `store` from `strings`.
    pub fn new(store: Arc<SubjectStore>, strings: Arc<dyn StringRepository>) -> Self {
        Self {
            inner: TrackedText::new(store, strings, ATTR_TEXT, ATTR_HINT),
        }
    }
}

impl Transformer for TextTransformer {
    fn name(&self) -> &str {
        "text"
    }

    fn capability(&self) -> Capability {
        Capability::Text
    }

    fn transform(
        &self,
        subject: SubjectId,
        attrs: &Attributes,
    ) -> Result<SubjectId, TransformError> {
        self.inner.apply(subject, attrs)
    }

    fn invalidate(&self) {
        self.inner.invalidate();
    }

    fn visible_metadata(&self) -> Vec<VisibleMetadata> {
        self.inner.visible_metadata()
    }

    fn visible_subjects(&self) -> Vec<(SubjectId, Arc<TranslationMetadata>)> {
        self.inner.subjects().entries()
    }

    fn set_change_listener(&self, listener: Option<Arc<dyn ChangeListener>>) {
        self.inner.set_change_listener(listener);
    }

    fn replace_metadata(&self, subject: SubjectId, metadata: Arc<TranslationMetadata>) -> bool {
        self.inner.subjects().replace(subject, metadata)
    }
}

impl std::fmt::Debug for TextTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextTransformer")
            .field("tracked", &self.inner.subjects().len())
            .finish_non_exhaustive()
    }
}

//! Transformer for title bars: `title` and `subtitle` attributes.

use std::sync::Arc;

use livetext_core::{SubjectId, SubjectStore, TranslationMetadata, VisibleMetadata};

use crate::attributes::{ATTR_SUBTITLE, ATTR_TITLE, Attributes};
use crate::capability::Capability;
use crate::errors::TransformError;
use crate::listener::ChangeListener;
use crate::strings::StringRepository;
use crate::tracked::TrackedText;
use crate::transformer::Transformer;

/// Built-in transformer for [`Capability::Toolbar`] subjects.
///
/// The title is stored as the subject's text, the subtitle as its hint.
pub struct ToolbarTransformer {
    inner: TrackedText,
}

impl ToolbarTransformer {
    /// Transformer rendering toolbars of `store` from `strings`.
    pub fn new(store: Arc<SubjectStore>, strings: Arc<dyn StringRepository>) -> Self {
        Self {
            inner: TrackedText::new(store, strings, ATTR_TITLE, ATTR_SUBTITLE),
        }
    }
}

impl Transformer for ToolbarTransformer {
    fn name(&self) -> &str {
        "toolbar"
    }

    fn capability(&self) -> Capability {
        Capability::Toolbar
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

impl std::fmt::Debug for ToolbarTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolbarTransformer")
            .field("tracked", &self.inner.subjects().len())
            .finish_non_exhaustive()
    }
}

//! Transformer trait.
//!
//! A transformer rewrites subjects of the kinds its [`Capability`] accepts
//! and optionally tracks the subjects it touched. Transformers are registered
//! with the [`TransformPipeline`](crate::pipeline::TransformPipeline) and run
//! in registration order.

use std::sync::Arc;

use livetext_core::{SubjectId, TranslationMetadata, VisibleMetadata};

use crate::attributes::Attributes;
use crate::capability::Capability;
use crate::errors::TransformError;
use crate::listener::ChangeListener;

/// One step of the transformation pipeline.
///
/// Only [`transform`](Transformer::transform) is required. Stateless
/// rewrites can ignore the tracking hooks; transformers that keep a weak map
/// override them so pushed updates can find their subjects.
pub trait Transformer: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Subject kinds this transformer accepts.
    fn capability(&self) -> Capability;

    /// Rewrite `subject`, returning the subject to hand to the next step.
    ///
    /// Usually the same handle; a transformer may substitute another subject
    /// it created in the same store.
    fn transform(&self, subject: SubjectId, attrs: &Attributes)
    -> Result<SubjectId, TransformError>;

    /// Drop cached rendering state and redraw from current resources.
    fn invalidate(&self) {}

    /// Snapshot of the metadata of every live subject this transformer tracks.
    fn visible_metadata(&self) -> Vec<VisibleMetadata> {
        Vec::new()
    }

    /// Live tracked subjects with their metadata, in insertion order.
    fn visible_subjects(&self) -> Vec<(SubjectId, Arc<TranslationMetadata>)> {
        Vec::new()
    }

    /// Attach or, with `None`, detach the change listener.
    fn set_change_listener(&self, _listener: Option<Arc<dyn ChangeListener>>) {}

    /// Replace the metadata of a tracked subject. `false` if not tracked here.
    fn replace_metadata(&self, _subject: SubjectId, _metadata: Arc<TranslationMetadata>) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livetext_core::SubjectKind;

    struct Passthrough;

    impl Transformer for Passthrough {
        fn name(&self) -> &str {
            "passthrough"
        }

        fn capability(&self) -> Capability {
            Capability::Any
        }

        fn transform(
            &self,
            subject: SubjectId,
            _attrs: &Attributes,
        ) -> Result<SubjectId, TransformError> {
            Ok(subject)
        }
    }

    #[test]
    fn tracking_hooks_default_to_noops() {
        let t = Passthrough;
        t.invalidate();
        t.set_change_listener(None);
        assert!(t.visible_metadata().is_empty());
        assert!(t.visible_subjects().is_empty());
        assert!(!t.replace_metadata(
            SubjectId::new(0, 0),
            Arc::new(TranslationMetadata::default())
        ));
        assert!(t.capability().matches(SubjectKind::Container));
    }
}

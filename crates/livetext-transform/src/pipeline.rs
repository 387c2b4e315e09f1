//! Transformation pipeline.
//!
//! The pipeline is the host's single entry point for subject creation. Each
//! `transform` call folds the subject through every registered transformer
//! whose capability accepts the subject's kind, in registration order. The
//! remaining operations fan out to every transformer and aggregate the
//! results.
//!
//! `transform` runs synchronously on the caller's thread. The registry lock
//! is held only long enough to snapshot the matching transformers, so
//! transformers may call back into the pipeline (for example a change
//! listener reading [`TransformPipeline::change_listener`]).

use std::sync::Arc;

use livetext_core::{SubjectId, SubjectStore, TranslationMetadata, VisibleMetadata};
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::attributes::Attributes;
use crate::listener::ChangeListener;
use crate::registry::TransformerRegistry;
use crate::transformer::Transformer;
use crate::weak_map::WeakSubjectMap;

/// Ordered transformer chain over one subject store.
pub struct TransformPipeline {
    store: Arc<SubjectStore>,
    registry: RwLock<TransformerRegistry>,
    listener: RwLock<Option<Arc<dyn ChangeListener>>>,
}

impl TransformPipeline {
    /// Empty pipeline over `store`.
    #[must_use]
    pub fn new(store: Arc<SubjectStore>) -> Self {
        Self {
            store,
            registry: RwLock::new(TransformerRegistry::new()),
            listener: RwLock::new(None),
        }
    }

    /// Subject store the pipeline resolves subjects against.
    pub fn store(&self) -> &Arc<SubjectStore> {
        &self.store
    }

    /// Append a transformer to the chain.
    ///
    /// If a change listener is currently attached, the new transformer gets it
    /// too.
    pub fn register(&self, transformer: Arc<dyn Transformer>) {
        if let Some(listener) = self.change_listener() {
            transformer.set_change_listener(Some(listener));
        }
        self.registry.write().register(transformer);
    }

    /// Number of registered transformers.
    pub fn len(&self) -> usize {
        self.registry.read().len()
    }

    /// Whether no transformer is registered.
    pub fn is_empty(&self) -> bool {
        self.registry.read().is_empty()
    }

    /// Run `subject` through every matching transformer.
    ///
    /// `None` in gives `None` out without touching any transformer. A handle
    /// that no longer resolves is returned unchanged. Capabilities are checked
    /// against the kind of the subject passed in; a substituted subject is
    /// handed on but does not change which transformers run. A transformer
    /// that fails is logged and skipped and the previous result carried on.
    pub fn transform(&self, subject: Option<SubjectId>, attrs: &Attributes) -> Option<SubjectId> {
        let subject = subject?;
        let Some(kind) = self.store.kind(subject) else {
            debug!(%subject, "transform skipped, subject no longer alive");
            return Some(subject);
        };

        let matching = self.registry.read().matching(kind);
        let result = matching.iter().fold(subject, |current, transformer| {
            match transformer.transform(current, attrs) {
                Ok(next) => next,
                Err(err) => {
                    warn!(
                        transformer = transformer.name(),
                        subject = %current,
                        %kind,
                        error = %err,
                        "transformer failed, skipping"
                    );
                    metrics::counter!(
                        "livetext_transform_faults_total",
                        "transformer" => transformer.name().to_owned()
                    )
                    .increment(1);
                    current
                }
            }
        });
        Some(result)
    }

    /// Ask every transformer to redraw from current resources.
    pub fn invalidate(&self) {
        let all = self.registry.read().all();
        debug!(transformers = all.len(), "invalidating");
        for transformer in &all {
            transformer.invalidate();
        }
    }

    /// Union of every transformer's metadata snapshot, in registration order.
    pub fn collect_all_visible_metadata(&self) -> Vec<VisibleMetadata> {
        self.registry
            .read()
            .all()
            .iter()
            .flat_map(|t| t.visible_metadata())
            .collect()
    }

    /// All tracked live subjects merged into one weak map.
    ///
    /// When two transformers track the same subject the later registration
    /// wins.
    pub fn collect_visible_subjects_with_metadata(&self) -> WeakSubjectMap {
        let merged = WeakSubjectMap::new(Arc::clone(&self.store));
        for transformer in self.registry.read().all() {
            merged.extend_from(transformer.visible_subjects());
        }
        merged
    }

    /// Attach `listener` to every transformer, or detach with `None`.
    pub fn set_change_listener(&self, listener: Option<Arc<dyn ChangeListener>>) {
        debug!(attached = listener.is_some(), "setting change listener");
        self.listener.write().clone_from(&listener);
        for transformer in self.registry.read().all() {
            transformer.set_change_listener(listener.clone());
        }
    }

    /// The listener most recently attached through the pipeline.
    pub fn change_listener(&self) -> Option<Arc<dyn ChangeListener>> {
        self.listener.read().clone()
    }

    /// Replace a subject's metadata in every transformer that tracks it.
    ///
    /// Returns `false` when no transformer tracks the subject.
    pub fn replace_metadata(&self, subject: SubjectId, metadata: &Arc<TranslationMetadata>) -> bool {
        let mut replaced = false;
        for transformer in self.registry.read().all() {
            replaced |= transformer.replace_metadata(subject, Arc::clone(metadata));
        }
        replaced
    }
}

impl std::fmt::Debug for TransformPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformPipeline")
            .field("transformers", &self.len())
            .field("listener", &self.listener.read().is_some())
            .finish_non_exhaustive()
    }
}

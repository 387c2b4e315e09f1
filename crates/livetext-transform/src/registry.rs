//! Capability registry.
//!
//! Ordered list of transformers. Registration order is significant: it is
//! the order transformers run in and the order conflicts are resolved in.

use std::sync::Arc;

use livetext_core::SubjectKind;
use tracing::debug;

use crate::transformer::Transformer;

/// Registered transformers in registration order.
#[derive(Default)]
pub struct TransformerRegistry {
    entries: Vec<Arc<dyn Transformer>>,
}

impl TransformerRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transformer. Registering the same transformer twice runs it
    /// twice.
    pub fn register(&mut self, transformer: Arc<dyn Transformer>) {
        debug!(
            name = transformer.name(),
            capability = %transformer.capability(),
            position = self.entries.len(),
            "registering transformer"
        );
        self.entries.push(transformer);
    }

    /// Every registered transformer, in order.
    #[must_use]
    pub fn all(&self) -> Vec<Arc<dyn Transformer>> {
        self.entries.clone()
    }

    /// Transformers whose capability accepts `kind`, in order.
    #[must_use]
    pub fn matching(&self, kind: SubjectKind) -> Vec<Arc<dyn Transformer>> {
        self.entries
            .iter()
            .filter(|t| t.capability().matches(kind))
            .cloned()
            .collect()
    }

    /// Number of registered transformers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for TransformerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformerRegistry")
            .field("count", &self.len())
            .finish()
    }
}

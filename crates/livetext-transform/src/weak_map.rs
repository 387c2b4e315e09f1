//! Non-owning subject → metadata map.
//!
//! Entries are keyed by [`SubjectId`] handles, which never keep a subject
//! alive. Every read resolves the handle against the host's
//! [`SubjectStore`]; entries whose subject has been released are invisible
//! and are pruned lazily on the next write-capable access.
//!
//! The map is shared between host-thread writers (new subjects registered
//! during `transform`) and the update channel (lookups and metadata
//! replacement) behind an internal `RwLock`. Iteration order is insertion
//! order.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use livetext_core::{SubjectId, SubjectStore, TranslationMetadata};
use parking_lot::RwLock;

/// Weak registry from live subject to its current translation metadata.
pub struct WeakSubjectMap {
    store: Arc<SubjectStore>,
    entries: RwLock<IndexMap<SubjectId, Arc<TranslationMetadata>>>,
}

impl WeakSubjectMap {
    /// Empty map resolving handles against `store`.
    #[must_use]
    pub fn new(store: Arc<SubjectStore>) -> Self {
        Self {
            store,
            entries: RwLock::new(IndexMap::new()),
        }
    }

    /// Store the subjects are resolved against.
    pub fn store(&self) -> &Arc<SubjectStore> {
        &self.store
    }

    /// Attach metadata to a subject, replacing any previous record.
    pub fn insert(&self, subject: SubjectId, metadata: impl Into<Arc<TranslationMetadata>>) {
        let mut entries = self.entries.write();
        entries.retain(|id, _| self.store.is_alive(*id));
        let _ = entries.insert(subject, metadata.into());
    }

    /// Metadata of a live subject.
    pub fn get(&self, subject: SubjectId) -> Option<Arc<TranslationMetadata>> {
        if !self.store.is_alive(subject) {
            return None;
        }
        self.entries.read().get(&subject).cloned()
    }

    /// Whether a live subject has metadata here.
    pub fn contains(&self, subject: SubjectId) -> bool {
        self.get(subject).is_some()
    }

    /// Replace the metadata of a subject already in the map.
    ///
    /// Returns `false` when the subject is absent or released.
    pub fn replace(&self, subject: SubjectId, metadata: Arc<TranslationMetadata>) -> bool {
        if !self.store.is_alive(subject) {
            return false;
        }
        match self.entries.write().get_mut(&subject) {
            Some(slot) => {
                *slot = metadata;
                true
            }
            None => false,
        }
    }

    /// Live entries in insertion order.
    pub fn entries(&self) -> Vec<(SubjectId, Arc<TranslationMetadata>)> {
        self.entries
            .read()
            .iter()
            .filter(|(id, _)| self.store.is_alive(**id))
            .map(|(id, meta)| (*id, Arc::clone(meta)))
            .collect()
    }

    /// Live subjects in insertion order.
    pub fn subjects(&self) -> Vec<SubjectId> {
        self.entries().into_iter().map(|(id, _)| id).collect()
    }

    /// Insert every entry of `other`, overwriting on conflict.
    pub fn extend_from<I>(&self, other: I)
    where
        I: IntoIterator<Item = (SubjectId, Arc<TranslationMetadata>)>,
    {
        let mut entries = self.entries.write();
        for (id, meta) in other {
            if self.store.is_alive(id) {
                let _ = entries.insert(id, meta);
            }
        }
    }

    /// Drop entries whose subject was released. Returns how many were dropped.
    pub fn prune(&self) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|id, _| self.store.is_alive(*id));
        before - entries.len()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .keys()
            .filter(|id| self.store.is_alive(**id))
            .count()
    }

    /// Whether no live entries remain.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for WeakSubjectMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakSubjectMap")
            .field("live", &self.len())
            .finish_non_exhaustive()
    }
}

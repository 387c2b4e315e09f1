//! Host-owned subject arena.
//!
//! The host toolkit creates and releases subjects here; everything else in
//! livetext refers to them through [`SubjectId`] handles. Slots are reused
//! after release with a bumped generation, so stale handles resolve to
//! nothing instead of to the slot's next occupant.
//!
//! The store is shared between the host thread (creation, transformation)
//! and the update channel's I/O context (in-place content updates), so all
//! state sits behind one `parking_lot::RwLock`.

use std::fmt;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::errors::{CoreError, Result};
use crate::ids::SubjectId;

/// Declared kind of a subject.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubjectKind {
    /// Static text label.
    Label,
    /// Clickable button with a caption.
    Button,
    /// Editable text field with an optional hint.
    TextInput,
    /// Title bar with title and subtitle.
    Toolbar,
    /// Layout container with no text of its own.
    Container,
}

impl SubjectKind {
    /// Whether this kind displays a primary text and a hint.
    #[must_use]
    pub const fn is_text(self) -> bool {
        matches!(self, Self::Label | Self::Button | Self::TextInput)
    }

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::Button => "button",
            Self::TextInput => "textInput",
            Self::Toolbar => "toolbar",
            Self::Container => "container",
        }
    }
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Displayable content of one subject.
///
/// For toolbars `text` is the title and `hint` the subtitle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Declared kind.
    pub kind: SubjectKind,
    /// Primary displayed text.
    pub text: String,
    /// Secondary text (placeholder hint, subtitle).
    pub hint: Option<String>,
}

impl Subject {
    /// A subject with primary text and no hint.
    pub fn new(kind: SubjectKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            hint: None,
        }
    }
}

struct Slot {
    generation: u32,
    subject: Option<Subject>,
}

#[derive(Default)]
struct Arena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl Arena {
    fn resolve(&self, id: SubjectId) -> Option<&Subject> {
        let slot = self.slots.get(id.index())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.subject.as_ref()
    }

    fn resolve_mut(&mut self, id: SubjectId) -> Option<&mut Subject> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.subject.as_mut()
    }
}

/// Arena of live subjects, owned by the host.
#[derive(Default)]
pub struct SubjectStore {
    arena: RwLock<Arena>,
}

impl SubjectStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a subject and return its handle.
    pub fn insert(&self, subject: Subject) -> SubjectId {
        let mut arena = self.arena.write();
        arena.live += 1;
        if let Some(index) = arena.free.pop() {
            let slot = &mut arena.slots[index as usize];
            slot.subject = Some(subject);
            return SubjectId::new(index, slot.generation);
        }
        let index = arena.slots.len() as u32;
        arena.slots.push(Slot {
            generation: 0,
            subject: Some(subject),
        });
        SubjectId::new(index, 0)
    }

    /// Create a subject of `kind` showing `text`.
    pub fn create(&self, kind: SubjectKind, text: impl Into<String>) -> SubjectId {
        self.insert(Subject::new(kind, text))
    }

    /// Release a subject. Every handle to it stops resolving.
    ///
    /// Returns the released content, or `None` if the handle was already stale.
    pub fn release(&self, id: SubjectId) -> Option<Subject> {
        let mut arena = self.arena.write();
        let slot = arena.slots.get_mut(id.index())?;
        if slot.generation != id.generation() {
            return None;
        }
        let subject = slot.subject.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        arena.free.push(id.index() as u32);
        arena.live -= 1;
        Some(subject)
    }

    /// Whether the handle still names a live subject.
    pub fn is_alive(&self, id: SubjectId) -> bool {
        self.arena.read().resolve(id).is_some()
    }

    /// Number of live subjects.
    pub fn len(&self) -> usize {
        self.arena.read().live
    }

    /// Whether the store holds no live subjects.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of a subject's content.
    pub fn get(&self, id: SubjectId) -> Option<Subject> {
        self.arena.read().resolve(id).cloned()
    }

    /// Kind of a live subject.
    pub fn kind(&self, id: SubjectId) -> Option<SubjectKind> {
        self.arena.read().resolve(id).map(|s| s.kind)
    }

    /// Primary text of a live subject.
    pub fn text(&self, id: SubjectId) -> Option<String> {
        self.arena.read().resolve(id).map(|s| s.text.clone())
    }

    /// Hint of a live subject.
    pub fn hint(&self, id: SubjectId) -> Option<String> {
        self.arena.read().resolve(id).and_then(|s| s.hint.clone())
    }

    /// Run `f` against a live subject under the write lock.
    pub fn update<R>(&self, id: SubjectId, f: impl FnOnce(&mut Subject) -> R) -> Result<R> {
        let mut arena = self.arena.write();
        arena
            .resolve_mut(id)
            .map(f)
            .ok_or(CoreError::StaleSubject(id))
    }

    /// Replace the primary text.
    pub fn set_text(&self, id: SubjectId, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        self.update(id, |s| s.text = text)
    }

    /// Replace the hint.
    pub fn set_hint(&self, id: SubjectId, hint: Option<String>) -> Result<()> {
        self.update(id, |s| s.hint = hint)
    }
}

impl fmt::Debug for SubjectStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubjectStore")
            .field("live", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn create_and_read() {
        let store = SubjectStore::new();
        let id = store.create(SubjectKind::Label, "hello");
        assert!(store.is_alive(id));
        assert_eq!(store.text(id).as_deref(), Some("hello"));
        assert_eq!(store.kind(id), Some(SubjectKind::Label));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn release_invalidates_handle() {
        let store = SubjectStore::new();
        let id = store.create(SubjectKind::Label, "bye");
        let released = store.release(id).unwrap();
        assert_eq!(released.text, "bye");
        assert!(!store.is_alive(id));
        assert!(store.get(id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn double_release_is_none() {
        let store = SubjectStore::new();
        let id = store.create(SubjectKind::Button, "ok");
        assert!(store.release(id).is_some());
        assert!(store.release(id).is_none());
    }

    #[test]
    fn reused_slot_does_not_resolve_old_handle() {
        let store = SubjectStore::new();
        let old = store.create(SubjectKind::Label, "old");
        let _ = store.release(old);
        let new = store.create(SubjectKind::Label, "new");
        assert_eq!(old.index(), new.index());
        assert_ne!(old, new);
        assert!(store.text(old).is_none());
        assert_eq!(store.text(new).as_deref(), Some("new"));
    }

    #[test]
    fn set_text_on_stale_handle_errors() {
        let store = SubjectStore::new();
        let id = store.create(SubjectKind::Label, "x");
        let _ = store.release(id);
        assert_matches!(store.set_text(id, "y"), Err(CoreError::StaleSubject(stale)) if stale == id);
    }

    #[test]
    fn set_hint_round_trip() {
        let store = SubjectStore::new();
        let id = store.create(SubjectKind::TextInput, "");
        store.set_hint(id, Some("Email".into())).unwrap();
        assert_eq!(store.hint(id).as_deref(), Some("Email"));
    }

    #[test]
    fn unknown_index_is_not_alive() {
        let store = SubjectStore::new();
        assert!(!store.is_alive(SubjectId::new(42, 0)));
    }

    #[test]
    fn text_kinds() {
        assert!(SubjectKind::Label.is_text());
        assert!(SubjectKind::TextInput.is_text());
        assert!(!SubjectKind::Toolbar.is_text());
        assert!(!SubjectKind::Container.is_text());
    }

    #[test]
    fn concurrent_updates_are_serialized() {
        let store = std::sync::Arc::new(SubjectStore::new());
        let id = store.create(SubjectKind::Label, "");
        let handles: Vec<_> = (0..4)
            .map(|n| {
                let store = std::sync::Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        store
                            .update(id, |s| s.text.push(char::from(b'a' + n)))
                            .unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.text(id).unwrap().len(), 200);
    }
}

//! Generational subject handles.
//!
//! A [`SubjectId`] names a slot in the host's [`SubjectStore`](crate::SubjectStore)
//! together with the slot generation it was issued for. Releasing a subject
//! bumps the slot generation, so every handle issued before the release stops
//! resolving. Holding a handle never keeps a subject alive.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Non-owning handle to a host subject.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubjectId {
    /// Slot index in the store.
    index: u32,
    /// Slot generation this handle was issued for.
    generation: u32,
}

impl SubjectId {
    /// Build a handle from its raw parts.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Slot generation.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

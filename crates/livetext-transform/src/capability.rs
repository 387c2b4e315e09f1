//! Subject capabilities a transformer can declare.
//!
//! A capability is a predicate over a subject's declared [`SubjectKind`],
//! checked at transform time. Several capabilities can match the same kind
//! (a button is both [`Capability::Text`] and [`Capability::Kind`]`(Button)`).

use std::fmt;

use livetext_core::SubjectKind;

/// What kinds of subject a transformer applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Every subject.
    Any,
    /// Subjects showing a primary text and hint (labels, buttons, inputs).
    Text,
    /// Title bars.
    Toolbar,
    /// Exactly this kind.
    Kind(SubjectKind),
}

impl Capability {
    /// Whether a subject of `kind` has this capability.
    #[must_use]
    pub fn matches(self, kind: SubjectKind) -> bool {
        match self {
            Self::Any => true,
            Self::Text => kind.is_text(),
            Self::Toolbar => kind == SubjectKind::Toolbar,
            Self::Kind(k) => k == kind,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::Text => f.write_str("text"),
            Self::Toolbar => f.write_str("toolbar"),
            Self::Kind(k) => write!(f, "kind:{k}"),
        }
    }
}

//! Transformer error types.

use livetext_core::CoreError;
use thiserror::Error;

/// Errors a transformer can report for one subject.
///
/// The pipeline logs these and skips the failing transformer; they never
/// reach the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// The subject was released while being transformed.
    #[error(transparent)]
    Subject(#[from] CoreError),

    /// A `@string/` reference named a key the repository does not have.
    #[error("no string for key '{key}'")]
    MissingString {
        /// The missing key.
        key: String,
    },

    /// A `@plurals/` reference had no form for the quantity.
    #[error("no plural '{name}' for quantity {quantity}")]
    MissingPlural {
        /// Plural resource name.
        name: String,
        /// Requested quantity.
        quantity: i64,
    },

    /// An attribute value could not be interpreted.
    #[error("invalid attribute '{name}': {reason}")]
    InvalidAttribute {
        /// Attribute name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use livetext_core::SubjectId;

    #[test]
    fn missing_string_display() {
        let err = TransformError::MissingString {
            key: "app_name".into(),
        };
        assert_eq!(err.to_string(), "no string for key 'app_name'");
    }

    #[test]
    fn subject_error_is_transparent() {
        let err: TransformError = CoreError::StaleSubject(SubjectId::new(1, 0)).into();
        assert_eq!(err.to_string(), "subject #1v0 is no longer alive");
    }

    #[test]
    fn missing_plural_display() {
        let err = TransformError::MissingPlural {
            name: "items".into(),
            quantity: 4,
        };
        assert!(err.to_string().contains("items"));
        assert!(err.to_string().contains('4'));
    }
}

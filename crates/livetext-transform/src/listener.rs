//! Change notification for subjects whose translation metadata changed.

use std::sync::Arc;

use livetext_core::{SubjectId, TranslationMetadata};

/// Receives `(subject, metadata)` whenever a subject is registered with or
/// updated in a transformer's weak map.
///
/// Called synchronously from the thread that made the change: the host thread
/// during `transform`, the update channel's I/O task for pushed content.
pub trait ChangeListener: Send + Sync {
    /// A subject's metadata changed.
    fn on_change(&self, subject: SubjectId, metadata: &Arc<TranslationMetadata>);
}

impl<F> ChangeListener for F
where
    F: Fn(SubjectId, &Arc<TranslationMetadata>) + Send + Sync,
{
    fn on_change(&self, subject: SubjectId, metadata: &Arc<TranslationMetadata>) {
        self(subject, metadata);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn closures_are_listeners() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let listener: Arc<dyn ChangeListener> =
            Arc::new(move |id: SubjectId, meta: &Arc<TranslationMetadata>| {
                sink.lock().push((id, meta.text_key.clone()));
            });

        listener.on_change(
            SubjectId::new(3, 1),
            &Arc::new(TranslationMetadata::for_text("title")),
        );
        assert_eq!(
            seen.lock().as_slice(),
            &[(SubjectId::new(3, 1), Some("title".to_string()))]
        );
    }
}

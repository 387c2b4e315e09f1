//! Shared core of the built-in transformers.
//!
//! Resolves a primary and a secondary attribute against the string
//! repository, writes the rendered text into the subject, and records the
//! keys in a weak map so pushed updates can find the subject later.

use std::sync::Arc;

use livetext_core::text::format_with_args;
use livetext_core::{
    PluralCategory, PluralForm, SubjectId, SubjectStore, TranslationMetadata, VisibleMetadata,
};
use parking_lot::RwLock;
use tracing::debug;

use crate::attributes::{Attributes, ResourceRef};
use crate::errors::TransformError;
use crate::listener::ChangeListener;
use crate::strings::StringRepository;
use crate::weak_map::WeakSubjectMap;

/// Text resolved for one field before anything is written.
struct Resolved {
    text: String,
    key: Option<String>,
    plural: Option<(PluralCategory, i64)>,
}

pub(crate) struct TrackedText {
    store: Arc<SubjectStore>,
    strings: Arc<dyn StringRepository>,
    subjects: WeakSubjectMap,
    listener: RwLock<Option<Arc<dyn ChangeListener>>>,
    primary: &'static str,
    secondary: &'static str,
}

impl TrackedText {
    pub(crate) fn new(
        store: Arc<SubjectStore>,
        strings: Arc<dyn StringRepository>,
        primary: &'static str,
        secondary: &'static str,
    ) -> Self {
        Self {
            subjects: WeakSubjectMap::new(Arc::clone(&store)),
            store,
            strings,
            listener: RwLock::new(None),
            primary,
            secondary,
        }
    }

    pub(crate) fn subjects(&self) -> &WeakSubjectMap {
        &self.subjects
    }

    fn resolve(
        &self,
        attr: &str,
        value: ResourceRef<'_>,
        attrs: &Attributes,
        args: &[String],
    ) -> Result<Resolved, TransformError> {
        match value {
            ResourceRef::Literal(text) => Ok(Resolved {
                text: text.to_owned(),
                key: None,
                plural: None,
            }),
            ResourceRef::String(key) => {
                let template = self
                    .strings
                    .string(key)
                    .ok_or_else(|| TransformError::MissingString { key: key.into() })?;
                Ok(Resolved {
                    text: format_with_args(&template, args),
                    key: Some(key.to_owned()),
                    plural: None,
                })
            }
            ResourceRef::Plural(name) => {
                if attr != self.primary {
                    return Err(TransformError::InvalidAttribute {
                        name: attr.to_owned(),
                        reason: "plurals are only supported on the primary text".into(),
                    });
                }
                let quantity = attrs.quantity()?.ok_or_else(|| {
                    TransformError::InvalidAttribute {
                        name: attr.to_owned(),
                        reason: "plural reference without quantity".into(),
                    }
                })?;
                let (category, template) = self.strings.plural(name, quantity).ok_or_else(
                    || TransformError::MissingPlural {
                        name: name.into(),
                        quantity,
                    },
                )?;
                Ok(Resolved {
                    text: format_with_args(&template, args),
                    key: Some(name.to_owned()),
                    plural: Some((category, quantity)),
                })
            }
        }
    }

    /// Render `subject` from `attrs` and start tracking it if any field is
    /// keyed.
    pub(crate) fn apply(
        &self,
        subject: SubjectId,
        attrs: &Attributes,
    ) -> Result<SubjectId, TransformError> {
        let args = attrs.format_args();
        let primary = attrs
            .resource(self.primary)
            .map(|v| self.resolve(self.primary, v, attrs, &args))
            .transpose()?;
        let secondary = attrs
            .resource(self.secondary)
            .map(|v| self.resolve(self.secondary, v, attrs, &args))
            .transpose()?;

        let mut metadata = TranslationMetadata::default();
        if let Some(p) = &primary {
            metadata.text_key.clone_from(&p.key);
            if let Some((category, quantity)) = p.plural {
                metadata = metadata.with_plural(category, quantity);
            }
        }
        if let Some(s) = &secondary {
            metadata.hint_key.clone_from(&s.key);
        }
        let keyed = metadata.text_key.is_some() || metadata.hint_key.is_some();
        if keyed {
            metadata = metadata.with_format_args(args);
        }

        self.store.update(subject, |s| {
            if let Some(p) = primary {
                s.text = p.text;
            }
            if let Some(h) = secondary {
                s.hint = Some(h.text);
            }
        })?;

        if keyed {
            let metadata = Arc::new(metadata);
            self.subjects.insert(subject, Arc::clone(&metadata));
            debug!(%subject, key = ?metadata.text_key, hint_key = ?metadata.hint_key, "tracking subject");
            self.notify(subject, &metadata);
        }
        Ok(subject)
    }

    fn render(&self, key: &str, metadata: &TranslationMetadata) -> Option<String> {
        let template = match (metadata.plural, metadata.plural_quantity) {
            (PluralForm::Category(_), Some(quantity)) => {
                self.strings.plural(key, quantity).map(|(_, t)| t)
            }
            _ => self.strings.string(key),
        }?;
        Some(format_with_args(&template, &metadata.format_args))
    }

    /// Redraw every tracked subject from the repository, dropping pushed text.
    pub(crate) fn invalidate(&self) {
        let _ = self.subjects.prune();
        for (subject, metadata) in self.subjects.entries() {
            let text = metadata
                .text_key
                .as_deref()
                .and_then(|key| self.render(key, &metadata));
            let hint = metadata.hint_key.as_deref().and_then(|key| {
                let plain = TranslationMetadata {
                    plural: PluralForm::None,
                    ..(*metadata).clone()
                };
                self.render(key, &plain)
            });
            let result = self.store.update(subject, |s| {
                if let Some(text) = text {
                    s.text = text;
                }
                if let Some(hint) = hint {
                    s.hint = Some(hint);
                }
            });
            if let Err(err) = result {
                debug!(%subject, error = %err, "subject released during invalidate");
                continue;
            }
            if metadata.applied_text.is_some() {
                let _ = self
                    .subjects
                    .replace(subject, Arc::new(metadata.without_applied_text()));
            }
        }
    }

    pub(crate) fn visible_metadata(&self) -> Vec<VisibleMetadata> {
        self.subjects
            .entries()
            .into_iter()
            .filter_map(|(subject, metadata)| {
                self.store.kind(subject).map(|kind| VisibleMetadata {
                    subject,
                    kind,
                    metadata,
                })
            })
            .collect()
    }

    pub(crate) fn set_change_listener(&self, listener: Option<Arc<dyn ChangeListener>>) {
        *self.listener.write() = listener;
    }

    fn notify(&self, subject: SubjectId, metadata: &Arc<TranslationMetadata>) {
        let listener = self.listener.read().clone();
        if let Some(listener) = listener {
            listener.on_change(subject, metadata);
        }
    }
}

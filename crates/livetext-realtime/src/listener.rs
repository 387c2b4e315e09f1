//! Update listener: applies pushed content to live subjects.
//!
//! One listener is built per connection. When the socket opens it subscribes
//! every tracked subject's mapping ids and wraps the pipeline's change
//! listener so subjects created later are subscribed as they appear. Each
//! inbound frame is decoded and applied synchronously, in delivery order, to
//! every live subject whose recorded key maps to the frame's mapping id.
//!
//! A listener is bound to the dial epoch it was built for. Once a newer dial
//! starts, its callbacks no longer change the connection state and its
//! frames are dropped.

use std::sync::Arc;

use dashmap::DashSet;
use livetext_core::text::format_with_args;
use livetext_core::{PluralForm, SubjectId, TextTarget, TranslationMetadata};
use livetext_transform::{ChangeListener, TransformPipeline};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::errors::TransportError;
use crate::mapping::MappingTable;
use crate::state::{CloseReason, ConnectionState, SharedState};
use crate::transport::{Socket, SocketListener};
use crate::wire::{Subscriptions, UpdateEvent, parse_update};

/// Sends subscribe frames, once per mapping id per connection.
struct Subscriber {
    mapping: Arc<MappingTable>,
    subscriptions: Arc<Subscriptions>,
    subscribed: Arc<DashSet<String>>,
    socket: Arc<dyn Socket>,
}

impl Subscriber {
    fn subscribe(&self, metadata: &TranslationMetadata) {
        for (_, id) in self.mapping.ids_for(metadata) {
            if !self.subscribed.insert(id.to_owned()) {
                continue;
            }
            let sent = self
                .subscriptions
                .frames(id)
                .iter()
                .all(|frame| self.socket.send(frame));
            if sent {
                debug!(mapping_id = id, "subscribed");
            } else {
                warn!(mapping_id = id, "subscribe frame not sent, socket closing");
                let _ = self.subscribed.remove(id);
            }
        }
    }
}

/// Change listener installed while the connection is open.
struct SubscribingListener {
    subscriber: Subscriber,
    forward: Option<Arc<dyn ChangeListener>>,
}

impl ChangeListener for SubscribingListener {
    fn on_change(&self, subject: SubjectId, metadata: &Arc<TranslationMetadata>) {
        self.subscriber.subscribe(metadata);
        if let Some(forward) = &self.forward {
            forward.on_change(subject, metadata);
        }
    }
}

struct Installed {
    ours: Arc<dyn ChangeListener>,
    previous: Option<Arc<dyn ChangeListener>>,
}

/// Socket listener driving the connection state and applying updates.
pub struct UpdateListener {
    mapping: Arc<MappingTable>,
    subscriptions: Arc<Subscriptions>,
    pipeline: Arc<TransformPipeline>,
    state: Arc<SharedState>,
    epoch: u64,
    subscribed: Arc<DashSet<String>>,
    installed: Mutex<Option<Installed>>,
}

impl UpdateListener {
    /// Listener for the dial started as `epoch` on `state`.
    pub fn new(
        mapping: Arc<MappingTable>,
        subscriptions: Subscriptions,
        pipeline: Arc<TransformPipeline>,
        state: Arc<SharedState>,
        epoch: u64,
    ) -> Self {
        Self {
            mapping,
            subscriptions: Arc::new(subscriptions),
            pipeline,
            state,
            epoch,
            subscribed: Arc::new(DashSet::new()),
            installed: Mutex::new(None),
        }
    }

    /// Mapping ids subscribed on this connection so far.
    pub fn subscribed_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.subscribed.iter().map(|id| id.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Apply one decoded update. Returns how many fields changed.
    pub fn apply(&self, event: &UpdateEvent) -> usize {
        let store = self.pipeline.store();
        let mut applied = 0;

        for (subject, metadata) in self.pipeline.collect_visible_subjects_with_metadata().entries() {
            let mut current = metadata;
            let targets: Vec<TextTarget> = self
                .mapping
                .ids_for(&current)
                .filter(|(_, id)| *id == event.mapping_id)
                .map(|(target, _)| target)
                .collect();

            for target in targets {
                let accepted = match target {
                    TextTarget::Text => current.accepts_plural(event.plural),
                    TextTarget::Hint => event.plural == PluralForm::None,
                };
                if !accepted {
                    debug!(%subject, plural = %event.plural, "plural form mismatch, skipping");
                    continue;
                }

                let text = format_with_args(&event.text, &current.format_args);
                let result = match target {
                    TextTarget::Text => store.set_text(subject, text.clone()),
                    TextTarget::Hint => store.set_hint(subject, Some(text.clone())),
                };
                if let Err(err) = result {
                    debug!(error = %err, "update target released");
                    break;
                }

                let updated = Arc::new(current.with_applied_text(text));
                let _ = self.pipeline.replace_metadata(subject, &updated);
                if let Some(listener) = self.pipeline.change_listener() {
                    listener.on_change(subject, &updated);
                }
                metrics::counter!("livetext_updates_applied_total").increment(1);
                applied += 1;
                current = updated;
            }
        }
        applied
    }

    fn detach(&self) {
        let Some(installed) = self.installed.lock().take() else {
            return;
        };
        let still_ours = self
            .pipeline
            .change_listener()
            .is_some_and(|current| Arc::ptr_eq(&current, &installed.ours));
        if still_ours {
            self.pipeline.set_change_listener(installed.previous);
        }
    }

    /// Whether this listener still belongs to the latest dial.
    pub fn is_current(&self) -> bool {
        self.state.is_current(self.epoch)
    }

    fn transition(&self, f: impl FnOnce(&mut ConnectionState) -> bool) {
        let changed = self.state.update_if_current(self.epoch, f);
        if changed {
            let state = self.state.get();
            debug!(epoch = self.epoch, %state, "connection state");
        } else if !self.is_current() {
            debug!(epoch = self.epoch, "callback from superseded connection ignored");
        }
    }
}

impl SocketListener for UpdateListener {
    fn on_open(&self, socket: Arc<dyn Socket>) {
        let armed = self.state.update_if_current(self.epoch, |state| {
            if *state == ConnectionState::Connecting {
                *state = ConnectionState::Open;
                true
            } else {
                false
            }
        });
        if !armed {
            let state = self.state.get();
            debug!(epoch = self.epoch, current = self.is_current(), %state, "not arming");
            return;
        }
        info!(language = %self.mapping.language, "update channel open");

        let subscriber = Subscriber {
            mapping: Arc::clone(&self.mapping),
            subscriptions: Arc::clone(&self.subscriptions),
            subscribed: Arc::clone(&self.subscribed),
            socket,
        };
        for (_, metadata) in self.pipeline.collect_visible_subjects_with_metadata().entries() {
            subscriber.subscribe(&metadata);
        }

        let previous = self.pipeline.change_listener();
        let ours: Arc<dyn ChangeListener> = Arc::new(SubscribingListener {
            subscriber,
            forward: previous.clone(),
        });
        self.pipeline.set_change_listener(Some(Arc::clone(&ours)));
        *self.installed.lock() = Some(Installed { ours, previous });
        if !self.is_current() {
            // Superseded while installing.
            self.detach();
        }
    }

    fn on_message(&self, text: &str) {
        if !self.is_current() || !self.state.get().is_open() {
            debug!(epoch = self.epoch, "frame received while not open, ignoring");
            return;
        }
        match parse_update(text) {
            Ok(event) => {
                let applied = self.apply(&event);
                debug!(mapping_id = %event.mapping_id, applied, "update applied");
            }
            Err(err) => {
                debug!(error = %err, "ignoring frame");
                metrics::counter!("livetext_frames_ignored_total").increment(1);
            }
        }
    }

    fn on_closing(&self, code: u16) {
        info!(code, "update channel closing");
        self.transition(|state| {
            if state.is_active() && *state != ConnectionState::Closing {
                *state = ConnectionState::Closing;
                true
            } else {
                false
            }
        });
        self.detach();
    }

    fn on_closed(&self, code: u16) {
        info!(code, "update channel closed");
        self.transition(|state| {
            *state = ConnectionState::Closed(CloseReason::Normal);
            true
        });
        self.detach();
    }

    fn on_failure(&self, error: &TransportError) {
        warn!(error = %error, "update channel failed");
        self.transition(|state| {
            *state = ConnectionState::Closed(CloseReason::Abnormal);
            true
        });
        self.detach();
    }
}

impl std::fmt::Debug for UpdateListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateListener")
            .field("language", &self.mapping.language)
            .field("subscribed", &self.subscribed.len())
            .finish_non_exhaustive()
    }
}

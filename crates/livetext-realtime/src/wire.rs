//! Push channel wire format.
//!
//! Outbound, the client subscribes to per-string events:
//!
//! ```text
//! {"action":"subscribe","event":"update-draft:{wsHash}:{projectId}:{userId}:{languageId}:{mappingId}"}
//! {"action":"subscribe","event":"top-suggestion:{wsHash}:{projectId}:{languageId}:{mappingId}"}
//! ```
//!
//! Inbound, the server pushes content for one of those events. The mapping
//! id is always the last `:`-separated segment of the event name.
//!
//! ```text
//! {"event":"update-draft:…:{mappingId}","data":{"text":"…","pluralForm":"none"}}
//! ```

use livetext_core::PluralForm;
use serde::Deserialize;

use crate::data::DistributionDescriptor;
use crate::errors::WireError;

/// Event families the channel handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A translator's draft changed.
    UpdateDraft,
    /// The top-voted suggestion changed.
    TopSuggestion,
}

impl EventKind {
    /// Event name prefix.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::UpdateDraft => "update-draft",
            Self::TopSuggestion => "top-suggestion",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "update-draft" => Some(Self::UpdateDraft),
            "top-suggestion" => Some(Self::TopSuggestion),
            _ => None,
        }
    }
}

/// A decoded inbound update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateEvent {
    /// Which event family produced it.
    pub kind: EventKind,
    /// Remote id of the string that changed.
    pub mapping_id: String,
    /// New content.
    pub text: String,
    /// Plural form the content is for, `none` for plain strings.
    pub plural: PluralForm,
}

#[derive(Deserialize)]
struct InboundFrame {
    event: String,
    data: InboundData,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InboundData {
    text: String,
    #[serde(default)]
    plural_form: Option<PluralForm>,
}

/// Decode one inbound text frame.
pub fn parse_update(frame: &str) -> Result<UpdateEvent, WireError> {
    let frame: InboundFrame = serde_json::from_str(frame)?;
    let (prefix, rest) = frame
        .event
        .split_once(':')
        .ok_or_else(|| WireError::MissingMappingId(frame.event.clone()))?;
    let kind =
        EventKind::from_prefix(prefix).ok_or_else(|| WireError::UnknownEvent(prefix.to_owned()))?;
    let mapping_id = rest
        .rsplit(':')
        .next()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| WireError::MissingMappingId(frame.event.clone()))?;

    Ok(UpdateEvent {
        kind,
        mapping_id: mapping_id.to_owned(),
        text: frame.data.text,
        plural: frame.data.plural_form.unwrap_or_default(),
    })
}

/// Routing data needed to name subscription events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subscriptions {
    descriptor: DistributionDescriptor,
    language: String,
}

impl Subscriptions {
    /// Subscriptions for `descriptor`'s project in `language`.
    pub fn new(descriptor: DistributionDescriptor, language: impl Into<String>) -> Self {
        Self {
            descriptor,
            language: language.into(),
        }
    }

    /// Event name for `kind` on `mapping_id`.
    pub fn event_name(&self, kind: EventKind, mapping_id: &str) -> String {
        let d = &self.descriptor;
        match kind {
            EventKind::UpdateDraft => format!(
                "{}:{}:{}:{}:{}:{mapping_id}",
                kind.prefix(),
                d.project_ws_hash,
                d.project_id,
                d.user_id,
                self.language
            ),
            EventKind::TopSuggestion => format!(
                "{}:{}:{}:{}:{mapping_id}",
                kind.prefix(),
                d.project_ws_hash,
                d.project_id,
                self.language
            ),
        }
    }

    /// Subscribe frames for every event family on `mapping_id`.
    pub fn frames(&self, mapping_id: &str) -> Vec<String> {
        [EventKind::UpdateDraft, EventKind::TopSuggestion]
            .into_iter()
            .map(|kind| subscribe_frame(&self.event_name(kind, mapping_id)))
            .collect()
    }
}

/// Encode a subscribe frame for `event`.
pub fn subscribe_frame(event: &str) -> String {
    serde_json::json!({ "action": "subscribe", "event": event }).to_string()
}

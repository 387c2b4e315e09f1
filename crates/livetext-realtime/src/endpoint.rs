//! Push endpoint selection.

use livetext_settings::LivetextSettings;

/// Endpoint to dial: the shared endpoint when no organization is configured,
/// the enterprise endpoint otherwise.
pub fn select_endpoint(settings: &LivetextSettings) -> &str {
    match settings.organization() {
        None => settings.realtime.shared_endpoint.as_str(),
        Some(_) => settings.realtime.enterprise_endpoint.as_str(),
    }
}

//! Connection manager: owns the single push connection.
//!
//! The manager is an ordinary value. Hosts build one per activation and pass
//! it by reference; tests build as many independent instances as they need.
//! It alone holds the socket handle, and it alone opens or closes it.
//!
//! Each dial starts a new epoch on the shared state. A connection that was
//! closed and then replaced keeps running its close handshake in the
//! background, but its late callbacks are fenced off from the new one.

use std::sync::Arc;

use livetext_settings::{LivetextSettings, NORMAL_CLOSURE_STATUS};
use livetext_transform::TransformPipeline;
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::data::DataSource;
use crate::endpoint::select_endpoint;
use crate::listener::UpdateListener;
use crate::state::{CloseReason, ConnectionState, SharedState};
use crate::transport::{Socket, Transport};
use crate::wire::Subscriptions;

/// Opens and closes the push connection that feeds the [`UpdateListener`].
pub struct ConnectionManager {
    settings: LivetextSettings,
    data: Option<Arc<dyn DataSource>>,
    pipeline: Arc<TransformPipeline>,
    transport: Arc<dyn Transport>,
    socket: Mutex<Option<Arc<dyn Socket>>>,
    state: Arc<SharedState>,
}

impl ConnectionManager {
    /// Manager for `pipeline`. A missing `data` source disables the channel.
    pub fn new(
        settings: LivetextSettings,
        data: Option<Arc<dyn DataSource>>,
        pipeline: Arc<TransformPipeline>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            settings,
            data,
            pipeline,
            transport,
            socket: Mutex::new(None),
            state: Arc::new(SharedState::new()),
        }
    }

    /// Open the connection if every prerequisite is available.
    ///
    /// Silently does nothing when the channel is disabled, when there is no
    /// data source, descriptor, or mapping table for the source language, or
    /// when a connection is already dialing or open. Otherwise dials exactly
    /// once and releases the transport client right after.
    pub fn open_connection(&self) {
        if !self.settings.realtime.enabled {
            debug!("update channel disabled by settings");
            return;
        }
        let Some(data) = &self.data else {
            debug!("no data source, update channel disabled");
            return;
        };
        let Some(descriptor) = data.distribution() else {
            debug!("no distribution descriptor, update channel disabled");
            return;
        };

        let mut socket = self.socket.lock();
        // Only the current dial's listener can write the state, so it
        // reflects the socket held here.
        let state = self.state();
        if socket.is_some() && state.is_active() {
            debug!(%state, "update channel already active");
            return;
        }

        let language = &self.settings.source_language;
        let Some(mapping) = data.mapping(language) else {
            debug!(%language, "no mapping table, update channel disabled");
            return;
        };

        let url = select_endpoint(&self.settings);
        let epoch = self.state.begin_dial();
        let listener = Arc::new(UpdateListener::new(
            Arc::new(mapping),
            Subscriptions::new(descriptor, self.settings.target_language.clone()),
            Arc::clone(&self.pipeline),
            Arc::clone(&self.state),
            epoch,
        ));

        let client = self.transport.client();
        let dialed = client.dial(url, listener);
        client.shutdown();

        match dialed {
            Ok(dialed) => {
                info!(%url, epoch, "update channel dialed");
                *socket = Some(dialed);
            }
            Err(err) => {
                warn!(%url, error = %err, "update channel dial failed");
                *socket = None;
                let _ = self.state.update_if_current(epoch, |state| {
                    *state = ConnectionState::Closed(CloseReason::Abnormal);
                    true
                });
            }
        }
    }

    /// Close the connection, if any, and detach the pipeline's change
    /// listener. Safe to call at any time, any number of times.
    pub fn close_connection(&self) {
        let socket = self.socket.lock().take();
        if let Some(socket) = socket {
            let code = NORMAL_CLOSURE_STATUS;
            if socket.close(code, None) {
                info!(code, "update channel close requested");
            }
            let _ = self.state.update(|state| {
                if matches!(state, ConnectionState::Connecting | ConnectionState::Open) {
                    *state = ConnectionState::Closing;
                    true
                } else {
                    false
                }
            });
        }
        self.pipeline.set_change_listener(None);
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state.get()
    }

    /// Receiver that observes every state change.
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// Whether updates are currently flowing.
    pub fn is_connected(&self) -> bool {
        self.state().is_open()
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("state", &self.state())
            .field("endpoint", &select_endpoint(&self.settings))
            .finish_non_exhaustive()
    }
}

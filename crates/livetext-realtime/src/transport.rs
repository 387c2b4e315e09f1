//! Transport abstraction.
//!
//! The connection manager never touches sockets directly. It asks a
//! [`Transport`] for a short-lived [`TransportClient`], dials once, shuts the
//! client down, and keeps only the returned [`Socket`]. Connection events
//! arrive on the [`SocketListener`] handed to `dial`, on whatever context the
//! transport runs its I/O.

use std::sync::Arc;

use crate::errors::TransportError;

/// A live (or pending) connection.
pub trait Socket: Send + Sync {
    /// Queue a text frame. `false` if the socket is closing or gone.
    fn send(&self, text: &str) -> bool;

    /// Start the close handshake. `false` if already closing or gone.
    fn close(&self, code: u16, reason: Option<&str>) -> bool;
}

/// Receives connection events.
pub trait SocketListener: Send + Sync {
    /// Handshake finished; `socket` is the same handle `dial` returned.
    fn on_open(&self, socket: Arc<dyn Socket>);

    /// One inbound text frame.
    fn on_message(&self, text: &str);

    /// The peer sent, or acknowledged, a close frame.
    fn on_closing(&self, code: u16);

    /// The connection is fully closed after a close handshake.
    fn on_closed(&self, code: u16);

    /// The connection failed. No further events follow.
    fn on_failure(&self, error: &TransportError);
}

/// Dialing resources, released right after the dial.
pub trait TransportClient: Send {
    /// Start connecting to `url`. Returns immediately; the outcome arrives on
    /// `listener`.
    fn dial(
        &self,
        url: &str,
        listener: Arc<dyn SocketListener>,
    ) -> Result<Arc<dyn Socket>, TransportError>;

    /// Release the client. Sockets it dialed stay up.
    fn shutdown(self: Box<Self>);
}

/// Factory of transport clients.
pub trait Transport: Send + Sync {
    /// A fresh client for one dial.
    fn client(&self) -> Box<dyn TransportClient>;
}

//! [`Transport`] over `tokio-tungstenite`.
//!
//! Each dial spawns one task on the configured runtime that owns the
//! websocket. The returned [`Socket`] is a handle onto that task's outbound
//! queue, so `send` and `close` never block and are safe to call from
//! listener callbacks running inside the task.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::{SinkExt, StreamExt};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Error as WsError;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tracing::{debug, info, warn};
use url::Url;

use crate::errors::TransportError;
use crate::transport::{Socket, SocketListener, Transport, TransportClient};

/// Status reported when the peer closes without a code.
const NO_STATUS_RECEIVED: u16 = 1005;

enum Outbound {
    Text(String),
    Close { code: u16, reason: String },
}

/// Websocket transport running its I/O on a tokio runtime.
#[derive(Clone, Debug)]
pub struct TungsteniteTransport {
    handle: Handle,
}

impl TungsteniteTransport {
    /// Transport spawning connections on `handle`.
    pub fn new(handle: Handle) -> Self {
        // Another component may have installed a provider already.
        let _ = rustls::crypto::ring::default_provider().install_default();
        Self { handle }
    }

    /// Transport on the runtime of the calling task, if there is one.
    pub fn try_current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

impl Transport for TungsteniteTransport {
    fn client(&self) -> Box<dyn TransportClient> {
        Box::new(TungsteniteClient {
            handle: self.handle.clone(),
        })
    }
}

struct TungsteniteClient {
    handle: Handle,
}

impl TransportClient for TungsteniteClient {
    fn dial(
        &self,
        url: &str,
        listener: Arc<dyn SocketListener>,
    ) -> Result<Arc<dyn Socket>, TransportError> {
        let parsed = Url::parse(url).map_err(|e| TransportError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "ws" | "wss") {
            return Err(TransportError::InvalidUrl {
                url: url.to_owned(),
                reason: format!("scheme '{}' is not ws or wss", parsed.scheme()),
            });
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let socket: Arc<dyn Socket> = Arc::new(TungsteniteSocket {
            outbound: tx,
            closing: AtomicBool::new(false),
        });
        debug!(%url, "dialing");
        drop(self.handle.spawn(run_connection(
            url.to_owned(),
            rx,
            listener,
            Arc::clone(&socket),
        )));
        Ok(socket)
    }

    fn shutdown(self: Box<Self>) {
        debug!("transport client released");
    }
}

struct TungsteniteSocket {
    outbound: mpsc::UnboundedSender<Outbound>,
    closing: AtomicBool,
}

impl Socket for TungsteniteSocket {
    fn send(&self, text: &str) -> bool {
        if self.closing.load(Ordering::Acquire) {
            return false;
        }
        self.outbound.send(Outbound::Text(text.to_owned())).is_ok()
    }

    fn close(&self, code: u16, reason: Option<&str>) -> bool {
        if self.closing.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.outbound
            .send(Outbound::Close {
                code,
                reason: reason.unwrap_or_default().to_owned(),
            })
            .is_ok()
    }
}

async fn run_connection(
    url: String,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
    listener: Arc<dyn SocketListener>,
    socket: Arc<dyn Socket>,
) {
    let ws = match connect_async(url.as_str()).await {
        Ok((ws, _response)) => ws,
        Err(e) => {
            warn!(%url, error = %e, "websocket connect failed");
            listener.on_failure(&TransportError::Connect(e.to_string()));
            return;
        }
    };
    info!(%url, "websocket connected");

    let (mut sink, mut stream) = ws.split();
    listener.on_open(socket);

    let mut outbound_open = true;
    let mut close_code: Option<u16> = None;

    loop {
        tokio::select! {
            out = outbound.recv(), if outbound_open => {
                let message = match out {
                    Some(Outbound::Text(text)) => Message::Text(text.into()),
                    Some(Outbound::Close { code, reason }) => {
                        outbound_open = false;
                        Message::Close(Some(CloseFrame {
                            code: CloseCode::from(code),
                            reason: reason.into(),
                        }))
                    }
                    None => {
                        outbound_open = false;
                        Message::Close(None)
                    }
                };
                if let Err(e) = sink.send(message).await {
                    warn!(%url, error = %e, "websocket send failed");
                    listener.on_failure(&TransportError::Protocol(e.to_string()));
                    return;
                }
            }
            inbound = stream.next() => match inbound {
                Some(Ok(Message::Text(text))) => listener.on_message(text.as_str()),
                Some(Ok(Message::Close(frame))) => {
                    let code = frame.map_or(NO_STATUS_RECEIVED, |f| u16::from(f.code));
                    close_code = Some(code);
                    listener.on_closing(code);
                }
                Some(Ok(_)) => {}
                Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) | None => {
                    match close_code {
                        Some(code) => {
                            info!(%url, code, "websocket closed");
                            listener.on_closed(code);
                        }
                        None => {
                            warn!(%url, "websocket stream ended without close frame");
                            listener.on_failure(&TransportError::Closed);
                        }
                    }
                    return;
                }
                Some(Err(e)) => {
                    warn!(%url, error = %e, "websocket receive failed");
                    listener.on_failure(&TransportError::Protocol(e.to_string()));
                    return;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    impl std::fmt::Debug for dyn Socket {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("dyn Socket")
        }
    }

    struct Silent;

    impl SocketListener for Silent {
        fn on_open(&self, _socket: Arc<dyn Socket>) {}
        fn on_message(&self, _text: &str) {}
        fn on_closing(&self, _code: u16) {}
        fn on_closed(&self, _code: u16) {}
        fn on_failure(&self, _error: &TransportError) {}
    }

    #[tokio::test]
    async fn rejects_non_websocket_urls() {
        let client = TungsteniteTransport::new(Handle::current()).client();
        assert_matches!(
            client.dial("https://example.com", Arc::new(Silent)),
            Err(TransportError::InvalidUrl { .. })
        );
        assert_matches!(
            client.dial("not a url", Arc::new(Silent)),
            Err(TransportError::InvalidUrl { .. })
        );
        client.shutdown();
    }

    #[tokio::test]
    async fn close_is_one_shot() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let socket = TungsteniteSocket {
            outbound: tx,
            closing: AtomicBool::new(false),
        };
        assert!(socket.send("a"));
        assert!(socket.close(1001, None));
        assert!(!socket.close(1001, None));
        assert!(!socket.send("b"));
    }

    #[test]
    fn try_current_outside_runtime_is_none() {
        assert!(TungsteniteTransport::try_current().is_none());
    }
}

//! Connection lifecycle state.
//!
//! [`SharedState`] is the one cell a manager and all of its listeners write
//! to. Each dial starts a new epoch; a listener only drives the state while
//! the epoch it was built for is still the latest, so late callbacks from a
//! connection that was closed and replaced cannot touch its successor.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

/// How a closed connection ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CloseReason {
    /// Close handshake completed.
    Normal,
    /// Connect failure or transport error.
    Abnormal,
}

/// State of the push connection.
///
/// `Idle → Connecting → Open → Closing → Closed(Normal)`, or
/// `Connecting | Open → Closed(Abnormal)` on transport failure. `Closed` is
/// terminal for a connection; a new `open_connection` starts over at
/// `Connecting`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// Nothing dialed yet.
    #[default]
    Idle,
    /// Dial issued, handshake pending.
    Connecting,
    /// Handshake done, updates flowing.
    Open,
    /// Close requested or received.
    Closing,
    /// Connection gone.
    Closed(CloseReason),
}

impl ConnectionState {
    /// Whether inbound updates should be applied.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Whether a connection is dialing or live.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Connecting | Self::Open | Self::Closing)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Connecting => f.write_str("connecting"),
            Self::Open => f.write_str("open"),
            Self::Closing => f.write_str("closing"),
            Self::Closed(CloseReason::Normal) => f.write_str("closed"),
            Self::Closed(CloseReason::Abnormal) => f.write_str("closed (abnormal)"),
        }
    }
}

/// Connection state plus the epoch of the latest dial.
#[derive(Debug)]
pub struct SharedState {
    tx: watch::Sender<ConnectionState>,
    epoch: AtomicU64,
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedState {
    /// `Idle`, with no dial started.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(ConnectionState::Idle);
        Self {
            tx,
            epoch: AtomicU64::new(0),
        }
    }

    /// Current state.
    pub fn get(&self) -> ConnectionState {
        *self.tx.borrow()
    }

    /// Receiver observing every change.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.tx.subscribe()
    }

    /// Start a new dial: supersede every earlier epoch and move to
    /// `Connecting`. Returns the new epoch.
    pub fn begin_dial(&self) -> u64 {
        let mut epoch = 0;
        self.tx.send_modify(|state| {
            epoch = self.epoch.fetch_add(1, Ordering::AcqRel) + 1;
            *state = ConnectionState::Connecting;
        });
        epoch
    }

    /// Whether `epoch` is the latest dial.
    pub fn is_current(&self, epoch: u64) -> bool {
        self.epoch.load(Ordering::Acquire) == epoch
    }

    /// Apply `f` only while `epoch` is the latest dial. `f` returns whether
    /// it changed the state. The epoch check and the write happen under the
    /// same lock as [`begin_dial`](Self::begin_dial).
    pub fn update_if_current(
        &self,
        epoch: u64,
        f: impl FnOnce(&mut ConnectionState) -> bool,
    ) -> bool {
        self.tx
            .send_if_modified(|state| self.is_current(epoch) && f(state))
    }

    /// Apply `f` regardless of epoch. Returns whether the state changed.
    pub fn update(&self, f: impl FnOnce(&mut ConnectionState) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }

    /// Overwrite the state regardless of epoch, returning the previous one.
    pub fn replace(&self, state: ConnectionState) -> ConnectionState {
        self.tx.send_replace(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_dial_supersedes_earlier_epochs() {
        let shared = SharedState::new();
        assert_eq!(shared.get(), ConnectionState::Idle);
        let first = shared.begin_dial();
        let second = shared.begin_dial();
        assert_ne!(first, second);
        assert!(!shared.is_current(first));
        assert!(shared.is_current(second));
        assert_eq!(shared.get(), ConnectionState::Connecting);
    }

    #[test]
    fn stale_epoch_cannot_write() {
        let shared = SharedState::new();
        let first = shared.begin_dial();
        let second = shared.begin_dial();

        let changed = shared.update_if_current(first, |state| {
            *state = ConnectionState::Closed(CloseReason::Normal);
            true
        });
        assert!(!changed);
        assert_eq!(shared.get(), ConnectionState::Connecting);

        assert!(shared.update_if_current(second, |state| {
            *state = ConnectionState::Open;
            true
        }));
        assert_eq!(shared.get(), ConnectionState::Open);
    }

    #[test]
    fn subscribers_see_changes() {
        let shared = SharedState::new();
        let rx = shared.subscribe();
        let _ = shared.begin_dial();
        assert_eq!(*rx.borrow(), ConnectionState::Connecting);
    }

    #[test]
    fn only_open_applies_updates() {
        assert!(ConnectionState::Open.is_open());
        assert!(!ConnectionState::Closing.is_open());
        assert!(!ConnectionState::Connecting.is_open());
    }

    #[test]
    fn active_states() {
        assert!(ConnectionState::Connecting.is_active());
        assert!(ConnectionState::Closing.is_active());
        assert!(!ConnectionState::Idle.is_active());
        assert!(!ConnectionState::Closed(CloseReason::Abnormal).is_active());
    }

    #[test]
    fn display() {
        assert_eq!(ConnectionState::default().to_string(), "idle");
        assert_eq!(
            ConnectionState::Closed(CloseReason::Abnormal).to_string(),
            "closed (abnormal)"
        );
    }
}

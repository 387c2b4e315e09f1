//! # livetext-realtime
//!
//! Push channel that applies translation edits to live subjects.
//!
//! - **Manager**: [`manager::ConnectionManager`] picks the endpoint, dials once,
//!   and closes with the configured status code
//! - **Listener**: [`listener::UpdateListener`] subscribes every visible keyed
//!   subject and rewrites text in place as updates arrive
//! - **Wire**: [`wire`] encodes subscribe frames and decodes update frames
//! - **Data**: [`data::DataSource`] supplies the distribution descriptor and
//!   the per-language [`mapping::MappingTable`]
//! - **Transport**: [`transport::Transport`] abstracts the socket;
//!   [`websocket::TungsteniteTransport`] is the tokio-tungstenite implementation
//!
//! ## Crate Position
//!
//! Depends on livetext-core, livetext-settings, livetext-transform.

#![deny(unsafe_code)]

pub mod data;
pub mod endpoint;
pub mod errors;
pub mod listener;
pub mod manager;
pub mod mapping;
pub mod state;
pub mod transport;
pub mod websocket;
pub mod wire;

pub use data::{DataSource, DirectoryDataSource, DistributionDescriptor, MemoryDataSource};
pub use endpoint::select_endpoint;
pub use errors::{DataError, TransportError, WireError};
pub use listener::UpdateListener;
pub use manager::ConnectionManager;
pub use mapping::MappingTable;
pub use state::{CloseReason, ConnectionState, SharedState};
pub use transport::{Socket, SocketListener, Transport, TransportClient};
pub use websocket::TungsteniteTransport;
pub use wire::{EventKind, Subscriptions, UpdateEvent, parse_update, subscribe_frame};

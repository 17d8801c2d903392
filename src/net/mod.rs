//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ListenerOptions + Option<LoadedTlsConfig>
//!     → listener.rs (merge, plain or TLS decision)
//!     → tls.rs (rustls ServerConfig, only for TLS at bind time)
//!     → BoundListener::serve (axum plain / axum-server rustls)
//! ```
//!
//! # Design Decisions
//! - Building a listener never parses certificate bytes
//! - TLS results are visible through `Listener::is_tls`

pub mod listener;
pub mod tls;

pub use listener::{create_listener_sync, BoundListener, Listener, ListenerArgs, ListenerError};
pub use tls::TlsError;

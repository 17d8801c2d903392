//! TLS option resolution and listener bootstrapping.
//!
//! Pass no flags and get a plain listener; pass `--tls-cert`/`--tls-key` (or
//! set `TLS_CERT`/`TLS_KEY`) and get a TLS one.

pub mod config;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod tls;

pub use config::ListenerOptions;
pub use net::{create_listener_sync, Listener, ListenerArgs};
pub use tls::{read, read_sync, LoadedTlsConfig};

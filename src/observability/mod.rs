//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! tls::resolve / tls::load / net::listener
//!     → tracing events with structured fields
//!     → logging.rs subscriber (fmt layer, EnvFilter)
//!     → stdout
//! ```

pub mod logging;

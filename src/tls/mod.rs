//! TLS option subsystem.
//!
//! # Data Flow
//! ```text
//! argv (&mut Vec<String> or Vec<OsString>) + environment
//!     → resolve.rs (flags first, env as a unit, consume matched args)
//!     → normalize.rs (cert+key(+ca) | pfx | none)
//!     → load.rs (blocking or concurrent reads → bytes)
//!     → LoadedTlsConfig (material + secure_options)
//!     → net::listener (plain or TLS listener)
//! ```
//!
//! # Design Decisions
//! - Argument vector and environment are injected, never read ambiently
//! - `read` and `read_sync` share resolution; only the loader differs
//! - No TLS is a valid outcome (`Ok(None)`), never an error
//! - Certificate contents are not inspected here

pub mod env;
pub mod load;
pub mod material;
pub mod normalize;
pub mod resolve;

pub use env::{Environment, ProcessEnv};
pub use load::{load, load_sync, LoadError};
pub use material::{LoadedTlsConfig, SecureOptions, TlsMaterial};
pub use normalize::{normalize, TlsConfig};
pub use resolve::{resolve, resolve_os, resolve_raw_options, resolve_raw_os_options, RawOptions};

use std::ffi::OsString;

/// Resolve TLS options from `args`/`env` and load the files, blocking.
pub fn read_sync<E>(
    args: &mut Vec<String>,
    env: &E,
    preserve: bool,
) -> Result<Option<LoadedTlsConfig>, LoadError>
where
    E: Environment + ?Sized,
{
    load_sync(resolve(args, env, preserve))
}

/// Resolve TLS options from `args`/`env` and load the files concurrently.
pub async fn read<E>(
    args: &mut Vec<String>,
    env: &E,
    preserve: bool,
) -> Result<Option<LoadedTlsConfig>, LoadError>
where
    E: Environment + ?Sized,
{
    let config = resolve(args, env, preserve);
    load(config).await
}

/// [`read_sync`] over `std::env::args_os()` and the process environment.
///
/// Returns the loaded config and the arguments left after consumption.
/// Arguments that are not valid UTF-8 are passed through as-is.
pub fn read_process_sync(
    preserve: bool,
) -> Result<(Option<LoadedTlsConfig>, Vec<OsString>), LoadError> {
    let mut args: Vec<OsString> = std::env::args_os().collect();
    let loaded = load_sync(resolve_os(&mut args, &ProcessEnv, preserve))?;
    Ok((loaded, args))
}

/// [`read`] over `std::env::args_os()` and the process environment.
pub async fn read_process(
    preserve: bool,
) -> Result<(Option<LoadedTlsConfig>, Vec<OsString>), LoadError> {
    let mut args: Vec<OsString> = std::env::args_os().collect();
    let config = resolve_os(&mut args, &ProcessEnv, preserve);
    let loaded = load(config).await?;
    Ok((loaded, args))
}

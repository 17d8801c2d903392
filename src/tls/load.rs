//! File loading for classified TLS paths.
//!
//! # Responsibilities
//! - Replace every path in a [`TlsConfig`] with the file's bytes
//! - Blocking variant reads sequentially and stops at the first failure
//! - Async variant reads all files concurrently; first failure wins
//! - Material is built per config shape, so every field comes from its own read
//! - Attach [`SecureOptions::LEGACY_DISABLED`](crate::tls::SecureOptions::LEGACY_DISABLED) to every loaded config

use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures_util::future::try_join3;
use thiserror::Error;

use crate::tls::material::{LoadedTlsConfig, TlsMaterial};
use crate::tls::normalize::TlsConfig;

/// Errors raised while loading TLS files.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A resolved path could not be opened or read.
    #[error("failed to read TLS {field} from {}: {source}", .path.display())]
    Read {
        field: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LoadError {
    /// The underlying I/O error kind (e.g. `NotFound`).
    pub fn io_kind(&self) -> io::ErrorKind {
        match self {
            LoadError::Read { source, .. } => source.kind(),
        }
    }

    /// The path that failed to load.
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Read { path, .. } => path,
        }
    }
}

fn read_error(field: &'static str, path: &Path, source: io::Error) -> LoadError {
    tracing::debug!(field, path = %path.display(), error = %source, "TLS file read failed");
    LoadError::Read {
        field,
        path: path.to_path_buf(),
        source,
    }
}

fn read_file(field: &'static str, path: &Path) -> Result<Bytes, LoadError> {
    std::fs::read(path)
        .map(Bytes::from)
        .map_err(|e| read_error(field, path, e))
}

async fn read_file_async(field: &'static str, path: &Path) -> Result<Bytes, LoadError> {
    tokio::fs::read(path)
        .await
        .map(Bytes::from)
        .map_err(|e| read_error(field, path, e))
}

async fn read_optional_async(
    field: &'static str,
    path: Option<&Path>,
) -> Result<Option<Bytes>, LoadError> {
    match path {
        Some(path) => read_file_async(field, path).await.map(Some),
        None => Ok(None),
    }
}

fn loaded(material: TlsMaterial) -> LoadedTlsConfig {
    let loaded = LoadedTlsConfig::new(material);
    tracing::info!(
        pfx = loaded.pfx().is_some(),
        ca = loaded.ca().is_some(),
        "TLS material loaded"
    );
    loaded
}

/// Load every file referenced by `config`, blocking the current thread.
///
/// `None` passes through without touching the filesystem.
pub fn load_sync(config: Option<TlsConfig>) -> Result<Option<LoadedTlsConfig>, LoadError> {
    let material = match config {
        None => return Ok(None),
        Some(TlsConfig::CertKey { cert, key, ca }) => TlsMaterial::CertKey {
            cert: read_file("cert", &cert)?,
            key: read_file("key", &key)?,
            ca: ca.map(|ca| read_file("ca", &ca)).transpose()?,
        },
        Some(TlsConfig::Pfx { pfx }) => TlsMaterial::Pfx {
            pfx: read_file("pfx", &pfx)?,
        },
    };

    Ok(Some(loaded(material)))
}

/// Load every file referenced by `config` with one concurrent read per field.
///
/// `None` passes through without touching the filesystem.
pub async fn load(config: Option<TlsConfig>) -> Result<Option<LoadedTlsConfig>, LoadError> {
    let material = match config {
        None => return Ok(None),
        Some(TlsConfig::CertKey { cert, key, ca }) => {
            let (cert, key, ca) = try_join3(
                read_file_async("cert", &cert),
                read_file_async("key", &key),
                read_optional_async("ca", ca.as_deref()),
            )
            .await?;
            TlsMaterial::CertKey { cert, key, ca }
        }
        Some(TlsConfig::Pfx { pfx }) => TlsMaterial::Pfx {
            pfx: read_file_async("pfx", &pfx).await?,
        },
    };

    Ok(Some(loaded(material)))
}

//! TLS server configuration from loaded material.
//!
//! This is the only place certificate bytes are parsed. It runs when a TLS
//! listener binds, never while options are resolved or merged.

use std::io::BufReader;
use std::sync::Arc;

use axum_server::tls_rustls::RustlsConfig;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::server::WebPkiClientVerifier;
use rustls::{RootCertStore, ServerConfig};
use thiserror::Error;

use crate::config::TlsOptions;
use crate::tls::SecureOptions;

/// Errors building a rustls server config.
#[derive(Debug, Error)]
pub enum TlsError {
    /// PEM data could not be decoded.
    #[error("invalid PEM in {field}: {source}")]
    Pem {
        field: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Neither cert+key nor a bundle was provided.
    #[error("TLS listener has no certificate material")]
    MissingMaterial,

    /// The bundle holds no PEM certificate chain and private key.
    #[error("unsupported certificate bundle: {0}")]
    UnsupportedBundle(&'static str),

    /// rustls rejected the certificate, key or CA.
    #[error("rustls error: {0}")]
    Rustls(#[from] rustls::Error),

    /// The client verifier could not be built from the CA bundle.
    #[error("client verifier error: {0}")]
    Verifier(#[from] rustls::server::VerifierBuilderError),
}

fn parse_certs(field: &'static str, pem: &[u8]) -> Result<Vec<CertificateDer<'static>>, TlsError> {
    let mut reader = BufReader::new(pem);
    rustls_pemfile::certs(&mut reader)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| TlsError::Pem { field, source })
}

fn parse_key(field: &'static str, pem: &[u8]) -> Result<Option<PrivateKeyDer<'static>>, TlsError> {
    let mut reader = BufReader::new(pem);
    rustls_pemfile::private_key(&mut reader).map_err(|source| TlsError::Pem { field, source })
}

/// Certificate chain and key from either cert+key or a combined PEM bundle.
fn identity(
    tls: &TlsOptions,
) -> Result<(Vec<CertificateDer<'static>>, PrivateKeyDer<'static>), TlsError> {
    match (&tls.cert, &tls.key, &tls.pfx) {
        (Some(cert), Some(key), _) => {
            let certs = parse_certs("cert", cert)?;
            if certs.is_empty() {
                return Err(TlsError::Pem {
                    field: "cert",
                    source: std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        "no certificates found",
                    ),
                });
            }
            let key = parse_key("key", key)?.ok_or_else(|| TlsError::Pem {
                field: "key",
                source: std::io::Error::new(std::io::ErrorKind::InvalidData, "no private key found"),
            })?;
            Ok((certs, key))
        }
        (_, _, Some(pfx)) => {
            // rustls has no PKCS#12 support; only combined PEM bundles work.
            let certs = parse_certs("pfx", pfx)?;
            if certs.is_empty() {
                return Err(TlsError::UnsupportedBundle("no PEM certificate in bundle"));
            }
            let key = parse_key("pfx", pfx)?
                .ok_or(TlsError::UnsupportedBundle("no PEM private key in bundle"))?;
            Ok((certs, key))
        }
        _ => Err(TlsError::MissingMaterial),
    }
}

/// Build a rustls server config from merged listener TLS options.
pub fn server_config(tls: &TlsOptions) -> Result<ServerConfig, TlsError> {
    let (certs, key) = identity(tls)?;

    let secure_options = tls.secure_options.unwrap_or(SecureOptions::LEGACY_DISABLED);
    let provider = Arc::new(rustls::crypto::aws_lc_rs::default_provider());
    let builder = ServerConfig::builder_with_provider(provider.clone())
        .with_protocol_versions(&secure_options.protocol_versions())?;

    let builder = match &tls.ca {
        Some(ca) => {
            let mut roots = RootCertStore::empty();
            for cert in parse_certs("ca", ca)? {
                roots.add(cert)?;
            }
            // Client certificates are verified against the CA when offered.
            let verifier = WebPkiClientVerifier::builder_with_provider(Arc::new(roots), provider)
                .allow_unauthenticated()
                .build()?;
            builder.with_client_cert_verifier(verifier)
        }
        None => builder.with_no_client_auth(),
    };

    let mut config = builder.with_single_cert(certs, key)?;
    config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

    tracing::debug!(
        secure_options = %secure_options,
        client_ca = tls.ca.is_some(),
        bundle = tls.pfx.is_some() && tls.cert.is_none(),
        "TLS server config built"
    );

    Ok(config)
}

/// Wrap [`server_config`] for axum-server.
pub fn rustls_config(tls: &TlsOptions) -> Result<RustlsConfig, TlsError> {
    Ok(RustlsConfig::from_config(Arc::new(server_config(tls)?)))
}

//! Configuration schema definitions.
//!
//! Listener settings derive Serde traits for deserialization from TOML.
//! TLS material is never read from the config file; it is merged in from a
//! [`LoadedTlsConfig`] or set programmatically.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::tls::{LoadedTlsConfig, SecureOptions, TlsMaterial};

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerOptions {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// TLS material for the encrypted listener.
    #[serde(skip)]
    pub tls: TlsOptions,
}

impl Default for ListenerOptions {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
            tls: TlsOptions::default(),
        }
    }
}

/// TLS-related listener options.
///
/// Field-for-field counterpart of a loaded config, so caller-supplied values
/// can be overridden one field at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsOptions {
    /// PEM certificate chain.
    pub cert: Option<Bytes>,

    /// PEM private key.
    pub key: Option<Bytes>,

    /// PEM certificate authority bundle for client verification.
    pub ca: Option<Bytes>,

    /// Combined certificate and key bundle.
    pub pfx: Option<Bytes>,

    /// Protocol restriction flags.
    pub secure_options: Option<SecureOptions>,
}

impl TlsOptions {
    /// Overwrite the material with the loaded config.
    ///
    /// A loaded bundle drops any caller cert, key and CA; a loaded cert+key
    /// drops any caller bundle. A caller CA survives when the loaded config
    /// has none.
    pub fn merge(&mut self, loaded: &LoadedTlsConfig) {
        match &loaded.material {
            TlsMaterial::CertKey { cert, key, ca } => {
                self.cert = Some(cert.clone());
                self.key = Some(key.clone());
                if let Some(ca) = ca {
                    self.ca = Some(ca.clone());
                }
                self.pfx = None;
            }
            TlsMaterial::Pfx { pfx } => {
                self.pfx = Some(pfx.clone());
                self.cert = None;
                self.key = None;
                self.ca = None;
            }
        }
        self.secure_options = Some(loaded.secure_options);
    }

    /// True when no material is set.
    pub fn is_empty(&self) -> bool {
        self.cert.is_none() && self.key.is_none() && self.ca.is_none() && self.pfx.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = ListenerOptions::default();
        assert_eq!(options.bind_address, "0.0.0.0:8080");
        assert_eq!(options.request_timeout_secs, 30);
        assert!(options.tls.is_empty());
    }

    #[test]
    fn merge_overrides_loaded_fields_only() {
        let mut tls = TlsOptions {
            cert: Some(Bytes::from_static(b"caller-cert")),
            ca: Some(Bytes::from_static(b"caller-ca")),
            ..Default::default()
        };
        let loaded = LoadedTlsConfig::new(TlsMaterial::CertKey {
            cert: Bytes::from_static(b"cert"),
            key: Bytes::from_static(b"key"),
            ca: None,
        });

        tls.merge(&loaded);

        assert_eq!(tls.cert.as_deref(), Some(&b"cert"[..]));
        assert_eq!(tls.key.as_deref(), Some(&b"key"[..]));
        assert_eq!(tls.ca.as_deref(), Some(&b"caller-ca"[..]));
        assert_eq!(tls.secure_options, Some(SecureOptions::LEGACY_DISABLED));
    }

    #[test]
    fn loaded_bundle_replaces_caller_cert_and_key() {
        let mut tls = TlsOptions {
            cert: Some(Bytes::from_static(b"caller-cert")),
            key: Some(Bytes::from_static(b"caller-key")),
            ca: Some(Bytes::from_static(b"caller-ca")),
            ..Default::default()
        };
        let loaded = LoadedTlsConfig::new(TlsMaterial::Pfx {
            pfx: Bytes::from_static(&[0x30, 0x82]),
        });

        tls.merge(&loaded);

        assert_eq!(tls.pfx.as_deref(), Some(&[0x30, 0x82][..]));
        assert!(tls.cert.is_none());
        assert!(tls.key.is_none());
        assert!(tls.ca.is_none());
    }

    #[test]
    fn loaded_cert_key_replaces_caller_bundle() {
        let mut tls = TlsOptions {
            pfx: Some(Bytes::from_static(b"caller-bundle")),
            ..Default::default()
        };
        let loaded = LoadedTlsConfig::new(TlsMaterial::CertKey {
            cert: Bytes::from_static(b"cert"),
            key: Bytes::from_static(b"key"),
            ca: None,
        });

        tls.merge(&loaded);

        assert!(tls.pfx.is_none());
        assert_eq!(tls.cert.as_deref(), Some(&b"cert"[..]));
    }
}

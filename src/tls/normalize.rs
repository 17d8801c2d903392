//! Classification of resolved paths.

use std::path::PathBuf;

/// Classified TLS paths.
///
/// `ca` only exists alongside a certificate and key; a PKCS#12 bundle stands
/// alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsConfig {
    /// PEM certificate chain and private key, optionally a CA bundle.
    CertKey {
        cert: PathBuf,
        key: PathBuf,
        ca: Option<PathBuf>,
    },
    /// Combined certificate and key bundle.
    Pfx { pfx: PathBuf },
}

/// Classify a (cert, key, ca) triple. First match wins; `key` and `ca`
/// without `cert` are ignored.
pub fn normalize<S: Into<PathBuf>>(
    cert: Option<S>,
    key: Option<S>,
    ca: Option<S>,
) -> Option<TlsConfig> {
    match (cert, key) {
        (Some(cert), Some(key)) => Some(TlsConfig::CertKey {
            cert: cert.into(),
            key: key.into(),
            ca: ca.map(Into::into),
        }),
        (Some(cert), None) => Some(TlsConfig::Pfx { pfx: cert.into() }),
        (None, _) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cert_key_ca() {
        let config = normalize(Some("c"), Some("k"), Some("a"));
        assert_eq!(
            config,
            Some(TlsConfig::CertKey {
                cert: "c".into(),
                key: "k".into(),
                ca: Some("a".into()),
            })
        );
    }

    #[test]
    fn cert_key() {
        let config = normalize(Some("c"), Some("k"), None);
        assert_eq!(
            config,
            Some(TlsConfig::CertKey {
                cert: "c".into(),
                key: "k".into(),
                ca: None,
            })
        );
    }

    #[test]
    fn cert_alone_is_pfx() {
        assert_eq!(
            normalize(Some("c"), None, Some("a")),
            Some(TlsConfig::Pfx { pfx: "c".into() })
        );
    }

    #[test]
    fn no_cert_is_none() {
        assert_eq!(normalize(None, Some("k"), Some("a")), None);
        assert_eq!(normalize::<&str>(None, None, None), None);
    }
}

//! Loaded TLS material and protocol flags.

use bytes::Bytes;

/// OpenSSL-compatible `secureOptions` bit flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SecureOptions(u64);

impl SecureOptions {
    /// `SSL_OP_NO_TLSv1`.
    pub const NO_TLSV1: Self = Self(0x0400_0000);
    /// `SSL_OP_NO_TLSv1_2`.
    pub const NO_TLSV1_2: Self = Self(0x0800_0000);
    /// `SSL_OP_NO_TLSv1_1`.
    pub const NO_TLSV1_1: Self = Self(0x1000_0000);
    /// TLS 1.0 and TLS 1.1 refused. Attached to every loaded config.
    pub const LEGACY_DISABLED: Self = Self(Self::NO_TLSV1.0 | Self::NO_TLSV1_1.0);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u64 {
        self.0
    }

    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Protocol versions rustls may still negotiate under these flags.
    ///
    /// rustls never implements TLS 1.0/1.1, so only the 1.2 bit matters here.
    pub fn protocol_versions(&self) -> Vec<&'static rustls::SupportedProtocolVersion> {
        let mut versions = vec![&rustls::version::TLS13];
        if !self.contains(Self::NO_TLSV1_2) {
            versions.push(&rustls::version::TLS12);
        }
        versions
    }
}

impl std::ops::BitOr for SecureOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::fmt::Display for SecureOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// File contents in the same shape as [`TlsConfig`](crate::tls::TlsConfig).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsMaterial {
    CertKey {
        cert: Bytes,
        key: Bytes,
        ca: Option<Bytes>,
    },
    Pfx { pfx: Bytes },
}

/// Loaded material plus the protocol flags for the listener layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTlsConfig {
    pub material: TlsMaterial,
    pub secure_options: SecureOptions,
}

impl LoadedTlsConfig {
    pub fn new(material: TlsMaterial) -> Self {
        Self {
            material,
            secure_options: SecureOptions::LEGACY_DISABLED,
        }
    }

    pub fn cert(&self) -> Option<&Bytes> {
        match &self.material {
            TlsMaterial::CertKey { cert, .. } => Some(cert),
            TlsMaterial::Pfx { .. } => None,
        }
    }

    pub fn key(&self) -> Option<&Bytes> {
        match &self.material {
            TlsMaterial::CertKey { key, .. } => Some(key),
            TlsMaterial::Pfx { .. } => None,
        }
    }

    pub fn ca(&self) -> Option<&Bytes> {
        match &self.material {
            TlsMaterial::CertKey { ca, .. } => ca.as_ref(),
            TlsMaterial::Pfx { .. } => None,
        }
    }

    pub fn pfx(&self) -> Option<&Bytes> {
        match &self.material {
            TlsMaterial::Pfx { pfx } => Some(pfx),
            TlsMaterial::CertKey { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_disabled_bits() {
        let flags = SecureOptions::LEGACY_DISABLED;
        assert_eq!(flags.bits(), 0x1400_0000);
        assert!(flags.contains(SecureOptions::NO_TLSV1));
        assert!(flags.contains(SecureOptions::NO_TLSV1_1));
        assert!(!flags.contains(SecureOptions::NO_TLSV1_2));
    }

    #[test]
    fn protocol_versions_follow_flags() {
        assert_eq!(SecureOptions::LEGACY_DISABLED.protocol_versions().len(), 2);

        let strict = SecureOptions::LEGACY_DISABLED | SecureOptions::NO_TLSV1_2;
        let versions = strict.protocol_versions();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].version, rustls::ProtocolVersion::TLSv1_3);
    }

    #[test]
    fn pfx_accessors() {
        let loaded = LoadedTlsConfig::new(TlsMaterial::Pfx {
            pfx: Bytes::from_static(b"bundle"),
        });
        assert_eq!(loaded.pfx().map(|b| b.as_ref()), Some(&b"bundle"[..]));
        assert!(loaded.cert().is_none());
        assert!(loaded.key().is_none());
        assert!(loaded.ca().is_none());
        assert_eq!(loaded.secure_options, SecureOptions::LEGACY_DISABLED);
    }
}

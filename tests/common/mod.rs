//! Shared utilities for integration tests.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// A temp directory holding `dir/cert.file`, `dir/key.file` and `dir/ca.file`
/// with the contents "cert", "key" and "ca".
pub struct Fixtures {
    root: TempDir,
}

impl Fixtures {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("dir");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("cert.file"), "cert").unwrap();
        fs::write(dir.join("key.file"), "key").unwrap();
        fs::write(dir.join("ca.file"), "ca").unwrap();
        Self { root }
    }

    /// Absolute path string for a fixture (or missing) file under `dir/`.
    pub fn path(&self, name: &str) -> String {
        self.root.path().join("dir").join(name).display().to_string()
    }

    #[allow(dead_code)]
    pub fn root(&self) -> &Path {
        self.root.path()
    }
}

/// Path string for a PEM file under `tests/fixtures/`.
#[allow(dead_code)]
pub fn pem_fixture(name: &str) -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
        .display()
        .to_string()
}

/// `["node", "script", ...extra]`.
pub fn argv<S: AsRef<str>>(extra: &[S]) -> Vec<String> {
    ["node", "script"]
        .iter()
        .map(|s| s.to_string())
        .chain(extra.iter().map(|s| s.as_ref().to_string()))
        .collect()
}

/// An environment map from pairs.
pub fn env(pairs: &[(&str, String)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

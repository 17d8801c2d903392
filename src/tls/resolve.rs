//! Option resolution from argv and environment.
//!
//! # Responsibilities
//! - Locate `--tls-cert`, `--tls-key` and `--tls-ca` in the argument vector
//! - Fall back to `TLS_CERT`, `TLS_KEY` and `TLS_CA` as a unit
//! - Consume matched arguments unless asked to preserve them
//!
//! # Design Decisions
//! - The command line wins for the whole triple once `--tls-cert` is present;
//!   sources are never mixed per field
//! - Removal collects indices first and rebuilds the vector afterwards

use std::collections::BTreeSet;
use std::ffi::OsString;

use crate::tls::env::Environment;
use crate::tls::normalize::{normalize, TlsConfig};

/// Long option naming the certificate (or PKCS#12 bundle) path.
pub const CERT_FLAG: &str = "--tls-cert";
/// Long option naming the private key path.
pub const KEY_FLAG: &str = "--tls-key";
/// Long option naming the certificate authority path.
pub const CA_FLAG: &str = "--tls-ca";

/// Environment variable naming the certificate path.
pub const CERT_VAR: &str = "TLS_CERT";
/// Environment variable naming the private key path.
pub const KEY_VAR: &str = "TLS_KEY";
/// Environment variable naming the certificate authority path.
pub const CA_VAR: &str = "TLS_CA";

/// Paths as found on the command line or in the environment, before
/// classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOptions {
    pub cert: Option<String>,
    pub key: Option<String>,
    pub ca: Option<String>,
}

impl RawOptions {
    /// Classify into a [`TlsConfig`].
    pub fn normalize(self) -> Option<TlsConfig> {
        normalize(self.cert, self.key, self.ca)
    }

    /// True when no path was found.
    pub fn is_empty(&self) -> bool {
        self.cert.is_none() && self.key.is_none() && self.ca.is_none()
    }
}

/// Where a resolved option set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionSource {
    CommandLine,
    Environment,
    None,
}

impl std::fmt::Display for OptionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionSource::CommandLine => write!(f, "command-line"),
            OptionSource::Environment => write!(f, "environment"),
            OptionSource::None => write!(f, "none"),
        }
    }
}

/// A single flag match: the value (if any) and the argument indices it spans.
struct FlagMatch {
    value: Option<String>,
    indices: Vec<usize>,
}

/// Find the first occurrence of `flag`, in either `--flag value` or
/// `--flag=value` form.
fn find_flag(args: &[String], flag: &str) -> Option<FlagMatch> {
    let prefix = format!("{flag}=");

    for (i, arg) in args.iter().enumerate() {
        if arg == flag {
            // A trailing flag has no value; only the flag itself is consumed.
            return Some(match args.get(i + 1) {
                Some(value) => FlagMatch {
                    value: Some(value.clone()),
                    indices: vec![i, i + 1],
                },
                None => FlagMatch {
                    value: None,
                    indices: vec![i],
                },
            });
        }

        if let Some(value) = arg.strip_prefix(&prefix) {
            return Some(FlagMatch {
                value: Some(value.to_string()),
                indices: vec![i],
            });
        }
    }

    None
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Locate the three flags in `args` and pick the winning source.
///
/// Returns the options with the argument indices every flag match spans.
fn scan<E>(args: &[String], env: &E) -> (RawOptions, OptionSource, BTreeSet<usize>)
where
    E: Environment + ?Sized,
{
    let cert = find_flag(args, CERT_FLAG);
    let key = find_flag(args, KEY_FLAG);
    let ca = find_flag(args, CA_FLAG);

    let consumed: BTreeSet<usize> = [&cert, &key, &ca]
        .into_iter()
        .flatten()
        .flat_map(|m| m.indices.iter().copied())
        .collect();

    let value = |m: Option<FlagMatch>| non_empty(m.and_then(|m| m.value));
    let cli = RawOptions {
        cert: value(cert),
        key: value(key),
        ca: value(ca),
    };

    if cli.cert.is_some() {
        return (cli, OptionSource::CommandLine, consumed);
    }

    let from_env = RawOptions {
        cert: non_empty(env.var(CERT_VAR)),
        key: non_empty(env.var(KEY_VAR)),
        ca: non_empty(env.var(CA_VAR)),
    };
    let source = if from_env.cert.is_some() {
        OptionSource::Environment
    } else {
        OptionSource::None
    };
    (from_env, source, consumed)
}

/// Drop the elements at `consumed`, keeping the order of the rest.
fn remove_indices<T>(args: &mut Vec<T>, consumed: &BTreeSet<usize>) -> usize {
    if consumed.is_empty() {
        return 0;
    }
    let before = args.len();
    let remaining = std::mem::take(args)
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !consumed.contains(i))
        .map(|(_, arg)| arg)
        .collect();
    *args = remaining;
    before - args.len()
}

fn log_resolved(options: &RawOptions, source: OptionSource, removed: usize) {
    tracing::debug!(
        source = %source,
        cert = ?options.cert,
        key = ?options.key,
        ca = ?options.ca,
        removed,
        "TLS options resolved"
    );
}

/// Resolve raw TLS paths from `args` and `env`.
///
/// Unless `preserve` is set, the matched flag elements (and the value element
/// of the space-delimited form) are removed from `args`, keeping the order of
/// everything else.
pub fn resolve_raw_options<E>(args: &mut Vec<String>, env: &E, preserve: bool) -> RawOptions
where
    E: Environment + ?Sized,
{
    let (options, source, consumed) = scan(args, env);
    let removed = if preserve {
        0
    } else {
        remove_indices(args, &consumed)
    };
    log_resolved(&options, source, removed);
    options
}

/// [`resolve_raw_options`] over OS arguments, which need not be UTF-8.
///
/// Flags are matched on a lossy view of each argument. Arguments that are not
/// consumed come back untouched.
pub fn resolve_raw_os_options<E>(args: &mut Vec<OsString>, env: &E, preserve: bool) -> RawOptions
where
    E: Environment + ?Sized,
{
    let lossy: Vec<String> = args
        .iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    let (options, source, consumed) = scan(&lossy, env);
    let removed = if preserve {
        0
    } else {
        remove_indices(args, &consumed)
    };
    log_resolved(&options, source, removed);
    options
}

/// Resolve and classify in one step.
pub fn resolve<E>(args: &mut Vec<String>, env: &E, preserve: bool) -> Option<TlsConfig>
where
    E: Environment + ?Sized,
{
    resolve_raw_options(args, env, preserve).normalize()
}

/// Resolve and classify OS arguments in one step.
pub fn resolve_os<E>(args: &mut Vec<OsString>, env: &E, preserve: bool) -> Option<TlsConfig>
where
    E: Environment + ?Sized,
{
    resolve_raw_os_options(args, env, preserve).normalize()
}

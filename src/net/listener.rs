//! Listener factory: plain or TLS depending on resolved options.
//!
//! # Responsibilities
//! - Resolve and load TLS material (blocking, consuming flags)
//! - Merge loaded material into caller-supplied listener options
//! - Build a plain or TLS listener and report which one via `is_tls`
//! - Bind and serve an axum router on either transport

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ListenerOptions;
use crate::net::tls::{rustls_config, TlsError};
use crate::tls::{self, Environment, LoadError, LoadedTlsConfig};

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Failed to bind to address.
    #[error("Failed to bind: {0}")]
    Bind(#[source] std::io::Error),
    /// TLS material could not be turned into a server config.
    #[error("Failed to configure TLS: {0}")]
    Tls(#[from] TlsError),
    /// The server stopped with an I/O error.
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Listener options and request handler, in any of the accepted shapes.
///
/// A bare [`Router`] is the handler with default options; bare
/// [`ListenerOptions`] get an empty router.
#[derive(Debug, Clone, Default)]
pub struct ListenerArgs {
    pub options: ListenerOptions,
    pub router: Router,
}

impl From<Router> for ListenerArgs {
    fn from(router: Router) -> Self {
        Self {
            options: ListenerOptions::default(),
            router,
        }
    }
}

impl From<ListenerOptions> for ListenerArgs {
    fn from(options: ListenerOptions) -> Self {
        Self {
            options,
            router: Router::new(),
        }
    }
}

impl From<(ListenerOptions, Router)> for ListenerArgs {
    fn from((options, router): (ListenerOptions, Router)) -> Self {
        Self { options, router }
    }
}

/// An unbound listener: options (with any merged TLS material) and a router.
#[derive(Debug, Clone)]
pub struct Listener {
    options: ListenerOptions,
    router: Router,
    tls: bool,
}

impl Listener {
    /// Plain listener using the options as given.
    pub fn plain(options: ListenerOptions, router: Router) -> Self {
        Self {
            options,
            router,
            tls: false,
        }
    }

    /// TLS listener. `options.tls` must carry the material by bind time.
    pub fn secure(options: ListenerOptions, router: Router) -> Self {
        Self {
            options,
            router,
            tls: true,
        }
    }

    /// Merge `loaded` into `options` and pick the transport.
    pub fn from_loaded(
        mut options: ListenerOptions,
        loaded: Option<LoadedTlsConfig>,
        router: Router,
    ) -> Self {
        match loaded {
            Some(loaded) => {
                options.tls.merge(&loaded);
                Self::secure(options, router)
            }
            None => Self::plain(options, router),
        }
    }

    /// True for a TLS listener.
    pub fn is_tls(&self) -> bool {
        self.tls
    }

    /// The options the listener was built with, TLS material merged.
    pub fn options(&self) -> &ListenerOptions {
        &self.options
    }

    /// Bind the TCP socket. For TLS the rustls config is built first so
    /// certificate problems surface before the port is taken.
    pub async fn bind(self) -> Result<BoundListener, ListenerError> {
        let tls = if self.tls {
            Some(rustls_config(&self.options.tls)?)
        } else {
            None
        };

        let inner = TcpListener::bind(&self.options.bind_address)
            .await
            .map_err(ListenerError::Bind)?;
        let local_addr = inner.local_addr().map_err(ListenerError::Bind)?;

        tracing::info!(
            address = %local_addr,
            tls = self.tls,
            "Listener bound"
        );

        Ok(BoundListener {
            inner,
            local_addr,
            app: build_app(self.router, &self.options),
            tls,
        })
    }
}

/// Attach the tracing and timeout layers.
fn build_app(router: Router, options: &ListenerOptions) -> Router {
    router
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(options.request_timeout_secs),
        ))
        .layer(TraceLayer::new_for_http())
}

/// A bound listener ready to serve.
pub struct BoundListener {
    inner: TcpListener,
    local_addr: SocketAddr,
    app: Router,
    tls: Option<RustlsConfig>,
}

impl BoundListener {
    /// Get the local address this listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// True when serving TLS.
    pub fn is_tls(&self) -> bool {
        self.tls.is_some()
    }

    /// Serve until `shutdown` resolves, then stop gracefully.
    pub async fn serve<F>(self, shutdown: F) -> Result<(), ListenerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match self.tls {
            None => {
                axum::serve(self.inner, self.app)
                    .with_graceful_shutdown(shutdown)
                    .await
                    .map_err(ListenerError::Serve)?;
            }
            Some(config) => {
                let listener = self.inner.into_std().map_err(ListenerError::Bind)?;
                let handle = axum_server::Handle::new();

                let shutdown_handle = handle.clone();
                let forward = tokio::spawn(async move {
                    shutdown.await;
                    shutdown_handle.graceful_shutdown(None);
                });

                let served = axum_server::from_tcp_rustls(listener, config)
                    .handle(handle)
                    .serve(self.app.into_make_service())
                    .await;
                // The shutdown future must not outlive the server.
                forward.abort();
                served.map_err(ListenerError::Serve)?;
            }
        }

        tracing::info!(address = %self.local_addr, "Listener stopped");
        Ok(())
    }
}

/// Resolve TLS options from `args`/`env` (consuming matched flags), load them
/// and build a plain or TLS listener.
///
/// Loaded fields override caller-supplied TLS fields of the same name; every
/// other option passes through unchanged. File errors are returned as is.
pub fn create_listener_sync<E>(
    args: &mut Vec<String>,
    env: &E,
    listener_args: impl Into<ListenerArgs>,
) -> Result<Listener, LoadError>
where
    E: Environment + ?Sized,
{
    let ListenerArgs { options, router } = listener_args.into();
    let loaded = tls::read_sync(args, env, false)?;
    Ok(Listener::from_loaded(options, loaded, router))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use bytes::Bytes;
    use std::collections::HashMap;

    use crate::tls::TlsMaterial;

    #[test]
    fn router_alone_gets_default_options() {
        let args: ListenerArgs = Router::new().route("/", get(|| async { "ok" })).into();
        assert_eq!(args.options.bind_address, ListenerOptions::default().bind_address);
    }

    #[test]
    fn no_material_is_plain() {
        let listener = Listener::from_loaded(ListenerOptions::default(), None, Router::new());
        assert!(!listener.is_tls());
        assert!(listener.options().tls.is_empty());
    }

    #[test]
    fn loaded_material_is_secure() {
        let options = ListenerOptions {
            bind_address: "127.0.0.1:9443".into(),
            ..Default::default()
        };
        let loaded = LoadedTlsConfig::new(TlsMaterial::Pfx {
            pfx: Bytes::from_static(b"bundle"),
        });
        let listener = Listener::from_loaded(options, Some(loaded), Router::new());
        assert!(listener.is_tls());
        assert_eq!(listener.options().bind_address, "127.0.0.1:9443");
        assert_eq!(listener.options().tls.pfx.as_deref(), Some(&b"bundle"[..]));
    }

    #[test]
    fn factory_without_tls_options_is_plain() {
        let mut args = vec!["tlsopt-serve".to_string(), "--verbose".to_string()];
        let env: HashMap<String, String> = HashMap::new();
        let listener = create_listener_sync(&mut args, &env, ListenerOptions::default()).unwrap();
        assert!(!listener.is_tls());
        assert_eq!(args.len(), 2);
    }

    #[tokio::test]
    async fn invalid_material_fails_at_bind() {
        let options = ListenerOptions {
            bind_address: "127.0.0.1:0".into(),
            ..Default::default()
        };
        let loaded = LoadedTlsConfig::new(TlsMaterial::CertKey {
            cert: Bytes::from_static(b"cert"),
            key: Bytes::from_static(b"key"),
            ca: None,
        });
        let listener = Listener::from_loaded(options, Some(loaded), Router::new());
        assert!(matches!(listener.bind().await, Err(ListenerError::Tls(_))));
    }
}

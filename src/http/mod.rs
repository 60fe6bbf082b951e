//! The HTTP server, handler and routes.
//!
//! This file itself contains fairly little business logic and just sets up the
//! `hyper` server and catches errors. The main logic is in `handlers.rs`.

use bytes::Bytes;
use futures::FutureExt;
use http_body_util::Full;
use hyper::{header::HeaderValue, service::service_fn};
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server::conn::auto,
};
use std::{
    convert::Infallible,
    future::Future,
    net::{IpAddr, SocketAddr},
    panic::AssertUnwindSafe,
    pin::pin,
    sync::Arc,
};
use tokio::net::{TcpListener, TcpStream};

use crate::{api, prelude::*, store::Store};
use self::handlers::handle;


mod handlers;
mod log;
mod response;

#[cfg(test)]
mod tests;


/// HTTP server configuration.
#[derive(Debug, Clone, confique::Config)]
pub(crate) struct HttpConfig {
    /// The TCP port the HTTP server should listen on.
    #[config(default = 4000)]
    pub(crate) port: u16,

    /// The bind address to listen on.
    #[config(default = "127.0.0.1")]
    pub(crate) address: IpAddr,

    /// Value of the `Access-Control-Allow-Origin` header sent with API
    /// responses and answers to CORS preflight requests. `"*"` allows
    /// frontends from any origin to use the API. If set to an empty string,
    /// no CORS headers are sent and browsers only allow same-origin requests.
    #[config(default = "*")]
    pub(crate) cors_allow_origin: String,
}

impl HttpConfig {
    /// The `Access-Control-Allow-Origin` value to send, if any.
    pub(crate) fn cors_header(&self) -> Result<Option<HeaderValue>> {
        match self.cors_allow_origin.as_str() {
            "" => Ok(None),
            origin => HeaderValue::from_str(origin)
                .map(Some)
                .context("invalid value for 'http.cors_allow_origin'"),
        }
    }
}


// All our responses have a body that is fully in memory.
type Response<T = Full<Bytes>> = hyper::Response<T>;
type Request<T = hyper::body::Incoming> = hyper::Request<T>;


/// Context that the request handler has access to.
struct Context {
    api_root: Arc<api::RootNode>,
    store: Arc<Store>,
    log_http_headers: bool,
    cors_allow_origin: Option<HeaderValue>,
}

impl Context {
    fn new(
        config: &HttpConfig,
        log_http_headers: bool,
        api_root: api::RootNode,
        store: Arc<Store>,
    ) -> Result<Self> {
        Ok(Self {
            api_root: Arc::new(api_root),
            store,
            log_http_headers,
            cors_allow_origin: config.cors_header()?,
        })
    }
}


/// Starts the HTTP server. The future returned by this function must be awaited
/// to actually run it. It resolves once a shutdown signal is received.
pub(crate) async fn serve(
    config: &HttpConfig,
    log_http_headers: bool,
    api_root: api::RootNode,
    store: Arc<Store>,
) -> Result<()> {
    let ctx = Arc::new(Context::new(config, log_http_headers, api_root, store)?);

    let addr = SocketAddr::new(config.address, config.port);
    let listener = TcpListener::bind(addr).await
        .with_context(|| format!("failed to bind to {addr}"))?;
    info!("Listening on http://{}", listener.local_addr()?);

    let mut shutdown = pin!(shutdown_signal());
    loop {
        let (stream, peer) = tokio::select! {
            res = listener.accept() => match res {
                Ok(conn) => conn,
                Err(e) => {
                    // Errors here are usually about this single connection
                    // (e.g. the peer hung up), so we just keep accepting.
                    warn!("Failed to accept TCP connection: {e}");
                    continue;
                }
            },
            _ = &mut shutdown => break,
        };

        serve_connection(stream, peer, Arc::clone(&ctx));
    }

    info!("Received shutdown signal, stopping HTTP server");
    Ok(())
}

/// Serves all requests of one TCP connection on a new task.
fn serve_connection(stream: TcpStream, peer: SocketAddr, ctx: Arc<Context>) {
    trace!("Accepted connection from {peer}");
    tokio::spawn(async move {
        // All our logic is encoded in the function `handle`. The only thing
        // we are doing here is to pass the context to that function, and
        // clone its `Arc` accordingly.
        let service = service_fn(move |req| {
            handle_internal_errors(handle(req, Arc::clone(&ctx)))
        });

        let builder = auto::Builder::new(TokioExecutor::new());
        if let Err(e) = builder.serve_connection(TokioIo::new(stream), service).await {
            debug!("Error serving connection from {peer}: {e}");
        }
    });
}

/// Resolves when the process receives Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => { s.recv().await; }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

/// This just wraps another future and catches all panics that might occur when
/// resolving/polling that given future. This ensures that we always answer with
/// `500` instead of just crashing the thread and closing the connection.
async fn handle_internal_errors(
    future: impl Future<Output = Response>,
) -> Result<Response, Infallible> {
    // The `AssertUnwindSafe` is unfortunately necessary. What we are saying
    // here is: "if the future panics, the global/remaining application state
    // is not 'broken'." The stores are only ever modified by single
    // non-panicking calls while their lock is held, so that holds.
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(response) => Ok(response),
        Err(panic) => {
            // The `panic` information is just an `Any` object representing the
            // value the panic was invoked with. For most panics (which use
            // `panic!` like `println!`), this is either `&str` or `String`.
            let msg = panic.downcast_ref::<String>()
                .map(|s| s.as_str())
                .or(panic.downcast_ref::<&str>().map(|s| *s));

            match msg {
                Some(msg) => error!("INTERNAL SERVER ERROR: HTTP handler panicked: '{}'", msg),
                None => error!("INTERNAL SERVER ERROR: HTTP handler panicked"),
            }

            Ok(response::internal_server_error())
        }
    }
}

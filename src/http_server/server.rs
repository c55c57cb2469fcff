//! # HTTP Server
//!
//! The listener for the compras API. Every request goes through a single
//! dispatch handler that consults the route table, so unknown paths and
//! unsupported methods still get a JSON body instead of axum's defaults.

use std::any::Any;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::{to_bytes, Bytes};
use axum::extract::{Request, State};
use axum::response::Response;
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::{
    panic_response, resolve, ApiError, ApiHandler, Outcome, Route, StatusPolicy, ROUTES,
};
use crate::storage::Stores;

use super::config::HttpServerConfig;

/// Largest POST body read into memory
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// State shared by every request
#[derive(Clone)]
struct AppState {
    handler: ApiHandler,
    policy: StatusPolicy,
}

/// HTTP Server for the compras API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over the given stores
    pub fn new(stores: Arc<Stores>, config: HttpServerConfig) -> Self {
        let router = Self::build_router(ApiHandler::new(stores), config.status_codes);
        Self { config, router }
    }

    /// Build the router: one fallback handler behind tracing and panic guards
    fn build_router(handler: ApiHandler, policy: StatusPolicy) -> Router {
        let state = AppState { handler, policy };
        with_guards(Router::new().fallback(dispatch).with_state(state), policy)
    }

    /// Get the configured socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind the listening socket without serving yet
    pub async fn bind(self) -> io::Result<BoundServer> {
        let listener = TcpListener::bind(self.config.socket_addr()).await?;
        Ok(BoundServer {
            listener,
            router: self.router,
        })
    }

    /// Bind and serve until SIGINT or SIGTERM
    pub async fn start(self) -> io::Result<()> {
        self.bind().await?.serve_until(shutdown_signal()).await
    }
}

/// A server whose socket is bound and ready to accept connections
pub struct BoundServer {
    listener: TcpListener,
    router: Router,
}

impl BoundServer {
    /// Address the socket is bound to (resolves port 0)
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve requests until `shutdown` completes, then drain in-flight
    /// requests and release the socket.
    pub async fn serve_until<F>(self, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.listener.local_addr()?;
        info!(%addr, "compras API listening");
        for entry in ROUTES.iter() {
            info!(method = %entry.method, path = entry.path, "route registered");
        }

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!(%addr, "compras API stopped");
        Ok(())
    }
}

/// Wraps a router in request tracing and turns handler panics into the
/// JSON failure response.
fn with_guards(router: Router, policy: StatusPolicy) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CatchPanicLayer::custom(
                move |panic: Box<dyn Any + Send + 'static>| panic_response(policy, panic),
            )),
    )
}

/// Routes and executes one request.
async fn dispatch(State(state): State<AppState>, request: Request) -> Response {
    let route = resolve(request.method(), request.uri().path());

    let body = match &route {
        Route::Matched(operation) if operation.reads_body() => {
            match to_bytes(request.into_body(), MAX_BODY_BYTES).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    return Outcome::WriteFailed(ApiError::UnreadableBody(e.to_string()))
                        .into_response(state.policy)
                }
            }
        }
        _ => Bytes::new(),
    };

    state
        .handler
        .handle(route, &body)
        .await
        .into_response(state.policy)
}

/// Completes on SIGINT or SIGTERM (Ctrl+C elsewhere).
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                warn!("could not register signal handlers, falling back to ctrl_c");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    info!("shutdown signal received");
}

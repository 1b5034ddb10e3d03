//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the proxy handler
//! - Wire up middleware (tracing, request ID, optional timeout)
//! - Bind server to listener and serve with graceful shutdown
//! - Enforce the inbound contract (POST only, JSON payload)
//! - Hand decoded payloads to the forwarder and shape its output

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode},
    response::Response,
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ProxyConfig;
use crate::forward::Forwarder;
use crate::http::request::{RequestIdLayer, X_REQUEST_ID};
use crate::http::response::{json_response, plain_error};
use crate::lifecycle::ShutdownSignal;
use crate::store::ExchangeStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<Forwarder>,
}

/// HTTP server for the forwarding proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
    store: ExchangeStore,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// The exchange ledger and forwarder are constructed here and injected
    /// into the handler state; there is no hidden global state.
    pub fn new(config: ProxyConfig) -> Self {
        let store = ExchangeStore::new();
        let forwarder = Arc::new(Forwarder::new(config.upstream.clone(), store.clone()));

        let state = AppState { forwarder };
        let router = Self::build_router(&config, state);

        Self {
            router,
            config,
            store,
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// `/proxy` is bound with `any` so the handler owns the 405 response
    /// body instead of the router's default.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/proxy", any(proxy_handler))
            .with_state(state)
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http());

        // Hardening extension, off by default: the original enforces no
        // request timeout.
        if let Some(secs) = config.timeouts.request_secs {
            router = router.layer(TimeoutLayer::new(Duration::from_secs(secs)));
        }

        router
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.recv().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Handle to the exchange ledger, for embedding and tests.
    pub fn store(&self) -> ExchangeStore {
        self.store.clone()
    }
}

/// Main proxy handler.
/// Validates the inbound call, forwards it, and shapes the result.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    if request.method() != Method::POST {
        tracing::warn!(
            request_id = %request_id,
            method = %request.method(),
            "Rejected non-POST invocation"
        );
        return plain_error(StatusCode::METHOD_NOT_ALLOWED, "Only POST method is allowed");
    }

    // An unreadable body and malformed JSON collapse to the same error.
    let payload = match axum::body::to_bytes(request.into_body(), usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Failed to read request body");
            return plain_error(StatusCode::BAD_REQUEST, "Invalid JSON format");
        }
    };

    match state.forwarder.forward_raw(&payload).await {
        Ok(response) => {
            tracing::info!(
                request_id = %request_id,
                exchange_id = %response.id,
                status = response.status,
                length = response.length,
                "Exchange completed"
            );
            json_response(&response)
        }
        Err(err) => {
            tracing::error!(request_id = %request_id, error = %err, "Exchange failed");
            plain_error(err.status_code(), err.public_message())
        }
    }
}

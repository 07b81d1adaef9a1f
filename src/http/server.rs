//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the dispatch middleware in front
//! - Wire up middleware (tracing, timeout, request ID)
//! - Swap dispatch snapshots on config reload
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{HeaderName, Request},
    middleware,
    response::{IntoResponse, Json},
    Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::app::{AppLoader, AppRegistry, ApplicationContext, Dispatcher, FsAppLoader};
use crate::config::{ConfigError, MultiAppConfig};
use crate::http::middleware::{dispatch_middleware, DispatchState};
use crate::http::request::{request_id, MakeRequestUuidV4, X_REQUEST_ID};
use crate::routing::{RequestContext, Resolution};

/// HTTP server for the multi-app dispatcher.
pub struct HttpServer {
    router: Router,
    state: DispatchState,
    registry: Arc<AppRegistry>,
    loader: Arc<dyn AppLoader>,
}

impl HttpServer {
    /// Create a server, failing if the app tables in `config` are malformed.
    pub fn new(config: MultiAppConfig, registry: AppRegistry) -> Result<Self, ConfigError> {
        let registry = Arc::new(registry);
        let loader: Arc<dyn AppLoader> = Arc::new(FsAppLoader::new(registry.clone()));
        let dispatcher = Dispatcher::from_config(&config, &registry, loader.clone())?;
        let state = DispatchState::new(dispatcher);

        let router = Self::build_router(&config, state.clone());
        Ok(Self {
            router,
            state,
            registry,
            loader,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &MultiAppConfig, state: DispatchState) -> Router {
        let x_request_id = HeaderName::from_static(X_REQUEST_ID);

        Router::new()
            .fallback(app_info_handler)
            .layer(middleware::from_fn_with_state(state, dispatch_middleware))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuidV4))
    }

    /// The router, for serving or for driving with `tower::ServiceExt`.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Rebuild the dispatch snapshot from a new config.
    ///
    /// On error the current snapshot stays in place.
    pub fn reload(&self, config: &MultiAppConfig) -> Result<(), ConfigError> {
        let dispatcher = Dispatcher::from_config(config, &self.registry, self.loader.clone())?;
        self.state.swap(dispatcher);
        Ok(())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<MultiAppConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let router = self.router();
        let reloader = Arc::new(self);
        let updates = reloader.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                match updates.reload(&config) {
                    Ok(()) => tracing::info!("Dispatch configuration reloaded"),
                    Err(e) => {
                        tracing::error!(error = %e, "Rejected reloaded config, keeping current snapshot")
                    }
                }
            }
        });

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Body returned by the default handler.
#[derive(Debug, Serialize)]
pub struct AppInfo {
    pub app: Option<String>,
    pub namespace: Option<String>,
    pub bound: bool,
    pub loaded: bool,
    pub root: String,
    pub path_info: String,
    pub request_id: Option<String>,
}

/// Echo which app the request was dispatched to.
async fn app_info_handler(req: Request<Body>) -> impl IntoResponse {
    let extensions = req.extensions();
    let app = extensions.get::<ApplicationContext>();
    let resolution = extensions.get::<Resolution>();
    let (root, path_info) = match extensions.get::<RequestContext>() {
        Some(ctx) => (ctx.root().to_string(), ctx.path_info().to_string()),
        None => (String::new(), req.uri().path().trim_start_matches('/').to_string()),
    };

    Json(AppInfo {
        app: app.map(|a| a.name.clone()),
        namespace: app.map(|a| a.namespace.clone()),
        bound: resolution.is_some_and(|r| r.binding.is_bound),
        loaded: app.is_some_and(|a| a.loaded),
        root,
        path_info,
        request_id: request_id(&req).map(str::to_string),
    })
}

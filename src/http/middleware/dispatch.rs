//! Multi-app dispatch middleware.
//!
//! ```text
//! Undecided ──NoMatch──▶ Forwarded  (request passed on untouched)
//!     │
//!     ├──NotFound──▶ 404
//!     │
//!     └──resolved──▶ Activated  (app-stage chain, then next handler)
//! ```

use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::{Chain, Dispatch, Dispatcher, APP_STAGE};
use crate::observability::metrics;

/// Pins the app for a request; set by a layer in front of the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppBinding(pub String);

/// Shared handle on the current dispatch snapshot.
#[derive(Debug, Clone)]
pub struct DispatchState {
    dispatcher: Arc<ArcSwap<Dispatcher>>,
}

impl DispatchState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(ArcSwap::from_pointee(dispatcher)),
        }
    }

    /// Snapshot used by requests starting now.
    pub fn current(&self) -> Arc<Dispatcher> {
        self.dispatcher.load_full()
    }

    /// Replace the snapshot; in-flight requests keep the old one.
    pub fn swap(&self, dispatcher: Dispatcher) {
        self.dispatcher.store(Arc::new(dispatcher));
    }
}

pub async fn dispatch_middleware(
    State(state): State<DispatchState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let dispatcher = state.current();
    let mut ctx = dispatcher.context_for(&req);
    let bound = req.extensions().get::<AppBinding>().map(|b| b.0.clone());

    match dispatcher.dispatch(&mut ctx, bound.as_deref()) {
        Ok(Dispatch::Forwarded) => next.run(req).await,
        Ok(Dispatch::Activated { resolution, app }) => {
            let start = Instant::now();
            let name = app.name.clone();
            let chain = Chain::new(app.pipeline(APP_STAGE), next);

            tracing::debug!(
                app = %name,
                path = %ctx.original_path(),
                root = %ctx.root(),
                path_info = %ctx.path_info(),
                bound = resolution.binding.is_bound,
                "Dispatching to app"
            );

            let extensions = req.extensions_mut();
            extensions.insert(ctx);
            extensions.insert(resolution);
            extensions.insert(app);

            let response = chain.run(req).await;
            metrics::record_request(&name, response.status().as_u16(), start);
            response
        }
        Err(e) => e.into_response(),
    }
}

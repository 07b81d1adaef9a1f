//! App-stage middleware chain.
//!
//! Middleware imported from an app's `middleware.toml` runs after the app is
//! activated and before the wrapped handler, in declaration order.

use std::future::Future;
use std::sync::Arc;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use futures_util::future::BoxFuture;

/// Pipeline stage that app middleware is imported into.
pub const APP_STAGE: &str = "app";

/// Middleware that can be named in an app's middleware definitions.
pub trait AppMiddleware: Send + Sync {
    fn handle(&self, req: Request<Body>, next: Chain) -> BoxFuture<'static, Response>;
}

/// Adapter turning an async closure into an [`AppMiddleware`].
pub struct FnMiddleware<F> {
    f: F,
}

/// Build middleware from an async closure, like `axum::middleware::from_fn`.
pub fn middleware_fn<F, Fut>(f: F) -> FnMiddleware<F>
where
    F: Fn(Request<Body>, Chain) -> Fut + Send + Sync,
    Fut: Future<Output = Response> + Send + 'static,
{
    FnMiddleware { f }
}

impl<F, Fut> AppMiddleware for FnMiddleware<F>
where
    F: Fn(Request<Body>, Chain) -> Fut + Send + Sync,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn handle(&self, req: Request<Body>, next: Chain) -> BoxFuture<'static, Response> {
        Box::pin((self.f)(req, next))
    }
}

/// Remaining middleware followed by the wrapped handler.
#[derive(Clone)]
pub struct Chain {
    stack: Arc<[Arc<dyn AppMiddleware>]>,
    index: usize,
    next: Next,
}

impl Chain {
    pub fn new(stack: Arc<[Arc<dyn AppMiddleware>]>, next: Next) -> Self {
        Self {
            stack,
            index: 0,
            next,
        }
    }

    /// Run the next middleware, or the wrapped handler once the stack is exhausted.
    pub async fn run(self, req: Request<Body>) -> Response {
        let current = self.stack.get(self.index).cloned();
        match current {
            Some(middleware) => {
                let rest = Self {
                    index: self.index + 1,
                    ..self
                };
                middleware.handle(req, rest).await
            }
            None => self.next.run(req).await,
        }
    }
}

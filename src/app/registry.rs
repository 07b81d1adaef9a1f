//! Named extension points referenced from configuration.
//!
//! Config files can only name things; the code behind a dynamic `app_map`
//! entry or an app-stage middleware is registered here at startup.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::http::HeaderValue;

use crate::app::activator::ApplicationContext;
use crate::app::pipeline::{middleware_fn, AppMiddleware};
use crate::routing::{DynamicResolver, RequestContext};

/// Response header set by the built-in `app_header` middleware.
pub const X_APP_NAME: &str = "x-app-name";

/// Registry of dynamic app resolvers and app-stage middleware.
#[derive(Clone, Default)]
pub struct AppRegistry {
    dynamic: HashMap<String, DynamicResolver>,
    middleware: HashMap<String, Arc<dyn AppMiddleware>>,
}

impl AppRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the middleware shipped with this crate.
    pub fn with_builtins() -> Self {
        Self::new().with_middleware(
            "app_header",
            middleware_fn(|req, next| async move {
                let app = req
                    .extensions()
                    .get::<ApplicationContext>()
                    .and_then(|app| HeaderValue::from_str(&app.name).ok());
                let mut response = next.run(req).await;
                if let Some(app) = app {
                    response.headers_mut().insert(X_APP_NAME, app);
                }
                response
            }),
        )
    }

    /// Register a handler usable as `{ dynamic = "<name>" }` in `app.app_map`.
    pub fn with_dynamic<F>(mut self, name: impl Into<String>, resolver: F) -> Self
    where
        F: Fn(&RequestContext) -> Option<String> + Send + Sync + 'static,
    {
        self.dynamic.insert(name.into(), Arc::new(resolver));
        self
    }

    /// Register a middleware usable from an app's `middleware.toml`.
    pub fn with_middleware<M>(mut self, name: impl Into<String>, middleware: M) -> Self
    where
        M: AppMiddleware + 'static,
    {
        self.middleware.insert(name.into(), Arc::new(middleware));
        self
    }

    pub fn dynamic(&self, name: &str) -> Option<DynamicResolver> {
        self.dynamic.get(name).cloned()
    }

    pub fn middleware(&self, name: &str) -> Option<Arc<dyn AppMiddleware>> {
        self.middleware.get(name).cloned()
    }
}

impl fmt::Debug for AppRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dynamic: Vec<_> = self.dynamic.keys().collect();
        let mut middleware: Vec<_> = self.middleware.keys().collect();
        dynamic.sort();
        middleware.sort();
        f.debug_struct("AppRegistry")
            .field("dynamic", &dynamic)
            .field("middleware", &middleware)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        let registry = AppRegistry::with_builtins()
            .with_dynamic("mobile", |ctx: &RequestContext| {
                ctx.sub_domain().starts_with('m').then(|| "mobile".to_string())
            });

        assert!(registry.middleware("app_header").is_some());
        assert!(registry.middleware("missing").is_none());

        let resolver = registry.dynamic("mobile").unwrap();
        let ctx = RequestContext::new("/", "m.example.com", None);
        assert_eq!(resolver(&ctx).as_deref(), Some("mobile"));
    }

    #[test]
    fn test_debug_lists_names() {
        let registry = AppRegistry::with_builtins().with_dynamic("b", |_: &RequestContext| None);
        let debug = format!("{registry:?}");
        assert!(debug.contains("app_header"));
        assert!(debug.contains("\"b\""));
    }
}

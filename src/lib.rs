//! Multi-application dispatch for Axum services.
//!
//! Routes each request to a sub-application chosen by explicit binding,
//! domain binding, or the first path segment, then activates that app by
//! loading its definition files into a request-local context.

pub mod app;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use app::{AppRegistry, ApplicationContext, Dispatcher};
pub use config::MultiAppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{AppResolver, Decline, RequestContext};

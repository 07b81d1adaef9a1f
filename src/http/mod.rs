//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → middleware/dispatch.rs (resolve + activate the app)
//!     → app-stage middleware chain
//!     → handler
//!     → response.rs (dispatch errors → status codes)
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use middleware::{AppBinding, DispatchState};
pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{AppInfo, HttpServer};

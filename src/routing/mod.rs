//! Routing subsystem: which sub-application owns a request.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, path)
//!     → context.rs (domain, sub-domain, path info)
//!     → resolver.rs (binding → domain → path segment → default)
//!     → Return: Resolution, or Decline::{NoMatch, NotFound}
//!
//! Snapshot Compilation (at startup and on reload):
//!     ConfigProvider (`app.*` keys) + AppRegistry (dynamic handlers)
//!     → ResolutionConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Snapshot compiled up front, immutable at runtime
//! - Deterministic: same input always resolves the same way
//! - Explicit decline rather than silent default when no app directory exists

pub mod context;
pub mod resolver;

pub use context::RequestContext;
pub use resolver::{
    AppResolver, AppTarget, BindingState, Decline, DynamicResolver, Resolution, ResolutionConfig,
};

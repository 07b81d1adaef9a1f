//! Application activation subsystem.
//!
//! # Data Flow
//! ```text
//! dispatcher.rs (snapshot: resolver + activator)
//!     → routing::resolver (app name, or decline)
//!     → activator.rs (app path, namespace, runtime/route dirs)
//!     → loader.rs, one step at a time:
//!         common → config → events → middleware → providers → language
//!     → ApplicationContext (request-local)
//!     → pipeline.rs (app-stage middleware chain before the handler)
//! ```
//!
//! # Design Decisions
//! - Config files and middleware refer to code by name; registry.rs maps
//!   names to implementations at startup
//! - Missing files are skipped; a bare directory is a valid app

pub mod activator;
pub mod dispatcher;
pub mod loader;
pub mod pipeline;
pub mod registry;

pub use activator::{
    ActivationError, ActivationSettings, AppActivator, ApplicationContext, LoadStep, LOAD_ORDER,
};
pub use dispatcher::{Dispatch, DispatchError, Dispatcher};
pub use loader::{AppLoader, EventDefinitions, FsAppLoader, LoadError};
pub use pipeline::{middleware_fn, AppMiddleware, Chain, APP_STAGE};
pub use registry::{AppRegistry, X_APP_NAME};

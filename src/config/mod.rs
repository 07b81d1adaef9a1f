//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → MultiAppConfig (validated, immutable)
//!     → provider.rs (dotted key/value view, `app.default_app` etc.)
//!     → ResolutionConfig snapshot shared via Arc
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap of the resolution snapshot
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - A failed reload keeps the previous snapshot

pub mod loader;
pub mod provider;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use provider::{ConfigProvider, ConfigRepository};
pub use schema::{AppConfig, LangConfig, ListenerConfig, MultiAppConfig, ObservabilityConfig};

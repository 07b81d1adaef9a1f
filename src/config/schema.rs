//! Configuration schema definitions.
//!
//! This module defines the configuration file structure for the dispatcher.
//! All types derive Serde traits for deserialization from config files.
//!
//! The mapping tables of the `app` section (`domain_bind`, `app_map`,
//! `deny_app_list`) are kept as raw values. Their shape is checked when the
//! resolution snapshot is built.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Root configuration for the multi-app dispatcher.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MultiAppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Application resolution and layout settings.
    pub app: AppConfig,

    /// Language pack settings.
    pub lang: LangConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Application resolution settings, read through the provider as `app.*`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// App used when nothing else matches.
    pub default_app: String,

    /// Entry-point name the server reports as its script hint.
    pub entry: String,

    /// Explicitly bound app; skips all discovery when set.
    pub bind: Option<String>,

    /// Directory holding one sub-directory per app.
    pub base_path: PathBuf,

    /// Explicit app directory, overriding `base_path/<name>/`.
    pub app_path: Option<PathBuf>,

    /// Root of the per-app runtime (scratch) directories.
    pub runtime_path: PathBuf,

    /// Base directory for route definitions. Defaults to the app directory.
    pub route_base: Option<PathBuf>,

    /// Namespace override for every resolved app.
    pub app_namespace: Option<String>,

    /// Extension of per-app config files, without the dot (`toml` or `json`).
    pub config_ext: String,

    /// Root domain used to derive the sub-domain of a host.
    pub domain_root: Option<String>,

    /// Domain, sub-domain or `*` to app name.
    pub domain_bind: BTreeMap<String, Value>,

    /// First path segment (or `*`) to a literal app name or `{ dynamic = "<handler>" }`.
    pub app_map: BTreeMap<String, Value>,

    /// Segments that must never resolve as an app.
    pub deny_app_list: Vec<Value>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_app: "index".to_string(),
            entry: "index".to_string(),
            bind: None,
            base_path: PathBuf::from("app"),
            app_path: None,
            runtime_path: PathBuf::from("runtime"),
            route_base: None,
            app_namespace: None,
            config_ext: "toml".to_string(),
            domain_root: None,
            domain_bind: BTreeMap::new(),
            app_map: BTreeMap::new(),
            deny_app_list: Vec::new(),
        }
    }
}

/// Language pack configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LangConfig {
    /// Language pack loaded on activation (`lang/<default_lang>.toml`).
    pub default_lang: String,
}

impl Default for LangConfig {
    fn default() -> Self {
        Self {
            default_lang: "en-us".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

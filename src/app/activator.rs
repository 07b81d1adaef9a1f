//! App activation.
//!
//! # Responsibilities
//! - Compute the app directory, namespace, runtime and route directories
//! - Run the ordered load steps against the app directory
//! - Produce a request-local [`ApplicationContext`]
//!
//! # Design Decisions
//! - Nothing process-wide is mutated; the app config is an overlay copy of
//!   the global provider
//! - Steps run sequentially in [`LOAD_ORDER`]
//! - Missing files are skipped, broken files abort activation
//! - An app name without a directory still activates, with nothing loaded

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::app::loader::{AppLoader, EventDefinitions, LoadError};
use crate::app::pipeline::{AppMiddleware, APP_STAGE};
use crate::config::{ConfigProvider, ConfigRepository};
use crate::observability::metrics;

/// One optional step of loading an app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStep {
    Common,
    Config,
    Events,
    Middleware,
    Providers,
    Language,
}

/// Order in which load steps run.
pub const LOAD_ORDER: [LoadStep; 6] = [
    LoadStep::Common,
    LoadStep::Config,
    LoadStep::Events,
    LoadStep::Middleware,
    LoadStep::Providers,
    LoadStep::Language,
];

impl LoadStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadStep::Common => "common",
            LoadStep::Config => "config",
            LoadStep::Events => "events",
            LoadStep::Middleware => "middleware",
            LoadStep::Providers => "providers",
            LoadStep::Language => "language",
        }
    }
}

impl fmt::Display for LoadStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A load step failed on a file that exists.
#[derive(Debug, Error)]
#[error("failed to load {step} for app `{app}`: {source}")]
pub struct ActivationError {
    pub app: String,
    pub step: LoadStep,
    #[source]
    pub source: LoadError,
}

/// App middleware together with the name it was imported under.
#[derive(Clone)]
pub struct NamedMiddleware {
    pub name: String,
    pub handler: Arc<dyn AppMiddleware>,
}

impl Serialize for NamedMiddleware {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

impl fmt::Debug for NamedMiddleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NamedMiddleware").field(&self.name).finish()
    }
}

/// Everything known about the app handling the current request.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationContext {
    pub name: String,
    pub namespace: String,
    pub app_path: PathBuf,
    /// Set only when the app directory exists.
    pub runtime_path: Option<PathBuf>,
    pub route_path: Option<PathBuf>,
    /// Whether the app directory existed and load steps ran.
    pub loaded: bool,
    /// Steps that found something to load, in order.
    pub steps: Vec<LoadStep>,
    #[serde(skip)]
    pub config: ConfigRepository,
    pub events: EventDefinitions,
    pub middleware: BTreeMap<String, Vec<NamedMiddleware>>,
    pub providers: BTreeMap<String, String>,
    pub lang: BTreeMap<String, Value>,
}

impl ApplicationContext {
    pub(crate) fn new(name: &str, namespace: String, app_path: PathBuf, config: ConfigRepository) -> Self {
        Self {
            name: name.to_string(),
            namespace,
            app_path,
            runtime_path: None,
            route_path: None,
            loaded: false,
            steps: Vec::new(),
            config,
            events: EventDefinitions::default(),
            middleware: BTreeMap::new(),
            providers: BTreeMap::new(),
            lang: BTreeMap::new(),
        }
    }

    /// Middleware imported into `stage`, in import order.
    pub fn pipeline(&self, stage: &str) -> Arc<[Arc<dyn AppMiddleware>]> {
        self.middleware
            .get(stage)
            .map(|list| list.iter().map(|m| m.handler.clone()).collect())
            .unwrap_or_else(|| Arc::from(Vec::new()))
    }

    /// App-scoped configuration (global values overlaid with app files).
    pub fn config(&self) -> &dyn ConfigProvider {
        &self.config
    }
}

/// Directory layout and naming settings for activation.
#[derive(Debug, Clone)]
pub struct ActivationSettings {
    pub base_path: PathBuf,
    pub app_path: Option<PathBuf>,
    pub runtime_root: PathBuf,
    pub route_base: Option<PathBuf>,
    pub app_namespace: Option<String>,
    pub config_ext: String,
    pub default_lang: String,
}

impl Default for ActivationSettings {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("app"),
            app_path: None,
            runtime_root: PathBuf::from("runtime"),
            route_base: None,
            app_namespace: None,
            config_ext: "toml".to_string(),
            default_lang: "en-us".to_string(),
        }
    }
}

impl ActivationSettings {
    pub fn from_provider(provider: &dyn ConfigProvider) -> Self {
        let defaults = Self::default();
        let path = |key: &str| provider.get_str(key).map(PathBuf::from);

        Self {
            base_path: path("app.base_path").unwrap_or(defaults.base_path),
            app_path: path("app.app_path"),
            runtime_root: path("app.runtime_path").unwrap_or(defaults.runtime_root),
            route_base: path("app.route_base"),
            app_namespace: provider.get_str("app.app_namespace").map(str::to_string),
            config_ext: provider
                .get_str("app.config_ext")
                .map(str::to_string)
                .unwrap_or(defaults.config_ext),
            default_lang: provider
                .get_str("lang.default_lang")
                .map(str::to_string)
                .unwrap_or(defaults.default_lang),
        }
    }
}

/// Turns a resolved app name into an [`ApplicationContext`].
#[derive(Clone)]
pub struct AppActivator {
    settings: ActivationSettings,
    loader: Arc<dyn AppLoader>,
}

impl AppActivator {
    pub fn new(settings: ActivationSettings, loader: Arc<dyn AppLoader>) -> Self {
        Self { settings, loader }
    }

    /// Activate `name`, overlaying its files on a copy of `config`.
    pub fn activate(
        &self,
        name: &str,
        config: &ConfigRepository,
    ) -> Result<ApplicationContext, ActivationError> {
        let start = Instant::now();
        let settings = &self.settings;

        let app_path = settings
            .app_path
            .clone()
            .unwrap_or_else(|| settings.base_path.join(name));
        let namespace = settings
            .app_namespace
            .clone()
            .unwrap_or_else(|| format!("app.{name}"));

        let mut app = ApplicationContext::new(name, namespace, app_path.clone(), config.clone());

        if !app_path.is_dir() {
            tracing::debug!(app = %name, path = ?app_path, "App directory missing, nothing to load");
            metrics::record_activation(name, false, start);
            return Ok(app);
        }

        app.runtime_path = Some(settings.runtime_root.join(name));
        app.route_path = Some(
            settings
                .route_base
                .as_ref()
                .unwrap_or(&app_path)
                .join("route"),
        );
        app.loaded = true;

        for step in LOAD_ORDER {
            let found = self.run_step(step, &mut app).map_err(|source| ActivationError {
                app: name.to_string(),
                step,
                source,
            })?;
            if found {
                app.steps.push(step);
            }
        }

        tracing::debug!(
            app = %name,
            namespace = %app.namespace,
            steps = ?app.steps,
            "App activated"
        );
        metrics::record_activation(name, true, start);
        Ok(app)
    }

    fn run_step(&self, step: LoadStep, app: &mut ApplicationContext) -> Result<bool, LoadError> {
        let dir = app.app_path.clone();
        let loader = self.loader.as_ref();
        match step {
            LoadStep::Common => loader.load_common(&dir.join("common.toml"), app),
            LoadStep::Config => {
                loader.load_config_files(&dir.join("config"), &self.settings.config_ext, app)
            }
            LoadStep::Events => loader.load_events(&dir.join("event.toml"), app),
            LoadStep::Middleware => {
                loader.import_middleware(&dir.join("middleware.toml"), APP_STAGE, app)
            }
            LoadStep::Providers => loader.bind_providers(&dir.join("provider.toml"), app),
            LoadStep::Language => {
                loader.load_default_language(&dir.join("lang"), &self.settings.default_lang, app)
            }
        }
    }
}

impl fmt::Debug for AppActivator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppActivator")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

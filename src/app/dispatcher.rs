//! Resolution followed by activation, independent of the transport.
//!
//! A [`Dispatcher`] is one immutable snapshot of everything needed to route a
//! request to an app: the global config tree, the resolution tables and the
//! activator. The HTTP layer swaps whole snapshots on reload; the CLI builds
//! one and uses it once.

use std::sync::Arc;

use axum::http::Request;
use thiserror::Error;

use crate::app::activator::{ActivationError, ActivationSettings, AppActivator, ApplicationContext};
use crate::app::loader::AppLoader;
use crate::app::registry::AppRegistry;
use crate::config::{ConfigError, ConfigProvider, ConfigRepository, MultiAppConfig};
use crate::observability::metrics;
use crate::routing::{AppResolver, Decline, RequestContext, Resolution, ResolutionConfig};

/// Terminal state of a dispatched request.
#[derive(Debug, Clone)]
pub enum Dispatch {
    /// No sub-application claims the request.
    Forwarded,
    /// An app was resolved and activated.
    Activated {
        resolution: Resolution,
        app: ApplicationContext,
    },
}

/// Dispatch failures that stop the request.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("app not exists: {0}")]
    NotFound(String),

    #[error(transparent)]
    Activation(#[from] ActivationError),
}

/// Immutable routing snapshot.
#[derive(Debug)]
pub struct Dispatcher {
    config: ConfigRepository,
    resolution: ResolutionConfig,
    activator: AppActivator,
    script_hint: String,
    domain_root: Option<String>,
}

impl Dispatcher {
    /// Build a snapshot from a loaded config file.
    pub fn from_config(
        config: &MultiAppConfig,
        registry: &AppRegistry,
        loader: Arc<dyn AppLoader>,
    ) -> Result<Self, ConfigError> {
        Self::from_provider(ConfigRepository::from_serializable(config)?, registry, loader)
    }

    /// Build a snapshot from a provider tree.
    pub fn from_provider(
        config: ConfigRepository,
        registry: &AppRegistry,
        loader: Arc<dyn AppLoader>,
    ) -> Result<Self, ConfigError> {
        let resolution = ResolutionConfig::from_provider(&config, registry)?;
        let activator = AppActivator::new(ActivationSettings::from_provider(&config), loader);
        let script_hint = config.get_str("app.entry").unwrap_or_default().to_string();
        let domain_root = config.get_str("app.domain_root").map(str::to_string);

        Ok(Self {
            config,
            resolution,
            activator,
            script_hint,
            domain_root,
        })
    }

    /// Replace the entry-point name used as the script hint.
    pub fn with_script_hint(mut self, script_hint: impl Into<String>) -> Self {
        self.script_hint = script_hint.into();
        self
    }

    pub fn script_hint(&self) -> &str {
        &self.script_hint
    }

    pub fn config(&self) -> &ConfigRepository {
        &self.config
    }

    /// Routing context for a request, using the configured root domain.
    pub fn context_for<B>(&self, req: &Request<B>) -> RequestContext {
        RequestContext::from_request(req, self.domain_root.as_deref())
    }

    /// Routing context for a bare host and path.
    pub fn context(&self, path: &str, host: &str) -> RequestContext {
        RequestContext::new(path, host, self.domain_root.as_deref())
    }

    /// Resolve and, on success, activate the app for `ctx`.
    pub fn dispatch(
        &self,
        ctx: &mut RequestContext,
        bound_hint: Option<&str>,
    ) -> Result<Dispatch, DispatchError> {
        let resolver = AppResolver::new(&self.resolution);

        let resolution = match resolver.resolve(ctx, bound_hint, &self.script_hint) {
            Ok(resolution) => resolution,
            Err(Decline::NoMatch) => {
                metrics::record_resolution("forwarded");
                tracing::debug!(path = %ctx.path_info(), "No app claims the request, forwarding");
                return Ok(Dispatch::Forwarded);
            }
            Err(Decline::NotFound(segment)) => {
                metrics::record_resolution("not_found");
                return Err(DispatchError::NotFound(segment));
            }
        };

        metrics::record_resolution("resolved");
        let app = self.activator.activate(&resolution.name, &self.config)?;

        Ok(Dispatch::Activated { resolution, app })
    }
}

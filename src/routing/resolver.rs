//! Application resolution.
//!
//! # Responsibilities
//! - Decide which sub-application handles a request
//! - Strip the resolved app's root from the path info
//! - Report an explicit decline rather than guessing
//!
//! # Precedence
//! ```text
//! 1. explicit binding (bound hint, or script hint outside {index, router})
//! 2. domain binding   (exact domain → sub-domain → "*")
//! 3. path segment     (app_map key → deny/mapped-target 404 → "*" → segment/default)
//! 4. default app
//! ```
//! First matching rule wins; later rules are not evaluated.
//!
//! # Design Decisions
//! - Immutable snapshot, shareable across requests without locks
//! - Case-sensitive exact matching, no normalization
//! - Malformed mapping entries fail at snapshot build time

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::app::registry::AppRegistry;
use crate::config::{ConfigError, ConfigProvider};
use crate::routing::context::RequestContext;

/// Entry-point names that never pin an app.
pub const RESERVED_ENTRIES: [&str; 2] = ["index", "router"];

/// Wildcard key for `domain_bind` and `app_map`.
pub const WILDCARD: &str = "*";

/// Computes an app name from the request. `None` or `""` means "use the segment".
pub type DynamicResolver = Arc<dyn Fn(&RequestContext) -> Option<String> + Send + Sync>;

/// Value side of an `app_map` entry.
#[derive(Clone)]
pub enum AppTarget {
    Literal(String),
    Dynamic {
        handler: String,
        resolver: DynamicResolver,
    },
}

impl fmt::Debug for AppTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppTarget::Literal(name) => f.debug_tuple("Literal").field(name).finish(),
            AppTarget::Dynamic { handler, .. } => {
                f.debug_struct("Dynamic").field("handler", handler).finish()
            }
        }
    }
}

/// Read-only resolution settings, built once per config snapshot.
#[derive(Debug, Clone)]
pub struct ResolutionConfig {
    pub default_app: String,
    pub bind_app: Option<String>,
    pub domain_bind: HashMap<String, String>,
    pub app_map: HashMap<String, AppTarget>,
    pub deny_list: HashSet<String>,
    pub base_path: PathBuf,
    pub app_path: Option<PathBuf>,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            default_app: "index".to_string(),
            bind_app: None,
            domain_bind: HashMap::new(),
            app_map: HashMap::new(),
            deny_list: HashSet::new(),
            base_path: PathBuf::from("app"),
            app_path: None,
        }
    }
}

impl ResolutionConfig {
    /// Read the `app.*` keys from the provider, checking every mapping entry.
    pub fn from_provider(
        provider: &dyn ConfigProvider,
        registry: &AppRegistry,
    ) -> Result<Self, ConfigError> {
        let mut config = Self {
            default_app: provider
                .get_str("app.default_app")
                .unwrap_or("index")
                .to_string(),
            bind_app: provider.get_str("app.bind").map(str::to_string),
            base_path: provider
                .get_str("app.base_path")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("app")),
            app_path: provider.get_str("app.app_path").map(PathBuf::from),
            ..Self::default()
        };

        if let Some(bind) = table(provider, "app.domain_bind")? {
            for (domain, app) in bind {
                let key = format!("app.domain_bind.{domain}");
                // Request hosts are lowercased.
                config
                    .domain_bind
                    .insert(domain.to_lowercase(), app_name(&key, app)?);
            }
        }

        if let Some(map) = table(provider, "app.app_map")? {
            for (segment, target) in map {
                let key = format!("app.app_map.{segment}");
                config
                    .app_map
                    .insert(segment.clone(), app_target(&key, target, registry)?);
            }
        }

        match provider.get("app.deny_app_list") {
            None => {}
            Some(Value::Array(items)) => {
                for (i, item) in items.iter().enumerate() {
                    let key = format!("app.deny_app_list[{i}]");
                    config.deny_list.insert(app_name(&key, item)?);
                }
            }
            Some(_) => {
                return Err(ConfigError::Malformed {
                    key: "app.deny_app_list".to_string(),
                    reason: "expected an array of app names".to_string(),
                })
            }
        }

        Ok(config)
    }

    /// Directory an app is expected to live in.
    pub fn app_dir(&self, name: &str) -> PathBuf {
        match &self.app_path {
            Some(path) => path.clone(),
            None => self.base_path.join(name),
        }
    }

    /// True when `name` is the literal target of some `app_map` entry.
    fn is_mapped_target(&self, name: &str) -> bool {
        self.app_map
            .values()
            .any(|t| matches!(t, AppTarget::Literal(target) if target == name))
    }
}

fn table<'a>(
    provider: &'a dyn ConfigProvider,
    key: &str,
) -> Result<Option<&'a Map<String, Value>>, ConfigError> {
    match provider.get(key) {
        None => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(ConfigError::Malformed {
            key: key.to_string(),
            reason: "expected a table".to_string(),
        }),
    }
}

fn app_name(key: &str, value: &Value) -> Result<String, ConfigError> {
    match value {
        Value::String(name) if !name.is_empty() => Ok(name.clone()),
        _ => Err(ConfigError::Malformed {
            key: key.to_string(),
            reason: format!("expected a non-empty app name, found `{value}`"),
        }),
    }
}

fn app_target(key: &str, value: &Value, registry: &AppRegistry) -> Result<AppTarget, ConfigError> {
    if let Value::Object(entry) = value {
        let handler = match (entry.len(), entry.get("dynamic")) {
            (1, Some(Value::String(handler))) => handler,
            _ => {
                return Err(ConfigError::Malformed {
                    key: key.to_string(),
                    reason: "expected `{ dynamic = \"<handler>\" }`".to_string(),
                })
            }
        };
        let resolver =
            registry
                .dynamic(handler)
                .ok_or_else(|| ConfigError::UnknownDynamicHandler {
                    key: key.to_string(),
                    handler: handler.clone(),
                })?;
        return Ok(AppTarget::Dynamic {
            handler: handler.clone(),
            resolver,
        });
    }

    app_name(key, value).map(AppTarget::Literal)
}

/// Whether the app was pinned or inferred from the path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BindingState {
    pub is_bound: bool,
    pub bound_app: Option<String>,
}

impl BindingState {
    fn bind(&mut self, name: &str) {
        self.is_bound = true;
        self.bound_app = Some(name.to_string());
    }
}

/// Successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub name: String,
    pub binding: BindingState,
}

/// Why no app was resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Decline {
    /// No sub-application claims the request; forward it untouched.
    #[error("no application matched the request")]
    NoMatch,

    /// The segment addresses a mapped target or a denied app directly.
    #[error("app not exists: {0}")]
    NotFound(String),
}

/// Resolves the sub-application for a request against a config snapshot.
#[derive(Debug, Clone, Copy)]
pub struct AppResolver<'a> {
    config: &'a ResolutionConfig,
}

impl<'a> AppResolver<'a> {
    pub fn new(config: &'a ResolutionConfig) -> Self {
        Self { config }
    }

    /// Resolve the app for `ctx`, updating its root and path info when the
    /// name came from the first path segment.
    ///
    /// `bound_hint` is an app name pinned by an earlier layer; it falls back
    /// to the configured `app.bind`. `script_hint` is the entry-point name.
    pub fn resolve(
        &self,
        ctx: &mut RequestContext,
        bound_hint: Option<&str>,
        script_hint: &str,
    ) -> Result<Resolution, Decline> {
        let mut binding = BindingState::default();

        let hint = bound_hint
            .filter(|h| !h.is_empty())
            .or(self.config.bind_app.as_deref());
        let explicit = hint.or_else(|| {
            (!script_hint.is_empty() && !RESERVED_ENTRIES.contains(&script_hint))
                .then_some(script_hint)
        });

        let name = match explicit {
            Some(name) => {
                binding.bind(name);
                tracing::debug!(app = %name, "App explicitly bound");
                Some(name.to_string())
            }
            None => match self.bind_by_domain(ctx) {
                Some(name) => {
                    binding.bind(&name);
                    tracing::debug!(app = %name, domain = %ctx.domain(), "App bound by domain");
                    Some(name)
                }
                None => self.resolve_by_path(ctx)?,
            },
        };

        let name = name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| self.config.default_app.clone());

        Ok(Resolution { name, binding })
    }

    fn bind_by_domain(&self, ctx: &RequestContext) -> Option<String> {
        let bind = &self.config.domain_bind;
        bind.get(ctx.domain())
            .or_else(|| bind.get(ctx.sub_domain()))
            .or_else(|| bind.get(WILDCARD))
            .cloned()
    }

    fn resolve_by_path(&self, ctx: &mut RequestContext) -> Result<Option<String>, Decline> {
        let path = ctx.path_info().to_string();
        let segment = first_segment(&path);

        let name = if let Some(target) = self.config.app_map.get(segment) {
            self.evaluate(target, segment, ctx)
        } else if !segment.is_empty()
            && (self.config.is_mapped_target(segment) || self.config.deny_list.contains(segment))
        {
            tracing::debug!(segment = %segment, "Segment addresses a hidden app");
            return Err(Decline::NotFound(segment.to_string()));
        } else if let Some(target) = self
            .config
            .app_map
            .get(WILDCARD)
            .filter(|_| !segment.is_empty())
        {
            self.evaluate(target, segment, ctx)
        } else {
            let name = if segment.is_empty() {
                self.config.default_app.clone()
            } else {
                segment.to_string()
            };
            if !self.config.app_dir(&name).is_dir() {
                tracing::debug!(app = %name, "No app directory, declining");
                return Err(Decline::NoMatch);
            }
            name
        };

        if !segment.is_empty() {
            ctx.set_root(format!("/{segment}"));
            ctx.set_path_info(
                path.split_once('/')
                    .map(|(_, rest)| rest.trim_start_matches('/'))
                    .unwrap_or_default(),
            );
        }

        Ok(Some(name))
    }

    fn evaluate(&self, target: &AppTarget, segment: &str, ctx: &RequestContext) -> String {
        match target {
            AppTarget::Literal(name) => name.clone(),
            AppTarget::Dynamic { resolver, .. } => resolver(ctx)
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| segment.to_string()),
        }
    }
}

/// First path component, with any extension after the first `.` removed.
///
/// A leading dot is kept so that `.well-known` stays addressable.
pub fn first_segment(path: &str) -> &str {
    let first = path.split('/').next().unwrap_or_default();
    match first.find('.') {
        Some(pos) if pos > 0 => &first[..pos],
        _ => first,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigRepository;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn layout(apps: &[&str]) -> (TempDir, ResolutionConfig) {
        let dir = tempfile::tempdir().unwrap();
        for app in apps {
            fs::create_dir_all(dir.path().join(app)).unwrap();
        }
        let config = ResolutionConfig {
            base_path: dir.path().to_path_buf(),
            ..ResolutionConfig::default()
        };
        (dir, config)
    }

    fn literal(name: &str) -> AppTarget {
        AppTarget::Literal(name.to_string())
    }

    #[test]
    fn test_first_segment() {
        assert_eq!(first_segment("blog/posts"), "blog");
        assert_eq!(first_segment("blog.json/posts"), "blog");
        assert_eq!(first_segment("blog.v1.json"), "blog");
        assert_eq!(first_segment(".well-known/x"), ".well-known");
        assert_eq!(first_segment(""), "");
    }

    #[test]
    fn test_script_hint_binds() {
        let (_dir, config) = layout(&[]);
        let mut ctx = RequestContext::new("/shop/item", "example.com", None);

        let res = AppResolver::new(&config)
            .resolve(&mut ctx, None, "admin")
            .unwrap();
        assert_eq!(res.name, "admin");
        assert!(res.binding.is_bound);
        assert_eq!(res.binding.bound_app.as_deref(), Some("admin"));
        // Path evaluation was skipped.
        assert_eq!(ctx.root(), "");
        assert_eq!(ctx.path_info(), "shop/item");
    }

    #[test]
    fn test_reserved_script_hints_do_not_bind() {
        let (_dir, config) = layout(&["index"]);
        for script in RESERVED_ENTRIES {
            let mut ctx = RequestContext::new("/", "example.com", None);
            let res = AppResolver::new(&config)
                .resolve(&mut ctx, None, script)
                .unwrap();
            assert_eq!(res.name, "index");
            assert!(!res.binding.is_bound);
        }
    }

    #[test]
    fn test_bound_hint_beats_script_and_config() {
        let (_dir, mut config) = layout(&[]);
        config.bind_app = Some("configured".to_string());
        let mut ctx = RequestContext::new("/", "example.com", None);

        let resolver = AppResolver::new(&config);
        let res = resolver.resolve(&mut ctx, Some("pinned"), "cli").unwrap();
        assert_eq!(res.name, "pinned");

        let res = resolver.resolve(&mut ctx, None, "cli").unwrap();
        assert_eq!(res.name, "configured");
        assert!(res.binding.is_bound);
    }

    #[test]
    fn test_domain_precedence() {
        let (_dir, mut config) = layout(&[]);
        config.domain_bind = HashMap::from([
            ("admin.example.com".to_string(), "backend".to_string()),
            ("admin".to_string(), "sub".to_string()),
            ("*".to_string(), "wild".to_string()),
        ]);
        let resolver = AppResolver::new(&config);

        let mut ctx = RequestContext::new("/shop/item", "admin.example.com", None);
        let res = resolver.resolve(&mut ctx, None, "index").unwrap();
        assert_eq!(res.name, "backend");
        assert!(res.binding.is_bound);
        assert_eq!(ctx.root(), "");
        assert_eq!(ctx.path_info(), "shop/item");

        let mut ctx = RequestContext::new("/", "admin.example.org", None);
        assert_eq!(resolver.resolve(&mut ctx, None, "").unwrap().name, "sub");

        let mut ctx = RequestContext::new("/", "www.other.net", None);
        assert_eq!(resolver.resolve(&mut ctx, None, "").unwrap().name, "wild");
    }

    #[test]
    fn test_scenario_existing_directory() {
        let (_dir, config) = layout(&["admin"]);
        let mut ctx = RequestContext::new("/admin/users", "example.com", None);

        let res = AppResolver::new(&config)
            .resolve(&mut ctx, None, "index")
            .unwrap();
        assert_eq!(res.name, "admin");
        assert!(!res.binding.is_bound);
        assert_eq!(ctx.root(), "/admin");
        assert_eq!(ctx.path_info(), "users");
    }

    #[test]
    fn test_scenario_missing_directory_declines() {
        let (_dir, config) = layout(&[]);
        let mut ctx = RequestContext::new("/admin/users", "example.com", None);
        let before = ctx.clone();

        let err = AppResolver::new(&config)
            .resolve(&mut ctx, None, "index")
            .unwrap_err();
        assert_eq!(err, Decline::NoMatch);
        assert_eq!(ctx, before);
    }

    #[test]
    fn test_scenario_mapped_segment() {
        let (_dir, mut config) = layout(&[]);
        config.app_map.insert("shop".to_string(), literal("store"));
        let mut ctx = RequestContext::new("/shop/item", "example.com", None);

        let res = AppResolver::new(&config)
            .resolve(&mut ctx, None, "index")
            .unwrap();
        assert_eq!(res.name, "store");
        assert_eq!(ctx.root(), "/shop");
        assert_eq!(ctx.path_info(), "item");
    }

    #[test]
    fn test_scenario_mapped_target_is_hidden() {
        let (_dir, mut config) = layout(&["store"]);
        config.app_map.insert("shop".to_string(), literal("store"));
        let mut ctx = RequestContext::new("/store/item", "example.com", None);

        let err = AppResolver::new(&config)
            .resolve(&mut ctx, None, "index")
            .unwrap_err();
        assert_eq!(err, Decline::NotFound("store".to_string()));
        assert!(err.to_string().contains("store"));
    }

    #[test]
    fn test_deny_list_wins_over_wildcard() {
        let (_dir, mut config) = layout(&["internal"]);
        config.deny_list.insert("internal".to_string());
        config.app_map.insert("*".to_string(), literal("portal"));
        let mut ctx = RequestContext::new("/internal.json", "example.com", None);

        let err = AppResolver::new(&config)
            .resolve(&mut ctx, None, "index")
            .unwrap_err();
        assert_eq!(err.to_string(), "app not exists: internal");
    }

    #[test]
    fn test_wildcard_map_entry() {
        let (_dir, mut config) = layout(&[]);
        config.app_map.insert("*".to_string(), literal("portal"));
        let mut ctx = RequestContext::new("/news/today", "example.com", None);

        let res = AppResolver::new(&config)
            .resolve(&mut ctx, None, "index")
            .unwrap();
        assert_eq!(res.name, "portal");
        assert_eq!(ctx.root(), "/news");
        assert_eq!(ctx.path_info(), "today");
    }

    #[test]
    fn test_wildcard_skips_empty_segment() {
        let (_dir, mut config) = layout(&["index"]);
        config.app_map.insert("*".to_string(), literal("portal"));
        let resolver = AppResolver::new(&config);

        let mut ctx = RequestContext::new("/", "example.com", None);
        assert_eq!(resolver.resolve(&mut ctx, None, "index").unwrap().name, "index");
        assert_eq!(ctx.root(), "");

        let (_dir, mut config) = layout(&[]);
        config.app_map.insert("*".to_string(), literal("portal"));
        let mut ctx = RequestContext::new("/", "example.com", None);
        let err = AppResolver::new(&config)
            .resolve(&mut ctx, None, "index")
            .unwrap_err();
        assert_eq!(err, Decline::NoMatch);
    }

    #[test]
    fn test_repeated_slashes_trimmed_from_path_info() {
        let (_dir, config) = layout(&["admin"]);
        let mut ctx = RequestContext::new("/admin//users", "example.com", None);

        AppResolver::new(&config)
            .resolve(&mut ctx, None, "index")
            .unwrap();
        assert_eq!(ctx.root(), "/admin");
        assert_eq!(ctx.path_info(), "users");
    }

    #[test]
    fn test_dynamic_entry() {
        let (_dir, mut config) = layout(&[]);
        let by_host: DynamicResolver = Arc::new(|ctx: &RequestContext| {
            (ctx.sub_domain() == "m").then(|| "mobile".to_string())
        });
        config.app_map.insert(
            "blog".to_string(),
            AppTarget::Dynamic {
                handler: "by_host".to_string(),
                resolver: by_host,
            },
        );
        let resolver = AppResolver::new(&config);

        let mut ctx = RequestContext::new("/blog/posts", "m.example.com", None);
        assert_eq!(resolver.resolve(&mut ctx, None, "").unwrap().name, "mobile");

        let mut ctx = RequestContext::new("/blog/posts", "www.example.com", None);
        assert_eq!(resolver.resolve(&mut ctx, None, "").unwrap().name, "blog");
        assert_eq!(ctx.root(), "/blog");
    }

    #[test]
    fn test_extension_stripping_matches_plain_segment() {
        let (_dir, mut config) = layout(&[]);
        config.app_map.insert("blog".to_string(), literal("cms"));
        let resolver = AppResolver::new(&config);

        let mut with_ext = RequestContext::new("/blog.json/posts", "example.com", None);
        let mut plain = RequestContext::new("/blog/posts", "example.com", None);
        let a = resolver.resolve(&mut with_ext, None, "").unwrap();
        let b = resolver.resolve(&mut plain, None, "").unwrap();
        assert_eq!(a, b);
        assert_eq!(with_ext.root(), "/blog");
        assert_eq!(with_ext.path_info(), "posts");
    }

    #[test]
    fn test_empty_path_uses_default_app() {
        let (_dir, config) = layout(&["index"]);
        let mut ctx = RequestContext::new("/", "example.com", None);

        let res = AppResolver::new(&config)
            .resolve(&mut ctx, None, "index")
            .unwrap();
        assert_eq!(res.name, "index");
        assert_eq!(ctx.root(), "");
        assert_eq!(ctx.path_info(), "");
    }

    #[test]
    fn test_segment_without_rest() {
        let (_dir, config) = layout(&["admin"]);
        let mut ctx = RequestContext::new("/admin", "example.com", None);

        AppResolver::new(&config)
            .resolve(&mut ctx, None, "index")
            .unwrap();
        assert_eq!(ctx.root(), "/admin");
        assert_eq!(ctx.path_info(), "");
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let (_dir, mut config) = layout(&[]);
        config.app_map.insert("shop".to_string(), literal("store"));
        let resolver = AppResolver::new(&config);

        let mut first = RequestContext::new("/shop/item/1", "example.com", None);
        let mut second = first.clone();
        let a = resolver.resolve(&mut first, None, "").unwrap();
        let b = resolver.resolve(&mut second, None, "").unwrap();
        assert_eq!(a, b);
        assert_eq!(first, second);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let (_dir, mut config) = layout(&[]);
        config.app_map.insert("shop".to_string(), literal("store"));
        let mut ctx = RequestContext::new("/Shop/item", "example.com", None);

        let err = AppResolver::new(&config)
            .resolve(&mut ctx, None, "")
            .unwrap_err();
        assert_eq!(err, Decline::NoMatch);
    }

    #[test]
    fn test_from_provider_parses_tables() {
        let provider = ConfigRepository::from_serializable(&json!({
            "app": {
                "default_app": "home",
                "domain_bind": { "admin.example.com": "backend" },
                "app_map": { "shop": "store", "blog": { "dynamic": "blog" } },
                "deny_app_list": ["common"],
            }
        }))
        .unwrap();
        let registry = AppRegistry::new().with_dynamic("blog", |_: &RequestContext| None);

        let config = ResolutionConfig::from_provider(&provider, &registry).unwrap();
        assert_eq!(config.default_app, "home");
        assert_eq!(config.domain_bind["admin.example.com"], "backend");
        assert!(matches!(&config.app_map["shop"], AppTarget::Literal(n) if n == "store"));
        assert!(matches!(&config.app_map["blog"], AppTarget::Dynamic { handler, .. } if handler == "blog"));
        assert!(config.deny_list.contains("common"));
    }

    #[test]
    fn test_domain_bind_keys_match_any_case() {
        let provider = ConfigRepository::from_serializable(&json!({
            "app": { "domain_bind": { "Admin.Example.com": "backend" } }
        }))
        .unwrap();
        let config = ResolutionConfig::from_provider(&provider, &AppRegistry::new()).unwrap();

        let mut ctx = RequestContext::new("/x", "Admin.Example.com", None);
        let res = AppResolver::new(&config)
            .resolve(&mut ctx, None, "index")
            .unwrap();
        assert_eq!(res.name, "backend");
        assert!(res.binding.is_bound);
    }

    #[test]
    fn test_from_provider_rejects_malformed_entries() {
        let registry = AppRegistry::new();
        let cases = [
            json!({ "app": { "app_map": { "shop": 42 } } }),
            json!({ "app": { "app_map": { "shop": { "dynamic": "x", "extra": 1 } } } }),
            json!({ "app": { "app_map": ["shop"] } }),
            json!({ "app": { "domain_bind": { "a.com": true } } }),
            json!({ "app": { "deny_app_list": "common" } }),
            json!({ "app": { "deny_app_list": [1] } }),
        ];

        for case in cases {
            let provider = ConfigRepository::from_serializable(&case).unwrap();
            let err = ResolutionConfig::from_provider(&provider, &registry).unwrap_err();
            assert!(matches!(err, ConfigError::Malformed { .. }), "{case}: {err}");
        }
    }

    #[test]
    fn test_from_provider_rejects_unknown_handler() {
        let provider = ConfigRepository::from_serializable(&json!({
            "app": { "app_map": { "blog": { "dynamic": "missing" } } }
        }))
        .unwrap();

        let err = ResolutionConfig::from_provider(&provider, &AppRegistry::new()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownDynamicHandler { ref handler, .. } if handler == "missing"
        ));
    }
}

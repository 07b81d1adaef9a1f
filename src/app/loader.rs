//! Loading of an app's definition files.
//!
//! # Files (relative to the app directory)
//! ```text
//! common.toml            shared values, parsed once per process
//! config/<stem>.<ext>    merged into the app config under <stem> (toml or json)
//! event.toml             bind / listen / subscribe tables
//! middleware.toml        middleware = ["name", ...]
//! provider.toml          abstract = "concrete"
//! lang/<lang>.toml       default language pack
//! ```
//!
//! Every file is optional. A missing file is reported as `Ok(false)`; a
//! present file that cannot be read or parsed is an error.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::app::activator::{ApplicationContext, NamedMiddleware};
use crate::app::registry::AppRegistry;

/// Errors raised while loading a present definition file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse {path}: {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path}: middleware `{name}` is not registered")]
    UnknownMiddleware { path: PathBuf, name: String },
}

/// Event definitions of an app.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EventDefinitions {
    /// Event alias to event name.
    pub bind: BTreeMap<String, String>,
    /// Event name to listener names, in call order.
    pub listen: BTreeMap<String, Vec<String>>,
    /// Subscriber names.
    pub subscribe: Vec<String>,
}

impl EventDefinitions {
    fn extend(&mut self, other: EventDefinitions) {
        self.bind.extend(other.bind);
        for (event, listeners) in other.listen {
            self.listen.entry(event).or_default().extend(listeners);
        }
        self.subscribe.extend(other.subscribe);
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MiddlewareDefinitions {
    middleware: Vec<String>,
}

/// Loads the definition files of an activated app.
pub trait AppLoader: Send + Sync {
    /// Load the shared `common` file.
    fn load_common(&self, path: &Path, app: &mut ApplicationContext) -> Result<bool, LoadError>;

    /// Merge every `dir/*.<ext>` file into the app config, keyed by file stem.
    fn load_config_files(
        &self,
        dir: &Path,
        ext: &str,
        app: &mut ApplicationContext,
    ) -> Result<bool, LoadError>;

    fn load_events(&self, path: &Path, app: &mut ApplicationContext) -> Result<bool, LoadError>;

    /// Resolve middleware names and append them to `stage`.
    fn import_middleware(
        &self,
        path: &Path,
        stage: &str,
        app: &mut ApplicationContext,
    ) -> Result<bool, LoadError>;

    fn bind_providers(&self, path: &Path, app: &mut ApplicationContext) -> Result<bool, LoadError>;

    /// Load `dir/<lang>.toml` into the app language pack.
    fn load_default_language(
        &self,
        dir: &Path,
        lang: &str,
        app: &mut ApplicationContext,
    ) -> Result<bool, LoadError>;
}

/// [`AppLoader`] reading TOML files from disk.
#[derive(Debug)]
pub struct FsAppLoader {
    registry: Arc<AppRegistry>,
    common_cache: DashMap<PathBuf, Arc<Value>>,
}

impl FsAppLoader {
    pub fn new(registry: Arc<AppRegistry>) -> Self {
        Self {
            registry,
            common_cache: DashMap::new(),
        }
    }
}

fn read_file(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    toml::from_str(&read_file(path)?).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a `config/` file with the parser for `ext`.
fn read_config_file(path: &Path, ext: &str) -> Result<Value, LoadError> {
    match ext {
        "json" => {
            serde_json::from_str(&read_file(path)?).map_err(|source| LoadError::ParseJson {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => read_toml(path),
    }
}

impl AppLoader for FsAppLoader {
    fn load_common(&self, path: &Path, app: &mut ApplicationContext) -> Result<bool, LoadError> {
        if !path.is_file() {
            return Ok(false);
        }

        let cached = self.common_cache.get(path).map(|entry| entry.value().clone());
        let common = match cached {
            Some(common) => common,
            None => {
                let parsed = Arc::new(read_toml::<Value>(path)?);
                tracing::debug!(path = ?path, "Parsed common file");
                self.common_cache
                    .entry(path.to_path_buf())
                    .or_insert(parsed)
                    .value()
                    .clone()
            }
        };

        app.config.merge("common", common.as_ref().clone());
        Ok(true)
    }

    fn load_config_files(
        &self,
        dir: &Path,
        ext: &str,
        app: &mut ApplicationContext,
    ) -> Result<bool, LoadError> {
        if !dir.is_dir() {
            return Ok(false);
        }

        let entries = fs::read_dir(dir).map_err(|source| LoadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let mut files = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|source| LoadError::Io {
                    path: dir.to_path_buf(),
                    source,
                })?
                .path();
            if path.is_file() && path.extension().is_some_and(|e| e == ext) {
                files.push(path);
            }
        }
        files.sort();

        for file in &files {
            let Some(stem) = file.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let value = read_config_file(file, ext)?;
            app.config.merge(stem, value);
            tracing::debug!(app = %app.name, section = %stem, "Merged app config file");
        }

        Ok(!files.is_empty())
    }

    fn load_events(&self, path: &Path, app: &mut ApplicationContext) -> Result<bool, LoadError> {
        if !path.is_file() {
            return Ok(false);
        }
        let events: EventDefinitions = read_toml(path)?;
        app.events.extend(events);
        Ok(true)
    }

    fn import_middleware(
        &self,
        path: &Path,
        stage: &str,
        app: &mut ApplicationContext,
    ) -> Result<bool, LoadError> {
        if !path.is_file() {
            return Ok(false);
        }

        let definitions: MiddlewareDefinitions = read_toml(path)?;
        let mut resolved = Vec::with_capacity(definitions.middleware.len());
        for name in definitions.middleware {
            let handler = self
                .registry
                .middleware(&name)
                .ok_or_else(|| LoadError::UnknownMiddleware {
                    path: path.to_path_buf(),
                    name: name.clone(),
                })?;
            resolved.push(NamedMiddleware { name, handler });
        }

        app.middleware
            .entry(stage.to_string())
            .or_default()
            .extend(resolved);
        Ok(true)
    }

    fn bind_providers(&self, path: &Path, app: &mut ApplicationContext) -> Result<bool, LoadError> {
        if !path.is_file() {
            return Ok(false);
        }
        let bindings: BTreeMap<String, String> = read_toml(path)?;
        app.providers.extend(bindings);
        Ok(true)
    }

    fn load_default_language(
        &self,
        dir: &Path,
        lang: &str,
        app: &mut ApplicationContext,
    ) -> Result<bool, LoadError> {
        let path = dir.join(format!("{lang}.toml"));
        if !path.is_file() {
            return Ok(false);
        }
        let pack: BTreeMap<String, Value> = read_toml(&path)?;
        app.lang.extend(pack);
        Ok(true)
    }
}

//! Key/value configuration provider.
//!
//! Configuration is held as a `serde_json::Value` tree and addressed with
//! dotted keys (`app.default_app`). Per-app config files are merged in by
//! file stem during activation.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::loader::ConfigError;

/// Read access to configuration values.
pub trait ConfigProvider: Send + Sync {
    /// Look up a dotted key. `null` values are reported as absent.
    fn get(&self, key: &str) -> Option<&Value>;

    /// Look up a non-empty string value.
    fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// In-memory configuration tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConfigRepository {
    root: Map<String, Value>,
}

impl ConfigRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository from any serializable config struct.
    pub fn from_serializable<T: Serialize>(config: &T) -> Result<Self, ConfigError> {
        match serde_json::to_value(config).map_err(ConfigError::Serialize)? {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(ConfigError::Malformed {
                key: String::new(),
                reason: "configuration root must be a table".to_string(),
            }),
        }
    }

    /// Merge `value` under the top-level key `name`.
    ///
    /// Tables are merged one level deep; anything else replaces the section.
    pub fn merge(&mut self, name: &str, value: Value) {
        if let Value::Object(incoming) = value {
            if let Some(Value::Object(existing)) = self.root.get_mut(name) {
                existing.extend(incoming);
                return;
            }
            self.root.insert(name.to_string(), Value::Object(incoming));
        } else {
            self.root.insert(name.to_string(), value);
        }
    }
}

impl ConfigProvider for ConfigRepository {
    fn get(&self, key: &str) -> Option<&Value> {
        let mut parts = key.split('.');
        let mut current = self.root.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        (!current.is_null()).then_some(current)
    }
}

//! Startup orchestration.
//!
//! # Design Decisions
//! - Fail fast: a config that does not load or validate is fatal
//! - Without a config file the built-in defaults are used
//! - Runs before the subscriber is installed, so it does not log; the
//!   caller reports the outcome

use std::path::Path;

use crate::config::{load_config, ConfigError, MultiAppConfig};

/// Load `path` if given, otherwise fall back to defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<MultiAppConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(MultiAppConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_defaults_without_path() {
        let config = load_or_default(None).unwrap();
        assert_eq!(config.app.default_app, "index");
    }

    #[test]
    fn test_missing_path_is_fatal() {
        assert!(load_or_default(Some(Path::new("/no/such/multiapp.toml"))).is_err());
    }

    #[test]
    fn test_loading_emits_no_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("multiapp.toml");
        std::fs::write(&path, "[app]\ndefault_app = \"home\"").unwrap();

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            load_or_default(Some(&path)).unwrap();
            load_or_default(None).unwrap();
        });

        assert!(captured.0.lock().unwrap().is_empty());
    }
}

//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use multi_app::MultiAppConfig;
use tempfile::TempDir;

/// A throwaway app base directory.
pub struct AppTree {
    dir: TempDir,
}

impl AppTree {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn base(&self) -> &Path {
        self.dir.path()
    }

    /// Create an empty app directory.
    pub fn app(&self, name: &str) -> PathBuf {
        let path = self.base().join(name);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Write `contents` to `app/relative`, creating parents.
    pub fn file(&self, app: &str, relative: &str, contents: &str) {
        let path = self.base().join(app).join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    /// Parse `toml` and point the app and runtime paths into this tree.
    pub fn config(&self, toml: &str) -> MultiAppConfig {
        let mut config = multi_app::config::parse_config(toml).unwrap();
        config.app.base_path = self.base().to_path_buf();
        config.app.runtime_path = self.base().join("runtime");
        config
    }
}

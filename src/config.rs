//! # Configuration Store
//!
//! A small on-disk configuration file so the CLI can omit the repository
//! path: `$XDG_CONFIG_HOME/gitpass/config.json` (falling back to
//! `$HOME/.config`). Like the crypto lifecycle, at most one store may be
//! open per process; the instance flag is released when the store drops.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::{GitPassError, Result};

static CONFIG_HELD: AtomicBool = AtomicBool::new(false);

const DEFAULT_REPOSITORY_KEY: &str = "default_repository";

/// The persisted configuration values.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Configuration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_repository: Option<PathBuf>,

    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

/// Handle to the process's configuration file.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    configuration: Configuration,
}

fn default_config_path() -> Result<PathBuf> {
    let base = match env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => match env::var_os("HOME") {
            Some(home) if !home.is_empty() => PathBuf::from(home).join(".config"),
            _ => {
                return Err(GitPassError::Config(
                    "neither XDG_CONFIG_HOME nor HOME is set".to_string(),
                ))
            }
        },
    };
    Ok(base.join("gitpass").join("config.json"))
}

impl ConfigStore {
    /// Open the configuration store at its default location.
    pub fn open() -> Result<ConfigStore> {
        let path = default_config_path()?;
        Self::open_at(path)
    }

    /// Open the configuration store backed by an explicit file.
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<ConfigStore> {
        if CONFIG_HELD.swap(true, Ordering::SeqCst) {
            return Err(GitPassError::AlreadyInitialized);
        }

        let path = path.as_ref().to_path_buf();
        let configuration = match fs::read_to_string(&path) {
            Ok(contents) if !contents.trim().is_empty() => serde_json::from_str(&contents)
                .map_err(|e| {
                    CONFIG_HELD.store(false, Ordering::SeqCst);
                    GitPassError::Config(e.to_string())
                })?,
            _ => Configuration::default(),
        };

        Ok(ConfigStore {
            path,
            configuration,
        })
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// The configured default repository path, if any.
    pub fn default_repository(&self) -> Option<&Path> {
        self.configuration.default_repository.as_deref()
    }

    /// Look up a configuration value by key name.
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            DEFAULT_REPOSITORY_KEY => Ok(self
                .configuration
                .default_repository
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()),
            _ => Err(GitPassError::Config(format!(
                "unknown configuration key '{}'",
                key
            ))),
        }
    }

    /// Set a configuration value by key name and persist the file.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            DEFAULT_REPOSITORY_KEY => {
                self.configuration.default_repository = Some(PathBuf::from(value));
            }
            _ => {
                return Err(GitPassError::Config(format!(
                    "unknown configuration key '{}'",
                    key
                )))
            }
        }
        self.save()
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut serialized = serde_json::to_string_pretty(&self.configuration)
            .map_err(|e| GitPassError::Config(e.to_string()))?;
        serialized.push('\n');
        fs::write(&self.path, serialized)?;
        Ok(())
    }
}

impl Drop for ConfigStore {
    fn drop(&mut self) {
        CONFIG_HELD.store(false, Ordering::SeqCst);
    }
}

//! Per-user key/value preference store.
//!
//! Values are grouped in named nodes and persisted as one JSON document:
//!
//! ```json
//! { "image-snatcher": { "x": 120.0, "maximized": false } }
//! ```

use crate::config::{PREFERENCES_DIR, PREFERENCES_FILE};
use crate::error::{AppError, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A single stored value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreferenceValue {
    Bool(bool),
    Number(f64),
}

/// Named group of preference values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceNode {
    values: BTreeMap<String, PreferenceValue>,
}

impl PreferenceNode {
    /// Returns the number stored under `key`, or `default`.
    pub fn get_f64(&self, key: &str, default: f64) -> f64 {
        match self.values.get(key) {
            Some(PreferenceValue::Number(value)) => *value,
            _ => default,
        }
    }

    pub fn put_f64(&mut self, key: &str, value: f64) {
        self.values
            .insert(key.to_string(), PreferenceValue::Number(value));
    }

    /// Returns the flag stored under `key`, or `default`.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.values.get(key) {
            Some(PreferenceValue::Bool(value)) => *value,
            _ => default,
        }
    }

    pub fn put_bool(&mut self, key: &str, value: bool) {
        self.values
            .insert(key.to_string(), PreferenceValue::Bool(value));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

/// The preference store. Only used from the UI thread.
#[derive(Debug, Default)]
pub struct Preferences {
    /// `None` for a store that is never written to disk.
    path: Option<PathBuf>,
    nodes: BTreeMap<String, PreferenceNode>,
}

impl Preferences {
    /// Location of the store below the user's config directory.
    pub fn default_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir().ok_or_else(|| {
            AppError::Preferences("Could not determine user config directory".to_string())
        })?;
        path.push(PREFERENCES_DIR);
        path.push(PREFERENCES_FILE);
        Ok(path)
    }

    /// Opens the store at its default location.
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    /// Opens the store backed by `path`.
    ///
    /// A missing file gives an empty store. So does a corrupt one, since losing
    /// saved window geometry is preferable to refusing to start.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let nodes = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(nodes) => nodes,
                Err(e) => {
                    warn!("Ignoring unreadable preferences {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No preferences at {}, starting empty", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                return Err(AppError::Preferences(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        Ok(Self {
            path: Some(path),
            nodes,
        })
    }

    /// A store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the node called `name`, creating it if needed.
    pub fn node(&mut self, name: &str) -> &mut PreferenceNode {
        self.nodes.entry(name.to_string()).or_default()
    }

    /// Returns the node called `name` if it exists.
    pub fn get_node(&self, name: &str) -> Option<&PreferenceNode> {
        self.nodes.get(name)
    }

    /// Writes the whole store to disk.
    pub fn flush(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::Preferences(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let text = serde_json::to_string_pretty(&self.nodes)?;
        fs::write(path, text).map_err(|e| {
            AppError::Preferences(format!("Failed to write {}: {}", path.display(), e))
        })?;

        debug!("Preferences written to {}", path.display());
        Ok(())
    }
}

//! # Simulator Settings
//!
//! Tunables for edit-mode physics, stored as TOML.
//!
//! ## Settings Persistence
//! - **Location**: `~/.eustress_studio/edit_physics.toml`
//! - **Missing fields** fall back to their defaults
//! - **Invalid files** are reported and replaced by defaults in `load_or_default`

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Edit-mode physics settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorSettings {
    /// Seconds advanced per tick. `None` uses the host's fixed timestep.
    pub step_delta: Option<f32>,

    /// Emit a warning while any body is locked
    pub lock_warnings: bool,

    /// Ticks between two lock warnings (1 = every tick)
    pub lock_warning_interval: u32,

    /// Prefix put in front of every status line
    pub log_prefix: String,
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            step_delta: None,
            lock_warnings: true,
            lock_warning_interval: 1,
            log_prefix: "[Edit Physics]".to_string(),
        }
    }
}

impl SimulatorSettings {
    /// Default settings file (`~/.eustress_studio/edit_physics.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".eustress_studio").join("edit_physics.toml"))
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from `path`, or defaults if the file is missing or broken.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => {
                tracing::info!("Loaded edit physics settings from {:?}", path);
                settings
            }
            Err(e) => {
                tracing::warn!("{}. Using default edit physics settings.", e);
                Self::default()
            }
        }
    }

    /// Write settings to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        self.validate()?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| SettingsError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let content = self.to_toml_string()?;
        fs::write(path, content).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(delta) = self.step_delta {
            if !delta.is_finite() || delta <= 0.0 {
                return Err(SettingsError::Invalid {
                    field: "step_delta",
                    reason: format!("must be a positive number of seconds, got {delta}"),
                });
            }
        }
        if self.lock_warning_interval == 0 {
            return Err(SettingsError::Invalid {
                field: "lock_warning_interval",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

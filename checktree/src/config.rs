//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/checktree/checktree.toml`
//! 3. Explicit config file passed with `--config`
//! 4. Environment variables: `CHECKTREE_*` prefix, `__` between nested keys

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::TriState;

/// Prefix of environment overrides, e.g. `CHECKTREE_GLYPHS__CHECKED`.
pub const ENV_PREFIX: &str = "CHECKTREE";

/// Checkbox glyphs used by the renderer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Glyphs {
    pub checked: String,
    pub unchecked: String,
    pub partial: String,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            checked: "[x]".into(),
            unchecked: "[ ]".into(),
            partial: "[-]".into(),
        }
    }
}

impl Glyphs {
    pub fn for_state(&self, state: TriState) -> &str {
        match state {
            TriState::Checked => &self.checked,
            TriState::Indeterminate => &self.partial,
            TriState::Unchecked => &self.unchecked,
        }
    }
}

/// Raw glyphs for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawGlyphs {
    pub checked: Option<String>,
    pub unchecked: Option<String>,
    pub partial: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub document: Option<PathBuf>,
    pub placeholder: Option<String>,
    pub color: Option<bool>,
    pub glyphs: RawGlyphs,
}

/// Unified configuration for checktree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Document loaded when no path is given on the command line
    pub document: Option<PathBuf>,
    /// Label shown for items without a name
    pub placeholder: String,
    /// Colorize checkbox glyphs
    pub color: bool,
    pub glyphs: Glyphs,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            document: None,
            placeholder: "<new item>".into(),
            color: true,
            glyphs: Glyphs::default(),
        }
    }
}

/// Get the XDG config directory for checktree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "checktree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("checktree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// Expand `~`, `$VAR` and `${VAR}` in a path, leaving it untouched on failure.
fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

impl Settings {
    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            document: overlay.document.clone().or_else(|| self.document.clone()),
            placeholder: overlay
                .placeholder
                .clone()
                .unwrap_or_else(|| self.placeholder.clone()),
            color: overlay.color.unwrap_or(self.color),
            glyphs: Glyphs {
                checked: overlay
                    .glyphs
                    .checked
                    .clone()
                    .unwrap_or_else(|| self.glyphs.checked.clone()),
                unchecked: overlay
                    .glyphs
                    .unchecked
                    .clone()
                    .unwrap_or_else(|| self.glyphs.unchecked.clone()),
                partial: overlay
                    .glyphs
                    .partial
                    .clone()
                    .unwrap_or_else(|| self.glyphs.partial.clone()),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file given on the command line; it must exist
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref(), explicit)
    }

    /// Like [`Settings::load`], reading the global layer from `global`.
    ///
    /// A missing global file is skipped, a missing explicit file is an error.
    pub fn load_from(
        global: Option<&Path>,
        explicit: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global {
            if global_path.exists() {
                debug!(path = %global_path.display(), "loading global config");
                current = current.merge_with(&load_raw_settings(global_path)?);
            }
        }

        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading explicit config");
            current = current.merge_with(&load_raw_settings(path)?);
        }

        current = Self::apply_env_overrides(current)?;

        current.document = current.document.as_deref().map(expand_path);
        Ok(current)
    }

    /// Apply CHECKTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("document") {
            settings.document = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("placeholder") {
            settings.placeholder = val;
        }
        if let Ok(val) = config.get_bool("color") {
            settings.color = val;
        }
        if let Ok(val) = config.get_string("glyphs.checked") {
            settings.glyphs.checked = val;
        }
        if let Ok(val) = config.get_string("glyphs.unchecked") {
            settings.glyphs.unchecked = val;
        }
        if let Ok(val) = config.get_string("glyphs.partial") {
            settings.glyphs.partial = val;
        }

        Ok(settings)
    }

    /// Render the effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}

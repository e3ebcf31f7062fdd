//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treebuilder/treebuilder.toml`
//! 3. Local config: `<dir>/.treebuilder.toml` (usually the working directory)
//! 4. Environment variables: `TREEBUILDER_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, DEFAULT_INDENT_WIDTH};
use crate::domain::TraversalOrder;

/// Unified configuration for treebuilder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Traversal order used when a command does not name one
    pub default_order: TraversalOrder,
    /// Spaces per nesting level in outline files
    pub indent_width: usize,
    /// Colored terminal output
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_order: TraversalOrder::PreOrder,
            indent_width: DEFAULT_INDENT_WIDTH,
            color: true,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub default_order: Option<TraversalOrder>,
    pub indent_width: Option<usize>,
    pub color: Option<bool>,
}

/// Get the XDG config directory for treebuilder.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treebuilder").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treebuilder.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".treebuilder.toml")
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

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            default_order: overlay.default_order.unwrap_or(self.default_order),
            indent_width: overlay.indent_width.unwrap_or(self.indent_width),
            color: overlay.color.unwrap_or(self.color),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.treebuilder.toml`
    #[instrument(level = "debug")]
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
                debug!(path = %global_path.display(), "applied global config");
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
                debug!(path = %local_path.display(), "applied local config");
            }
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.validate()?;
        Ok(current)
    }

    /// Apply TREEBUILDER_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("TREEBUILDER").separator("__"))
            .build()
            .map_err(config_err)?;
        Self::apply_overrides(settings, &config)
    }

    fn apply_overrides(mut settings: Self, config: &Config) -> Result<Self, ApplicationError> {
        if let Some(val) = env_value(config.get_string("default_order"), "DEFAULT_ORDER")? {
            settings.default_order = val.parse().map_err(|e| ApplicationError::Config {
                message: format!("TREEBUILDER_DEFAULT_ORDER: {e}"),
            })?;
        }
        if let Some(val) = env_value(config.get_int("indent_width"), "INDENT_WIDTH")? {
            settings.indent_width =
                usize::try_from(val).map_err(|_| ApplicationError::Config {
                    message: format!("TREEBUILDER_INDENT_WIDTH: invalid width {val}"),
                })?;
        }
        if let Some(val) = env_value(config.get_bool("color"), "COLOR")? {
            settings.color = val;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.indent_width == 0 {
            return Err(ApplicationError::Config {
                message: "indent_width must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# treebuilder configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/treebuilder/treebuilder.toml
#   Local:  ./.treebuilder.toml
#   Env:    TREEBUILDER_* environment variables

# Traversal order when none is given: "pre-order", "in-order" or "post-order"
# default_order = "pre-order"

# Spaces per nesting level in outline files
# indent_width = 2

# Colored output (NO_COLOR is honoured as well)
# color = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// Unset variables yield `None`; set but unparsable ones are an error.
fn env_value<V>(
    result: Result<V, ConfigError>,
    name: &str,
) -> Result<Option<V>, ApplicationError> {
    match result {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(ApplicationError::Config {
            message: format!("TREEBUILDER_{name}: {e}"),
        }),
    }
}

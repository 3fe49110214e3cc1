//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/forumtree/forumtree.toml`
//! 3. Explicit config file (e.g. `--config`)
//! 4. Environment variables: `FORUMTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Raw settings for intermediate parsing (`None` = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub store_path: Option<PathBuf>,
    pub indent: Option<String>,
}

/// Unified configuration for forumtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Snapshot file of the forum tree store
    pub store_path: PathBuf,
    /// Indentation unit per level in `list` output
    pub indent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            indent: "  ".to_string(),
        }
    }
}

/// Default snapshot location in the platform data directory.
fn default_store_path() -> PathBuf {
    ProjectDirs::from("", "", "forumtree")
        .map(|dirs| dirs.data_dir().join("forums.toml"))
        .unwrap_or_else(|| PathBuf::from("~/.forumtree/forums.toml"))
}

/// Get the XDG config directory for forumtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "forumtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("forumtree.toml"))
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

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_path(self.store_path.to_string_lossy().as_ref());
        self.store_path = PathBuf::from(expanded);
    }

    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            store_path: overlay
                .store_path
                .clone()
                .unwrap_or_else(|| self.store_path.clone()),
            indent: overlay
                .indent
                .clone()
                .unwrap_or_else(|| self.indent.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; must exist if given
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config, if present
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Explicit config file
        if let Some(path) = config_file {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();
        Ok(current)
    }

    /// Apply FORUMTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("FORUMTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("store_path") {
            settings.store_path = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("indent") {
            settings.indent = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# forumtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/forumtree/forumtree.toml
#   File:   --config <path>
#   Env:    FORUMTREE_* environment variables (e.g. FORUMTREE_STORE_PATH)

# Snapshot file holding the forum tree
# store_path = "~/.local/share/forumtree/forums.toml"

# Indentation per level in `forumtree list`
# indent = "  "
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_config_when_loading_then_uses_defaults() {
        let settings = Settings::load(None).expect("load defaults");
        assert!(settings.store_path.ends_with("forums.toml"));
        assert!(!settings.indent.is_empty());
    }

    #[test]
    fn given_tilde_in_store_path_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            store_path: PathBuf::from("~/forums.toml"),
            indent: "  ".to_string(),
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let path = settings.store_path.to_string_lossy();
        assert!(path.starts_with(&home), "store_path should start with home: {}", path);
        assert!(!path.contains('~'));
    }

    #[test]
    fn given_partial_overlay_when_merging_then_keeps_unspecified_fields() {
        let base = Settings {
            store_path: PathBuf::from("/base/forums.toml"),
            indent: "  ".to_string(),
        };
        let overlay = RawSettings {
            store_path: None,
            indent: Some("....".to_string()),
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.store_path, PathBuf::from("/base/forums.toml"));
        assert_eq!(merged.indent, "....");
    }

    #[test]
    fn given_template_when_parsing_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).expect("template parses");
        assert!(raw.store_path.is_none());
    }
}

//! Configuration loading and management
//!
//! Handles parsing of `tm.toml` configuration files. Everything is
//! optional; a missing file means defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::view::{SortDirection, SortKey, ViewCriteria};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Data directory override (CLI flag and env still win)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Notice configuration
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Default view criteria
    #[serde(default)]
    pub view: ViewConfig,
}

/// Notice-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Auto-dismiss hint attached to emitted notices, in milliseconds
    #[serde(default = "default_display_ms")]
    pub display_ms: u64,
}

fn default_display_ms() -> u64 {
    crate::notify::NOTICE_DISPLAY_MS
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            display_ms: default_display_ms(),
        }
    }
}

/// Default view criteria applied when `tm list` is run without flags.
///
/// A convenience preference only; stored task state never depends on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Default sort key: "date" or "priority"
    #[serde(default = "default_sort")]
    pub default_sort: String,

    /// Default sort direction: "asc" or "desc"
    #[serde(default = "default_direction")]
    pub default_direction: String,
}

fn default_sort() -> String {
    "date".to_string()
}

fn default_direction() -> String {
    "desc".to_string()
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            default_sort: default_sort(),
            default_direction: default_direction(),
        }
    }
}

impl ViewConfig {
    /// Parse into concrete criteria (status always starts at `all`).
    pub fn criteria(&self) -> Result<ViewCriteria> {
        Ok(ViewCriteria {
            sort: self.default_sort.parse::<SortKey>()?,
            direction: self.default_direction.parse::<SortDirection>()?,
            ..ViewCriteria::default()
        })
    }
}

impl Config {
    /// Load configuration from a `tm.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the given file if present, or return
    /// defaults. Parse errors in the default-location file degrade to
    /// defaults rather than aborting the command.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    fn validate(&self) -> Result<()> {
        if self.notify.display_ms == 0 {
            return Err(Error::InvalidConfig(
                "notify.display_ms must be > 0".to_string(),
            ));
        }
        self.view.default_sort.parse::<SortKey>().map_err(|_| {
            Error::InvalidConfig(format!(
                "view.default_sort '{}' must be date or priority",
                self.view.default_sort
            ))
        })?;
        self.view
            .default_direction
            .parse::<SortDirection>()
            .map_err(|_| {
                Error::InvalidConfig(format!(
                    "view.default_direction '{}' must be asc or desc",
                    self.view.default_direction
                ))
            })?;
        Ok(())
    }
}

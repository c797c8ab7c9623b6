//! TOML configuration for the tools.
//!
//! ```toml
//! orientation = "clockwise"
//!
//! [layout]
//! extra_height = 12
//!
//! [render]
//! size = 10
//! ```
//!
//! Every key is optional. Command-line flags override the file.

use std::path::Path;

use anyhow::{Context, Result};
use backgammon_core::{Layout, Orientation};
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub trait LoadableConfig: Sized + DeserializeOwned {
    /// Parse a config from TOML text.
    fn from_string(string: &str) -> Result<Self> {
        toml::from_str::<Self>(string).context("Failed to parse config")
    }

    /// Read and parse the config file at `path`.
    fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from path: {}", path.display()))?;
        Self::from_string(&contents)
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    pub orientation: Orientation,
    pub layout: Layout,
    pub render: RenderConfig,
}

impl LoadableConfig for ToolConfig {}

#[derive(Deserialize, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Pixels per board unit.
    pub size: i32,
    pub show_dice: bool,
    pub show_cube: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig { size: 8, show_dice: true, show_cube: true }
    }
}

impl ToolConfig {
    /// The file at `path`, or the defaults when there is none.
    pub fn load(path: Option<&Path>) -> Result<ToolConfig> {
        match path {
            Some(path) => ToolConfig::from_file(path),
            None => Ok(ToolConfig::default()),
        }
    }

    /// Apply command-line overrides. A flag can only turn clockwise on.
    pub fn with_overrides(mut self, clockwise: bool, size: Option<i32>) -> ToolConfig {
        if clockwise {
            self.orientation = Orientation::Clockwise;
        }
        if let Some(size) = size {
            self.render.size = size;
        }
        self
    }
}

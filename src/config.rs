//! Layer-stack configuration.
//!
//! A TOML file names each layer in the stack, in the same order as the frames
//! of the description image, and sets the physical parameters the output
//! stage needs. Example:
//!
//! ```toml
//! grid = 3.0
//!
//! [[layers]]
//! name = "channels"
//!
//! [[layers]]
//! name = "vias"
//! material = "steel"
//! thickness = 1.0
//! pin_radius = 0.75
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::errors::ConfigError;

fn default_grid() -> f64 {
    3.0
}

fn default_material() -> String {
    "acrylic".to_string()
}

fn default_thickness() -> f64 {
    2.0
}

/// The whole stack: grid pitch plus one entry per layer, top to bottom.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Physical spacing between adjacent grid coordinates, in millimetres.
    #[serde(default = "default_grid")]
    pub grid: f64,
    pub layers: Vec<LayerConfig>,
}

/// Per-layer physical parameters.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerConfig {
    pub name: String,
    #[serde(default = "default_material")]
    pub material: String,
    /// Panel thickness in millimetres.
    #[serde(default = "default_thickness")]
    pub thickness: f64,
    /// Cap radius for unconnected pins, in grid units. Defaults to the
    /// channel radius when absent.
    #[serde(default)]
    pub pin_radius: Option<f64>,
}

impl Config {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Config::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Config, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

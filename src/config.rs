//! Runtime configuration.
//!
//! Settings come from an optional TOML file; command-line flags override
//! individual fields afterwards. Every field has a default, so an empty
//! file (or no file) is a valid configuration.
//!
//! ```toml
//! catalog = "items.json"
//! output_dir = "icons"
//! endpoint = "https://api.iconify.design"
//! timeout_seconds = 10
//! png_size = 64
//! default_color = "#202020"
//!
//! [rarity_colors]
//! mythic = "#FF0080"
//!
//! [type_colors]
//! wearable = "#95A5A6"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use palette::Srgb;
use serde::Deserialize;

use crate::colors::{ColorScheme, ColorTable, parse_hex};
use crate::error::ConfigError;
use crate::pipeline::IconPainter;
use crate::source::{DEFAULT_ENDPOINT, HttpIconSource};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON item catalog to read.
    pub catalog: PathBuf,
    /// Directory the painted icons are written to. Created if missing.
    pub output_dir: PathBuf,
    /// Base URL of the icon endpoint.
    pub endpoint: String,
    /// Per-request timeout. `None` keeps the HTTP client's default.
    pub timeout_seconds: Option<u64>,
    /// Side length of PNG previews. `None` disables them.
    pub png_size: Option<u32>,
    /// Replaces black as the color for unknown rarities and types.
    pub default_color: Option<String>,
    /// Merged over the built-in rarity table.
    pub rarity_colors: BTreeMap<String, String>,
    /// Merged over the built-in item type table.
    pub type_colors: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from("items.json"),
            output_dir: PathBuf::from("icons"),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_seconds: None,
            png_size: None,
            default_color: None,
            rarity_colors: BTreeMap::new(),
            type_colors: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let toml = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&toml)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    /// Built-in color tables with the configured overrides applied.
    pub fn color_scheme(&self) -> Result<ColorScheme, ConfigError> {
        let mut rarity = ColorTable::rarity()
            .with_overrides(parse_colors("rarity_colors", &self.rarity_colors)?);
        let mut item_type = ColorTable::item_type()
            .with_overrides(parse_colors("type_colors", &self.type_colors)?);

        if let Some(value) = &self.default_color {
            let default = parse_color("default_color", value)?;
            rarity = rarity.with_default(default);
            item_type = item_type.with_default(default);
        }

        Ok(ColorScheme { rarity, item_type })
    }

    pub fn icon_source(&self) -> Result<HttpIconSource, ConfigError> {
        Ok(HttpIconSource::new(self.endpoint.clone(), self.timeout())?)
    }

    /// A painter wired to the HTTP icon source with this configuration.
    pub fn painter(&self) -> Result<IconPainter<HttpIconSource>, ConfigError> {
        Ok(IconPainter::new(self.icon_source()?, self.output_dir.clone())
            .with_colors(self.color_scheme()?)
            .with_png_size(self.png_size))
    }
}

fn parse_color(key: &str, value: &str) -> Result<Srgb<u8>, ConfigError> {
    parse_hex(value).ok_or_else(|| ConfigError::InvalidColor {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_colors(
    table: &str,
    colors: &BTreeMap<String, String>,
) -> Result<Vec<(String, Srgb<u8>)>, ConfigError> {
    colors
        .iter()
        .map(|(key, value)| Ok((key.clone(), parse_color(&format!("{table}.{key}"), value)?)))
        .collect()
}

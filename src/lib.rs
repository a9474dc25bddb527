// Library exports for plotscript

pub mod canvas;
pub mod data;
pub mod dataset;
pub mod decor;
pub mod draw;
pub mod figure;
pub mod format;
pub mod options;
pub mod palette;
pub mod parser;
pub mod plot;
pub mod renderer;
pub mod session;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub use canvas::{Canvas, OutputFormat, RenderTarget};
pub use dataset::ColumnData;
pub use decor::TicsOptions;
pub use draw::{ColumnIndex, DrawSpec, DrawStyle};
pub use figure::{Figure, PlotCell};
pub use options::{FillOptions, FontOptions, LineOptions, OffsetOptions, PointOptions, TextOptions};
pub use palette::{BuiltinPalettes, JsonPalettes, PaletteCatalog};
pub use plot::{Bound, Plot, Plot3D, Range};
pub use renderer::{GnuplotRenderer, Renderer};
pub use session::Session;

/// Settings shared by everything created from one [`Session`].
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Canvas width in points.
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Remove generated script and data files after rendering.
    #[serde(default = "default_true")]
    pub autoclean: bool,
    /// Keep the interactive window open after the renderer exits.
    #[serde(default = "default_true")]
    pub persist: bool,
    #[serde(default = "default_gnuplot")]
    pub gnuplot: String,
    #[serde(default = "default_palette")]
    pub default_palette: String,
    /// Directory for generated files, the current directory when unset.
    #[serde(default)]
    pub workdir: Option<PathBuf>,
}

fn default_width() -> u32 { 324 }
fn default_height() -> u32 { 200 }
fn default_true() -> bool { true }
fn default_gnuplot() -> String { "gnuplot".to_string() }
fn default_palette() -> String { "dark2".to_string() }

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            autoclean: true,
            persist: true,
            gnuplot: default_gnuplot(),
            default_palette: default_palette(),
            workdir: None,
        }
    }
}

impl RenderConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse render configuration")
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration '{}'", path.display()))?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = RenderConfig::from_json_str("{}").unwrap();
        assert_eq!((config.width, config.height), (324, 200));
        assert!(config.autoclean && config.persist);
        assert_eq!(config.gnuplot, "gnuplot");
        assert_eq!(config.default_palette, "dark2");
        assert!(config.workdir.is_none());
    }

    #[test]
    fn test_config_overrides() {
        let config = RenderConfig::from_json_str(
            r#"{"width": 640, "autoclean": false, "workdir": "/tmp/out", "default_palette": "viridis"}"#,
        )
        .unwrap();
        assert_eq!(config.width, 640);
        assert_eq!(config.height, 200);
        assert!(!config.autoclean);
        assert_eq!(config.workdir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(config.default_palette, "viridis");
    }

    #[test]
    fn test_config_errors() {
        assert!(RenderConfig::from_json_str(r#"{"width": "wide"}"#).is_err());
        assert!(RenderConfig::from_json_file("/nonexistent/plotscript.json").is_err());
    }
}

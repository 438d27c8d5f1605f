//! Configuration file support.
//!
//! Every field is optional in the JSON file; missing fields take the
//! defaults below. Command line flags are applied on top by the binary.

use std::path::Path;

use roi_ui::widgets::PatchStyle;
use roi_ui::{Color, Colormap};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MINSPAN, DISPLAY_FIGSIZE, SELECTOR_FIGSIZE};
use crate::error::{Error, Result};

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Log level setting for the application.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Style of the committed ROI outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BBoxStyle {
    /// Outline width in points; also the crop offset in pixels
    #[serde(default = "default_linewidth")]
    pub linewidth: f32,

    /// Outline color, or "none"
    #[serde(default = "default_edgecolor")]
    pub edgecolor: String,

    /// Fill color, or "none"
    #[serde(default = "default_facecolor")]
    pub facecolor: String,
}

fn default_linewidth() -> f32 {
    1.0
}

fn default_edgecolor() -> String {
    "r".to_string()
}

fn default_facecolor() -> String {
    "none".to_string()
}

impl Default for BBoxStyle {
    fn default() -> Self {
        Self {
            linewidth: default_linewidth(),
            edgecolor: default_edgecolor(),
            facecolor: default_facecolor(),
        }
    }
}

impl BBoxStyle {
    /// Resolve the color names into a drawable style.
    pub fn to_patch_style(&self) -> Result<PatchStyle> {
        Ok(PatchStyle {
            linewidth: self.linewidth,
            edgecolor: parse_color(&self.edgecolor)?,
            facecolor: parse_color(&self.facecolor)?,
        })
    }

    /// Crop offset in whole pixels.
    pub fn offset(&self) -> i64 {
        self.linewidth.round().max(0.0) as i64
    }
}

/// Parse a color, where "none" means not drawn.
pub fn parse_color(spec: &str) -> Result<Option<Color>> {
    if spec.trim().eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    Color::parse(spec)
        .map(Some)
        .ok_or_else(|| Error::InvalidColor(spec.to_string()))
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    #[serde(default = "default_version")]
    pub version: u32,

    /// Drags spanning fewer canvas pixels than this are ignored
    #[serde(default = "default_minspan")]
    pub minspan: i64,

    /// Do not display the selector when it is created
    #[serde(default)]
    pub hidden: bool,

    #[serde(default)]
    pub bbox_style: BBoxStyle,

    /// Selector figure size in inches
    #[serde(default = "default_selector_figsize")]
    pub selector_figsize: (f32, f32),

    /// Cropped preview figure size in inches
    #[serde(default = "default_display_figsize")]
    pub display_figsize: (f32, f32),

    /// Colormap for single-channel images
    #[serde(default)]
    pub colormap: Colormap,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

fn default_minspan() -> i64 {
    DEFAULT_MINSPAN
}

fn default_selector_figsize() -> (f32, f32) {
    SELECTOR_FIGSIZE
}

fn default_display_figsize() -> (f32, f32) {
    DISPLAY_FIGSIZE
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            minspan: DEFAULT_MINSPAN,
            hidden: false,
            bbox_style: BBoxStyle::default(),
            selector_figsize: SELECTOR_FIGSIZE,
            display_figsize: DISPLAY_FIGSIZE,
            colormap: Colormap::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl AppConfig {
    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;

        if config.version > CONFIG_VERSION {
            return Err(Error::ConfigVersion {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }
        // Catch bad colors at load time rather than on first draw
        config.bbox_style.to_patch_style()?;

        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.minspan, 5);
        assert_eq!(config.selector_figsize, (7.0, 5.0));
        assert_eq!(config.display_figsize, (3.0, 3.0));
    }

    #[test]
    fn test_roundtrip() {
        let config = AppConfig {
            minspan: 12,
            colormap: Colormap::Gray,
            log_level: LogLevel::Debug,
            ..AppConfig::default()
        };
        let json = config.to_json().unwrap();
        assert!(json.contains("\"gray\""));
        assert!(json.contains("\"debug\""));
        assert_eq!(AppConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let result = AppConfig::from_json(r#"{"version": 99}"#);
        assert!(matches!(
            result,
            Err(Error::ConfigVersion {
                file_version: 99,
                ..
            })
        ));
    }

    #[test]
    fn test_bbox_style_colors() {
        let style = BBoxStyle::default().to_patch_style().unwrap();
        assert_eq!(style.edgecolor, Some(Color::RED));
        assert_eq!(style.facecolor, None);
        assert_eq!(style.linewidth, 1.0);

        let bad = r#"{"bbox_style": {"edgecolor": "chartreuse-ish"}}"#;
        assert!(matches!(
            AppConfig::from_json(bad),
            Err(Error::InvalidColor(_))
        ));
    }

    #[test]
    fn test_offset_rounds_linewidth() {
        let style = BBoxStyle {
            linewidth: 2.4,
            ..BBoxStyle::default()
        };
        assert_eq!(style.offset(), 2);
    }
}

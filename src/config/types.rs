//! Configuration type definitions.

use crate::annotation::{StrokeStyle, Tool};
use crate::draw::{BLACK, Color};
use crate::util::name_to_color;
use log::warn;
use serde::{Deserialize, Serialize};

/// Color specification - either a named color or RGB values.
///
/// # Examples
/// ```toml
/// # Named color
/// pen_color = "black"
///
/// # Custom RGB color (0-255 per component)
/// pen_color = [255, 128, 0]  # Orange
/// ```
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Named color: red, green, blue, yellow, orange, pink, white, black
    Name(String),
    /// RGB color as [red, green, blue] where each component is 0-255
    Rgb([u8; 3]),
}

impl ColorSpec {
    /// Converts the color specification to a [`Color`] struct.
    ///
    /// Named colors are mapped to predefined RGBA values; unknown names
    /// default to black with a warning. RGB arrays are converted from the
    /// 0-255 range to 0.0-1.0 with full opacity.
    pub fn to_color(&self) -> Color {
        match self {
            ColorSpec::Name(name) => name_to_color(name).unwrap_or_else(|| {
                warn!("Unknown color '{}', using black", name);
                BLACK
            }),
            ColorSpec::Rgb([r, g, b]) => Color {
                r: *r as f64 / 255.0,
                g: *g as f64 / 255.0,
                b: *b as f64 / 255.0,
                a: 1.0,
            },
        }
    }
}

/// Ink tool defaults.
///
/// Controls the preset style each tool starts a stroke with. The opacity
/// setting applies to the highlighter only; pen strokes are always opaque.
#[derive(Debug, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Pen stroke color
    #[serde(default = "default_pen_color")]
    pub pen_color: ColorSpec,

    /// Pen stroke width in page units (valid range: 1.0 - 20.0)
    #[serde(default = "default_pen_width")]
    pub pen_width: f64,

    /// Highlighter stroke color (opacity applied separately)
    #[serde(default = "default_highlighter_color")]
    pub highlighter_color: ColorSpec,

    /// Highlighter stroke width in page units (valid range: 1.0 - 20.0)
    #[serde(default = "default_highlighter_width")]
    pub highlighter_width: f64,

    /// Highlighter opacity (valid range: 0.05 - 1.0)
    #[serde(default = "default_highlighter_opacity")]
    pub highlighter_opacity: f64,
}

impl ToolsConfig {
    /// The configured preset style for a tool.
    pub fn style_for(&self, tool: Tool) -> StrokeStyle {
        match tool {
            Tool::Pen => StrokeStyle {
                color: self.pen_color.to_color(),
                fill: false,
                line_width: self.pen_width,
            },
            Tool::Highlighter => StrokeStyle {
                color: self
                    .highlighter_color
                    .to_color()
                    .with_alpha(self.highlighter_opacity),
                fill: false,
                line_width: self.highlighter_width,
            },
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            pen_color: default_pen_color(),
            pen_width: default_pen_width(),
            highlighter_color: default_highlighter_color(),
            highlighter_width: default_highlighter_width(),
            highlighter_opacity: default_highlighter_opacity(),
        }
    }
}

/// Canvas placeholder settings.
///
/// An in-progress stroke composites into a canvas of this size until commit
/// tightens the bounds to the drawn geometry.
#[derive(Debug, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Placeholder canvas width in page units (valid range: 100 - 10000)
    #[serde(default = "default_canvas_extent")]
    pub width: f64,

    /// Placeholder canvas height in page units (valid range: 100 - 10000)
    #[serde(default = "default_canvas_extent")]
    pub height: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_canvas_extent(),
            height: default_canvas_extent(),
        }
    }
}

/// Where annotation store files are written.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreStorageMode {
    /// Platform data directory (e.g. `~/.local/share/pagemark`)
    Auto,
    /// Next to the configuration file
    Config,
    /// An explicit directory from `custom_directory`
    Custom,
}

/// Compression preference for annotation store files.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreCompression {
    /// Gzip when the payload exceeds the auto-compress threshold
    Auto,
    /// Always gzip
    On,
    /// Never gzip
    Off,
}

/// Annotation store settings.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Whether annotations are persisted to disk at all
    #[serde(default = "default_store_enabled")]
    pub enabled: bool,

    /// Where store files are placed
    #[serde(default = "default_storage_mode")]
    pub storage: StoreStorageMode,

    /// Directory used when `storage = "custom"` (supports `~/` expansion)
    #[serde(default)]
    pub custom_directory: Option<String>,

    /// Compression preference
    #[serde(default = "default_compression")]
    pub compress: StoreCompression,

    /// Refuse to write or read store files larger than this many MiB
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,

    /// Auto-compression threshold in KiB
    #[serde(default = "default_auto_compress_threshold_kb")]
    pub auto_compress_threshold_kb: u64,

    /// Number of rotated backup files to keep (0 disables backups)
    #[serde(default = "default_backup_retention")]
    pub backup_retention: usize,

    /// Maximum annotations loaded per document (0 = unlimited)
    #[serde(default = "default_max_annotations")]
    pub max_annotations: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            enabled: default_store_enabled(),
            storage: default_storage_mode(),
            custom_directory: None,
            compress: default_compression(),
            max_file_size_mb: default_max_file_size_mb(),
            auto_compress_threshold_kb: default_auto_compress_threshold_kb(),
            backup_retention: default_backup_retention(),
            max_annotations: default_max_annotations(),
        }
    }
}

fn default_pen_color() -> ColorSpec {
    ColorSpec::Name("black".to_string())
}

fn default_pen_width() -> f64 {
    3.0
}

fn default_highlighter_color() -> ColorSpec {
    ColorSpec::Name("yellow".to_string())
}

fn default_highlighter_width() -> f64 {
    10.0
}

fn default_highlighter_opacity() -> f64 {
    0.3
}

fn default_canvas_extent() -> f64 {
    1000.0
}

fn default_store_enabled() -> bool {
    true
}

fn default_storage_mode() -> StoreStorageMode {
    StoreStorageMode::Auto
}

fn default_compression() -> StoreCompression {
    StoreCompression::Auto
}

fn default_max_file_size_mb() -> u64 {
    10
}

fn default_auto_compress_threshold_kb() -> u64 {
    100
}

fn default_backup_retention() -> usize {
    1
}

fn default_max_annotations() -> usize {
    10_000
}

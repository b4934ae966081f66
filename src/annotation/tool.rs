//! Ink tool variants and stroke styling.

use crate::draw::{BLACK, Color, YELLOW};
use serde::{Deserialize, Serialize};

/// Visual parameters of a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// Stroke color, including opacity.
    pub color: Color,
    /// Carried for the persistence schema; path strokes never fill.
    pub fill: bool,
    /// Line thickness in page units. Must be positive.
    pub line_width: f64,
}

/// Ink tool selection.
///
/// Both tools drive the same stroke engine; a tool is a preset style plus
/// the metadata a host toolbar needs to present it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tool {
    /// Opaque pen stroke (default)
    Pen,
    /// Wide translucent marker stroke
    Highlighter,
}

impl Tool {
    /// Human-readable name for toolbar buttons.
    pub fn display_name(&self) -> &'static str {
        match self {
            Tool::Pen => "Pen",
            Tool::Highlighter => "Highlighter",
        }
    }

    /// Name of the bundled toolbar icon for this tool.
    pub fn icon_name(&self) -> &'static str {
        match self {
            Tool::Pen => "pen",
            Tool::Highlighter => "highlighter",
        }
    }

    /// The preset style a fresh stroke of this tool starts with.
    pub fn default_style(&self) -> StrokeStyle {
        match self {
            Tool::Pen => StrokeStyle {
                color: BLACK,
                fill: false,
                line_width: 3.0,
            },
            Tool::Highlighter => StrokeStyle {
                color: YELLOW.with_alpha(0.3),
                fill: false,
                line_width: 10.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pen_defaults_are_opaque_black() {
        let style = Tool::Pen.default_style();
        assert_eq!(style.color, BLACK);
        assert_eq!(style.line_width, 3.0);
        assert!(!style.fill);
    }

    #[test]
    fn highlighter_defaults_are_translucent_yellow() {
        let style = Tool::Highlighter.default_style();
        assert!((style.color.a - 0.3).abs() < 1e-9);
        assert_eq!(style.color.r, 1.0);
        assert_eq!(style.color.g, 1.0);
        assert_eq!(style.color.b, 0.0);
        assert_eq!(style.line_width, 10.0);
    }

    #[test]
    fn toolbar_metadata_names_each_tool() {
        assert_eq!(Tool::Pen.display_name(), "Pen");
        assert_eq!(Tool::Pen.icon_name(), "pen");
        assert_eq!(Tool::Highlighter.display_name(), "Highlighter");
        assert_eq!(Tool::Highlighter.icon_name(), "highlighter");
    }
}

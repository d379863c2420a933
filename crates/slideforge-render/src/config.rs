//! Render pipeline settings.

use peniko::Color;
use serde::{Deserialize, Serialize};

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Colors and sizes used when drawing a frame.
///
/// Sizes marked "pixels" are screen-space and do not follow the zoom. Sizes
/// in points are document-space and scale with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Area around the slide.
    pub canvas_color: SerializableColor,
    /// Slide background.
    pub slide_color: SerializableColor,
    pub slide_border_color: SerializableColor,
    /// Shape fill when the operation declares none.
    pub default_fill: SerializableColor,
    /// Outline color when an outline declares no fill.
    pub default_outline: SerializableColor,
    /// Outline and line weight in points when none is declared.
    pub default_stroke_weight_pt: f64,
    pub text_color: SerializableColor,
    /// Font size in points when a text box declares none.
    pub default_font_size_pt: f64,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
    /// Inner padding of text boxes in points.
    pub text_padding_pt: f64,
    pub image_fill: SerializableColor,
    pub image_border: SerializableColor,
    pub image_label: String,
    pub selection_color: SerializableColor,
    /// Distance in pixels between the element and its selection glow.
    pub glow_offset: f64,
    /// Selection handle edge length in pixels.
    pub handle_size: f64,
    /// Coordinate picker grid lines.
    pub grid_color: SerializableColor,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            canvas_color: SerializableColor::rgb(241, 243, 244),
            slide_color: SerializableColor::rgb(255, 255, 255),
            slide_border_color: SerializableColor::rgb(218, 220, 224),
            default_fill: SerializableColor::rgb(66, 133, 244),
            default_outline: SerializableColor::rgb(32, 33, 36),
            default_stroke_weight_pt: 1.0,
            text_color: SerializableColor::rgb(32, 33, 36),
            default_font_size_pt: 14.0,
            line_height: 1.2,
            text_padding_pt: 4.0,
            image_fill: SerializableColor::rgb(232, 234, 237),
            image_border: SerializableColor::rgb(154, 160, 166),
            image_label: "Image".to_string(),
            selection_color: SerializableColor::rgb(59, 130, 246),
            glow_offset: 4.0,
            handle_size: 8.0,
            grid_color: SerializableColor::new(200, 200, 200, 100),
        }
    }
}

impl RenderConfig {
    pub fn with_selection_color(mut self, color: Color) -> Self {
        self.selection_color = color.into();
        self
    }

    pub fn with_default_fill(mut self, color: Color) -> Self {
        self.default_fill = color.into();
        self
    }

    pub fn with_handle_size(mut self, size: f64) -> Self {
        self.handle_size = size;
        self
    }

    pub fn with_glow_offset(mut self, offset: f64) -> Self {
        self.glow_offset = offset;
        self
    }

    pub fn with_font_size(mut self, size_pt: f64) -> Self {
        self.default_font_size_pt = size_pt;
        self
    }
}

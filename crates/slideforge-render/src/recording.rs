//! A surface that records draw calls instead of rasterizing them.
//!
//! Used for headless inspection and in tests.

use crate::renderer::Surface;
use kurbo::{BezPath, Point, Size, Stroke};
use peniko::Color;

/// Average glyph advance as a fraction of the font size.
const APPROX_GLYPH_ADVANCE: f64 = 0.6;

/// One recorded draw call.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Clear(Color),
    Fill {
        path: BezPath,
        color: Color,
    },
    Stroke {
        path: BezPath,
        width: f64,
        color: Color,
    },
    Text {
        text: String,
        origin: Point,
        font_size: f64,
        color: Color,
    },
}

/// Records every draw call since the last [`Surface::clear`].
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    size: Size,
    commands: Vec<DrawCommand>,
    clears: usize,
}

impl RecordingSurface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            commands: Vec::new(),
            clears: 0,
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of times the surface was cleared, i.e. frames started.
    pub fn clear_count(&self) -> usize {
        self.clears
    }

    /// Text drawn in the current frame, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn resize(&mut self, size: Size) {
        self.size = size;
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self, color: Color) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
        self.clears += 1;
    }

    fn fill(&mut self, path: &BezPath, color: Color) {
        self.commands.push(DrawCommand::Fill {
            path: path.clone(),
            color,
        });
    }

    fn stroke(&mut self, path: &BezPath, style: &Stroke, color: Color) {
        self.commands.push(DrawCommand::Stroke {
            path: path.clone(),
            width: style.width,
            color,
        });
    }

    fn fill_text(&mut self, text: &str, origin: Point, font_size: f64, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            origin,
            font_size,
            color,
        });
    }

    fn measure_text(&mut self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * font_size * APPROX_GLYPH_ADVANCE
    }
}

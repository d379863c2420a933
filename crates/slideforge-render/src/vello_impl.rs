//! Vello implementation of [`Surface`].

use crate::renderer::Surface;
use kurbo::{Affine, BezPath, Point, Rect, Size, Stroke};
use parley::layout::{Layout, PositionedLayoutItem};
use parley::{FontContext, FontStack, LayoutContext, StyleProperty};
use peniko::{Brush, Color, Fill};
use std::borrow::Cow;
use vello::Scene;

/// Font stack for slide text. Resolved against the system font collection.
const FONT_STACK: &str = "sans-serif";

/// Glyph advance estimate used when no system font resolves.
const FALLBACK_GLYPH_ADVANCE: f64 = 0.6;

/// Builds a Vello [`Scene`] for one frame.
pub struct SceneSurface {
    /// The scene being built.
    scene: Scene,
    size: Size,
    /// Font context, kept across frames so the system collection is
    /// enumerated once.
    font_cx: FontContext,
    layout_cx: LayoutContext<Brush>,
}

impl SceneSurface {
    pub fn new(size: Size) -> Self {
        Self {
            scene: Scene::new(),
            size,
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Match the window's inner size.
    pub fn resize(&mut self, size: Size) {
        self.size = size;
    }

    fn layout(&mut self, text: &str, font_size: f64, brush: Brush) -> Layout<Brush> {
        let mut builder = self.layout_cx.ranged_builder(&mut self.font_cx, text, 1.0, false);
        builder.push_default(StyleProperty::FontSize(font_size as f32));
        builder.push_default(StyleProperty::Brush(brush));
        builder.push_default(StyleProperty::FontStack(FontStack::Source(Cow::Borrowed(
            FONT_STACK,
        ))));
        let mut layout = builder.build(text);
        layout.break_all_lines(None);
        layout.align(None, parley::Alignment::Start, parley::AlignmentOptions::default());
        layout
    }
}

impl Surface for SceneSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self, color: Color) {
        self.scene.reset();
        let rect = Rect::from_origin_size(Point::ZERO, self.size);
        self.scene.fill(Fill::NonZero, Affine::IDENTITY, color, None, &rect);
    }

    fn fill(&mut self, path: &BezPath, color: Color) {
        self.scene.fill(Fill::NonZero, Affine::IDENTITY, color, None, path);
    }

    fn stroke(&mut self, path: &BezPath, style: &Stroke, color: Color) {
        self.scene.stroke(style, Affine::IDENTITY, color, None, path);
    }

    fn fill_text(&mut self, text: &str, origin: Point, font_size: f64, color: Color) {
        if text.is_empty() {
            return;
        }
        let brush = Brush::Solid(color);
        let layout = self.layout(text, font_size, brush.clone());
        let transform = Affine::translate(origin.to_vec2());

        let mut glyph_count = 0;
        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let glyph_xform = run
                    .synthesis()
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        vello::Glyph {
                            id: glyph.id,
                            x: gx,
                            y: gy,
                        }
                    })
                    .collect();
                glyph_count += glyphs.len();

                if !glyphs.is_empty() {
                    self.scene
                        .draw_glyphs(run.font())
                        .brush(&brush)
                        .hint(true)
                        .transform(transform)
                        .glyph_transform(glyph_xform)
                        .font_size(run.font_size())
                        .normalized_coords(run.normalized_coords())
                        .draw(Fill::NonZero, glyphs.into_iter());
                }
            }
        }

        if glyph_count == 0 {
            log::debug!("No font resolved for {FONT_STACK}; drawing {text:?} as a placeholder bar");
            let width = self.measure_text(text, font_size);
            let bar = Rect::new(
                origin.x,
                origin.y + font_size * 0.25,
                origin.x + width,
                origin.y + font_size * 0.75,
            );
            self.scene.fill(Fill::NonZero, Affine::IDENTITY, color.with_alpha(0.4), None, &bar);
        }
    }

    fn measure_text(&mut self, text: &str, font_size: f64) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        let layout = self.layout(text, font_size, Brush::default());
        let width = layout.width() as f64;
        if width > 0.0 {
            width
        } else {
            text.chars().count() as f64 * font_size * FALLBACK_GLYPH_ADVANCE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Shape;

    #[test]
    fn test_surface_creation() {
        let surface = SceneSurface::new(Size::new(800.0, 600.0));
        assert!(surface.scene().encoding().is_empty());
    }

    #[test]
    fn test_clear_resets_scene() {
        let mut surface = SceneSurface::new(Size::new(100.0, 100.0));
        let path = Rect::new(10.0, 10.0, 20.0, 20.0).to_path(0.1);
        surface.fill(&path, Color::BLACK);
        surface.stroke(&path, &Stroke::new(1.0), Color::BLACK);
        surface.clear(Color::WHITE);
        let scene = surface.take_scene();
        assert!(!scene.encoding().is_empty());
        assert!(surface.scene().encoding().is_empty());
    }

    #[test]
    fn test_resize() {
        let mut surface = SceneSurface::new(Size::new(100.0, 100.0));
        surface.resize(Size::new(640.0, 480.0));
        assert_eq!(surface.size(), Size::new(640.0, 480.0));
    }

    #[test]
    fn test_measure_text_is_positive() {
        let mut surface = SceneSurface::new(Size::new(100.0, 100.0));
        assert!(surface.measure_text("Slide", 14.0) > 0.0);
        assert_eq!(surface.measure_text("", 14.0), 0.0);
    }
}

//! Viewport: the pan/zoom transform between slide (document) space and screen space.
//!
//! Document coordinates are points on the slide, with the origin at the
//! slide's top-left corner. Screen coordinates are device pixels in the
//! drawing surface. The slide is centered in the surface, then shifted by the
//! pan offset.

use crate::operation::ElementProperties;
use crate::units::{pixel_to_point, point_to_pixel};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Deserializer, Serialize};

/// Canonical slide width in points (16:9).
pub const SLIDE_WIDTH_PT: f64 = 720.0;
/// Canonical slide height in points (16:9).
pub const SLIDE_HEIGHT_PT: f64 = 405.0;

/// Minimum zoom scale.
pub const MIN_SCALE: f64 = 0.1;
/// Maximum zoom scale.
pub const MAX_SCALE: f64 = 3.0;

/// Pan offset and zoom scale of a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Surface width in pixels.
    pub width: f64,
    /// Surface height in pixels.
    pub height: f64,
    /// Zoom scale, always within [`MIN_SCALE`, `MAX_SCALE`].
    #[serde(deserialize_with = "deserialize_scale")]
    scale: f64,
    /// Pan offset in pixels (unbounded).
    pub offset: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Size::new(
            point_to_pixel(SLIDE_WIDTH_PT),
            point_to_pixel(SLIDE_HEIGHT_PT),
        ))
    }
}

impl Viewport {
    /// Create a viewport for a surface of the given size, unpanned at 100%.
    pub fn new(size: Size) -> Self {
        Self {
            width: size.width,
            height: size.height,
            scale: 1.0,
            offset: Vec2::ZERO,
        }
    }

    /// Current zoom scale.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Set the zoom scale, clamped to the allowed range.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = clamp_scale(scale);
    }

    /// Builder form of [`Viewport::set_scale`].
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.set_scale(scale);
        self
    }

    /// Builder form for the pan offset.
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Surface size in pixels.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Resize the surface. Pan and zoom are kept.
    pub fn resize(&mut self, size: Size) {
        self.width = size.width;
        self.height = size.height;
    }

    /// Pan by a delta in screen pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Restore `{offset: 0, scale: 1}`.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.scale = 1.0;
    }

    /// Size of the slide on screen at the current zoom.
    pub fn slide_screen_size(&self) -> Size {
        Size::new(
            point_to_pixel(SLIDE_WIDTH_PT) * self.scale,
            point_to_pixel(SLIDE_HEIGHT_PT) * self.scale,
        )
    }

    /// Screen position of the slide's top-left corner.
    pub fn slide_origin(&self) -> Point {
        let slide = self.slide_screen_size();
        Point::new(
            (self.width - slide.width) / 2.0 + self.offset.x,
            (self.height - slide.height) / 2.0 + self.offset.y,
        )
    }

    /// Screen rectangle covered by the slide background.
    pub fn slide_rect(&self) -> Rect {
        Rect::from_origin_size(self.slide_origin(), self.slide_screen_size())
    }

    /// Convert a document point (in points) to a screen point.
    pub fn document_to_screen(&self, doc: Point) -> Point {
        let origin = self.slide_origin();
        Point::new(
            origin.x + point_to_pixel(doc.x) * self.scale,
            origin.y + point_to_pixel(doc.y) * self.scale,
        )
    }

    /// Convert a screen point to a document point (in points).
    pub fn screen_to_document(&self, screen: Point) -> Point {
        let origin = self.slide_origin();
        Point::new(
            pixel_to_point((screen.x - origin.x) / self.scale),
            pixel_to_point((screen.y - origin.y) / self.scale),
        )
    }

    /// Screen-space bounds of an element.
    ///
    /// Position comes from the translation; size is the declared size times
    /// the transform's scale factors. Negative scales flip the box, so the
    /// result is normalized.
    pub fn element_bounds(&self, props: &ElementProperties) -> Rect {
        let (tx, ty) = props.translate_points();
        let (w, h) = props.size_points();
        let (sx, sy) = props.scale();

        let top_left = self.document_to_screen(Point::new(tx, ty));
        let width = point_to_pixel(w) * sx * self.scale;
        let height = point_to_pixel(h) * sy * self.scale;
        Rect::new(
            top_left.x,
            top_left.y,
            top_left.x + width,
            top_left.y + height,
        )
        .abs()
    }

    /// Screen-space start and end of a line element.
    ///
    /// The start is the translation and the end is the declared extent times
    /// the scale factors, so a zero height yields a horizontal line.
    pub fn element_endpoints(&self, props: &ElementProperties) -> (Point, Point) {
        let (tx, ty) = props.translate_points();
        let (w, h) = props.extent_points();
        let (sx, sy) = props.scale();

        let start = self.document_to_screen(Point::new(tx, ty));
        let end = Point::new(
            start.x + point_to_pixel(w) * sx * self.scale,
            start.y + point_to_pixel(h) * sy * self.scale,
        );
        (start, end)
    }
}

/// Clamp a zoom scale to [`MIN_SCALE`, `MAX_SCALE`]. NaN maps to 1.
pub fn clamp_scale(scale: f64) -> f64 {
    if scale.is_nan() {
        return 1.0;
    }
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

fn deserialize_scale<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    f64::deserialize(deserializer).map(clamp_scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{AffineTransform, ElementSize};
    use crate::units::{Dimension, Unit};

    fn props(
        translate_pt: (f64, f64),
        size_pt: (f64, f64),
        scale: (f64, f64),
    ) -> ElementProperties {
        ElementProperties {
            page_object_id: "p1".into(),
            size: Some(ElementSize {
                width: Some(Dimension::pt(size_pt.0)),
                height: Some(Dimension::pt(size_pt.1)),
            }),
            transform: Some(AffineTransform {
                scale_x: scale.0,
                scale_y: scale.1,
                translate_x: translate_pt.0,
                translate_y: translate_pt.1,
                unit: Unit::Pt,
            }),
        }
    }

    #[test]
    fn test_default_viewport_fits_slide() {
        let viewport = Viewport::default();
        assert_eq!(viewport.slide_origin(), Point::ZERO);
        assert!((viewport.slide_rect().width() - 960.0).abs() < 1e-9);
        assert!((viewport.slide_rect().height() - 540.0).abs() < 1e-9);
    }

    #[test]
    fn test_slide_centered_with_offset() {
        let viewport = Viewport::new(Size::new(1160.0, 740.0)).with_offset(Vec2::new(10.0, -20.0));
        let origin = viewport.slide_origin();
        assert!((origin.x - 110.0).abs() < 1e-9);
        assert!((origin.y - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_scale_clamped() {
        let mut viewport = Viewport::default();
        viewport.set_scale(5.0);
        assert_eq!(viewport.scale(), MAX_SCALE);
        viewport.set_scale(0.01);
        assert_eq!(viewport.scale(), MIN_SCALE);
        viewport.set_scale(f64::NAN);
        assert_eq!(viewport.scale(), 1.0);
    }

    #[test]
    fn test_deserialized_scale_clamped() {
        let parse = |json: &str| serde_json::from_str::<Viewport>(json).unwrap();
        let viewport = parse(r#"{"width":800,"height":600,"scale":5.0,"offset":[0,0]}"#);
        assert_eq!(viewport.scale(), MAX_SCALE);
        let viewport = parse(r#"{"width":800,"height":600,"scale":0.0,"offset":[3,4]}"#);
        assert_eq!(viewport.scale(), MIN_SCALE);
        assert_eq!(viewport.offset, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_serialized_viewport_reloads() {
        let viewport = Viewport::new(Size::new(640.0, 480.0))
            .with_scale(2.5)
            .with_offset(Vec2::new(-12.0, 8.0));
        let json = serde_json::to_string(&viewport).unwrap();
        assert_eq!(serde_json::from_str::<Viewport>(&json).unwrap(), viewport);
    }

    #[test]
    fn test_document_screen_roundtrip() {
        let viewport = Viewport::new(Size::new(1200.0, 800.0))
            .with_scale(1.7)
            .with_offset(Vec2::new(-33.0, 41.5));
        let doc = Point::new(123.4, 56.7);
        let back = viewport.screen_to_document(viewport.document_to_screen(doc));
        assert!((back.x - doc.x).abs() < 1e-9);
        assert!((back.y - doc.y).abs() < 1e-9);
    }

    #[test]
    fn test_element_bounds() {
        let viewport = Viewport::default().with_scale(2.0);
        let origin = viewport.slide_origin();
        let bounds = viewport.element_bounds(&props((72.0, 36.0), (72.0, 72.0), (1.5, 1.0)));
        assert!((bounds.x0 - (origin.x + 192.0)).abs() < 1e-9);
        assert!((bounds.y0 - (origin.y + 96.0)).abs() < 1e-9);
        assert!((bounds.width() - 288.0).abs() < 1e-9);
        assert!((bounds.height() - 192.0).abs() < 1e-9);
    }

    #[test]
    fn test_element_bounds_negative_scale_normalized() {
        let viewport = Viewport::default();
        let bounds = viewport.element_bounds(&props((100.0, 100.0), (30.0, 30.0), (-1.0, 1.0)));
        assert!(bounds.width() > 0.0);
        assert!((bounds.x1 - point_to_pixel(100.0)).abs() < 1e-9);
    }

    #[test]
    fn test_flat_line_endpoints() {
        let viewport = Viewport::default();
        let rule = props((10.0, 20.0), (100.0, 0.0), (1.0, 1.0));
        let (start, end) = viewport.element_endpoints(&rule);
        assert_eq!(start.y, end.y);
        assert!((end.x - start.x - point_to_pixel(100.0)).abs() < 1e-9);
        // The hit box still keeps its minimum height.
        let bounds = viewport.element_bounds(&rule);
        assert!(bounds.height() > 0.0);
    }

    #[test]
    fn test_mirrored_line_endpoints() {
        let viewport = Viewport::default();
        let mirrored = props((100.0, 0.0), (50.0, 50.0), (-1.0, 1.0));
        let (start, end) = viewport.element_endpoints(&mirrored);
        assert!(end.x < start.x);
        assert!(end.y > start.y);
    }

    #[test]
    fn test_reset() {
        let mut viewport = Viewport::default().with_scale(2.5).with_offset(Vec2::new(5.0, 6.0));
        viewport.reset();
        assert_eq!(viewport.offset, Vec2::ZERO);
        assert_eq!(viewport.scale(), 1.0);
    }
}

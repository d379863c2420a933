//! Selection overlay: an offset glow outline plus eight resize handles.

use crate::config::RenderConfig;
use crate::renderer::Surface;
use kurbo::{Point, Rect, Shape, Stroke};
use peniko::Color;

/// Handle centers: four corners then four edge midpoints, clockwise from the
/// top-left.
pub fn handle_positions(bounds: Rect) -> [Point; 8] {
    let mid_x = (bounds.x0 + bounds.x1) / 2.0;
    let mid_y = (bounds.y0 + bounds.y1) / 2.0;
    [
        Point::new(bounds.x0, bounds.y0),
        Point::new(bounds.x1, bounds.y0),
        Point::new(bounds.x1, bounds.y1),
        Point::new(bounds.x0, bounds.y1),
        Point::new(mid_x, bounds.y0),
        Point::new(bounds.x1, mid_y),
        Point::new(mid_x, bounds.y1),
        Point::new(bounds.x0, mid_y),
    ]
}

/// Draw the selection overlay around `bounds`. Sizes are in screen pixels
/// and do not follow the zoom.
pub(crate) fn draw_selection(surface: &mut dyn Surface, bounds: Rect, config: &RenderConfig) {
    let color: Color = config.selection_color.into();
    let glow_rect = bounds.inflate(config.glow_offset, config.glow_offset);

    // Soft halo first, crisp outline on top.
    let halo = color.with_alpha(0.3);
    surface.stroke(&glow_rect.to_path(0.1), &Stroke::new(4.0), halo);
    surface.stroke(&glow_rect.to_path(0.1), &Stroke::new(1.5), color);

    let half = config.handle_size / 2.0;
    for center in handle_positions(bounds) {
        let handle = Rect::new(center.x - half, center.y - half, center.x + half, center.y + half);
        let path = handle.to_path(0.1);
        surface.fill(&path, Color::WHITE);
        surface.stroke(&path, &Stroke::new(1.5), color);
    }
}

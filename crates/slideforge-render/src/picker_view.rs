//! Drawing of the coordinate picker.

use crate::config::RenderConfig;
use crate::renderer::Surface;
use kurbo::{BezPath, Point, Rect, Shape, Stroke, Vec2};
use peniko::Color;
use slideforge_core::picker::CoordinatePicker;

/// Half the length of the marker's crosshair arms, in pixels.
const MARKER_ARM: f64 = 6.0;

/// Draw the picker with its top-left corner at `origin`: slide outline,
/// grid lines at the grid quantum, and a crosshair on the current value.
pub fn draw_picker(
    surface: &mut dyn Surface,
    picker: &CoordinatePicker,
    origin: Point,
    config: &RenderConfig,
) {
    let display = picker.config().display_size;
    let frame = Rect::from_origin_size(origin, display);
    let offset = origin.to_vec2();

    let outline = frame.to_path(0.1);
    surface.fill(&outline, config.slide_color.into());

    let quantum = picker.config().grid_quantum;
    if quantum.is_finite() && quantum > 0.0 {
        let grid = grid_path(picker, frame, offset);
        surface.stroke(&grid, &Stroke::new(0.5), config.grid_color.into());
    }
    surface.stroke(&outline, &Stroke::new(1.0), config.slide_border_color.into());

    let marker = picker.document_to_display(picker.value()) + offset;
    let color: Color = config.selection_color.into();
    let mut cross = BezPath::new();
    cross.move_to(Point::new(marker.x - MARKER_ARM, marker.y));
    cross.line_to(Point::new(marker.x + MARKER_ARM, marker.y));
    cross.move_to(Point::new(marker.x, marker.y - MARKER_ARM));
    cross.line_to(Point::new(marker.x, marker.y + MARKER_ARM));
    surface.stroke(&cross, &Stroke::new(1.5), color);
}

/// Interior grid lines batched into one path.
fn grid_path(picker: &CoordinatePicker, frame: Rect, offset: Vec2) -> BezPath {
    let config = picker.config();
    let quantum = config.grid_quantum;
    let mut path = BezPath::new();

    // Vertical lines
    let mut x = quantum;
    while x < config.slide_size.width {
        let px = picker.document_to_display(Point::new(x, 0.0)).x + offset.x;
        path.move_to(Point::new(px, frame.y0));
        path.line_to(Point::new(px, frame.y1));
        x += quantum;
    }

    // Horizontal lines
    let mut y = quantum;
    while y < config.slide_size.height {
        let py = picker.document_to_display(Point::new(0.0, y)).y + offset.y;
        path.move_to(Point::new(frame.x0, py));
        path.line_to(Point::new(frame.x1, py));
        y += quantum;
    }
    path
}

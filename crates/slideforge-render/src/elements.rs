//! Drawing of individual operations.
//!
//! Each create-like operation resolves to a screen-space geometry through
//! the viewport, draws itself, and returns the [`RenderedElement`] that goes
//! into the hit-test index. Operations that do not create anything return
//! `Ok(None)`.

use crate::config::RenderConfig;
use crate::renderer::{RenderError, RenderResult, Surface};
use crate::text::wrap_text;
use kurbo::{BezPath, Ellipse, Line, Point, Rect, RoundedRect, Shape, Stroke, Vec2};
use peniko::Color;
use slideforge_core::hit_test::RenderedElement;
use slideforge_core::operation::{
    CreateImage, CreateLine, CreateShape, CreateTextBox, ElementKind, ElementProperties, Operation,
    Outline, ShapeProperties,
};
use slideforge_core::units::point_to_pixel;
use slideforge_core::viewport::Viewport;

/// Tolerance for converting curves to paths.
const PATH_TOLERANCE: f64 = 0.1;

/// Corner radius of round rectangles relative to the shorter side.
const ROUND_RECT_RADIUS_RATIO: f64 = 0.16;

/// Arrowhead length relative to the stroke width, and its lower bound in pixels.
const ARROWHEAD_SCALE: f64 = 4.0;
const ARROWHEAD_MIN: f64 = 8.0;

/// Where an element lands on screen.
#[derive(Debug, Clone, Copy)]
struct Placement {
    /// Normalized screen-space box.
    bounds: Rect,
    /// Transform origin; lines start here.
    start: Point,
    /// Declared extent after scaling; lines end here. Unlike `bounds`, a
    /// zero extent is kept.
    end: Point,
}

fn place(
    object_id: &str,
    tag: &str,
    props: &ElementProperties,
    viewport: &Viewport,
) -> RenderResult<Placement> {
    if object_id.is_empty() {
        return Err(RenderError::MissingObjectId { tag: tag.to_string() });
    }
    let bounds = viewport.element_bounds(props);
    let (start, end) = viewport.element_endpoints(props);
    let finite = [bounds.x0, bounds.y0, bounds.x1, bounds.y1, start.x, start.y, end.x, end.y]
        .iter()
        .all(|v| v.is_finite());
    if !finite {
        return Err(RenderError::InvalidGeometry {
            object_id: object_id.to_string(),
        });
    }
    Ok(Placement { bounds, start, end })
}

/// Draw one operation. Returns the hit-test entry for drawn elements.
pub(crate) fn draw_operation(
    surface: &mut dyn Surface,
    operation: &Operation,
    viewport: &Viewport,
    config: &RenderConfig,
) -> RenderResult<Option<RenderedElement>> {
    match operation {
        Operation::CreateShape(shape) => draw_shape(surface, shape, viewport, config),
        Operation::CreateTextBox(text_box) => {
            draw_text_box(surface, text_box, viewport, config).map(Some)
        }
        Operation::CreateImage(image) => draw_image(surface, image, viewport, config).map(Some),
        Operation::CreateLine(line) => draw_line(surface, line, viewport, config).map(Some),
        Operation::UpdateTransform(_)
        | Operation::InsertText(_)
        | Operation::Delete(_)
        | Operation::Unsupported { .. } => {
            log::trace!("Operation {} draws nothing", operation.tag());
            Ok(None)
        }
    }
}

fn element(
    object_id: &str,
    kind: ElementKind,
    bounds: Rect,
    props: &ElementProperties,
) -> RenderedElement {
    RenderedElement {
        object_id: object_id.to_string(),
        kind,
        bounds,
        properties: props.clone(),
    }
}

/// Outline color and width in pixels, if the shape declares an outline.
fn outline_style(
    outline: Option<&Outline>,
    viewport: &Viewport,
    config: &RenderConfig,
) -> Option<(Color, Stroke)> {
    let outline = outline?;
    let color = outline
        .outline_fill
        .as_ref()
        .and_then(|fill| fill.color())
        .unwrap_or_else(|| config.default_outline.into());
    let weight_px = outline
        .weight
        .map(|weight| weight.to_pixels())
        .filter(|w| w.is_finite() && *w > 0.0)
        .unwrap_or_else(|| point_to_pixel(config.default_stroke_weight_pt));
    Some((color, Stroke::new(weight_px * viewport.scale())))
}

fn draw_shape(
    surface: &mut dyn Surface,
    shape: &CreateShape,
    viewport: &Viewport,
    config: &RenderConfig,
) -> RenderResult<Option<RenderedElement>> {
    let Some(kind) = ElementKind::from_shape_type(&shape.shape_type) else {
        log::trace!(
            "Skipping {} with unknown shape type {:?}",
            shape.object_id,
            shape.shape_type
        );
        return Ok(None);
    };
    let placement = place(&shape.object_id, "createShape", &shape.element_properties, viewport)?;
    let props = shape.shape_properties.unwrap_or_default();

    if kind == ElementKind::TextBox {
        draw_box_background(surface, placement.bounds, &props, viewport, config);
    } else if kind == ElementKind::Line {
        let (color, stroke) = outline_style(props.outline.as_ref(), viewport, config)
            .unwrap_or_else(|| {
                (
                    config.default_outline.into(),
                    Stroke::new(point_to_pixel(config.default_stroke_weight_pt) * viewport.scale()),
                )
            });
        surface.stroke(&line_path(placement.start, placement.end), &stroke, color);
    } else {
        let path = shape_path(kind, placement.bounds);
        let fill = props.fill_color().unwrap_or_else(|| config.default_fill.into());
        surface.fill(&path, fill);
        if let Some((color, stroke)) = outline_style(props.outline.as_ref(), viewport, config) {
            surface.stroke(&path, &stroke, color);
        }
    }

    Ok(Some(element(
        &shape.object_id,
        kind,
        placement.bounds,
        &shape.element_properties,
    )))
}

/// Fill and outline a text box. Text boxes are transparent unless they
/// declare a fill.
fn draw_box_background(
    surface: &mut dyn Surface,
    bounds: Rect,
    props: &ShapeProperties,
    viewport: &Viewport,
    config: &RenderConfig,
) {
    let path = bounds.to_path(PATH_TOLERANCE);
    if let Some(fill) = props.fill_color() {
        surface.fill(&path, fill);
    }
    if let Some((color, stroke)) = outline_style(props.outline.as_ref(), viewport, config) {
        surface.stroke(&path, &stroke, color);
    }
}

fn draw_text_box(
    surface: &mut dyn Surface,
    text_box: &CreateTextBox,
    viewport: &Viewport,
    config: &RenderConfig,
) -> RenderResult<RenderedElement> {
    let placement = place(
        &text_box.object_id,
        "createTextBox",
        &text_box.element_properties,
        viewport,
    )?;
    let bounds = placement.bounds;
    let props = text_box.shape_properties.unwrap_or_default();
    draw_box_background(surface, bounds, &props, viewport, config);

    let style = text_box.style.unwrap_or_default();
    let font_size = style
        .font_size
        .map(|size| size.to_pixels())
        .filter(|size| size.is_finite() && *size > 0.0)
        .unwrap_or_else(|| point_to_pixel(config.default_font_size_pt))
        * viewport.scale();
    let color = style
        .foreground_color
        .map(|rgb| rgb.to_color(1.0))
        .unwrap_or_else(|| config.text_color.into());

    let padding = point_to_pixel(config.text_padding_pt) * viewport.scale();
    let inner = Rect::new(
        bounds.x0 + padding,
        bounds.y0 + padding,
        (bounds.x1 - padding).max(bounds.x0 + padding),
        (bounds.y1 - padding).max(bounds.y0 + padding),
    );
    let line_height = font_size * config.line_height;
    let lines = wrap_text(&text_box.text, inner.width().max(0.0), |line| {
        surface.measure_text(line, font_size)
    });

    let mut y = inner.y0;
    for line in &lines {
        // Lines that would start below the padded box are not drawn.
        if y + line_height > inner.y1 && y > inner.y0 {
            break;
        }
        if !line.is_empty() {
            surface.fill_text(line, Point::new(inner.x0, y), font_size, color);
        }
        y += line_height;
    }

    Ok(element(
        &text_box.object_id,
        ElementKind::TextBox,
        bounds,
        &text_box.element_properties,
    ))
}

fn draw_image(
    surface: &mut dyn Surface,
    image: &CreateImage,
    viewport: &Viewport,
    config: &RenderConfig,
) -> RenderResult<RenderedElement> {
    let placement = place(&image.object_id, "createImage", &image.element_properties, viewport)?;
    let bounds = placement.bounds;
    let path = bounds.to_path(PATH_TOLERANCE);
    surface.fill(&path, config.image_fill.into());
    surface.stroke(&path, &Stroke::new(1.0), config.image_border.into());

    let font_size = point_to_pixel(config.default_font_size_pt) * viewport.scale();
    let label = config.image_label.as_str();
    let width = surface.measure_text(label, font_size);
    let origin = Point::new(
        bounds.center().x - width / 2.0,
        bounds.center().y - font_size / 2.0,
    );
    surface.fill_text(label, origin, font_size, config.image_border.into());

    Ok(element(
        &image.object_id,
        ElementKind::Image,
        bounds,
        &image.element_properties,
    ))
}

fn draw_line(
    surface: &mut dyn Surface,
    line: &CreateLine,
    viewport: &Viewport,
    config: &RenderConfig,
) -> RenderResult<RenderedElement> {
    let placement = place(&line.object_id, "createLine", &line.element_properties, viewport)?;
    let kind = line.kind();
    let props = line.line_properties.unwrap_or_default();
    let color = props
        .line_fill
        .as_ref()
        .and_then(|fill| fill.color())
        .unwrap_or_else(|| config.default_outline.into());
    let width_px = props
        .weight
        .map(|weight| weight.to_pixels())
        .filter(|w| w.is_finite() && *w > 0.0)
        .unwrap_or_else(|| point_to_pixel(config.default_stroke_weight_pt))
        * viewport.scale();

    surface.stroke(&line_path(placement.start, placement.end), &Stroke::new(width_px), color);
    if kind == ElementKind::Arrow {
        let size = (width_px * ARROWHEAD_SCALE).max(ARROWHEAD_MIN);
        let head = arrowhead_path(placement.start, placement.end, size);
        surface.fill(&head, color);
    }

    Ok(element(&line.object_id, kind, placement.bounds, &line.element_properties))
}

/// Outline path for a closed shape kind filling `bounds`.
pub fn shape_path(kind: ElementKind, bounds: Rect) -> BezPath {
    match kind {
        ElementKind::Ellipse => Ellipse::from_rect(bounds).to_path(PATH_TOLERANCE),
        ElementKind::RoundRectangle => {
            let radius = bounds.width().min(bounds.height()) * ROUND_RECT_RADIUS_RATIO;
            RoundedRect::from_rect(bounds, radius).to_path(PATH_TOLERANCE)
        }
        ElementKind::Triangle => triangle_path(bounds),
        ElementKind::RightArrow => right_arrow_path(bounds),
        ElementKind::Line | ElementKind::Arrow => line_path(
            Point::new(bounds.x0, bounds.y0),
            Point::new(bounds.x1, bounds.y1),
        ),
        ElementKind::Rectangle | ElementKind::TextBox | ElementKind::Image => {
            bounds.to_path(PATH_TOLERANCE)
        }
    }
}

/// Isosceles triangle with its apex at the top center.
fn triangle_path(bounds: Rect) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(Point::new(bounds.center().x, bounds.y0));
    path.line_to(Point::new(bounds.x1, bounds.y1));
    path.line_to(Point::new(bounds.x0, bounds.y1));
    path.close_path();
    path
}

/// Block arrow pointing right: a shaft over the middle half of the height
/// and a head over the last third of the width.
fn right_arrow_path(bounds: Rect) -> BezPath {
    let shaft_top = bounds.y0 + bounds.height() * 0.25;
    let shaft_bottom = bounds.y0 + bounds.height() * 0.75;
    let head_x = bounds.x1 - bounds.width() / 3.0;
    let mid_y = bounds.center().y;

    let mut path = BezPath::new();
    path.move_to(Point::new(bounds.x0, shaft_top));
    path.line_to(Point::new(head_x, shaft_top));
    path.line_to(Point::new(head_x, bounds.y0));
    path.line_to(Point::new(bounds.x1, mid_y));
    path.line_to(Point::new(head_x, bounds.y1));
    path.line_to(Point::new(head_x, shaft_bottom));
    path.line_to(Point::new(bounds.x0, shaft_bottom));
    path.close_path();
    path
}

fn line_path(start: Point, end: Point) -> BezPath {
    Line::new(start, end).to_path(PATH_TOLERANCE)
}

/// Filled arrowhead at `end`, pointing away from `start`.
fn arrowhead_path(start: Point, end: Point, size: f64) -> BezPath {
    let direction = end - start;
    let length = direction.hypot();
    let unit = if length > f64::EPSILON {
        direction / length
    } else {
        Vec2::new(1.0, 0.0)
    };
    let normal = Vec2::new(-unit.y, unit.x);
    let base = end - unit * size;

    let mut path = BezPath::new();
    path.move_to(end);
    path.line_to(base + normal * (size / 2.0));
    path.line_to(base - normal * (size / 2.0));
    path.close_path();
    path
}

//! Drawing surface abstraction and render errors.

use kurbo::{BezPath, Point, Size, Stroke};
use peniko::Color;
use thiserror::Error;

/// Errors for a single element. The pipeline logs them and moves on to the
/// next operation.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{tag} operation has an empty object id")]
    MissingObjectId { tag: String },
    #[error("Element {object_id} has non-finite screen bounds")]
    InvalidGeometry { object_id: String },
}

/// Result type for element rendering.
pub type RenderResult<T> = Result<T, RenderError>;

/// A raster target the pipeline draws into.
///
/// All coordinates are screen pixels with the origin at the top-left.
pub trait Surface {
    /// Surface size in pixels.
    fn size(&self) -> Size;

    /// Discard everything drawn so far and fill with `color`.
    fn clear(&mut self, color: Color);

    /// Fill a path (non-zero winding).
    fn fill(&mut self, path: &BezPath, color: Color);

    /// Stroke a path.
    fn stroke(&mut self, path: &BezPath, style: &Stroke, color: Color);

    /// Draw a single line of text with its top-left corner at `origin`.
    fn fill_text(&mut self, text: &str, origin: Point, font_size: f64, color: Color);

    /// Advance width of a single line of text in pixels.
    fn measure_text(&mut self, text: &str, font_size: f64) -> f64;
}

//! Coordinate picker: a small slide map for choosing a position in EMU.
//!
//! The picker has its own fixed display size and maps it linearly onto the
//! slide size in EMU. It is independent of the main viewport.

use crate::config::PickerConfig;
use crate::controller::{CaptureGuard, PointerCapture};
use crate::input::{MouseButton, PointerEvent};
use crate::units::{emu_to_point, point_to_emu};
use kurbo::Point;
use std::fmt;
use std::rc::Rc;

/// Axis of a manual numeric entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Snap a value to the nearest multiple of `quantum`. Non-positive or
/// non-finite quanta leave the value untouched.
pub fn snap_to_grid(value: f64, quantum: f64) -> f64 {
    if quantum.is_finite() && quantum > 0.0 {
        (value / quantum).round() * quantum
    } else {
        value
    }
}

/// Picker state: the committed position and any drag in progress.
pub struct CoordinatePicker {
    config: PickerConfig,
    /// Committed position in EMU.
    value: Point,
    /// Held for the duration of a drag so the host routes the release to
    /// the picker even when it happens outside.
    drag: Option<CaptureGuard>,
    capture: Option<Rc<dyn PointerCapture>>,
}

impl fmt::Debug for CoordinatePicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoordinatePicker")
            .field("config", &self.config)
            .field("value", &self.value)
            .field("dragging", &self.drag.is_some())
            .finish()
    }
}

impl CoordinatePicker {
    pub fn new(config: PickerConfig) -> Self {
        Self {
            config,
            value: Point::ZERO,
            drag: None,
            capture: None,
        }
    }

    /// Attach the host's pointer capture hook.
    pub fn with_pointer_capture(mut self, capture: Rc<dyn PointerCapture>) -> Self {
        self.capture = Some(capture);
        self
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub fn set_snap(&mut self, snap: bool) {
        self.config.snap_to_grid = snap;
    }

    /// Committed position in EMU.
    pub fn value(&self) -> Point {
        self.value
    }

    /// Committed position in points.
    pub fn value_points(&self) -> Point {
        Point::new(emu_to_point(self.value.x), emu_to_point(self.value.y))
    }

    /// Replace the position from outside (e.g. when the form loads). Clamped,
    /// not snapped.
    pub fn set_value(&mut self, emu: Point) {
        self.value = self.clamp(emu);
    }

    /// Set the position from a value in points. Clamped, not snapped.
    pub fn set_value_points(&mut self, pt: Point) {
        self.set_value(Point::new(point_to_emu(pt.x), point_to_emu(pt.y)));
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// End any drag and release the capture. Called when the picker goes
    /// away.
    pub fn teardown(&mut self) {
        self.drag = None;
    }

    fn ratio(&self) -> (f64, f64) {
        let display = self.config.display_size;
        let slide = self.config.slide_size;
        (display.width / slide.width, display.height / slide.height)
    }

    /// EMU position to picker display pixels.
    pub fn document_to_display(&self, emu: Point) -> Point {
        let (rx, ry) = self.ratio();
        Point::new(emu.x * rx, emu.y * ry)
    }

    /// Picker display pixels to EMU, clamped to the slide and snapped when
    /// snapping is enabled.
    pub fn display_to_document(&self, display: Point) -> Point {
        let (rx, ry) = self.ratio();
        let raw = Point::new(display.x / rx, display.y / ry);
        let snapped = if self.config.snap_to_grid {
            Point::new(
                snap_to_grid(raw.x, self.config.grid_quantum),
                snap_to_grid(raw.y, self.config.grid_quantum),
            )
        } else {
            raw
        };
        self.clamp(snapped)
    }

    fn clamp(&self, emu: Point) -> Point {
        let slide = self.config.slide_size;
        let clamp_axis = |v: f64, max: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, max) };
        Point::new(
            clamp_axis(emu.x, slide.width),
            clamp_axis(emu.y, slide.height),
        )
    }

    /// Commit a click or drag position given in display pixels.
    pub fn commit_display(&mut self, display: Point) -> Point {
        self.value = self.display_to_document(display);
        self.value
    }

    /// Manual numeric entry for one axis, in EMU. Clamped, not snapped.
    pub fn set_axis(&mut self, axis: Axis, emu: f64) -> Point {
        let mut value = self.value;
        match axis {
            Axis::X => value.x = emu,
            Axis::Y => value.y = emu,
        }
        self.value = self.clamp(value);
        self.value
    }

    /// Handle pointer input in display pixels. Returns the committed value
    /// when it changed.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Option<Point> {
        let before = self.value;
        match *event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => {
                if self.drag.is_none() {
                    self.drag = Some(CaptureGuard::acquire(self.capture.clone()));
                }
                self.commit_display(position);
            }
            PointerEvent::Move { position } if self.drag.is_some() => {
                self.commit_display(position);
            }
            PointerEvent::Up {
                button: MouseButton::Left,
                ..
            } => {
                self.drag = None;
            }
            _ => {}
        }
        (self.value != before).then_some(self.value)
    }
}

impl Default for CoordinatePicker {
    fn default() -> Self {
        Self::new(PickerConfig::default())
    }
}

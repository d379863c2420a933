//! SlideForge Core Library
//!
//! Platform-agnostic data model and coordinate logic for the SlideForge slide
//! builder: length units, the operation model, the viewport and its input
//! controller, the per-frame hit-test index and the coordinate picker.

pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod operation;
pub mod picker;
pub mod units;
pub mod viewport;

pub use config::{ControllerConfig, PickerConfig};
pub use controller::{PointerCapture, ViewportController};
pub use error::{ConfigError, OperationError};
pub use hit_test::{HitTestIndex, RenderedElement};
pub use input::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent, WheelEvent};
pub use operation::{ElementKind, ElementProperties, Operation, parse_operations};
pub use picker::{Axis, CoordinatePicker};
pub use viewport::{MAX_SCALE, MIN_SCALE, SLIDE_HEIGHT_PT, SLIDE_WIDTH_PT, Viewport};

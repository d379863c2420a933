//! SlideForge Render Library
//!
//! Frame-coalesced drawing of slide operation lists onto a [`Surface`].
//! The production surface builds a Vello scene; [`RecordingSurface`] keeps
//! the draw calls for headless use and tests.

mod config;
mod elements;
mod overlay;
mod picker_view;
mod pipeline;
mod recording;
mod renderer;
mod scheduler;
mod text;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use config::{RenderConfig, SerializableColor};
pub use elements::shape_path;
pub use overlay::handle_positions;
pub use picker_view::draw_picker;
pub use pipeline::RenderPipeline;
pub use recording::{DrawCommand, RecordingSurface};
pub use renderer::{RenderError, RenderResult, Surface};
pub use scheduler::{FrameId, FrameScheduler, ManualScheduler, WinitScheduler};
pub use text::wrap_text;

#[cfg(feature = "vello-renderer")]
pub use vello_impl::SceneSurface;

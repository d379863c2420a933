//! Headless application shell: one slide, one pipeline, one recording
//! surface.

use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use slideforge_core::config::{self, ControllerConfig, PickerConfig};
use slideforge_core::hit_test::RenderedElement;
use slideforge_core::input::{KeyEvent, PointerEvent, WheelEvent};
use slideforge_core::operation::{Operation, parse_operations};
use slideforge_core::{ConfigError, CoordinatePicker, OperationError, Viewport, ViewportController};
use slideforge_render::{ManualScheduler, RecordingSurface, RenderConfig, RenderPipeline};
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Top-level failures of the binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Invalid operation list: {0}")]
    Operations(#[from] OperationError),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    pub render: RenderConfig,
    pub controller: ControllerConfig,
    pub picker: PickerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "SlideForge".to_string(),
            width: 1280,
            height: 800,
            render: RenderConfig::default(),
            controller: ControllerConfig::default(),
            picker: PickerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from a JSON file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        Ok(config::load(path)?)
    }

    pub fn surface_size(&self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }
}

/// Main application struct.
pub struct App {
    controller: ViewportController,
    pipeline: RenderPipeline<ManualScheduler>,
    surface: RecordingSurface,
    picker: CoordinatePicker,
    operations: Arc<[Operation]>,
    selected: Option<String>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let size = config.surface_size();
        let viewport = Viewport::new(size);
        log::info!("{}: {}x{} surface", config.title, config.width, config.height);
        Self {
            controller: ViewportController::new(viewport, config.controller),
            pipeline: RenderPipeline::new(ManualScheduler::new(), config.render, viewport),
            surface: RecordingSurface::new(size),
            picker: CoordinatePicker::new(config.picker),
            operations: Arc::from(Vec::new()),
            selected: None,
        }
    }

    /// Replace the operation list from a JSON array and schedule a frame.
    pub fn load_operations(&mut self, json: &str) -> Result<usize, AppError> {
        let operations = parse_operations(json)?;
        let count = operations.len();
        log::debug!("Loaded {count} operations");
        self.operations = operations.into();
        self.request_render();
        Ok(count)
    }

    pub fn load_operations_file(&mut self, path: &Path) -> Result<usize, AppError> {
        let json = std::fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.load_operations(&json)
    }

    pub fn select(&mut self, object_id: Option<&str>) {
        self.selected = object_id.map(str::to_string);
        self.request_render();
    }

    fn request_render(&mut self) {
        self.pipeline.set_viewport(*self.controller.viewport());
        self.pipeline.render(self.operations.clone(), self.selected.as_deref());
    }

    /// Deliver due frames to the pipeline. Returns the number drawn.
    pub fn tick(&mut self) -> usize {
        let due = self.pipeline.scheduler_mut().tick();
        let mut drawn = 0;
        for id in due {
            if self.pipeline.on_frame(id, &mut self.surface) {
                drawn += 1;
            }
        }
        drawn
    }

    pub fn handle_wheel(&mut self, event: &WheelEvent) {
        if self.controller.handle_wheel(event) {
            self.request_render();
        }
    }

    pub fn handle_key(&mut self, event: &KeyEvent) {
        if self.controller.handle_key(event) {
            self.request_render();
        }
    }

    pub fn handle_pointer(&mut self, event: &PointerEvent) {
        if self.controller.handle_pointer(event) {
            self.request_render();
        }
    }

    /// Follow a new surface size. The slide stays centered.
    pub fn resize(&mut self, size: Size) {
        self.controller.viewport_mut().resize(size);
        self.surface.resize(size);
        self.request_render();
    }

    /// Zoom to an absolute scale (clamped).
    pub fn zoom_to(&mut self, scale: f64) {
        self.controller.zoom_to(scale);
        self.request_render();
    }

    pub fn viewport(&self) -> &Viewport {
        self.controller.viewport()
    }

    pub fn pick(&self, screen: Point) -> Option<&RenderedElement> {
        self.pipeline.pick(screen)
    }

    pub fn screen_to_document(&self, screen: Point) -> Point {
        self.pipeline.screen_to_document(screen)
    }

    pub fn elements(&self) -> &[RenderedElement] {
        self.pipeline.hit_index().elements()
    }

    pub fn surface(&self) -> &RecordingSurface {
        &self.surface
    }

    pub fn picker(&self) -> &CoordinatePicker {
        &self.picker
    }

    pub fn picker_mut(&mut self) -> &mut CoordinatePicker {
        &mut self.picker
    }

    /// Text report of the last drawn frame: one line per element, topmost
    /// last.
    pub fn report(&self) -> String {
        let viewport = self.viewport();
        let mut out = String::new();
        let _ = writeln!(
            out,
            "viewport {}x{} scale {:.2} offset ({:.1}, {:.1})",
            viewport.width,
            viewport.height,
            viewport.scale(),
            viewport.offset.x,
            viewport.offset.y
        );
        for (z, element) in self.elements().iter().enumerate() {
            let b = element.bounds;
            let _ = writeln!(
                out,
                "{z:>3} {:<12} {:<16} [{:.1}, {:.1}, {:.1}, {:.1}]",
                element.kind.name(),
                element.object_id,
                b.x0,
                b.y0,
                b.x1,
                b.y1
            );
        }
        out
    }

    /// One report line for a pick at `screen`.
    pub fn describe_pick(&self, screen: Point) -> String {
        let doc = self.screen_to_document(screen);
        let hit = self
            .pick(screen)
            .map(|element| element.object_id.as_str())
            .unwrap_or("-");
        format!(
            "pick ({:.1}, {:.1}) -> {hit} at ({:.2}pt, {:.2}pt)",
            screen.x, screen.y, doc.x, doc.y
        )
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.controller.teardown();
        self.picker.teardown();
        self.pipeline.destroy();
    }
}

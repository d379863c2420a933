//! Frame-coalesced render pipeline.
//!
//! ```text
//! Idle --render()--> FrameScheduled --on_frame()--> Idle
//!                       |    ^
//!                       +----+ render(): cancel and reschedule
//! ```
//!
//! Any number of `render()` calls before the frame fires collapse into one
//! draw that uses the arguments of the last call.

use crate::config::RenderConfig;
use crate::elements::draw_operation;
use crate::overlay::draw_selection;
use crate::renderer::Surface;
use crate::scheduler::{FrameId, FrameScheduler};
use kurbo::{Point, Shape, Stroke};
use slideforge_core::hit_test::{HitTestIndex, RenderedElement};
use slideforge_core::operation::Operation;
use slideforge_core::viewport::Viewport;
use std::sync::Arc;

/// Arguments captured by the latest `render()` call.
struct PendingFrame {
    id: FrameId,
    operations: Arc<[Operation]>,
    selected: Option<String>,
    viewport: Viewport,
}

/// Draws an operation list onto a surface once per frame and keeps the
/// hit-test index for the last drawn frame.
pub struct RenderPipeline<S: FrameScheduler> {
    scheduler: S,
    config: RenderConfig,
    viewport: Viewport,
    pending: Option<PendingFrame>,
    index: HitTestIndex,
    frames_drawn: u64,
    destroyed: bool,
}

impl<S: FrameScheduler> RenderPipeline<S> {
    pub fn new(scheduler: S, config: RenderConfig, viewport: Viewport) -> Self {
        Self {
            scheduler,
            config,
            viewport,
            pending: None,
            index: HitTestIndex::new(),
            frames_drawn: 0,
            destroyed: false,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Push a new viewport. Takes effect on the next `render()` call.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Whether a frame is scheduled and not yet drawn.
    pub fn is_frame_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of frames actually drawn.
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Schedule a draw of `operations`, replacing any frame that has not run
    /// yet.
    pub fn render(&mut self, operations: Arc<[Operation]>, selected: Option<&str>) {
        if self.destroyed {
            log::debug!("render() after destroy() ignored");
            return;
        }
        if let Some(previous) = self.pending.take() {
            log::trace!("Superseding frame {:?}", previous.id);
            self.scheduler.cancel_frame(previous.id);
        }
        let id = self.scheduler.request_frame();
        log::trace!("Scheduled frame {id:?} with {} operations", operations.len());
        self.pending = Some(PendingFrame {
            id,
            operations,
            selected: selected.map(str::to_string),
            viewport: self.viewport,
        });
    }

    /// Frame callback. Draws if `id` is the scheduled frame; stale ids are
    /// ignored. Returns whether a frame was drawn.
    pub fn on_frame(&mut self, id: FrameId, surface: &mut dyn Surface) -> bool {
        match self.pending.take_if(|frame| frame.id == id) {
            Some(frame) => {
                self.draw(&frame, surface);
                true
            }
            None => {
                log::trace!("Ignoring stale frame {id:?}");
                false
            }
        }
    }

    /// Draw whatever frame is scheduled, for hosts whose frame callback does
    /// not carry an id.
    pub fn run_pending(&mut self, surface: &mut dyn Surface) -> bool {
        match self.pending.take() {
            Some(frame) => {
                self.draw(&frame, surface);
                true
            }
            None => false,
        }
    }

    /// Cancel any scheduled frame and refuse further renders. Nothing is
    /// drawn after this returns.
    pub fn destroy(&mut self) {
        if let Some(frame) = self.pending.take() {
            self.scheduler.cancel_frame(frame.id);
        }
        self.destroyed = true;
    }

    /// Topmost element under a screen point in the last drawn frame.
    pub fn pick(&self, point: Point) -> Option<&RenderedElement> {
        self.index.pick(point)
    }

    /// Convert a screen point to document points with the current viewport.
    pub fn screen_to_document(&self, point: Point) -> Point {
        self.viewport.screen_to_document(point)
    }

    /// Hit-test index of the last drawn frame.
    pub fn hit_index(&self) -> &HitTestIndex {
        &self.index
    }

    fn draw(&mut self, frame: &PendingFrame, surface: &mut dyn Surface) {
        let config = &self.config;
        let viewport = &frame.viewport;

        surface.clear(config.canvas_color.into());
        let slide = viewport.slide_rect().to_path(0.1);
        surface.fill(&slide, config.slide_color.into());
        surface.stroke(&slide, &Stroke::new(1.0), config.slide_border_color.into());

        self.index.clear();
        for (position, operation) in frame.operations.iter().enumerate() {
            match draw_operation(surface, operation, viewport, config) {
                Ok(Some(element)) => {
                    let selected = frame.selected.as_deref() == Some(element.object_id.as_str());
                    if selected {
                        draw_selection(surface, element.bounds, config);
                    }
                    self.index.push(element);
                }
                Ok(None) => {}
                Err(err) => {
                    log::warn!("Skipping operation {position} ({}): {err}", operation.tag());
                }
            }
        }

        self.frames_drawn += 1;
        log::debug!(
            "Drew frame {:?}: {} elements from {} operations",
            frame.id,
            self.index.len(),
            frame.operations.len()
        );
    }
}

impl<S: FrameScheduler> Drop for RenderPipeline<S> {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawCommand, RecordingSurface};
    use crate::scheduler::ManualScheduler;
    use kurbo::{Rect, Size, Vec2};
    use slideforge_core::operation::{
        AffineTransform, CreateImage, CreateShape, DeleteObject, ElementProperties, ElementSize,
    };
    use slideforge_core::units::{Dimension, Unit, point_to_pixel};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn rect_op(id: &str, x: f64, y: f64, w: f64, h: f64) -> Operation {
        shape_op(id, "RECTANGLE", x, y, w, h)
    }

    fn shape_op(id: &str, shape_type: &str, x: f64, y: f64, w: f64, h: f64) -> Operation {
        Operation::CreateShape(CreateShape {
            object_id: id.into(),
            shape_type: shape_type.into(),
            element_properties: ElementProperties {
                page_object_id: "p1".into(),
                size: Some(ElementSize {
                    width: Some(Dimension::emu(w)),
                    height: Some(Dimension::emu(h)),
                }),
                transform: Some(AffineTransform {
                    translate_x: x,
                    translate_y: y,
                    unit: Unit::Emu,
                    ..AffineTransform::default()
                }),
            },
            shape_properties: None,
        })
    }

    /// Finite inputs whose screen width overflows to infinity.
    fn overflowing_op(id: &str) -> Operation {
        let mut op = rect_op(id, 0.0, 0.0, 914_400.0, 914_400.0);
        if let Operation::CreateShape(shape) = &mut op {
            if let Some(transform) = shape.element_properties.transform.as_mut() {
                transform.scale_x = f64::MAX;
            }
        }
        op
    }

    fn pipeline() -> RenderPipeline<ManualScheduler> {
        RenderPipeline::new(ManualScheduler::new(), RenderConfig::default(), Viewport::default())
    }

    fn surface() -> RecordingSurface {
        RecordingSurface::new(Size::new(960.0, 540.0))
    }

    /// Deliver every due frame.
    fn tick(
        pipeline: &mut RenderPipeline<ManualScheduler>,
        surface: &mut RecordingSurface,
    ) -> usize {
        let due = pipeline.scheduler_mut().tick();
        due.into_iter()
            .filter(|id| pipeline.on_frame(*id, surface))
            .count()
    }

    fn ops(list: Vec<Operation>) -> Arc<[Operation]> {
        list.into()
    }

    #[test]
    fn test_render_is_deferred_until_frame() {
        let mut pipeline = pipeline();
        let mut surface = surface();
        pipeline.render(ops(vec![rect_op("a", 0.0, 0.0, 914_400.0, 914_400.0)]), None);
        assert!(pipeline.is_frame_scheduled());
        assert_eq!(surface.clear_count(), 0);
        assert!(pipeline.hit_index().is_empty());

        assert_eq!(tick(&mut pipeline, &mut surface), 1);
        assert!(!pipeline.is_frame_scheduled());
        assert_eq!(pipeline.hit_index().len(), 1);
    }

    #[test]
    fn test_three_renders_coalesce_into_one_draw() {
        let mut pipeline = pipeline();
        let mut surface = surface();
        pipeline.render(ops(vec![rect_op("first", 0.0, 0.0, 100.0, 100.0)]), None);
        pipeline.render(ops(vec![rect_op("second", 0.0, 0.0, 100.0, 100.0)]), None);
        pipeline.render(
            ops(vec![
                rect_op("third-a", 0.0, 0.0, 100.0, 100.0),
                rect_op("third-b", 0.0, 0.0, 100.0, 100.0),
            ]),
            Some("third-b"),
        );
        assert_eq!(pipeline.scheduler().cancelled_count(), 2);

        assert_eq!(tick(&mut pipeline, &mut surface), 1);
        assert_eq!(pipeline.frames_drawn(), 1);
        assert_eq!(surface.clear_count(), 1);
        let ids: Vec<_> = pipeline
            .hit_index()
            .elements()
            .iter()
            .map(|e| e.object_id.as_str())
            .collect();
        assert_eq!(ids, vec!["third-a", "third-b"]);
    }

    #[test]
    fn test_stale_frame_id_ignored() {
        let mut pipeline = pipeline();
        let mut surface = surface();
        pipeline.render(ops(vec![]), None);
        let stale = FrameId::new(999);
        assert!(!pipeline.on_frame(stale, &mut surface));
        assert!(pipeline.is_frame_scheduled());
    }

    #[test]
    fn test_identical_renders_identical_index() {
        let mut pipeline = pipeline();
        let mut surface = surface();
        let list = ops(vec![
            rect_op("a", 0.0, 0.0, 1_000_000.0, 500_000.0),
            shape_op("b", "ELLIPSE", 2_000_000.0, 1_000_000.0, 700_000.0, 700_000.0),
        ]);
        pipeline.render(list.clone(), Some("a"));
        tick(&mut pipeline, &mut surface);
        let first = pipeline.hit_index().elements().to_vec();

        pipeline.render(list, Some("a"));
        tick(&mut pipeline, &mut surface);
        assert_eq!(pipeline.hit_index().elements(), first.as_slice());
        assert_eq!(pipeline.frames_drawn(), 2);
    }

    #[test]
    fn test_topmost_wins_at_shared_center() {
        let mut pipeline = pipeline();
        let mut surface = surface();
        pipeline.render(
            ops(vec![
                rect_op("bottom", 914_400.0, 914_400.0, 1_828_800.0, 914_400.0),
                rect_op("top", 914_400.0, 914_400.0, 1_828_800.0, 914_400.0),
            ]),
            None,
        );
        tick(&mut pipeline, &mut surface);
        let center = pipeline.hit_index().get("top").unwrap().bounds.center();
        assert_eq!(pipeline.pick(center).unwrap().object_id, "top");
        assert!(pipeline.pick(Point::new(-10.0, -10.0)).is_none());
    }

    #[test]
    fn test_unknown_shape_type_has_no_entry() {
        let mut pipeline = pipeline();
        let mut surface = surface();
        pipeline.render(
            ops(vec![
                rect_op("a", 0.0, 0.0, 100.0, 100.0),
                shape_op("mystery", "HEPTAGRAM_DELUXE", 0.0, 0.0, 100.0, 100.0),
                Operation::Unsupported {
                    kind: "createVideo".into(),
                    payload: serde_json::Value::Null,
                },
                Operation::Delete(DeleteObject {
                    object_id: "a".into(),
                }),
            ]),
            None,
        );
        tick(&mut pipeline, &mut surface);
        assert!(pipeline.hit_index().get("mystery").is_none());
        assert_eq!(pipeline.hit_index().len(), 1);
    }

    #[test]
    fn test_bad_element_does_not_blank_frame() {
        let mut pipeline = pipeline();
        let mut surface = surface();
        pipeline.render(
            ops(vec![
                rect_op("before", 0.0, 0.0, 100.0, 100.0),
                rect_op("", 0.0, 0.0, 100.0, 100.0),
                overflowing_op("overflow"),
                Operation::CreateImage(CreateImage {
                    object_id: "after".into(),
                    url: String::new(),
                    element_properties: ElementProperties::default(),
                }),
            ]),
            None,
        );
        tick(&mut pipeline, &mut surface);
        let ids: Vec<_> = pipeline
            .hit_index()
            .elements()
            .iter()
            .map(|e| e.object_id.as_str())
            .collect();
        assert_eq!(ids, vec!["before", "after"]);
    }

    #[test]
    fn test_selection_overlay_only_for_selected() {
        let config = RenderConfig::default();
        let mut pipeline = pipeline();
        let mut surface = surface();
        let list = ops(vec![
            rect_op("a", 0.0, 0.0, 914_400.0, 914_400.0),
            rect_op("b", 2_000_000.0, 0.0, 914_400.0, 914_400.0),
        ]);

        let handle_fills = |surface: &RecordingSurface| {
            surface
                .commands()
                .iter()
                .filter(|c| match c {
                    DrawCommand::Fill { path, .. } => {
                        (path.bounding_box().width() - config.handle_size).abs() < 1e-9
                    }
                    _ => false,
                })
                .count()
        };

        pipeline.render(list.clone(), None);
        tick(&mut pipeline, &mut surface);
        assert_eq!(handle_fills(&surface), 0);

        pipeline.render(list, Some("b"));
        tick(&mut pipeline, &mut surface);
        assert_eq!(handle_fills(&surface), 8);
    }

    #[test]
    fn test_geometry_follows_viewport() {
        let mut pipeline = pipeline();
        let mut surface = surface();
        let viewport = Viewport::new(Size::new(1200.0, 800.0))
            .with_scale(2.0)
            .with_offset(Vec2::new(30.0, -10.0));
        pipeline.set_viewport(viewport);
        let rect = rect_op("a", 127_000.0, 254_000.0, 1_270_000.0, 635_000.0);
        pipeline.render(ops(vec![rect]), None);
        tick(&mut pipeline, &mut surface);

        let origin = viewport.slide_origin();
        let bounds = pipeline.hit_index().get("a").unwrap().bounds;
        let expected = Rect::new(
            origin.x + point_to_pixel(10.0) * 2.0,
            origin.y + point_to_pixel(20.0) * 2.0,
            origin.x + point_to_pixel(110.0) * 2.0,
            origin.y + point_to_pixel(70.0) * 2.0,
        );
        assert!((bounds.x0 - expected.x0).abs() < 1e-9);
        assert!((bounds.y0 - expected.y0).abs() < 1e-9);
        assert!((bounds.x1 - expected.x1).abs() < 1e-9);
        assert!((bounds.y1 - expected.y1).abs() < 1e-9);

        let doc = pipeline.screen_to_document(Point::new(bounds.x0, bounds.y0));
        assert!((doc.x - 10.0).abs() < 1e-9);
        assert!((doc.y - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_destroy_cancels_pending_frame() {
        let mut pipeline = pipeline();
        let mut surface = surface();
        pipeline.render(ops(vec![rect_op("a", 0.0, 0.0, 100.0, 100.0)]), None);
        pipeline.destroy();
        assert_eq!(pipeline.scheduler().pending_count(), 0);
        assert!(!pipeline.run_pending(&mut surface));
        assert_eq!(surface.clear_count(), 0);

        pipeline.render(ops(vec![]), None);
        assert!(!pipeline.is_frame_scheduled());
        assert_eq!(pipeline.frames_drawn(), 0);
    }

    /// Scheduler handle that outlives the pipeline owning it.
    #[derive(Clone, Default)]
    struct SharedScheduler(Rc<RefCell<ManualScheduler>>);

    impl FrameScheduler for SharedScheduler {
        fn request_frame(&mut self) -> FrameId {
            self.0.borrow_mut().request_frame()
        }

        fn cancel_frame(&mut self, id: FrameId) {
            self.0.borrow_mut().cancel_frame(id);
        }
    }

    #[test]
    fn test_drop_cancels_pending_frame() {
        let scheduler = SharedScheduler::default();
        let mut pipeline =
            RenderPipeline::new(scheduler.clone(), RenderConfig::default(), Viewport::default());
        pipeline.render(ops(vec![rect_op("a", 0.0, 0.0, 100.0, 100.0)]), None);
        assert_eq!(scheduler.0.borrow().pending_count(), 1);

        drop(pipeline);
        assert_eq!(scheduler.0.borrow().pending_count(), 0);
        assert_eq!(scheduler.0.borrow().cancelled_count(), 1);
        assert!(scheduler.0.borrow_mut().tick().is_empty());
    }

    #[test]
    fn test_run_pending_draws_latest() {
        let mut pipeline = pipeline();
        let mut surface = surface();
        pipeline.render(ops(vec![rect_op("old", 0.0, 0.0, 100.0, 100.0)]), None);
        pipeline.render(ops(vec![rect_op("new", 0.0, 0.0, 100.0, 100.0)]), None);
        assert!(pipeline.run_pending(&mut surface));
        assert!(!pipeline.run_pending(&mut surface));
        assert_eq!(pipeline.hit_index().elements()[0].object_id, "new");
    }
}

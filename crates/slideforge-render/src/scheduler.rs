//! Frame scheduling.
//!
//! The pipeline never draws synchronously. It asks a [`FrameScheduler`] for a
//! frame and draws when the host delivers it. Requesting a new frame cancels
//! the previous unexecuted one.

use std::sync::Arc;

/// Identifies one frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(u64);

impl FrameId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Host per-frame scheduling primitive.
pub trait FrameScheduler {
    /// Ask for a frame callback. The host later hands the id back to
    /// [`RenderPipeline::on_frame`](crate::RenderPipeline::on_frame).
    fn request_frame(&mut self) -> FrameId;

    /// Withdraw a request that has not run yet.
    fn cancel_frame(&mut self, id: FrameId);
}

/// A scheduler driven by explicit ticks, for tests and headless hosts.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: Vec<FrameId>,
    cancelled: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every request due on this tick.
    pub fn tick(&mut self) -> Vec<FrameId> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Number of requests cancelled so far.
    pub fn cancelled_count(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameId {
        self.next_id += 1;
        let id = FrameId(self.next_id);
        self.pending.push(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        let before = self.pending.len();
        self.pending.retain(|pending| *pending != id);
        if self.pending.len() != before {
            self.cancelled += 1;
        }
    }
}

/// Schedules frames through winit's redraw requests.
///
/// Winit coalesces redraw requests into one `RedrawRequested` event, so
/// cancelling is a no-op here. On `RedrawRequested` the host calls
/// [`RenderPipeline::run_pending`](crate::RenderPipeline::run_pending).
pub struct WinitScheduler {
    window: Arc<winit::window::Window>,
    next_id: u64,
}

impl WinitScheduler {
    pub fn new(window: Arc<winit::window::Window>) -> Self {
        Self { window, next_id: 0 }
    }

    pub fn window(&self) -> &Arc<winit::window::Window> {
        &self.window
    }
}

impl FrameScheduler for WinitScheduler {
    fn request_frame(&mut self) -> FrameId {
        self.next_id += 1;
        self.window.request_redraw();
        FrameId(self.next_id)
    }

    fn cancel_frame(&mut self, _id: FrameId) {}
}

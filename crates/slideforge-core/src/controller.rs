//! Viewport controller: turns wheel, keyboard and pointer input into pan/zoom.

use crate::config::ControllerConfig;
use crate::input::{Key, KeyEvent, MouseButton, PointerEvent, WheelEvent};
use crate::viewport::{Viewport, clamp_scale};
use kurbo::{Point, Vec2};
use std::rc::Rc;

/// Host hook for routing pointer moves/ups to the controller while a pan
/// drag is active, even when the pointer leaves the surface.
///
/// `acquire` is called when a drag starts. `release` is called exactly once
/// per `acquire`, when the drag ends or the controller is torn down.
pub trait PointerCapture {
    fn acquire(&self);
    fn release(&self);
}

/// Releases the pointer capture when dropped.
pub(crate) struct CaptureGuard {
    capture: Option<Rc<dyn PointerCapture>>,
}

impl CaptureGuard {
    pub(crate) fn acquire(capture: Option<Rc<dyn PointerCapture>>) -> Self {
        if let Some(capture) = &capture {
            capture.acquire();
        }
        Self { capture }
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        if let Some(capture) = self.capture.take() {
            capture.release();
        }
    }
}

/// An in-progress pan drag.
struct PanDrag {
    anchor_pointer: Point,
    anchor_offset: Vec2,
    button: MouseButton,
    _guard: CaptureGuard,
}

/// Owns a [`Viewport`] and mutates it in response to input.
pub struct ViewportController {
    viewport: Viewport,
    config: ControllerConfig,
    space_held: bool,
    drag: Option<PanDrag>,
    capture: Option<Rc<dyn PointerCapture>>,
}

impl ViewportController {
    pub fn new(viewport: Viewport, config: ControllerConfig) -> Self {
        Self {
            viewport,
            config,
            space_held: false,
            drag: None,
            capture: None,
        }
    }

    /// Attach the host's pointer capture hook.
    pub fn with_pointer_capture(mut self, capture: Rc<dyn PointerCapture>) -> Self {
        self.capture = Some(capture);
        self
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Whether pan mode is active (Space held or a pan drag in progress).
    pub fn is_pan_mode(&self) -> bool {
        self.space_held || self.drag.is_some()
    }

    /// Whether a pan drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Restore `{offset: 0, scale: 1}`.
    pub fn reset(&mut self) {
        self.viewport.reset();
    }

    /// Set the zoom scale (clamped). The slide origin stays the anchor.
    pub fn zoom_to(&mut self, scale: f64) {
        self.viewport.set_scale(scale);
    }

    /// Multiply the zoom scale by `factor` (clamped).
    pub fn zoom_by(&mut self, factor: f64) {
        self.zoom_to(self.viewport.scale() * factor);
    }

    /// Handle a wheel event. Returns true if the viewport changed.
    pub fn handle_wheel(&mut self, event: &WheelEvent) -> bool {
        let before = self.viewport;
        let delta = event.delta;
        let modifiers = event.modifiers;

        if modifiers.zoom() && modifiers.shift {
            self.viewport.pan(Vec2::new(-dominant_axis(delta), 0.0));
        } else if modifiers.zoom() {
            // Anchored at the viewport origin, not the cursor.
            let scale = self.viewport.scale() * (1.0 - delta.y * self.config.zoom_sensitivity);
            self.viewport.set_scale(clamp_scale(scale));
        } else if modifiers.shift {
            let dx = dominant_axis(delta) * self.config.shift_pan_factor;
            self.viewport.pan(Vec2::new(-dx, 0.0));
        } else {
            self.viewport.pan(-delta);
        }

        self.viewport != before
    }

    /// Handle a key event. Returns true if the viewport or pan mode changed.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        match *event {
            KeyEvent::Pressed { key, modifiers } => {
                let step = if modifiers.shift {
                    self.config.arrow_step_fast
                } else {
                    self.config.arrow_step
                };
                match key {
                    Key::ArrowLeft => self.viewport.pan(Vec2::new(step, 0.0)),
                    Key::ArrowRight => self.viewport.pan(Vec2::new(-step, 0.0)),
                    Key::ArrowUp => self.viewport.pan(Vec2::new(0.0, step)),
                    Key::ArrowDown => self.viewport.pan(Vec2::new(0.0, -step)),
                    Key::Space => {
                        let changed = !self.space_held;
                        self.space_held = true;
                        return changed;
                    }
                    Key::Character('0') if modifiers.zoom() => self.reset(),
                    Key::Character('=' | '+') if modifiers.zoom() => {
                        self.zoom_by(self.config.zoom_step)
                    }
                    Key::Character('-') if modifiers.zoom() => {
                        self.zoom_by(1.0 / self.config.zoom_step)
                    }
                    _ => return false,
                }
                true
            }
            KeyEvent::Released { key: Key::Space, .. } => {
                let changed = self.space_held || self.drag.is_some();
                self.space_held = false;
                if self
                    .drag
                    .as_ref()
                    .is_some_and(|drag| drag.button != MouseButton::Middle)
                {
                    self.end_drag();
                }
                changed
            }
            KeyEvent::Released { .. } => false,
        }
    }

    /// Handle a pointer event. Returns true if the viewport or pan mode changed.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        match *event {
            PointerEvent::Down { position, button } => {
                let starts_pan = button == MouseButton::Middle
                    || (button == MouseButton::Left && self.space_held);
                if !starts_pan || self.drag.is_some() {
                    return false;
                }
                log::trace!("Pan drag started at {position:?}");
                self.drag = Some(PanDrag {
                    anchor_pointer: position,
                    anchor_offset: self.viewport.offset,
                    button,
                    _guard: CaptureGuard::acquire(self.capture.clone()),
                });
                true
            }
            PointerEvent::Move { position } => {
                let Some(drag) = &self.drag else {
                    return false;
                };
                let offset = drag.anchor_offset + (position - drag.anchor_pointer);
                let changed = offset != self.viewport.offset;
                self.viewport.offset = offset;
                changed
            }
            PointerEvent::Up { button, .. } => {
                if self.drag.as_ref().is_some_and(|drag| drag.button == button) {
                    self.end_drag();
                    true
                } else {
                    false
                }
            }
        }
    }

    /// End any drag and leave pan mode. Called when the surface goes away.
    pub fn teardown(&mut self) {
        self.space_held = false;
        self.end_drag();
    }

    fn end_drag(&mut self) {
        if self.drag.take().is_some() {
            log::trace!("Pan drag ended");
        }
    }
}

/// The wheel axis with the larger magnitude. Shift+wheel arrives as vertical
/// motion on some platforms and horizontal on others.
fn dominant_axis(delta: Vec2) -> f64 {
    if delta.x.abs() > delta.y.abs() {
        delta.x
    } else {
        delta.y
    }
}

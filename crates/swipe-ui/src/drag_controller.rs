//! Drag controller for a single swipe panel.
//!
//! The controller owns the horizontal offset of the content layer and the
//! panel's lifecycle state. The host feeds it pointer events in two phases,
//! mirroring how containers route touches:
//!
//! 1. [`PanelDragController::should_intercept`] while the events are still
//!    on their way to the panel's children (the action button),
//! 2. [`PanelDragController::handle_event`] once the panel itself is the
//!    target.
//!
//! Settling is frame driven: after `open()`/`close()` or a release the host
//! calls [`PanelDragController::tick_settle`] once per frame until it
//! returns `false`.
//!
//! Listeners run after the controller's internal borrow is released, so a
//! listener may call back into any controller, including the one emitting.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;
use swipe_animation::SettleAnimation;
use swipe_foundation::{PointerEvent, PointerEventKind, Rect, SwipeConfig};

use crate::error::{check_extent, SwipeError};
use crate::host::PanelHost;
use crate::panel::{
    next_panel_id, DragSession, PanelEvent, PanelGeometry, PanelId, PanelState, RestingState,
};

pub type PanelListener = Rc<dyn Fn(&PanelDragController, PanelEvent)>;

/// Shared handle to a panel's drag state. Clones refer to the same panel.
#[derive(Clone)]
pub struct PanelDragController {
    inner: Rc<RefCell<ControllerInner>>,
}

/// Non-owning handle, used by registries that must not keep panels alive.
#[derive(Clone)]
pub struct WeakPanelDragController {
    id: PanelId,
    inner: Weak<RefCell<ControllerInner>>,
}

impl WeakPanelDragController {
    pub fn id(&self) -> PanelId {
        self.id
    }

    pub fn upgrade(&self) -> Option<PanelDragController> {
        self.inner
            .upgrade()
            .map(|inner| PanelDragController { inner })
    }
}

struct Settle {
    animation: SettleAnimation<f32>,
    target: RestingState,
}

struct ControllerInner {
    id: PanelId,
    config: SwipeConfig,
    geometry: Option<PanelGeometry>,
    content_offset_x: f32,
    state: PanelState,
    session: Option<DragSession>,
    settle: Option<Settle>,
    host: Option<Weak<dyn PanelHost>>,
    listeners: SmallVec<[PanelListener; 2]>,
}

/// Side effects collected under the borrow and applied after it is released.
#[derive(Default)]
struct Effects {
    events: SmallVec<[PanelEvent; 2]>,
    disallow_intercept: bool,
    request_frame: bool,
}

impl ControllerInner {
    fn swipeable_geometry(&self) -> Option<PanelGeometry> {
        self.geometry.filter(PanelGeometry::is_swipeable)
    }

    /// Start a session for a press, unless the press is in the edge strip
    /// or the panel cannot be dragged.
    fn begin_session(&mut self, event: &PointerEvent) -> bool {
        let Some(geometry) = self.swipeable_geometry() else {
            log::trace!("panel {} declines press: not swipeable", self.id);
            self.session = None;
            return false;
        };
        if event.raw_position.x <= self.config.edge_margin {
            log::trace!(
                "panel {} declines press at x={} inside edge margin {}",
                self.id,
                event.raw_position.x,
                self.config.edge_margin
            );
            self.session = None;
            return false;
        }
        let layer = geometry.layer_at(self.content_offset_x, event.position);
        self.session = Some(DragSession::new(layer, event.raw_position));
        true
    }

    /// Take ownership of the gesture. An in-flight settle is abandoned at its
    /// current position.
    fn claim(&mut self, effects: &mut Effects) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.claimed {
            return;
        }
        session.claimed = true;
        effects.disallow_intercept = true;
        if let Some(settle) = self.settle.take() {
            log::debug!(
                "panel {} drag interrupts settle towards {:?} at {}",
                self.id,
                settle.target,
                self.content_offset_x
            );
        }
        self.state = PanelState::Dragging;
        log::debug!("panel {} captured horizontal drag", self.id);
    }

    fn translate(&mut self, dx: f32) {
        if let Some(geometry) = self.geometry {
            self.content_offset_x = geometry.clamp_offset(self.content_offset_x + dx);
        }
    }

    /// Pick Open or Closed from where the drag left the content.
    fn release(&mut self, effects: &mut Effects) {
        let Some(geometry) = self.geometry else {
            return;
        };
        let target = if self.content_offset_x < geometry.release_threshold() {
            RestingState::Open
        } else {
            RestingState::Closed
        };
        log::debug!(
            "panel {} released at {} (threshold {}), settling {:?}",
            self.id,
            self.content_offset_x,
            geometry.release_threshold(),
            target
        );
        self.settle_to(target, effects);
    }

    fn settle_to(&mut self, target: RestingState, effects: &mut Effects) {
        if self.session.is_some_and(|session| session.claimed) {
            self.session = None;
        }

        let geometry = match self.swipeable_geometry() {
            Some(geometry) => geometry,
            None if target == RestingState::Closed => {
                self.settle = None;
                self.content_offset_x = 0.0;
                self.state = PanelState::Closed;
                effects.events.push(PanelEvent::Closed);
                return;
            }
            None => {
                log::debug!("panel {} cannot open: not swipeable", self.id);
                return;
            }
        };

        if self.state == target.as_state() {
            effects.events.push(target.event());
            return;
        }
        if self
            .settle
            .as_ref()
            .is_some_and(|settle| settle.target == target)
        {
            return;
        }

        let destination = geometry.resting_offset(target);
        if self.content_offset_x == destination {
            self.finish_settle(target, effects);
            return;
        }

        self.settle = Some(Settle {
            animation: SettleAnimation::new(
                self.content_offset_x,
                destination,
                self.config.settle,
                geometry.action_width,
            ),
            target,
        });
        self.state = PanelState::Settling;
        effects.request_frame = true;
    }

    fn finish_settle(&mut self, target: RestingState, effects: &mut Effects) {
        if let Some(geometry) = self.geometry {
            self.content_offset_x = geometry.resting_offset(target);
        }
        self.settle = None;
        self.state = target.as_state();
        log::debug!("panel {} settled {:?}", self.id, self.state);
        effects.events.push(target.event());
    }
}

impl Default for PanelDragController {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelDragController {
    pub fn new() -> Self {
        Self::with_config(SwipeConfig::default())
    }

    pub fn with_config(config: SwipeConfig) -> Self {
        let inner = ControllerInner {
            id: next_panel_id(),
            config,
            geometry: None,
            content_offset_x: 0.0,
            state: PanelState::Closed,
            session: None,
            settle: None,
            host: None,
            listeners: SmallVec::new(),
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    pub fn id(&self) -> PanelId {
        self.inner.borrow().id
    }

    pub fn downgrade(&self) -> WeakPanelDragController {
        WeakPanelDragController {
            id: self.id(),
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// True if both handles refer to the same panel.
    pub fn ptr_eq(&self, other: &PanelDragController) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn config(&self) -> SwipeConfig {
        self.inner.borrow().config
    }

    pub fn set_host(&self, host: Weak<dyn PanelHost>) {
        self.inner.borrow_mut().host = Some(host);
    }

    pub fn add_listener(&self, listener: impl Fn(&PanelDragController, PanelEvent) + 'static) {
        self.inner.borrow_mut().listeners.push(Rc::new(listener));
    }

    pub fn clear_listeners(&self) {
        self.inner.borrow_mut().listeners.clear();
    }

    /// Set the measured extents.
    ///
    /// The offset is re-derived from the state: 0 when closed, `-action_width`
    /// when open. A running settle snaps to its target and a live drag is
    /// clamped into the new range. A non-positive action width disables
    /// swiping and forces the panel closed.
    pub fn on_layout(
        &self,
        content_width: f32,
        action_width: f32,
        height: f32,
    ) -> Result<(), SwipeError> {
        let content_width = check_extent("content width", content_width)?;
        let height = check_extent("height", height)?;
        if !action_width.is_finite() {
            return Err(SwipeError::InvalidGeometry {
                what: "action width",
                value: action_width,
            });
        }

        let mut effects = Effects::default();
        {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;
            let geometry = PanelGeometry {
                content_width,
                action_width,
                height,
            };
            inner.geometry = Some(geometry);

            if !geometry.is_swipeable() {
                log::warn!(
                    "panel {} has action width {}, swiping disabled",
                    inner.id,
                    action_width
                );
                let was_closed = inner.state == PanelState::Closed;
                inner.session = None;
                inner.settle = None;
                inner.content_offset_x = 0.0;
                inner.state = PanelState::Closed;
                if !was_closed {
                    effects.events.push(PanelEvent::Closed);
                }
            } else {
                let state = inner.state;
                match state {
                    PanelState::Closed => inner.content_offset_x = 0.0,
                    PanelState::Open => inner.content_offset_x = -action_width,
                    PanelState::Dragging => {
                        inner.content_offset_x = geometry.clamp_offset(inner.content_offset_x);
                    }
                    PanelState::Settling => {
                        if let Some(settle) = inner.settle.take() {
                            inner.finish_settle(settle.target, &mut effects);
                        }
                    }
                }
            }
        }
        self.apply(effects);
        Ok(())
    }

    /// Capture-decision phase, called before the event reaches the panel's
    /// children. Returns true when the panel takes the gesture over.
    pub fn should_intercept(&self, event: &PointerEvent) -> bool {
        if event.kind == PointerEventKind::Down {
            self.emit(PanelEvent::AboutToCapture);
        }

        let mut effects = Effects::default();
        let intercept = {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;
            match event.kind {
                PointerEventKind::Down => {
                    inner.begin_session(event);
                    false
                }
                PointerEventKind::Move => {
                    let touch_slop = inner.config.touch_slop;
                    let horizontal = match inner.session.as_mut() {
                        None => false,
                        Some(session) if session.claimed => true,
                        Some(session) => {
                            let (distance_x, distance_y) = session.travel(event.raw_position);
                            session.advance(event.raw_position);
                            distance_x > distance_y && distance_x > touch_slop
                        }
                    };
                    if horizontal {
                        inner.claim(&mut effects);
                    }
                    horizontal
                }
                PointerEventKind::Up | PointerEventKind::Cancel => {
                    // Without a claim the children own this gesture.
                    if let Some(session) = inner.session.take() {
                        if session.claimed {
                            inner.release(&mut effects);
                        }
                    }
                    false
                }
            }
        };
        self.apply(effects);
        intercept
    }

    /// Process an event targeted at the panel itself. Returns whether the
    /// panel consumed it.
    pub fn handle_event(&self, event: &PointerEvent) -> bool {
        let mut effects = Effects::default();
        let consumed = {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;
            if inner.geometry.is_none() {
                log::warn!(
                    "panel {} got {:?} before layout, ignoring",
                    inner.id,
                    event.kind
                );
                return false;
            }

            match event.kind {
                PointerEventKind::Down => inner.begin_session(event),
                PointerEventKind::Move => {
                    let Some(session) = inner.session.as_mut() else {
                        return false;
                    };
                    let (distance_x, distance_y) = session.travel(event.raw_position);
                    let dx = session.advance(event.raw_position);
                    let claimed = session.claimed;
                    if !claimed && distance_x > distance_y {
                        inner.claim(&mut effects);
                    }
                    if inner.state == PanelState::Dragging {
                        inner.translate(dx);
                        log::trace!("panel {} dragged to {}", inner.id, inner.content_offset_x);
                    }
                    true
                }
                PointerEventKind::Up | PointerEventKind::Cancel => {
                    let Some(session) = inner.session.take() else {
                        return false;
                    };
                    // An unclaimed press lets a running settle finish.
                    if session.claimed || inner.state != PanelState::Settling {
                        inner.release(&mut effects);
                    }
                    true
                }
            }
        };
        self.apply(effects);
        consumed
    }

    /// Slide to Open. Emits `Opened` when the slide finishes, or right away
    /// if the panel is already open.
    pub fn open(&self) {
        self.settle_to(RestingState::Open);
    }

    /// Slide to Closed. Emits `Closed` when the slide finishes, or right away
    /// if the panel is already closed.
    pub fn close(&self) {
        self.settle_to(RestingState::Closed);
    }

    fn settle_to(&self, target: RestingState) {
        let mut effects = Effects::default();
        self.inner.borrow_mut().settle_to(target, &mut effects);
        self.apply(effects);
    }

    /// Snap to Closed without animating, dropping any session or settle.
    /// Used when a list rebinds the panel to another row. Emits `Closed` only
    /// if the panel was not already closed.
    pub fn recycle(&self) {
        let mut effects = Effects::default();
        {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;
            let was_closed = inner.state == PanelState::Closed;
            inner.session = None;
            inner.settle = None;
            inner.content_offset_x = 0.0;
            inner.state = PanelState::Closed;
            if !was_closed {
                log::debug!("panel {} recycled while not closed", inner.id);
                effects.events.push(PanelEvent::Closed);
            }
        }
        self.apply(effects);
    }

    /// Advance the settle animation to `frame_time_nanos`. Returns whether
    /// more frames are needed.
    pub fn tick_settle(&self, frame_time_nanos: u64) -> bool {
        match self.try_tick_settle(frame_time_nanos) {
            Ok(more) => more,
            Err(err) => {
                log::warn!("panel {} tick rejected: {err}", self.id());
                false
            }
        }
    }

    /// Like [`tick_settle`](Self::tick_settle), but reports a tick before
    /// layout as an error.
    pub fn try_tick_settle(&self, frame_time_nanos: u64) -> Result<bool, SwipeError> {
        let mut effects = Effects::default();
        let more = {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;
            let Some(geometry) = inner.geometry else {
                return Err(SwipeError::NotLaidOut);
            };
            let Some(settle) = inner.settle.as_mut() else {
                return Ok(false);
            };
            let step = settle.animation.tick(frame_time_nanos);
            let target = settle.target;
            inner.content_offset_x = geometry.clamp_offset(step.value());
            if step.is_finished() {
                inner.finish_settle(target, &mut effects);
                false
            } else {
                true
            }
        };
        self.apply(effects);
        Ok(more)
    }

    pub fn state(&self) -> PanelState {
        self.inner.borrow().state
    }

    pub fn is_open(&self) -> bool {
        self.state() == PanelState::Open
    }

    pub fn is_closed(&self) -> bool {
        self.state() == PanelState::Closed
    }

    pub fn is_settling(&self) -> bool {
        self.inner.borrow().settle.is_some()
    }

    /// State the panel is heading to: the settle target while settling,
    /// otherwise the current state.
    pub fn target_state(&self) -> PanelState {
        let inner = self.inner.borrow();
        match &inner.settle {
            Some(settle) => settle.target.as_state(),
            None => inner.state,
        }
    }

    /// True while a press is being tracked, claimed or not.
    pub fn has_session(&self) -> bool {
        self.inner.borrow().session.is_some()
    }

    pub fn session(&self) -> Option<DragSession> {
        self.inner.borrow().session
    }

    pub fn geometry(&self) -> Option<PanelGeometry> {
        self.inner.borrow().geometry
    }

    /// Laid out with a positive action width.
    pub fn is_swipeable(&self) -> bool {
        self.inner.borrow().swipeable_geometry().is_some()
    }

    pub fn content_offset_x(&self) -> f32 {
        self.inner.borrow().content_offset_x
    }

    /// Left edge of the action layer: `content_offset_x + content_width`.
    pub fn action_left(&self) -> f32 {
        let inner = self.inner.borrow();
        let content_width = inner.geometry.map_or(0.0, |g| g.content_width);
        inner.content_offset_x + content_width
    }

    pub fn content_rect(&self) -> Option<Rect> {
        let inner = self.inner.borrow();
        inner
            .geometry
            .map(|g| g.content_rect(inner.content_offset_x))
    }

    pub fn action_rect(&self) -> Option<Rect> {
        let inner = self.inner.borrow();
        inner.geometry.map(|g| g.action_rect(inner.content_offset_x))
    }

    fn apply(&self, effects: Effects) {
        if effects.disallow_intercept || effects.request_frame {
            let host = self.inner.borrow().host.as_ref().and_then(Weak::upgrade);
            if let Some(host) = host {
                if effects.disallow_intercept {
                    host.request_disallow_intercept(true);
                }
                if effects.request_frame {
                    host.request_animation_frame();
                }
            }
        }
        for event in effects.events {
            self.emit(event);
        }
    }

    fn emit(&self, event: PanelEvent) {
        let listeners: SmallVec<[PanelListener; 2]> = self.inner.borrow().listeners.clone();
        log::trace!("panel {} emits {:?}", self.id(), event);
        for listener in listeners {
            listener(self, event);
        }
    }
}

impl std::fmt::Debug for PanelDragController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("PanelDragController")
            .field("id", &inner.id)
            .field("state", &inner.state)
            .field("content_offset_x", &inner.content_offset_x)
            .field("geometry", &inner.geometry)
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/drag_controller_tests.rs"]
mod tests;

//! Plain data describing a swipe panel: its geometry, lifecycle state and the
//! events it reports.

use std::sync::atomic::{AtomicU64, Ordering};
use swipe_foundation::{Point, Rect};

pub type PanelId = u64;

static NEXT_PANEL_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_panel_id() -> PanelId {
    NEXT_PANEL_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PanelState {
    /// Content at offset 0, nothing animating.
    Closed,
    /// A claimed horizontal drag is moving the layers.
    Dragging,
    /// Sliding towards Open or Closed.
    Settling,
    /// Content at `-action_width`, nothing animating.
    Open,
}

/// Terminal state a settle ends in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RestingState {
    Closed,
    Open,
}

impl RestingState {
    pub(crate) fn as_state(self) -> PanelState {
        match self {
            RestingState::Closed => PanelState::Closed,
            RestingState::Open => PanelState::Open,
        }
    }

    pub(crate) fn event(self) -> PanelEvent {
        match self {
            RestingState::Closed => PanelEvent::Closed,
            RestingState::Open => PanelEvent::Opened,
        }
    }
}

/// Notifications a panel emits to its listeners.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelEvent {
    /// The panel reached Open (or `open()` was called while already open).
    Opened,
    /// The panel reached Closed (or `close()` was called while already closed).
    Closed,
    /// A press landed on the panel; fired before any capture decision.
    AboutToCapture,
}

/// Which layer a press landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Content,
    Action,
}

/// Measured extents of a panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelGeometry {
    pub content_width: f32,
    /// Width of the action layer; also the maximum horizontal travel.
    pub action_width: f32,
    pub height: f32,
}

impl PanelGeometry {
    /// Dragging is only possible with a positive action width.
    pub fn is_swipeable(&self) -> bool {
        self.action_width > 0.0
    }

    /// Content offset of a panel at rest in `state`.
    pub(crate) fn resting_offset(&self, state: RestingState) -> f32 {
        match state {
            RestingState::Closed => 0.0,
            RestingState::Open => -self.action_width.max(0.0),
        }
    }

    pub(crate) fn clamp_offset(&self, offset: f32) -> f32 {
        offset.clamp(-self.action_width.max(0.0), 0.0)
    }

    /// Offset at which a release switches from closing to opening.
    pub fn release_threshold(&self) -> f32 {
        -self.action_width / 2.0
    }

    pub fn content_rect(&self, content_offset_x: f32) -> Rect {
        Rect::new(content_offset_x, 0.0, self.content_width, self.height)
    }

    /// The action layer always sits flush against the content's right edge.
    pub fn action_rect(&self, content_offset_x: f32) -> Rect {
        Rect::new(
            content_offset_x + self.content_width,
            0.0,
            self.action_width.max(0.0),
            self.height,
        )
    }

    pub(crate) fn layer_at(&self, content_offset_x: f32, local: Point) -> Layer {
        if local.x >= content_offset_x + self.content_width {
            Layer::Action
        } else {
            Layer::Content
        }
    }
}

/// Ephemeral state between an accepted press and its release or cancel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    pub captured_layer: Layer,
    pub start: Point,
    /// Raw position of the previous event in this session.
    pub last: Point,
    /// Horizontal delta between the two most recent events.
    pub last_dx: f32,
    /// Set once horizontal movement has claimed the gesture.
    pub claimed: bool,
}

impl DragSession {
    pub(crate) fn new(captured_layer: Layer, start: Point) -> Self {
        Self {
            captured_layer,
            start,
            last: start,
            last_dx: 0.0,
            claimed: false,
        }
    }

    /// Record a new raw position and return the horizontal step.
    pub(crate) fn advance(&mut self, raw: Point) -> f32 {
        self.last_dx = raw.x - self.last.x;
        self.last = raw;
        self.last_dx
    }

    /// Absolute travel from the press, per axis.
    pub(crate) fn travel(&self, raw: Point) -> (f32, f32) {
        raw.axis_distance(self.start)
    }
}

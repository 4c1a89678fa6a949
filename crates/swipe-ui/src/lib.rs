//! Swipe-to-reveal list rows: a per-row drag controller, a coordinator that
//! keeps at most one row open, and a headless list host driving both.

mod coordinator;
mod drag_controller;
mod error;
mod host;
mod list;
mod panel;

pub use coordinator::SinglePanelCoordinator;
pub use drag_controller::{PanelDragController, PanelListener, WeakPanelDragController};
pub use error::SwipeError;
pub use host::PanelHost;
pub use list::{SwipeList, SwipeListConfig};
pub use panel::{DragSession, Layer, PanelEvent, PanelGeometry, PanelId, PanelState};

// Re-export the shared input and config types so hosts need one import
pub use swipe_foundation::{
    gesture_constants, Point, PointerEvent, PointerEventKind, Rect, Size, SwipeConfig,
};
pub use swipe_animation::{SettleSpec, SlideSpec, SpringSpec};

pub mod prelude {
    pub use crate::{
        PanelDragController, PanelEvent, PanelHost, PanelState, SinglePanelCoordinator,
        SwipeConfig, SwipeError, SwipeList, SwipeListConfig,
    };
    pub use swipe_foundation::prelude::*;
}

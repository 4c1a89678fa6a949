//! Geometry, pointer events and gesture configuration shared by the swipe-row
//! crates.

mod config;
mod geometry;
pub mod gesture_constants;
pub mod input;

pub use config::SwipeConfig;
pub use geometry::{Point, Rect, Size};
pub use input::{PointerEvent, PointerEventKind, PointerId};

pub mod prelude {
    pub use crate::config::SwipeConfig;
    pub use crate::geometry::{Point, Rect, Size};
    pub use crate::input::prelude::*;
}

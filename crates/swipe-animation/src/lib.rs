//! Settle animations for swipe rows.
//!
//! Animations here are not scheduled by themselves. The host drives them by
//! calling [`SettleAnimation::tick`] with the current frame time, once per
//! animation frame, until the animation reports that it has finished.

mod settle;

pub use settle::*;

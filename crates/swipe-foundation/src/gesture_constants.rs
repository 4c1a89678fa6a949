//! Shared gesture constants for swipe rows.
//!
//! Values are in logical pixels.

/// Touch slop in logical pixels.
///
/// Horizontal travel must exceed this before a panel steals a gesture from
/// the children it was delivered to (for example the action button). The
/// list uses the same value before it starts scrolling.
pub const DRAG_THRESHOLD: f32 = 8.0;

/// Width of the strip along the left edge of the screen in which a press is
/// never captured by a panel.
///
/// The strip is kept free for the platform's back gesture. The comparison is
/// inclusive: a press exactly on the margin is not captured.
pub const EDGE_EXCLUSION_MARGIN: f32 = 60.0;

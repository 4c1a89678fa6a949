//! Interface a panel needs from the scrollable container hosting it.

/// Services the enclosing container provides to its panels.
///
/// Panels hold the host weakly; a panel whose host is gone simply skips
/// these calls.
pub trait PanelHost {
    /// Stop the container from intercepting the rest of the current gesture.
    /// Panels call this once, when they claim a horizontal drag. The
    /// container resets the flag itself when the gesture ends.
    fn request_disallow_intercept(&self, disallow: bool);

    /// Ask for an animation frame. The host answers by calling
    /// `tick_settle` on every settling panel until none needs more frames.
    fn request_animation_frame(&self) {}
}

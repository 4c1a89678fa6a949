use crate::gesture_constants::{DRAG_THRESHOLD, EDGE_EXCLUSION_MARGIN};
use swipe_animation::SettleSpec;

/// Tunables for a single swipe panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwipeConfig {
    /// Presses at or left of this raw x coordinate are never captured.
    pub edge_margin: f32,
    /// Horizontal travel needed before the panel steals a gesture from its
    /// children during the intercept phase.
    pub touch_slop: f32,
    /// How the panel slides to its resting position after a release or a
    /// programmatic open/close.
    pub settle: SettleSpec,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            edge_margin: EDGE_EXCLUSION_MARGIN,
            touch_slop: DRAG_THRESHOLD,
            settle: SettleSpec::default(),
        }
    }
}

impl SwipeConfig {
    pub fn with_edge_margin(mut self, edge_margin: f32) -> Self {
        self.edge_margin = edge_margin;
        self.sanitized()
    }

    pub fn with_touch_slop(mut self, touch_slop: f32) -> Self {
        self.touch_slop = touch_slop;
        self.sanitized()
    }

    pub fn with_settle(mut self, settle: SettleSpec) -> Self {
        self.settle = settle;
        self
    }

    /// Replace values that cannot be used for hit decisions with defaults.
    fn sanitized(mut self) -> Self {
        if !self.edge_margin.is_finite() {
            log::warn!(
                "edge margin {} is not finite, using {}",
                self.edge_margin,
                EDGE_EXCLUSION_MARGIN
            );
            self.edge_margin = EDGE_EXCLUSION_MARGIN;
        }
        if !self.touch_slop.is_finite() || self.touch_slop < 0.0 {
            log::warn!(
                "touch slop {} is invalid, using {}",
                self.touch_slop,
                DRAG_THRESHOLD
            );
            self.touch_slop = DRAG_THRESHOLD;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swipe_animation::SpringSpec;

    #[test]
    fn defaults_match_gesture_constants() {
        let config = SwipeConfig::default();
        assert_eq!(config.edge_margin, 60.0);
        assert_eq!(config.touch_slop, 8.0);
        assert_eq!(config.settle, SettleSpec::default());
    }

    #[test]
    fn builders_override_values() {
        let config = SwipeConfig::default()
            .with_edge_margin(0.0)
            .with_touch_slop(4.0)
            .with_settle(SettleSpec::Spring(SpringSpec::stiff()));
        assert_eq!(config.edge_margin, 0.0);
        assert_eq!(config.touch_slop, 4.0);
        assert!(matches!(config.settle, SettleSpec::Spring(_)));
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = SwipeConfig::default()
            .with_edge_margin(f32::NAN)
            .with_touch_slop(-1.0);
        assert_eq!(config.edge_margin, EDGE_EXCLUSION_MARGIN);
        assert_eq!(config.touch_slop, DRAG_THRESHOLD);
    }
}

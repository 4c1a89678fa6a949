use crate::geometry::Point;
use std::cell::Cell;
use std::rc::Rc;

pub type PointerId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Cancel,
}

impl PointerEventKind {
    /// Up and Cancel both end a gesture.
    pub fn ends_gesture(&self) -> bool {
        matches!(self, PointerEventKind::Up | PointerEventKind::Cancel)
    }
}

/// Pointer event with consumption tracking.
///
/// `position` is local to whoever receives the event; `raw_position` is the
/// screen position and stays fixed as the event is re-targeted. Gesture
/// decisions (edge exclusion, axis distances) use the raw position so that a
/// panel that moves under the finger does not feed back into its own drag.
#[derive(Clone, Debug)]
pub struct PointerEvent {
    pub id: PointerId,
    pub kind: PointerEventKind,
    pub position: Point,
    pub raw_position: Point,
    /// Shared via Rc<Cell> so consumption is visible across copies.
    consumed: Rc<Cell<bool>>,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, position: Point, raw_position: Point) -> Self {
        Self {
            id: 0,
            kind,
            position,
            raw_position,
            consumed: Rc::new(Cell::new(false)),
        }
    }

    /// Event whose local and raw positions coincide.
    pub fn at(kind: PointerEventKind, x: f32, y: f32) -> Self {
        let point = Point::new(x, y);
        Self::new(kind, point, point)
    }

    pub fn down(x: f32, y: f32) -> Self {
        Self::at(PointerEventKind::Down, x, y)
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::at(PointerEventKind::Move, x, y)
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self::at(PointerEventKind::Up, x, y)
    }

    pub fn cancel(x: f32, y: f32) -> Self {
        Self::at(PointerEventKind::Cancel, x, y)
    }

    pub fn with_id(mut self, id: PointerId) -> Self {
        self.id = id;
        self
    }

    /// Mark this event as consumed so later handlers skip it.
    pub fn consume(&self) {
        self.consumed.set(true);
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed.get()
    }

    /// Copy with a new local position, sharing the consumption state.
    pub fn copy_with_local_position(&self, position: Point) -> Self {
        Self {
            id: self.id,
            kind: self.kind,
            position,
            raw_position: self.raw_position,
            consumed: self.consumed.clone(),
        }
    }

    /// Copy with a different kind, sharing the consumption state. Used by
    /// containers that turn a stolen gesture into a Cancel for the child.
    pub fn copy_with_kind(&self, kind: PointerEventKind) -> Self {
        Self {
            kind,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumption_is_shared_between_copies() {
        let event = PointerEvent::down(120.0, 20.0);
        let local = event.copy_with_local_position(Point::new(120.0, 4.0));
        assert!(!event.is_consumed());
        local.consume();
        assert!(event.is_consumed());
        assert_eq!(local.raw_position, Point::new(120.0, 20.0));
    }

    #[test]
    fn cancel_copy_keeps_positions() {
        let event = PointerEvent::moved(90.0, 140.0).with_id(3);
        let cancel = event.copy_with_kind(PointerEventKind::Cancel);
        assert_eq!(cancel.kind, PointerEventKind::Cancel);
        assert_eq!(cancel.id, 3);
        assert!(cancel.kind.ends_gesture());
        assert_eq!(cancel.raw_position, event.raw_position);
    }
}

//! Robot-style driver for a [`SwipeList`].
//!
//! The robot owns the list and a fake frame clock. Gestures are fed as
//! pointer events in list coordinates and the clock advances one frame per
//! drag step, so settles that start mid-gesture make progress the way they
//! would on a device.
//!
//! # Example
//!
//! ```
//! use swipe_testing::SwipeRobot;
//! use swipe_ui::SwipeListConfig;
//!
//! let rows: Vec<String> = (0..50).map(|i| i.to_string()).collect();
//! let mut robot = SwipeRobot::launch(SwipeListConfig::default(), rows, 320.0, 480.0)?;
//! robot.swipe_row_open(3)?;
//! assert!(robot.list().panel_for_row(3).is_some_and(|p| p.is_open()));
//! # Ok::<(), swipe_ui::SwipeError>(())
//! ```

use swipe_foundation::{Point, PointerEvent};
use swipe_ui::{SwipeError, SwipeList, SwipeListConfig};

/// One display frame at 60 Hz.
pub const FRAME_NANOS: u64 = 16_666_667;

/// Frames `wait_for_idle` pumps before giving up.
const MAX_IDLE_FRAMES: usize = 600;

/// Number of move events a drag is split into.
const DRAG_STEPS: usize = 10;

pub struct SwipeRobot<T> {
    list: SwipeList<T>,
    frame_time: u64,
    pointer: Option<Point>,
}

impl<T> SwipeRobot<T> {
    /// Wrap a list that already has a viewport.
    pub fn new(list: SwipeList<T>) -> Result<Self, SwipeError> {
        if list.viewport().is_none() {
            return Err(SwipeError::NotLaidOut);
        }
        Ok(Self {
            list,
            frame_time: 0,
            pointer: None,
        })
    }

    /// Build a list of `rows` and lay it out at `width` x `height`.
    pub fn launch(
        config: SwipeListConfig,
        rows: Vec<T>,
        width: f32,
        height: f32,
    ) -> Result<Self, SwipeError> {
        let mut list = SwipeList::new(config, rows)?;
        list.set_viewport(width, height)?;
        Self::new(list)
    }

    pub fn list(&self) -> &SwipeList<T> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut SwipeList<T> {
        &mut self.list
    }

    pub fn into_list(self) -> SwipeList<T> {
        self.list
    }

    /// Current fake frame time in nanoseconds.
    pub fn frame_time(&self) -> u64 {
        self.frame_time
    }

    fn viewport_width(&self) -> f32 {
        self.list.viewport().map_or(0.0, |v| v.width)
    }

    /// Screen y of the middle of `row`.
    pub fn row_center_y(&self, row: usize) -> f32 {
        self.list.row_top(row) + self.list.config().row_height / 2.0
    }

    // ------------------------------------------------------------------
    // Raw pointer input
    // ------------------------------------------------------------------

    pub fn press(&mut self, x: f32, y: f32) -> Result<bool, SwipeError> {
        self.pointer = Some(Point::new(x, y));
        self.list.dispatch(&PointerEvent::down(x, y))
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> Result<bool, SwipeError> {
        self.pointer = Some(Point::new(x, y));
        self.list.dispatch(&PointerEvent::moved(x, y))
    }

    /// Lift the pointer where it last was.
    pub fn release(&mut self) -> Result<bool, SwipeError> {
        let Some(at) = self.pointer.take() else {
            log::warn!("robot release without a press");
            return Ok(false);
        };
        self.list.dispatch(&PointerEvent::up(at.x, at.y))
    }

    pub fn cancel(&mut self) -> Result<bool, SwipeError> {
        let Some(at) = self.pointer.take() else {
            return Ok(false);
        };
        self.list.dispatch(&PointerEvent::cancel(at.x, at.y))
    }

    // ------------------------------------------------------------------
    // Gestures
    // ------------------------------------------------------------------

    /// Press at `from`, move to `to` in even steps (one frame each), release
    /// and wait for every settle to finish.
    pub fn drag(&mut self, from: (f32, f32), to: (f32, f32)) -> Result<(), SwipeError> {
        self.press(from.0, from.1)?;
        for step in 1..=DRAG_STEPS {
            let t = step as f32 / DRAG_STEPS as f32;
            let x = from.0 + (to.0 - from.0) * t;
            let y = from.1 + (to.1 - from.1) * t;
            self.move_to(x, y)?;
            self.advance_frame();
        }
        self.release()?;
        self.wait_for_idle();
        Ok(())
    }

    pub fn tap(&mut self, x: f32, y: f32) -> Result<(), SwipeError> {
        self.press(x, y)?;
        self.release()?;
        self.wait_for_idle();
        Ok(())
    }

    /// Drag `row` left by one and a half action widths from near its right
    /// edge.
    pub fn swipe_row_open(&mut self, row: usize) -> Result<(), SwipeError> {
        let y = self.row_center_y(row);
        let start = self.viewport_width() - 20.0;
        let distance = self.list.config().action_width * 1.5;
        self.drag((start, y), (start - distance, y))
    }

    /// Drag `row` right from the middle of its (open) content.
    pub fn swipe_row_closed(&mut self, row: usize) -> Result<(), SwipeError> {
        let y = self.row_center_y(row);
        let start = self.viewport_width() / 2.0;
        let distance = self.list.config().action_width * 1.5;
        self.drag((start, y), (start + distance, y))
    }

    /// Tap the middle of `row`'s action button as it sits on screen.
    pub fn tap_action(&mut self, row: usize) -> Result<(), SwipeError> {
        let y = self.row_center_y(row);
        let x = self.viewport_width() - self.list.config().action_width / 2.0;
        self.tap(x, y)
    }

    /// Vertical drag in the middle of the list; positive `dy` reveals later
    /// rows.
    pub fn scroll(&mut self, dy: f32) -> Result<(), SwipeError> {
        let x = self.viewport_width() / 2.0;
        let height = self.list.viewport().map_or(0.0, |v| v.height);
        let from = if dy >= 0.0 {
            height * 0.75
        } else {
            height * 0.25
        };
        self.drag((x, from), (x, from - dy))
    }

    // ------------------------------------------------------------------
    // Frames
    // ------------------------------------------------------------------

    /// Advance the clock by one frame and tick the list. Returns whether
    /// another frame is wanted.
    pub fn advance_frame(&mut self) -> bool {
        self.frame_time += FRAME_NANOS;
        self.list.on_frame(self.frame_time)
    }

    /// Advance by `nanos`, ticking once per elapsed frame.
    pub fn advance_time(&mut self, nanos: u64) {
        let frames = nanos / FRAME_NANOS;
        for _ in 0..frames {
            self.advance_frame();
        }
    }

    /// Pump frames until nothing is settling. Returns the frames pumped.
    pub fn wait_for_idle(&mut self) -> usize {
        for frame in 0..MAX_IDLE_FRAMES {
            if !self.list.needs_frame() {
                return frame;
            }
            self.advance_frame();
        }
        log::warn!("list still settling after {} frames", MAX_IDLE_FRAMES);
        MAX_IDLE_FRAMES
    }
}

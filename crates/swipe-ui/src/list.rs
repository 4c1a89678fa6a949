//! Headless virtualized list of swipeable rows.
//!
//! `SwipeList` plays the part of the scrolling container: it owns a small
//! pool of [`PanelDragController`]s (one per visible row plus one), binds
//! them to rows as the list scrolls, routes pointer events through the
//! intercept/handle phases and drives settle animations from `on_frame`.
//!
//! Event coordinates are list coordinates: the list sits at the origin of
//! the screen, so `position` and `raw_position` agree on input. Panels get a
//! copy whose local position is relative to the row's top edge.

use std::cell::Cell;
use std::ops::Range;
use std::rc::{Rc, Weak};

use swipe_foundation::gesture_constants::DRAG_THRESHOLD;
use swipe_foundation::{Point, PointerEvent, PointerEventKind, Size, SwipeConfig};

use crate::coordinator::SinglePanelCoordinator;
use crate::drag_controller::PanelDragController;
use crate::error::{check_extent, SwipeError};
use crate::host::PanelHost;
use crate::panel::PanelState;

/// Most rows a viewport may show at once. Taller viewports are rejected
/// rather than backed by an oversized panel pool.
pub const MAX_VISIBLE_ROWS: usize = 1024;

/// Layout and gesture settings for a [`SwipeList`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwipeListConfig {
    pub row_height: f32,
    /// Width of every row's action layer.
    pub action_width: f32,
    /// Vertical travel after which the list starts scrolling.
    pub scroll_slop: f32,
    pub panel: SwipeConfig,
}

impl Default for SwipeListConfig {
    fn default() -> Self {
        Self {
            row_height: 48.0,
            action_width: 100.0,
            scroll_slop: DRAG_THRESHOLD,
            panel: SwipeConfig::default(),
        }
    }
}

impl SwipeListConfig {
    pub fn with_row_height(mut self, row_height: f32) -> Self {
        self.row_height = row_height;
        self
    }

    pub fn with_action_width(mut self, action_width: f32) -> Self {
        self.action_width = action_width;
        self
    }

    pub fn with_scroll_slop(mut self, scroll_slop: f32) -> Self {
        self.scroll_slop = scroll_slop;
        self
    }

    pub fn with_panel(mut self, panel: SwipeConfig) -> Self {
        self.panel = panel;
        self
    }

    fn validate(&self) -> Result<(), SwipeError> {
        let row_height = check_extent("row height", self.row_height)?;
        if row_height == 0.0 {
            return Err(SwipeError::InvalidGeometry {
                what: "row height",
                value: row_height,
            });
        }
        if !self.action_width.is_finite() {
            return Err(SwipeError::InvalidGeometry {
                what: "action width",
                value: self.action_width,
            });
        }
        check_extent("scroll slop", self.scroll_slop)?;
        Ok(())
    }
}

/// What the list's panels ask of it, recorded for the current gesture.
#[derive(Default)]
struct ListHost {
    disallow_intercept: Cell<bool>,
    frame_requested: Cell<bool>,
}

impl PanelHost for ListHost {
    fn request_disallow_intercept(&self, disallow: bool) {
        self.disallow_intercept.set(disallow);
    }

    fn request_animation_frame(&self) {
        self.frame_requested.set(true);
    }
}

struct RowSlot {
    controller: PanelDragController,
    row: Option<usize>,
}

/// Who receives the events of the current gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TouchTarget {
    /// The panel itself, through `handle_event`.
    Panel,
    /// The action button; the panel only watches through `should_intercept`.
    ActionButton,
    /// Below the last row.
    Nothing,
}

#[derive(Clone, Copy, Debug)]
struct Gesture {
    row: Option<usize>,
    target: TouchTarget,
    down: Point,
    last: Point,
    scrolling: bool,
}

pub struct SwipeList<T> {
    config: SwipeListConfig,
    rows: Vec<T>,
    deleted: Vec<T>,
    viewport: Option<Size>,
    scroll_offset: f32,
    slots: Vec<RowSlot>,
    host: Rc<ListHost>,
    coordinator: SinglePanelCoordinator,
    gesture: Option<Gesture>,
}

impl<T> SwipeList<T> {
    pub fn new(config: SwipeListConfig, rows: Vec<T>) -> Result<Self, SwipeError> {
        Self::with_coordinator(config, rows, SinglePanelCoordinator::new())
    }

    /// Build a list whose panels report to `coordinator`, e.g.
    /// [`SinglePanelCoordinator::current`] to share one open row across
    /// several lists.
    pub fn with_coordinator(
        config: SwipeListConfig,
        rows: Vec<T>,
        coordinator: SinglePanelCoordinator,
    ) -> Result<Self, SwipeError> {
        config.validate()?;
        Ok(Self {
            config,
            rows,
            deleted: Vec::new(),
            viewport: None,
            scroll_offset: 0.0,
            slots: Vec::new(),
            host: Rc::new(ListHost::default()),
            coordinator,
            gesture: None,
        })
    }

    /// Measure the list. Grows or shrinks the panel pool to the number of
    /// rows that fit plus one and lays every bound panel out at the new
    /// width.
    pub fn set_viewport(&mut self, width: f32, height: f32) -> Result<(), SwipeError> {
        let width = check_extent("viewport width", width)?;
        let height = check_extent("viewport height", height)?;
        let rows_fit = (height / self.config.row_height).ceil();
        if rows_fit > MAX_VISIBLE_ROWS as f32 {
            return Err(SwipeError::InvalidGeometry {
                what: "viewport height",
                value: height,
            });
        }
        self.viewport = Some(Size::new(width, height));

        let pool_size = rows_fit as usize + 1;
        if pool_size != self.slots.len() {
            log::debug!(
                "list viewport {}x{}: pool of {} panels",
                width,
                height,
                pool_size
            );
            for slot in self.slots.drain(..) {
                slot.controller.recycle();
            }
            for _ in 0..pool_size {
                let slot = self.new_slot();
                self.slots.push(slot);
            }
        } else {
            for slot in &self.slots {
                if slot.row.is_some() {
                    slot.controller
                        .on_layout(width, self.config.action_width, self.config.row_height)?;
                }
            }
        }

        self.scroll_offset = self.scroll_offset.clamp(0.0, self.max_scroll());
        self.bind_visible()
    }

    fn new_slot(&self) -> RowSlot {
        let controller = PanelDragController::with_config(self.config.panel);
        let host: Rc<dyn PanelHost> = self.host.clone();
        let host: Weak<dyn PanelHost> = Rc::downgrade(&host);
        controller.set_host(host);
        self.coordinator.attach(&controller);
        RowSlot {
            controller,
            row: None,
        }
    }

    /// Rows that intersect the viewport.
    pub fn visible_rows(&self) -> Range<usize> {
        let Some(viewport) = self.viewport else {
            return 0..0;
        };
        let row_height = self.config.row_height;
        let first = (self.scroll_offset / row_height).floor() as usize;
        let end = ((self.scroll_offset + viewport.height) / row_height).ceil() as usize;
        first.min(self.rows.len())..end.min(self.rows.len())
    }

    fn slot_index(&self, row: usize) -> usize {
        row % self.slots.len()
    }

    /// Point every visible row at its slot, rebinding recycled panels.
    fn bind_visible(&mut self) -> Result<(), SwipeError> {
        let Some(viewport) = self.viewport else {
            return Err(SwipeError::NotLaidOut);
        };
        for row in self.visible_rows() {
            let index = self.slot_index(row);
            let slot = &mut self.slots[index];
            if slot.row == Some(row) {
                continue;
            }
            log::trace!(
                "binding row {} to panel {} (was {:?})",
                row,
                slot.controller.id(),
                slot.row
            );
            slot.controller.recycle();
            slot.row = Some(row);
            slot.controller.on_layout(
                viewport.width,
                self.config.action_width,
                self.config.row_height,
            )?;
        }
        Ok(())
    }

    /// Panel currently bound to `row`, if the row is on screen.
    pub fn panel_for_row(&self, row: usize) -> Option<PanelDragController> {
        if !self.visible_rows().contains(&row) {
            return None;
        }
        let slot = &self.slots[self.slot_index(row)];
        (slot.row == Some(row)).then(|| slot.controller.clone())
    }

    /// Screen y of the top edge of `row`.
    pub fn row_top(&self, row: usize) -> f32 {
        row as f32 * self.config.row_height - self.scroll_offset
    }

    /// Row under screen coordinate `y`.
    pub fn row_at(&self, y: f32) -> Option<usize> {
        let viewport = self.viewport?;
        if y < 0.0 || y >= viewport.height {
            return None;
        }
        let row = ((y + self.scroll_offset) / self.config.row_height).floor() as usize;
        (row < self.rows.len()).then_some(row)
    }

    /// Route one pointer event through the list and its panels. Returns
    /// whether anything consumed it.
    pub fn dispatch(&mut self, event: &PointerEvent) -> Result<bool, SwipeError> {
        if self.viewport.is_none() {
            return Err(SwipeError::NotLaidOut);
        }
        match event.kind {
            PointerEventKind::Down => Ok(self.dispatch_down(event)),
            PointerEventKind::Move => self.dispatch_move(event),
            PointerEventKind::Up | PointerEventKind::Cancel => self.dispatch_end(event),
        }
    }

    fn local_event(&self, row: usize, event: &PointerEvent) -> PointerEvent {
        let position = Point::new(event.position.x, event.position.y - self.row_top(row));
        event.copy_with_local_position(position)
    }

    fn dispatch_down(&mut self, event: &PointerEvent) -> bool {
        self.host.disallow_intercept.set(false);
        let row = self.row_at(event.position.y);
        let mut gesture = Gesture {
            row,
            target: TouchTarget::Nothing,
            down: event.raw_position,
            last: event.raw_position,
            scrolling: false,
        };

        let consumed = match row.and_then(|row| self.panel_for_row(row).map(|p| (row, p))) {
            Some((row, panel)) => {
                let local = self.local_event(row, event);
                panel.should_intercept(&local);
                let on_button = panel.is_open()
                    && panel
                        .action_rect()
                        .is_some_and(|rect| rect.contains(local.position.x, local.position.y));
                if on_button {
                    log::trace!("press on action button of row {}", row);
                    gesture.target = TouchTarget::ActionButton;
                    true
                } else {
                    gesture.target = TouchTarget::Panel;
                    panel.handle_event(&local)
                }
            }
            None => false,
        };
        self.gesture = Some(gesture);
        consumed
    }

    fn dispatch_move(&mut self, event: &PointerEvent) -> Result<bool, SwipeError> {
        let Some(mut gesture) = self.gesture else {
            return Ok(false);
        };
        let step_y = event.raw_position.y - gesture.last.y;
        gesture.last = event.raw_position;
        self.gesture = Some(gesture);

        if gesture.scrolling {
            self.scroll_by(-step_y)?;
            return Ok(true);
        }

        let (_, travel_y) = event.raw_position.axis_distance(gesture.down);
        if !self.host.disallow_intercept.get() && travel_y > self.config.scroll_slop {
            self.on_scroll_started(event);
            self.scroll_by(gesture.down.y - event.raw_position.y)?;
            return Ok(true);
        }

        let Some((row, panel)) = gesture
            .row
            .and_then(|row| self.panel_for_row(row).map(|p| (row, p)))
        else {
            return Ok(false);
        };
        let local = self.local_event(row, event);
        match gesture.target {
            TouchTarget::ActionButton => {
                if panel.should_intercept(&local) {
                    log::trace!("row {} panel steals gesture from action button", row);
                    self.set_target(TouchTarget::Panel);
                }
                Ok(true)
            }
            TouchTarget::Panel => Ok(panel.handle_event(&local)),
            TouchTarget::Nothing => Ok(false),
        }
    }

    fn dispatch_end(&mut self, event: &PointerEvent) -> Result<bool, SwipeError> {
        let Some(gesture) = self.gesture.take() else {
            return Ok(false);
        };
        self.host.disallow_intercept.set(false);
        if gesture.scrolling {
            return Ok(true);
        }

        let Some((row, panel)) = gesture
            .row
            .and_then(|row| self.panel_for_row(row).map(|p| (row, p)))
        else {
            return Ok(false);
        };
        let local = self.local_event(row, event);
        match gesture.target {
            TouchTarget::ActionButton => {
                panel.should_intercept(&local);
                let tapped = event.kind == PointerEventKind::Up
                    && panel.is_open()
                    && panel
                        .action_rect()
                        .is_some_and(|rect| rect.contains(local.position.x, local.position.y));
                if tapped {
                    log::info!("delete action tapped on row {}", row);
                    let removed = self.delete_row(row)?;
                    self.deleted.push(removed);
                }
                Ok(true)
            }
            TouchTarget::Panel => Ok(panel.handle_event(&local)),
            TouchTarget::Nothing => Ok(false),
        }
    }

    fn set_target(&mut self, target: TouchTarget) {
        if let Some(gesture) = self.gesture.as_mut() {
            gesture.target = target;
        }
    }

    /// A scroll begins, whether the list took a touch gesture over or the
    /// host started one itself (a fling, a programmatic scroll). Closes
    /// whichever row is open; a gesture in progress is cancelled for the
    /// panel it touched.
    pub fn on_scroll_started(&mut self, event: &PointerEvent) {
        self.cancel_touched_panel(event);
        self.coordinator.close_open_panel();
    }

    fn cancel_touched_panel(&mut self, event: &PointerEvent) {
        let Some(gesture) = self.gesture.as_mut() else {
            return;
        };
        if gesture.scrolling {
            return;
        }
        gesture.scrolling = true;
        let gesture = *gesture;
        log::debug!("list starts scrolling, cancelling row {:?}", gesture.row);

        if let Some((row, panel)) = gesture
            .row
            .and_then(|row| self.panel_for_row(row).map(|p| (row, p)))
        {
            let cancel = self
                .local_event(row, event)
                .copy_with_kind(PointerEventKind::Cancel);
            match gesture.target {
                TouchTarget::ActionButton => {
                    panel.should_intercept(&cancel);
                }
                TouchTarget::Panel => {
                    panel.handle_event(&cancel);
                }
                TouchTarget::Nothing => {}
            }
        }
    }

    /// Scroll by `dy` (positive reveals later rows), clamped to the content.
    /// Returns the distance actually scrolled.
    pub fn scroll_by(&mut self, dy: f32) -> Result<f32, SwipeError> {
        if self.viewport.is_none() {
            return Err(SwipeError::NotLaidOut);
        }
        let before = self.scroll_offset;
        self.scroll_offset = (before + dy).clamp(0.0, self.max_scroll());
        if self.scroll_offset != before {
            self.bind_visible()?;
        }
        Ok(self.scroll_offset - before)
    }

    /// Scroll just far enough that `row` is fully visible.
    pub fn scroll_to_row(&mut self, row: usize) -> Result<(), SwipeError> {
        let viewport = self.viewport.ok_or(SwipeError::NotLaidOut)?;
        self.check_row(row)?;
        let top = row as f32 * self.config.row_height;
        let bottom = top + self.config.row_height;
        let target = if top < self.scroll_offset {
            top
        } else if bottom > self.scroll_offset + viewport.height {
            bottom - viewport.height
        } else {
            return Ok(());
        };
        self.scroll_by(target - self.scroll_offset)?;
        Ok(())
    }

    /// Bring `row` on screen and slide its panel open.
    pub fn open_row(&mut self, row: usize) -> Result<(), SwipeError> {
        self.scroll_to_row(row)?;
        let panel = self.panel_for_row(row).ok_or(SwipeError::NotLaidOut)?;
        panel.open();
        Ok(())
    }

    /// Remove `row`. Panels bound at or after it are recycled and rebound to
    /// the rows that moved up.
    pub fn delete_row(&mut self, row: usize) -> Result<T, SwipeError> {
        self.check_row(row)?;
        let removed = self.rows.remove(row);
        for slot in &mut self.slots {
            if slot.row.is_some_and(|bound| bound >= row) {
                slot.row = None;
                slot.controller.recycle();
            }
        }
        self.scroll_offset = self.scroll_offset.clamp(0.0, self.max_scroll());
        log::debug!("deleted row {}, {} rows left", row, self.rows.len());
        if self.viewport.is_some() {
            self.bind_visible()?;
        }
        Ok(removed)
    }

    fn check_row(&self, row: usize) -> Result<(), SwipeError> {
        if row < self.rows.len() {
            Ok(())
        } else {
            Err(SwipeError::RowOutOfRange {
                index: row,
                len: self.rows.len(),
            })
        }
    }

    /// Rows removed through their delete action since the last call.
    pub fn take_deleted(&mut self) -> Vec<T> {
        std::mem::take(&mut self.deleted)
    }

    /// Advance every settling panel to `frame_time_nanos`. Returns whether
    /// another frame is needed.
    pub fn on_frame(&mut self, frame_time_nanos: u64) -> bool {
        self.host.frame_requested.set(false);
        let mut more = false;
        for slot in &self.slots {
            if slot.controller.is_settling() {
                more |= slot.controller.tick_settle(frame_time_nanos);
            }
        }
        // A panel finishing this frame may have started another's close.
        more || self.host.frame_requested.get()
    }

    pub fn needs_frame(&self) -> bool {
        self.host.frame_requested.get() || self.slots.iter().any(|s| s.controller.is_settling())
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn row(&self, row: usize) -> Option<&T> {
        self.rows.get(row)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn max_scroll(&self) -> f32 {
        let viewport_height = self.viewport.map_or(0.0, |v| v.height);
        (self.rows.len() as f32 * self.config.row_height - viewport_height).max(0.0)
    }

    pub fn viewport(&self) -> Option<Size> {
        self.viewport
    }

    pub fn config(&self) -> &SwipeListConfig {
        &self.config
    }

    pub fn coordinator(&self) -> &SinglePanelCoordinator {
        &self.coordinator
    }

    /// True while the current gesture is scrolling the list.
    pub fn is_scrolling(&self) -> bool {
        self.gesture.is_some_and(|g| g.scrolling)
    }

    /// Rows whose panels are open or heading there.
    pub fn open_rows(&self) -> Vec<usize> {
        self.slots
            .iter()
            .filter(|slot| slot.controller.target_state() == PanelState::Open)
            .filter_map(|slot| slot.row)
            .collect()
    }
}

impl<T> std::fmt::Debug for SwipeList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwipeList")
            .field("rows", &self.rows.len())
            .field("scroll_offset", &self.scroll_offset)
            .field("viewport", &self.viewport)
            .field("pool", &self.slots.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/list_tests.rs"]
mod tests;

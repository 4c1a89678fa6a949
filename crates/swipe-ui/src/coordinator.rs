//! Keeps at most one swipe panel open across a list.
//!
//! The coordinator holds a weak record of the panel that last reported
//! `Opened`. It never touches geometry; it only asks other panels to
//! `close()`. Panels report to it through listeners installed by
//! [`SinglePanelCoordinator::attach`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::drag_controller::{PanelDragController, WeakPanelDragController};
use crate::panel::{PanelEvent, PanelId, PanelState};

thread_local! {
    static CURRENT_COORDINATOR: SinglePanelCoordinator = SinglePanelCoordinator::new();
}

#[derive(Default)]
struct CoordinatorState {
    open: Option<WeakPanelDragController>,
}

/// Shared handle; clones refer to the same registry.
#[derive(Clone, Default)]
pub struct SinglePanelCoordinator {
    inner: Rc<RefCell<CoordinatorState>>,
}

impl SinglePanelCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The coordinator shared by everything on the current (UI) thread.
    pub fn current() -> Self {
        CURRENT_COORDINATOR.with(Clone::clone)
    }

    /// Route `controller`'s events into this coordinator.
    pub fn attach(&self, controller: &PanelDragController) {
        let registry = Rc::downgrade(&self.inner);
        controller.add_listener(move |panel, event| {
            let Some(inner) = Weak::upgrade(&registry) else {
                return;
            };
            let coordinator = SinglePanelCoordinator { inner };
            match event {
                PanelEvent::Opened => coordinator.notify_opened(panel),
                PanelEvent::Closed => coordinator.notify_closed(panel),
                PanelEvent::AboutToCapture => coordinator.notify_about_to_capture(panel),
            }
        });
    }

    /// Record `controller` as the open panel. A different panel that is
    /// still open (or heading there) is closed.
    pub fn notify_opened(&self, controller: &PanelDragController) {
        let previous = self
            .inner
            .borrow_mut()
            .open
            .replace(controller.downgrade())
            .and_then(|weak| weak.upgrade());

        if let Some(previous) = previous {
            if !previous.ptr_eq(controller) && previous.target_state() != PanelState::Closed {
                log::debug!(
                    "panels {} and {} both open, closing {}",
                    previous.id(),
                    controller.id(),
                    previous.id()
                );
                previous.close();
            }
        }
    }

    /// A press landed on `controller`: close whichever other panel is open.
    pub fn notify_about_to_capture(&self, controller: &PanelDragController) {
        let Some(open) = self.open_panel() else {
            return;
        };
        if !open.ptr_eq(controller) {
            log::debug!(
                "press on panel {} closes open panel {}",
                controller.id(),
                open.id()
            );
            open.close();
        }
    }

    /// Forget `controller` if it is the recorded open panel.
    pub fn notify_closed(&self, controller: &PanelDragController) {
        let mut state = self.inner.borrow_mut();
        let recorded = state
            .open
            .as_ref()
            .map(|weak| weak.id() == controller.id());
        if recorded == Some(true) {
            state.open = None;
        }
    }

    /// The recorded open panel, if it is still alive. A dead record is
    /// dropped.
    pub fn open_panel(&self) -> Option<PanelDragController> {
        let mut state = self.inner.borrow_mut();
        let panel = state.open.as_ref().and_then(WeakPanelDragController::upgrade);
        if panel.is_none() {
            state.open = None;
        }
        panel
    }

    pub fn open_panel_id(&self) -> Option<PanelId> {
        self.open_panel().map(|panel| panel.id())
    }

    /// Close the recorded open panel, e.g. because the list started
    /// scrolling. Returns whether there was one.
    pub fn close_open_panel(&self) -> bool {
        match self.open_panel() {
            Some(panel) => {
                log::debug!("closing open panel {}", panel.id());
                panel.close();
                true
            }
            None => false,
        }
    }

    /// Drop the record without touching any panel.
    pub fn clear(&self) {
        self.inner.borrow_mut().open = None;
    }
}

#[cfg(test)]
#[path = "tests/coordinator_tests.rs"]
mod tests;

//! Assertion utilities for robot testing
//!
//! Helpers for checking panel geometry and the open-row bookkeeping of a
//! [`SwipeList`].

use swipe_foundation::Rect;
use swipe_ui::{PanelDragController, SwipeList};

/// Assert that a value is within `tolerance` of the expected one.
pub fn assert_approx_eq(actual: f32, expected: f32, tolerance: f32, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{}: expected {} (±{}), got {} (diff: {})",
        msg,
        expected,
        tolerance,
        actual,
        diff
    );
}

pub fn assert_rect_approx_eq(actual: Rect, expected: Rect, tolerance: f32, msg: &str) {
    assert_approx_eq(actual.x, expected.x, tolerance, &format!("{} - x", msg));
    assert_approx_eq(actual.y, expected.y, tolerance, &format!("{} - y", msg));
    assert_approx_eq(
        actual.width,
        expected.width,
        tolerance,
        &format!("{} - width", msg),
    );
    assert_approx_eq(
        actual.height,
        expected.height,
        tolerance,
        &format!("{} - height", msg),
    );
}

/// The action layer must sit exactly at the content's right edge, and the
/// offset must stay within `[-action_width, 0]`.
pub fn assert_rigid_pair(panel: &PanelDragController, msg: &str) {
    let (Some(content), Some(action)) = (panel.content_rect(), panel.action_rect()) else {
        panic!("{}: panel {} is not laid out", msg, panel.id());
    };
    assert_eq!(
        action.x,
        content.right(),
        "{}: action layer detached from content",
        msg
    );
    let offset = panel.content_offset_x();
    assert!(
        (-action.width..=0.0).contains(&offset),
        "{}: offset {} outside [-{}, 0]",
        msg,
        offset,
        action.width
    );
}

/// At most one row is open or heading there, and the coordinator agrees
/// about which one once nothing is moving.
pub fn assert_single_open<T>(list: &SwipeList<T>, msg: &str) {
    let open = list.open_rows();
    assert!(open.len() <= 1, "{}: rows {:?} open at once", msg, open);

    if list.needs_frame() {
        return;
    }
    let recorded = list.coordinator().open_panel_id();
    let expected = open
        .first()
        .and_then(|&row| list.panel_for_row(row))
        .map(|panel| panel.id());
    assert_eq!(
        recorded, expected,
        "{}: coordinator records {:?}, open rows {:?}",
        msg, recorded, open
    );
}

pub fn assert_row_open<T>(list: &SwipeList<T>, row: usize, msg: &str) {
    let panel = list
        .panel_for_row(row)
        .unwrap_or_else(|| panic!("{}: row {} is not on screen", msg, row));
    assert!(
        panel.is_open(),
        "{}: row {} is {:?}",
        msg,
        row,
        panel.state()
    );
    assert_rigid_pair(&panel, msg);
}

pub fn assert_all_closed<T>(list: &SwipeList<T>, msg: &str) {
    for row in list.visible_rows() {
        if let Some(panel) = list.panel_for_row(row) {
            assert!(
                panel.is_closed(),
                "{}: row {} is {:?}",
                msg,
                row,
                panel.state()
            );
            assert_eq!(panel.content_offset_x(), 0.0, "{}: row {} offset", msg, row);
        }
    }
}

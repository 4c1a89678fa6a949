use super::*;

const FRAME: u64 = 16_666_667;

fn list() -> SwipeList<String> {
    let rows = (0..50).map(|i| i.to_string()).collect();
    let mut list = SwipeList::new(SwipeListConfig::default(), rows).expect("valid config");
    list.set_viewport(300.0, 480.0).expect("valid viewport");
    list
}

fn pump<T>(list: &mut SwipeList<T>) {
    let mut frame_time = 0;
    for _ in 0..500 {
        frame_time += FRAME;
        if !list.on_frame(frame_time) && !list.needs_frame() {
            return;
        }
    }
    panic!("list did not settle");
}

fn send<T>(list: &mut SwipeList<T>, event: PointerEvent) -> bool {
    list.dispatch(&event).expect("laid out")
}

fn open_and_settle<T>(list: &mut SwipeList<T>, row: usize) -> PanelDragController {
    list.open_row(row).expect("row exists");
    pump(list);
    let panel = list.panel_for_row(row).expect("row on screen");
    assert!(panel.is_open());
    panel
}

#[test]
fn pool_covers_visible_rows() {
    let list = list();
    assert_eq!(list.visible_rows(), 0..10);
    let ids: Vec<_> = list
        .visible_rows()
        .map(|row| list.panel_for_row(row).expect("bound").id())
        .collect();
    let mut unique = ids.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), ids.len());
    assert!(list.panel_for_row(10).is_none());
}

#[test]
fn horizontal_swipe_opens_row() {
    let mut list = list();
    assert!(send(&mut list, PointerEvent::down(250.0, 100.0)));
    for x in [200.0, 150.0, 120.0] {
        assert!(send(&mut list, PointerEvent::moved(x, 101.0)));
    }
    assert!(send(&mut list, PointerEvent::up(120.0, 102.0)));

    let panel = list.panel_for_row(2).expect("row 2 visible");
    assert!(panel.is_open());
    assert_eq!(panel.content_offset_x(), -100.0);
    assert_eq!(list.coordinator().open_panel_id(), Some(panel.id()));
    assert_eq!(list.open_rows(), vec![2]);
    assert_eq!(list.scroll_offset(), 0.0);
}

#[test]
fn vertical_drag_scrolls_and_closes_open_row() {
    let mut list = list();
    let open = open_and_settle(&mut list, 2);

    send(&mut list, PointerEvent::down(150.0, 300.0));
    send(&mut list, PointerEvent::moved(150.0, 290.0));
    assert!(list.is_scrolling());
    assert_eq!(open.target_state(), PanelState::Closed);
    send(&mut list, PointerEvent::moved(150.0, 250.0));
    send(&mut list, PointerEvent::up(150.0, 250.0));

    assert!(!list.is_scrolling());
    assert_eq!(list.scroll_offset(), 50.0);
    assert_eq!(list.visible_rows(), 1..12);
    pump(&mut list);
    assert!(open.is_closed());
    assert_eq!(list.coordinator().open_panel_id(), None);
    assert!(list.open_rows().is_empty());
}

#[test]
fn action_tap_deletes_open_row() {
    let mut list = list();
    open_and_settle(&mut list, 3);

    let y = 3.0 * 48.0 + 10.0;
    assert!(send(&mut list, PointerEvent::down(250.0, y)));
    assert!(send(&mut list, PointerEvent::up(250.0, y)));

    assert_eq!(list.take_deleted(), vec!["3".to_string()]);
    assert!(list.take_deleted().is_empty());
    assert_eq!(list.row_count(), 49);
    assert_eq!(list.row(3).map(String::as_str), Some("4"));
    assert_eq!(list.coordinator().open_panel_id(), None);
    let panel = list.panel_for_row(3).expect("row 3 visible");
    assert!(panel.is_closed());
    assert_eq!(panel.content_offset_x(), 0.0);
}

#[test]
fn tap_on_closed_row_deletes_nothing() {
    let mut list = list();
    send(&mut list, PointerEvent::down(250.0, 20.0));
    send(&mut list, PointerEvent::up(250.0, 20.0));
    assert_eq!(list.row_count(), 50);
    assert!(list.take_deleted().is_empty());
}

#[test]
fn press_in_edge_strip_never_swipes() {
    let mut list = list();
    assert!(!send(&mut list, PointerEvent::down(40.0, 100.0)));
    assert!(!send(&mut list, PointerEvent::moved(10.0, 100.0)));
    send(&mut list, PointerEvent::up(10.0, 100.0));
    let panel = list.panel_for_row(2).expect("row 2 visible");
    assert_eq!(panel.content_offset_x(), 0.0);
    assert!(panel.is_closed());
}

#[test]
fn press_on_other_row_closes_open_row() {
    let mut list = list();
    let open = open_and_settle(&mut list, 1);
    send(&mut list, PointerEvent::down(250.0, 200.0));
    assert_eq!(open.target_state(), PanelState::Closed);
    send(&mut list, PointerEvent::up(250.0, 200.0));
    pump(&mut list);
    assert!(list.open_rows().is_empty());
}

#[test]
fn dragging_action_button_sideways_closes_row() {
    let mut list = list();
    let panel = open_and_settle(&mut list, 2);

    send(&mut list, PointerEvent::down(250.0, 106.0));
    send(&mut list, PointerEvent::moved(270.0, 106.0));
    assert_eq!(panel.state(), PanelState::Dragging);
    assert_eq!(panel.content_offset_x(), -100.0);
    send(&mut list, PointerEvent::moved(330.0, 106.0));
    assert_eq!(panel.content_offset_x(), -40.0);
    send(&mut list, PointerEvent::up(330.0, 106.0));
    pump(&mut list);

    assert!(panel.is_closed());
    assert_eq!(list.row_count(), 50);
}

#[test]
fn scrolling_row_out_recycles_its_panel() {
    let mut list = list();
    open_and_settle(&mut list, 0);
    list.scroll_by(48.0 * 11.0).expect("laid out");

    assert_eq!(list.visible_rows(), 11..21);
    assert!(list.panel_for_row(0).is_none());
    assert!(list.panel_for_row(11).expect("bound").is_closed());
    assert_eq!(list.coordinator().open_panel_id(), None);
}

#[test]
fn scroll_is_clamped_to_content() {
    let mut list = list();
    assert_eq!(list.scroll_by(1.0e6).expect("laid out"), 1920.0);
    assert_eq!(list.max_scroll(), 1920.0);
    assert_eq!(list.visible_rows(), 40..50);
    assert!(list.panel_for_row(49).is_some());
    assert_eq!(list.scroll_by(-1.0e6).expect("laid out"), -1920.0);
    assert_eq!(list.scroll_offset(), 0.0);
}

#[test]
fn open_row_scrolls_it_into_view() {
    let mut list = list();
    list.open_row(30).expect("row exists");
    assert_eq!(list.scroll_offset(), 1008.0);
    assert!(list.needs_frame());
    let panel = list.panel_for_row(30).expect("row 30 visible");
    assert_eq!(panel.target_state(), PanelState::Open);
    pump(&mut list);
    assert!(panel.is_open());
    assert!(!list.on_frame(u64::MAX / 2));
}

#[test]
fn resize_keeps_open_row_open() {
    let mut list = list();
    let panel = open_and_settle(&mut list, 2);
    list.set_viewport(360.0, 480.0).expect("valid viewport");
    assert!(panel.is_open());
    assert_eq!(panel.action_rect().map(|r| r.x), Some(260.0));
}

#[test]
fn lists_sharing_a_coordinator_keep_one_row_open() {
    let coordinator = SinglePanelCoordinator::new();
    let rows = || (0..20).map(|i| i.to_string()).collect::<Vec<_>>();
    let mut first =
        SwipeList::with_coordinator(SwipeListConfig::default(), rows(), coordinator.clone())
            .expect("valid config");
    let mut second =
        SwipeList::with_coordinator(SwipeListConfig::default(), rows(), coordinator.clone())
            .expect("valid config");
    first.set_viewport(300.0, 240.0).expect("viewport");
    second.set_viewport(300.0, 240.0).expect("viewport");

    open_and_settle(&mut first, 1);
    second.open_row(3).expect("row exists");
    let mut frame_time = 0;
    for _ in 0..500 {
        frame_time += FRAME;
        let more = first.on_frame(frame_time) | second.on_frame(frame_time);
        if !more && !first.needs_frame() && !second.needs_frame() {
            break;
        }
    }
    assert!(first.open_rows().is_empty());
    assert_eq!(second.open_rows(), vec![3]);
}

#[test]
fn misuse_is_reported() {
    let rows = vec!["a".to_string()];
    let mut list = SwipeList::new(SwipeListConfig::default(), rows).expect("valid config");
    assert_eq!(
        list.dispatch(&PointerEvent::down(100.0, 10.0)),
        Err(SwipeError::NotLaidOut)
    );
    assert_eq!(list.scroll_by(10.0), Err(SwipeError::NotLaidOut));
    assert_eq!(
        list.delete_row(4),
        Err(SwipeError::RowOutOfRange { index: 4, len: 1 })
    );

    let bad = SwipeListConfig::default().with_row_height(0.0);
    assert!(matches!(
        SwipeList::new(bad, Vec::<String>::new()),
        Err(SwipeError::InvalidGeometry { what: "row height", .. })
    ));
    assert!(list.set_viewport(f32::NAN, 100.0).is_err());
}

#[test]
fn scroll_started_by_host_closes_open_row() {
    let mut list = list();
    let open = open_and_settle(&mut list, 2);

    list.on_scroll_started(&PointerEvent::moved(160.0, 100.0));
    assert_eq!(open.target_state(), PanelState::Closed);
    pump(&mut list);

    assert!(open.is_closed());
    assert_eq!(list.coordinator().open_panel_id(), None);
    assert!(list.open_rows().is_empty());
}

#[test]
fn oversized_viewport_is_rejected() {
    let mut list = list();
    assert!(matches!(
        list.set_viewport(300.0, f32::MAX),
        Err(SwipeError::InvalidGeometry { what: "viewport height", .. })
    ));
    assert!(list
        .set_viewport(300.0, 48.0 * (MAX_VISIBLE_ROWS + 1) as f32)
        .is_err());
    assert_eq!(list.viewport(), Some(Size::new(300.0, 480.0)));
    assert_eq!(list.visible_rows(), 0..10);

    list.set_viewport(300.0, 48.0 * MAX_VISIBLE_ROWS as f32)
        .expect("largest accepted viewport");
    assert_eq!(list.visible_rows(), 0..50);
}

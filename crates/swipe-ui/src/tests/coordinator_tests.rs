use super::*;
use swipe_foundation::PointerEvent;

const FRAME: u64 = 16_666_667;

struct Panels {
    coordinator: SinglePanelCoordinator,
    panels: Vec<PanelDragController>,
    frame_time: u64,
}

impl Panels {
    fn new(count: usize) -> Self {
        let coordinator = SinglePanelCoordinator::new();
        let panels = (0..count)
            .map(|_| {
                let panel = PanelDragController::new();
                panel.on_layout(300.0, 100.0, 48.0).expect("layout");
                coordinator.attach(&panel);
                panel
            })
            .collect();
        Self {
            coordinator,
            panels,
            frame_time: 0,
        }
    }

    fn tick(&mut self) -> bool {
        self.frame_time += FRAME;
        let mut more = false;
        for panel in &self.panels {
            if panel.is_settling() {
                more |= panel.tick_settle(self.frame_time);
            }
        }
        more
    }

    fn settle_all(&mut self) {
        for _ in 0..500 {
            if !self.tick() && self.panels.iter().all(|p| !p.is_settling()) {
                return;
            }
            self.assert_single_open();
        }
        panic!("panels did not settle");
    }

    fn press(&self, index: usize) {
        let panel = &self.panels[index];
        let down = PointerEvent::down(250.0, 20.0);
        panel.should_intercept(&down);
        panel.handle_event(&down);
    }

    fn swipe_open(&self, index: usize) {
        let panel = &self.panels[index];
        self.press(index);
        panel.handle_event(&PointerEvent::moved(120.0, 22.0));
        panel.handle_event(&PointerEvent::up(120.0, 22.0));
    }

    fn tap(&self, index: usize) {
        self.press(index);
        self.panels[index].handle_event(&PointerEvent::up(250.0, 20.0));
    }

    fn open_count(&self) -> usize {
        self.panels.iter().filter(|p| p.is_open()).count()
    }

    fn assert_single_open(&self) {
        assert!(
            self.open_count() <= 1,
            "more than one open panel: {:?}",
            self.panels
        );
    }
}

#[test]
fn press_on_other_panel_closes_open_one() {
    let mut panels = Panels::new(2);
    let (a, b) = (panels.panels[0].clone(), panels.panels[1].clone());

    a.open();
    panels.settle_all();
    assert!(a.is_open());
    assert_eq!(a.content_offset_x(), -100.0);
    assert_eq!(panels.coordinator.open_panel_id(), Some(a.id()));

    // The press on B closes A before B's drag gets going.
    let down = PointerEvent::down(250.0, 20.0);
    b.should_intercept(&down);
    assert_eq!(a.target_state(), PanelState::Closed);
    b.handle_event(&down);
    b.handle_event(&PointerEvent::moved(140.0, 20.0));
    assert_eq!(b.state(), PanelState::Dragging);
    b.handle_event(&PointerEvent::up(140.0, 20.0));

    panels.settle_all();
    assert!(a.is_closed());
    assert!(b.is_open());
    assert_eq!(panels.coordinator.open_panel_id(), Some(b.id()));
}

#[test]
fn press_on_open_panel_keeps_it() {
    let mut panels = Panels::new(2);
    let a = panels.panels[0].clone();
    a.open();
    panels.settle_all();

    panels.press(0);
    assert_eq!(a.target_state(), PanelState::Open);
    assert_eq!(panels.coordinator.open_panel_id(), Some(a.id()));
}

#[test]
fn programmatic_double_open_closes_older() {
    let mut panels = Panels::new(3);
    let (a, b) = (panels.panels[0].clone(), panels.panels[1].clone());

    a.open();
    panels.settle_all();
    b.open();
    panels.settle_all();

    assert!(a.is_closed());
    assert!(b.is_open());
    assert_eq!(panels.coordinator.open_panel_id(), Some(b.id()));
}

#[test]
fn simultaneous_opens_resolve_to_last_finisher() {
    let mut panels = Panels::new(3);
    for panel in &panels.panels {
        panel.open();
    }
    panels.settle_all();
    assert_eq!(panels.open_count(), 1);
    let open = panels.coordinator.open_panel().expect("one open panel");
    assert!(open.is_open());
}

#[test]
fn closed_notification_only_clears_matching_record() {
    let mut panels = Panels::new(2);
    let (a, b) = (panels.panels[0].clone(), panels.panels[1].clone());
    a.open();
    panels.settle_all();

    panels.coordinator.notify_closed(&b);
    assert_eq!(panels.coordinator.open_panel_id(), Some(a.id()));

    a.close();
    panels.settle_all();
    assert_eq!(panels.coordinator.open_panel_id(), None);
}

#[test]
fn close_open_panel_for_list_scroll() {
    let mut panels = Panels::new(2);
    assert!(!panels.coordinator.close_open_panel());

    panels.panels[1].open();
    panels.settle_all();
    assert!(panels.coordinator.close_open_panel());
    panels.settle_all();
    assert_eq!(panels.open_count(), 0);
    assert_eq!(panels.coordinator.open_panel_id(), None);
}

#[test]
fn dropped_panel_record_is_forgotten() {
    let coordinator = SinglePanelCoordinator::new();
    let panel = PanelDragController::new();
    panel.on_layout(300.0, 100.0, 48.0).expect("layout");
    coordinator.attach(&panel);
    coordinator.notify_opened(&panel);
    assert!(coordinator.open_panel().is_some());

    drop(panel);
    assert!(coordinator.open_panel().is_none());
    assert!(!coordinator.close_open_panel());
}

#[test]
fn dropped_coordinator_detaches_quietly() {
    let panel = PanelDragController::new();
    panel.on_layout(300.0, 100.0, 48.0).expect("layout");
    {
        let coordinator = SinglePanelCoordinator::new();
        coordinator.attach(&panel);
    }
    panel.open();
    let mut frame_time = 0;
    while panel.tick_settle(frame_time) {
        frame_time += FRAME;
    }
    assert!(panel.is_open());
    panel.close();
}

#[test]
fn current_is_shared_on_thread() {
    let first = SinglePanelCoordinator::current();
    let second = SinglePanelCoordinator::current();
    let panel = PanelDragController::new();
    panel.on_layout(300.0, 100.0, 48.0).expect("layout");

    first.notify_opened(&panel);
    assert_eq!(second.open_panel_id(), Some(panel.id()));
    second.clear();
    assert_eq!(first.open_panel_id(), None);
}

#[derive(Clone, Copy, Debug)]
enum Op {
    Open(usize),
    Close(usize),
    Tap(usize),
    Swipe(usize),
    Frames,
}

fn all_ops(panels: usize) -> Vec<Op> {
    let mut ops = vec![Op::Frames];
    for index in 0..panels {
        ops.extend([
            Op::Open(index),
            Op::Close(index),
            Op::Tap(index),
            Op::Swipe(index),
        ]);
    }
    ops
}

fn run(panels: &mut Panels, op: Op) {
    match op {
        Op::Open(index) => panels.panels[index].open(),
        Op::Close(index) => panels.panels[index].close(),
        Op::Tap(index) => panels.tap(index),
        Op::Swipe(index) => panels.swipe_open(index),
        Op::Frames => {
            for _ in 0..5 {
                panels.tick();
            }
        }
    }
}

#[test]
fn at_most_one_panel_open_after_any_sequence() {
    let ops = all_ops(3);
    for &first in &ops {
        for &second in &ops {
            for &third in &ops {
                let mut panels = Panels::new(3);
                for op in [first, second, third] {
                    run(&mut panels, op);
                    panels.assert_single_open();
                }
                panels.settle_all();
                panels.assert_single_open();

                let open: Vec<_> = panels.panels.iter().filter(|p| p.is_open()).collect();
                match open.first() {
                    Some(panel) => assert_eq!(
                        panels.coordinator.open_panel_id(),
                        Some(panel.id()),
                        "record out of sync after {:?}",
                        [first, second, third]
                    ),
                    None => assert_eq!(
                        panels.coordinator.open_panel_id(),
                        None,
                        "stale record after {:?}",
                        [first, second, third]
                    ),
                }
            }
        }
    }
}

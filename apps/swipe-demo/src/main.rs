use std::time::Duration;

use anyhow::{bail, Context, Result};
use swipe_ui::{PanelState, PointerEvent, SwipeList, SwipeListConfig};
use web_time::Instant;

const WIDTH: f32 = 360.0;
const HEIGHT: f32 = 640.0;
const ROWS: usize = 50;
const FRAME: Duration = Duration::from_millis(16);
const GESTURE_STEPS: usize = 12;

struct Demo {
    list: SwipeList<String>,
    started: Instant,
}

impl Demo {
    fn new() -> Result<Self> {
        let rows = (0..ROWS).map(|i| i.to_string()).collect();
        let mut list =
            SwipeList::new(SwipeListConfig::default(), rows).context("building the list")?;
        list.set_viewport(WIDTH, HEIGHT)
            .context("laying out the list")?;
        Ok(Self {
            list,
            started: Instant::now(),
        })
    }

    fn frame_time(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }

    fn frame(&mut self) -> bool {
        std::thread::sleep(FRAME);
        let frame_time = self.frame_time();
        self.list.on_frame(frame_time)
    }

    fn wait_for_idle(&mut self) {
        while self.frame() || self.list.needs_frame() {}
    }

    /// Press at `from`, move to `to` a frame at a time, release.
    fn gesture(&mut self, from: (f32, f32), to: (f32, f32)) -> Result<()> {
        self.list.dispatch(&PointerEvent::down(from.0, from.1))?;
        for step in 1..=GESTURE_STEPS {
            let t = step as f32 / GESTURE_STEPS as f32;
            let x = from.0 + (to.0 - from.0) * t;
            let y = from.1 + (to.1 - from.1) * t;
            self.list.dispatch(&PointerEvent::moved(x, y))?;
            self.frame();
        }
        self.list.dispatch(&PointerEvent::up(to.0, to.1))?;
        self.wait_for_idle();
        Ok(())
    }

    fn row_center(&self, row: usize) -> Result<f32> {
        if !self.list.visible_rows().contains(&row) {
            bail!("row {row} is not on screen");
        }
        Ok(self.list.row_top(row) + self.list.config().row_height / 2.0)
    }

    fn swipe_open(&mut self, row: usize) -> Result<()> {
        let y = self.row_center(row)?;
        log::info!("swiping row {} open", row);
        self.gesture((WIDTH - 30.0, y), (WIDTH - 200.0, y))
    }

    fn tap_delete(&mut self, row: usize) -> Result<()> {
        let y = self.row_center(row)?;
        let x = WIDTH - self.list.config().action_width / 2.0;
        log::info!("tapping delete on row {}", row);
        self.list.dispatch(&PointerEvent::down(x, y))?;
        self.list.dispatch(&PointerEvent::up(x, y))?;
        self.wait_for_idle();
        Ok(())
    }

    fn scroll(&mut self, dy: f32) -> Result<()> {
        log::info!("scrolling by {}", dy);
        let x = WIDTH / 2.0;
        let from = HEIGHT * 0.75;
        self.gesture((x, from), (x, from - dy))
    }

    fn print_screen(&self, title: &str) {
        println!("--- {title} (scroll {:.0}) ---", self.list.scroll_offset());
        for row in self.list.visible_rows() {
            let Some(panel) = self.list.panel_for_row(row) else {
                continue;
            };
            let label = self.list.row(row).map_or("?", String::as_str);
            let marker = match panel.state() {
                PanelState::Open => "[delete]",
                PanelState::Closed => "",
                PanelState::Dragging | PanelState::Settling => "...",
            };
            println!(
                "  {:>3} | {:<4} x={:>7.1} {}",
                row,
                label,
                panel.content_offset_x(),
                marker
            );
        }
    }
}

fn main() -> Result<()> {
    #[cfg(feature = "logging")]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    println!("=== Swipe list demo ===");
    println!("Swipe a row left to reveal its delete button.");
    println!("Only one row stays open; scrolling closes it.");
    println!();

    let mut demo = Demo::new()?;
    demo.print_screen("initial");

    demo.swipe_open(3)?;
    demo.print_screen("row 3 open");

    demo.swipe_open(5)?;
    demo.print_screen("row 5 open, row 3 closed");

    demo.scroll(200.0)?;
    demo.print_screen("after scrolling");

    demo.swipe_open(8)?;
    demo.tap_delete(8)?;
    demo.print_screen("row 8 deleted");

    let deleted = demo.list.take_deleted();
    log::info!(
        "deleted {:?}, {} rows remain",
        deleted,
        demo.list.row_count()
    );
    Ok(())
}

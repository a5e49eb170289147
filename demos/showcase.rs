//! Showcase: every widget in one screen.
//!
//! Demonstrates:
//! - StatusBar, ProgressBar, Spinner, Panel, Stack, TextInput, Button and Text
//! - List, Table and Menu pages inside Tabs
//! - Tab / Shift+Tab focus cycling, F2 to move between form and pages
//! - A help popup drawn on a higher z-plane (F1)
//! - Tick-driven animation and resize handling
//!
//! Logs go to `showcase.log`; set `STRATUM_LOG=debug` for more detail.
//! Quit with Ctrl+C or Ctrl+Q.

use std::cell::RefCell;
use std::fs::File;
use std::rc::Rc;
use std::sync::Mutex;
use std::time::Duration;

use stratum::buffer::{Buffer, Cell, Color, Style};
use stratum::input::{Event, KeyCode};
use stratum::layout::{Alignment, Flex, FlexChild, Rect, Size};
use stratum::widget::{
    Border, Button, Column, List, Menu, MenuItem, Panel, ProgressBar, Spinner, Stack, StatusBar,
    Table, Tabs, Text, TextInput, Widget,
};
use stratum::{App, AppConfig};
use tracing_subscriber::EnvFilter;

type Log = Rc<RefCell<Vec<String>>>;

struct Showcase {
    status: StatusBar,
    progress: ProgressBar,
    spinner: Spinner,
    form: Panel,
    pages: Tabs,
    history: Text,
    log: Log,
    show_help: bool,
    pages_focused: bool,
}

impl Showcase {
    fn new() -> Self {
        let log: Log = Rc::default();

        let mut status = StatusBar::new();
        status.set_all("stratum showcase", "", "F1 help");

        let mut progress = ProgressBar::new();
        progress.set_label("Loading");

        let submitted = Rc::clone(&log);
        let input = TextInput::new()
            .with_placeholder("type and press Enter")
            .on_submit(move |text| submitted.borrow_mut().push(format!("said: {text}")));

        let pressed = Rc::clone(&log);
        let reset = Rc::clone(&log);
        let buttons = Stack::horizontal()
            .with_gap(2)
            .with_focus_cycle(false)
            .with(
                FlexChild::fixed(10),
                Button::new("Ping").on_press(move || pressed.borrow_mut().push("pong".into())),
            )
            .with(
                FlexChild::fixed(11),
                Button::new("Clear").on_press(move || reset.borrow_mut().clear()),
            );

        let form = Panel::new().with_title("Form").with_child(
            Stack::vertical()
                .with(FlexChild::fixed(1), input)
                .with(FlexChild::fixed(1), Text::new(""))
                .with(FlexChild::fixed(1), buttons),
        );

        Self {
            status,
            progress,
            spinner: Spinner::new().with_label("busy"),
            form,
            pages: pages(&log),
            history: Text::new("").with_wrap(true),
            log,
            show_help: false,
            pages_focused: false,
        }
    }

    fn toggle_pages(&mut self) {
        self.pages_focused = !self.pages_focused;
        self.form.set_focused(!self.pages_focused);
        self.pages.set_focused(self.pages_focused);
    }

    /// Mirror the shared log into the widgets that display it.
    fn sync(&mut self) {
        let log = self.log.borrow();
        self.status.set_center(log.last().cloned().unwrap_or_default());
        self.history.set_text(log.join("\n"));
    }

    fn render_help(&self, buffer: &mut Buffer, area: Rect) {
        let popup_size = Size::new(36, 8);
        let popup = Rect::new(
            area.x + area.width.saturating_sub(popup_size.width) / 2,
            area.y + area.height.saturating_sub(popup_size.height) / 2,
            popup_size.width.min(area.width),
            popup_size.height.min(area.height),
        )
        .with_z(2);

        let background = Style::default().with_bg(Color::rgb(30, 30, 46));
        buffer.fill_rect(popup, 2, Cell::new(' ', background));
        Panel::new()
            .with_title("Help")
            .with_border(Border::Double)
            .with_style(background)
            .with_child(
                Text::new(concat!(
                    "Tab / Shift+Tab  move focus\n",
                    "Enter / Space    activate\n",
                    "F2               form / pages\n",
                    "Alt+Left/Right   switch page\n",
                    "F1               close help\n",
                    "Ctrl+Q           quit",
                ))
                    .with_style(background),
            )
            .render(buffer, popup);
    }
}

impl Widget for Showcase {
    fn render(&self, buffer: &mut Buffer, area: Rect) {
        let rows = Flex::vertical().layout(
            area,
            &[
                FlexChild::fixed(1),
                FlexChild::fixed(1),
                FlexChild::fixed(5),
                FlexChild::flex(2),
                FlexChild::flex(1),
            ],
        );
        self.status.render(buffer, rows[0]);
        let (spin, bar) = rows[1].inset(0, 2, 0, 2).split_horizontal(8);
        self.spinner.render(buffer, spin);
        self.progress.render(buffer, bar);
        self.form.render(buffer, rows[2]);
        self.pages.render(buffer, rows[3]);
        Panel::new()
            .with_title("History")
            .render(buffer, rows[4]);
        self.history.render(buffer, rows[4].shrink(1));

        if self.show_help {
            self.render_help(buffer, area);
        }
    }

    fn handle_event(&mut self, event: &Event) -> bool {
        if matches!(event.as_key(), Some(key) if key.code == KeyCode::F(1)) {
            self.show_help = !self.show_help;
            return true;
        }
        if self.show_help {
            return false;
        }
        if matches!(event.as_key(), Some(key) if key.code == KeyCode::F(2)) {
            self.toggle_pages();
            return true;
        }
        let handled = if self.pages_focused {
            self.pages.handle_event(event)
        } else {
            self.form.handle_event(event)
        };
        if handled {
            self.sync();
        }
        handled
    }

    fn preferred_size(&self) -> Size {
        Size::new(60, 24)
    }
}

fn pages(log: &Log) -> Tabs {
    let picked = Rc::clone(log);
    let fruit = List::new()
        .with_items(["apple", "banana", "cherry", "damson", "elderberry", "fig", "grape"])
        .with_max_selected(3)
        .on_select(move |_, item| picked.borrow_mut().push(format!("picked {item}")));

    let row = |cells: [&str; 3]| cells.iter().map(|c| (*c).to_string()).collect::<Vec<_>>();
    let stock = Table::new(vec![
        Column::flex("Item", 2),
        Column::fixed("Qty", 5).with_align(Alignment::End),
        Column::flex("Origin", 1),
    ])
    .with_rows(vec![
        row(["apple", "12", "Kent"]),
        row(["banana", "40", "Ecuador"]),
        row(["cherry", "250", "Valle"]),
        row(["fig", "7", "Izmir"]),
    ]);

    let pinged = Rc::clone(log);
    let cleared = Rc::clone(log);
    let actions = Menu::new()
        .with_item(
            MenuItem::new("Ping")
                .with_shortcut("p")
                .on_activate(move || pinged.borrow_mut().push("pong".into())),
        )
        .with_item(MenuItem::separator())
        .with_item(MenuItem::new("Clear history").on_activate(move || cleared.borrow_mut().clear()))
        .with_item(MenuItem::new("Export").disabled());

    Tabs::new()
        .with_tab("Fruit", fruit)
        .with_tab("Stock", stock)
        .with_tab("Actions", actions)
}

fn init_logging() -> stratum::Result<()> {
    let file = File::create("showcase.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("STRATUM_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> stratum::Result<()> {
    init_logging()?;

    let config = AppConfig::default().with_tick_interval(Duration::from_millis(50));
    let app = App::with_config(Showcase::new(), config)
        .on_init(|root| root.status.set_right("F1 help | F2 pages | Ctrl+Q quit"))
        .on_tick(|root, tick| {
            if root.progress.is_complete() {
                return false;
            }
            root.progress.increment(0.005);
            root.spinner.advance();
            if root.progress.is_complete() {
                root.progress.set_label("Done");
                root.spinner.set_label("idle");
                tracing::info!(elapsed = ?tick.elapsed, "progress complete");
            }
            true
        })
        .on_resize(|root, width, height| {
            tracing::info!(width, height, "resized");
            root.status.set_center(format!("{width}x{height}"));
        })
        .on_quit(|root| tracing::info!(entries = root.log.borrow().len(), "quitting"));

    let root = app.run()?;
    println!("{} log entries", root.log.borrow().len());
    Ok(())
}

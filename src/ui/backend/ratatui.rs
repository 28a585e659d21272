use crate::config::UiConfig;
use crate::tui::crossterm::into_ui_event;
use crate::tui::terminal_guard::{TerminalGuard, TerminalRestorer};
use crate::ui::backend::{event_channel, EventPoster, EventQueue, Screen};
use crate::ui::core::canvas::Surface;
use crate::ui::core::geom::Size;
use crate::ui::core::input::Event;
use crate::ui::core::style::{Color, Mod, Style};
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect as RRect;
use ratatui::style::{Color as RColor, Modifier as RModifier, Style as RStyle};
use ratatui::Terminal;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

/// Screen on the process's terminal. Cells are written into a persistent back
/// buffer; `show` hands it to ratatui, which only emits the changed cells.
pub struct TerminalScreen {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    guard: Option<TerminalGuard>,
    cells: Buffer,
    poster: EventPoster,
    queue: EventQueue,
    stop: Arc<AtomicBool>,
    reader: Option<JoinHandle<()>>,
}

impl TerminalScreen {
    /// Enters raw mode and the alternate screen and starts the input reader.
    pub fn new(config: &UiConfig) -> io::Result<Self> {
        let guard = TerminalGuard::new()?;
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        let (width, height) = crossterm::terminal::size()?;
        let (poster, queue) = event_channel();
        let stop = Arc::new(AtomicBool::new(false));
        let reader = spawn_input_reader(
            poster.clone(),
            Arc::clone(&stop),
            config.input_poll_interval(),
        )?;
        Ok(Self {
            terminal,
            guard: Some(guard),
            cells: Buffer::empty(RRect::new(0, 0, width, height)),
            poster,
            queue,
            stop,
            reader: Some(reader),
        })
    }

    /// Idempotent handle that puts the terminal back, for signal handlers.
    pub fn restorer(&self) -> Option<TerminalRestorer> {
        self.guard.as_ref().map(TerminalGuard::restorer)
    }

}

impl Surface for TerminalScreen {
    fn set_cell(&mut self, x: i32, y: i32, symbol: &str, style: Style) {
        let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
            return;
        };
        let style = to_ratatui_style(style);
        let Some(cell) = self.cells.cell_mut((x, y)) else {
            return;
        };
        cell.set_symbol(symbol).set_style(style);
        for dx in 1..UnicodeWidthStr::width(symbol) as u16 {
            let Some(cell) = self.cells.cell_mut((x.saturating_add(dx), y)) else {
                break;
            };
            cell.set_symbol(" ").set_style(style);
        }
    }
}

impl Screen for TerminalScreen {
    fn size(&self) -> Size {
        let area = self.cells.area;
        Size::new(area.width as i32, area.height as i32)
    }

    fn clear(&mut self) -> io::Result<()> {
        self.cells.reset();
        self.terminal.clear()
    }

    fn show(&mut self) -> io::Result<()> {
        let cells = &self.cells;
        self.terminal.draw(|frame| {
            let area = frame.area().intersection(cells.area);
            let buf = frame.buffer_mut();
            for y in area.top()..area.bottom() {
                for x in area.left()..area.right() {
                    if let (Some(src), Some(dst)) = (cells.cell((x, y)), buf.cell_mut((x, y))) {
                        *dst = src.clone();
                    }
                }
            }
        })?;
        Ok(())
    }

    fn poll_event(&mut self) -> Option<Event> {
        let event = self.queue.recv()?;
        if let Event::Resize(width, height) = event {
            resize_cells(&mut self.cells, width, height);
        }
        Some(event)
    }

    fn poster(&self) -> EventPoster {
        self.poster.clone()
    }

    fn enable_mouse(&mut self) -> io::Result<()> {
        crossterm::execute!(io::stdout(), crossterm::event::EnableMouseCapture)
    }

    fn fini(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(reader) = self.reader.take() {
            let _ = reader.join();
        }
        if let Err(err) = self.terminal.show_cursor() {
            tracing::warn!(%err, "failed to show cursor");
        }
        // Dropping the guard restores the terminal.
        self.guard.take();
    }

    fn surface(&mut self) -> &mut dyn Surface {
        self
    }
}

impl Drop for TerminalScreen {
    fn drop(&mut self) {
        if self.guard.is_some() {
            self.fini();
        }
    }
}

fn spawn_input_reader(
    poster: EventPoster,
    stop: Arc<AtomicBool>,
    poll_interval: Duration,
) -> io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("termwin-input".to_string())
        .spawn(move || {
            while !stop.load(Ordering::Acquire) {
                let ready = match crossterm::event::poll(poll_interval) {
                    Ok(ready) => ready,
                    Err(err) => {
                        tracing::error!(%err, "terminal poll failed");
                        poster.post(Event::Interrupt);
                        return;
                    }
                };
                if !ready {
                    continue;
                }
                match crossterm::event::read() {
                    Ok(event) => {
                        let Some(event) = into_ui_event(event) else {
                            continue;
                        };
                        if !poster.post(event) {
                            return;
                        }
                    }
                    Err(err) => {
                        tracing::error!(%err, "terminal read failed");
                        poster.post(Event::Interrupt);
                        return;
                    }
                }
            }
        })
}

/// Reallocates the back buffer for a new terminal size. Repeated resize
/// reports for the current size keep the cells, since the loop only repaints
/// after a real change.
fn resize_cells(cells: &mut Buffer, width: u16, height: u16) -> bool {
    let area = RRect::new(0, 0, width, height);
    if cells.area == area {
        return false;
    }
    cells.resize(area);
    cells.reset();
    true
}

fn to_ratatui_style(s: Style) -> RStyle {
    let mut out = RStyle::default();
    if let Some(fg) = s.fg {
        out = out.fg(to_ratatui_color(fg));
    }
    if let Some(bg) = s.bg {
        out = out.bg(to_ratatui_color(bg));
    }
    out.add_modifier(to_ratatui_mods(s.mods))
}

fn to_ratatui_color(c: Color) -> RColor {
    match c {
        Color::Reset => RColor::Reset,
        Color::Rgb(r, g, b) => RColor::Rgb(r, g, b),
        Color::Indexed(i) => RColor::Indexed(i),
    }
}

fn to_ratatui_mods(m: Mod) -> RModifier {
    [
        (Mod::BOLD, RModifier::BOLD),
        (Mod::DIM, RModifier::DIM),
        (Mod::ITALIC, RModifier::ITALIC),
        (Mod::UNDERLINE, RModifier::UNDERLINED),
        (Mod::REVERSE, RModifier::REVERSED),
    ]
    .into_iter()
    .filter(|(ours, _)| m.contains(*ours))
    .fold(RModifier::empty(), |acc, (_, theirs)| acc | theirs)
}

#[cfg(test)]
#[path = "../../../tests/unit/ui/backend/ratatui.rs"]
mod tests;

//! Screens the controller draws to and reads events from.
//!
//! The trait keeps the loop away from `ratatui`/`crossterm` terminal types;
//! the headless [`test::TestScreen`] implements the same contract.

use crate::ui::core::canvas::Surface;
use crate::ui::core::geom::Size;
pub use crate::ui::core::input::Event;
use std::io;
use std::sync::mpsc;

pub trait Screen: Surface + Send {
    fn size(&self) -> Size;

    /// Blanks every cell, on screen and in the back buffer.
    fn clear(&mut self) -> io::Result<()>;

    /// Pushes the back buffer to the terminal.
    fn show(&mut self) -> io::Result<()>;

    /// Next event. `None` means the source is exhausted and the loop ends.
    fn poll_event(&mut self) -> Option<Event>;

    /// Producer side of the event queue, usable from any thread.
    fn poster(&self) -> EventPoster;

    fn enable_mouse(&mut self) -> io::Result<()>;

    /// Releases the terminal. Called once, after the loop.
    fn fini(&mut self);

    fn surface(&mut self) -> &mut dyn Surface;
}

#[derive(Clone, Debug)]
pub struct EventPoster {
    tx: mpsc::Sender<Event>,
}

impl EventPoster {
    /// Returns false once the queue's receiver is gone.
    pub fn post(&self, event: Event) -> bool {
        self.tx.send(event).is_ok()
    }
}

#[derive(Debug)]
pub struct EventQueue {
    rx: mpsc::Receiver<Event>,
}

impl EventQueue {
    pub fn recv(&self) -> Option<Event> {
        self.rx.recv().ok()
    }

    pub fn try_recv(&self) -> Option<Event> {
        self.rx.try_recv().ok()
    }
}

pub fn event_channel() -> (EventPoster, EventQueue) {
    let (tx, rx) = mpsc::channel();
    (EventPoster { tx }, EventQueue { rx })
}

// The terminal screen is built on ratatui; the module name stays generic.
#[cfg(feature = "tui")]
#[path = "ratatui.rs"]
pub mod terminal;

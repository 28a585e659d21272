use super::id::ComponentId;
use crossterm::event::{KeyEvent, MouseEvent};

/// Everything the controller loop can wake up for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// The terminal changed size; the new size is read back from the screen.
    Resize(u16, u16),
    /// Posted when the first redraw mark lands after a drain.
    Wake,
    /// Ends the loop and starts the orderly shutdown.
    Interrupt,
    /// Asynchronous activation request for a component.
    Activate(ComponentId),
    /// The component's bounds changed; its direct children get notified.
    OwnerResized(ComponentId),
}


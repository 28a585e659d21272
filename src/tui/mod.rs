//! Terminal integration (crossterm).
//!
//! Kept apart from `ui::core` so the component tree never names terminal
//! types beyond the input events it routes.

pub mod crossterm;
pub mod terminal_guard;

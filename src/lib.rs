//! termwin - terminal character-grid UI toolkit core
//!
//! Module layout:
//! - ui::core: geometry, canvas frames, the component arena, focus
//! - ui::controller: the single loop that draws, dispatches and tears down
//! - ui::root: root container and modal pad
//! - ui::backend: screens (headless and crossterm/ratatui)
//! - tui: terminal setup/restore and event conversion
//! - config, logging, error: ambient plumbing

pub mod config;
pub mod error;
pub mod logging;
pub mod tui;
pub mod ui;

pub use config::UiConfig;
pub use error::UiError;
pub use ui::controller::{Canceller, Controller, RunHandle};
pub use ui::core::component::{Component, Cx, MouseWheel};
pub use ui::core::geom::{Pos, Rect, Size};
pub use ui::core::id::ComponentId;
pub use ui::core::tree::Ui;

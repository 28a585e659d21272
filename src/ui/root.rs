//! The root container and the modal pad.

use crate::ui::core::canvas::CanvasContext;
use crate::ui::core::component::{Component, Cx, MouseWheel};
use crate::ui::core::geom::Pos;
use crate::ui::core::id::ComponentId;
use crate::ui::core::style::Style;
use crossterm::event::{KeyCode, KeyEvent};

/// Fills the screen with its background. Always visible.
#[derive(Debug, Clone, Copy)]
pub struct RootContainer {
    style: Style,
}

impl RootContainer {
    pub fn new(style: Style) -> Self {
        Self { style }
    }
}

impl Component for RootContainer {
    fn is_container(&self) -> bool {
        true
    }

    fn draw(&self, cx: &Cx<'_>, canvas: &mut CanvasContext<'_>) {
        canvas.filled_rectangle(cx.bounds().at_origin(), self.style);
    }
}

/// Transparent full-screen layer that captures all input for its children.
/// Escape closes it, and so does closing any of its children.
#[derive(Debug, Default, Clone, Copy)]
pub struct ModalPad;

impl Component for ModalPad {
    fn is_container(&self) -> bool {
        true
    }

    fn on_key(&self, cx: &Cx<'_>, key: &KeyEvent) -> bool {
        if key.code == KeyCode::Esc {
            cx.close();
            return true;
        }
        if cx.active_child().is_none() {
            let first = cx
                .ui()
                .children(cx.id())
                .into_iter()
                .find(|child| cx.set_active(*child));
            if let Some(child) = first {
                cx.dispatch_key(child, key);
            }
        }
        true
    }

    fn on_mouse_pressed(&self, _cx: &Cx<'_>, _at: Pos) -> bool {
        true
    }

    fn on_mouse_wheel(&self, _cx: &Cx<'_>, _at: Pos, _wheel: MouseWheel) -> bool {
        true
    }

    fn on_owner_resized(&self, cx: &Cx<'_>) {
        let ui = cx.ui();
        let area = ui.bounds(ui.root()).unwrap_or_default().at_origin();
        if let Err(err) = ui.set_bounds(cx.id(), area) {
            tracing::debug!(%err, "modal pad resize skipped");
        }
    }

    fn on_child_closed(&self, cx: &Cx<'_>, _child: ComponentId) {
        cx.close();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ui/root.rs"]
mod tests;

//! The contract every widget implements and the context it is called with.

use super::canvas::CanvasContext;
use super::focus;
use super::geom::{Pos, Rect, Size};
use super::id::ComponentId;
use super::tree::Ui;
use crossterm::event::{KeyEvent, KeyModifiers, MouseEventKind};

/// Direction of a wheel notch, after modifier translation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseWheel {
    Up,
    Down,
    Left,
    Right,
}

impl MouseWheel {
    /// With any modifier held, vertical notches scroll sideways.
    pub fn from_event(kind: MouseEventKind, modifiers: KeyModifiers) -> Option<Self> {
        let wheel = match kind {
            MouseEventKind::ScrollUp if !modifiers.is_empty() => MouseWheel::Left,
            MouseEventKind::ScrollDown if !modifiers.is_empty() => MouseWheel::Right,
            MouseEventKind::ScrollUp => MouseWheel::Up,
            MouseEventKind::ScrollDown => MouseWheel::Down,
            MouseEventKind::ScrollLeft => MouseWheel::Left,
            MouseEventKind::ScrollRight => MouseWheel::Right,
            _ => return None,
        };
        Some(wheel)
    }
}

/// Widget behavior plugged into the component tree.
///
/// Callbacks run on the controller loop, never while the tree is locked, so
/// they may freely call back into [`Ui`] through the context. Every method
/// has a default, a bare widget draws nothing and ignores input.
pub trait Component: Send + Sync + 'static {
    /// Containers may own children. Fixed for the component's lifetime.
    fn is_container(&self) -> bool {
        false
    }

    /// Containers are focusable unless they say otherwise.
    fn can_be_focused(&self) -> bool {
        self.is_container()
    }

    /// Virtual point shown at the top-left of the children area.
    fn virtual_offset(&self) -> Pos {
        Pos::default()
    }

    /// Extent of the scrollable content, the bounds' size when not scrollable.
    fn virtual_size(&self, bounds: Rect) -> Size {
        bounds.size()
    }

    /// Where children live, in the owner's coordinates.
    fn children_canvas_bounds(&self, bounds: Rect) -> Rect {
        bounds
    }

    /// Draws the component. The canvas frame's origin is the component's
    /// top-left cell.
    fn draw(&self, _cx: &Cx<'_>, _canvas: &mut CanvasContext<'_>) {}

    /// Returns true when the key was consumed. Unconsumed keys bubble to the
    /// owner; the default moves focus on Tab and the arrow keys.
    fn on_key(&self, cx: &Cx<'_>, key: &KeyEvent) -> bool {
        cx.traverse_focus(key)
    }

    /// `at` is relative to the component's top-left cell.
    fn on_mouse_pressed(&self, _cx: &Cx<'_>, _at: Pos) -> bool {
        false
    }

    fn on_mouse_wheel(&self, _cx: &Cx<'_>, _at: Pos, _wheel: MouseWheel) -> bool {
        false
    }

    fn on_owner_resized(&self, _cx: &Cx<'_>) {}

    fn on_focus(&self, _cx: &Cx<'_>, _active: bool) {}

    /// Delivered exactly once, when the component is torn down.
    fn on_closed(&self, _cx: &Cx<'_>) {}

    fn on_child_closed(&self, _cx: &Cx<'_>, _child: ComponentId) {}
}

/// Handed to every callback. Only the controller loop creates one, so the
/// immediate focus operations here cannot race the loop.
pub struct Cx<'a> {
    ui: &'a Ui,
    id: ComponentId,
}

impl<'a> Cx<'a> {
    pub(crate) fn new(ui: &'a Ui, id: ComponentId) -> Self {
        Self { ui, id }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn ui(&self) -> &'a Ui {
        self.ui
    }

    pub fn bounds(&self) -> Rect {
        self.ui.bounds(self.id).unwrap_or_default()
    }

    pub fn is_active(&self) -> bool {
        self.ui.is_active(self.id)
    }

    pub fn owner(&self) -> Option<ComponentId> {
        self.ui.owner(self.id)
    }

    pub fn active_child(&self) -> Option<ComponentId> {
        self.ui.active_child(self.id)
    }

    pub fn redraw(&self) {
        self.ui.redraw(self.id);
    }

    pub fn close(&self) {
        if let Err(err) = self.ui.close(self.id) {
            tracing::debug!(id = ?self.id, %err, "close from callback ignored");
        }
    }

    /// Activates `target` right away. Returns false when it cannot take focus.
    pub fn set_active(&self, target: ComponentId) -> bool {
        focus::set_active(self.ui, target)
    }

    /// Routes `key` down the active chain starting at `target`.
    pub fn dispatch_key(&self, target: ComponentId, key: &KeyEvent) -> bool {
        focus::dispatch_key(self.ui, target, key)
    }

    pub fn focus_next(&self, container: ComponentId) -> bool {
        focus::move_focus(self.ui, container, true)
    }

    pub fn focus_prev(&self, container: ComponentId) -> bool {
        focus::move_focus(self.ui, container, false)
    }

    /// Moves focus on Tab, BackTab and the vertical arrows: first among this
    /// component's own children, then among its siblings.
    pub fn traverse_focus(&self, key: &KeyEvent) -> bool {
        focus::traverse(self.ui, self.id, key)
    }
}

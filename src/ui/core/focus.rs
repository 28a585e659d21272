//! Focus chain maintenance and keyboard routing. Loop-only.

use super::component::Cx;
use super::id::ComponentId;
use super::tree::Ui;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Flips one component's active flag and tells it about the change.
pub(crate) fn activate(ui: &Ui, id: ComponentId, active: bool) {
    let Some(view) = ui.view(id) else {
        return;
    };
    if !view.state.set_active_flag(id, active) {
        return;
    }
    tracing::trace!(?id, active, "focus changed");
    view.behavior.on_focus(&Cx::new(ui, id), active);
    ui.redraw(id);
}

fn can_take_focus(ui: &Ui, id: ComponentId) -> bool {
    ui.view(id).is_some_and(|v| {
        !v.state.is_closed() && v.state.is_visible() && v.behavior.can_be_focused()
    })
}

/// Root first, then each active child down to the deepest active component.
/// Hidden components still count so that their flags get cleared.
fn active_chain(ui: &Ui) -> Vec<ComponentId> {
    let mut chain = Vec::new();
    let mut cur = Some(ui.root());
    while let Some(id) = cur {
        if !ui.is_active(id) {
            break;
        }
        chain.push(id);
        cur = ui.flagged_active_child(id);
    }
    chain
}

/// Makes `target` the deepest active component. Fails without touching any
/// state unless `target` and all of its ancestors can take focus.
pub(crate) fn set_active(ui: &Ui, target: ComponentId) -> bool {
    let mut chain = Vec::new();
    let mut cur = Some(target);
    while let Some(id) = cur {
        if !can_take_focus(ui, id) {
            return false;
        }
        chain.push(id);
        cur = ui.owner(id);
    }
    if chain.last() != Some(&ui.root()) {
        return false;
    }

    for id in active_chain(ui) {
        if !chain.contains(&id) {
            activate(ui, id, false);
        }
    }
    for id in chain {
        activate(ui, id, true);
    }
    true
}

/// Activates the next (or previous) visible focusable child of `container`
/// after the currently active one. Does not wrap around.
pub(crate) fn move_focus(ui: &Ui, container: ComponentId, forward: bool) -> bool {
    let children = ui.children(container);
    let current = ui
        .active_child(container)
        .and_then(|active| children.iter().position(|c| *c == active));

    let candidates: Box<dyn Iterator<Item = &ComponentId>> = match (forward, current) {
        (true, Some(i)) => Box::new(children[i + 1..].iter()),
        (true, None) => Box::new(children.iter()),
        (false, Some(i)) => Box::new(children[..i].iter().rev()),
        (false, None) => Box::new(children.iter().rev()),
    };
    for child in candidates {
        if can_take_focus(ui, *child) && set_active(ui, *child) {
            return true;
        }
    }
    false
}

fn direction(key: &KeyEvent) -> Option<bool> {
    match key.code {
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => Some(false),
        KeyCode::Tab | KeyCode::Down => Some(true),
        KeyCode::BackTab | KeyCode::Up => Some(false),
        _ => None,
    }
}

pub(crate) fn traverse(ui: &Ui, id: ComponentId, key: &KeyEvent) -> bool {
    let Some(forward) = direction(key) else {
        return false;
    };
    let Some(view) = ui.view(id) else {
        return false;
    };
    if view.container && move_focus(ui, id, forward) {
        return true;
    }
    match view.owner {
        Some(owner) => move_focus(ui, owner, forward),
        None => false,
    }
}

/// Offers `key` to the active child first, then to `id` itself.
pub(crate) fn dispatch_key(ui: &Ui, id: ComponentId, key: &KeyEvent) -> bool {
    if let Some(child) = ui.active_child(id) {
        if dispatch_key(ui, child, key) {
            return true;
        }
    }
    match ui.component(id) {
        Some(behavior) => behavior.on_key(&Cx::new(ui, id), key),
        None => false,
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/ui/core/focus.rs"]
mod tests;

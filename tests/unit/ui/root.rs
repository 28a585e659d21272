use super::*;
use crate::config::UiConfig;
use crate::ui::backend::test::{TestScreen, TestScreenHandle};
use crate::ui::controller::Controller;
use crate::ui::core::geom::Rect;
use crate::ui::core::tree::Ui;
use crossterm::event::KeyModifiers;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Field {
    keys: Mutex<Vec<KeyCode>>,
    presses: AtomicUsize,
    closed: AtomicUsize,
}

impl Component for Field {
    fn can_be_focused(&self) -> bool {
        true
    }

    fn on_key(&self, _cx: &Cx<'_>, key: &KeyEvent) -> bool {
        self.keys.lock().unwrap().push(key.code);
        true
    }

    fn on_mouse_pressed(&self, _cx: &Cx<'_>, _at: Pos) -> bool {
        self.presses.fetch_add(1, Ordering::SeqCst);
        true
    }

    fn on_closed(&self, _cx: &Cx<'_>) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

fn started() -> (Controller, TestScreenHandle, Ui) {
    let screen = TestScreen::new(40, 12);
    let handle = screen.handle();
    let mut controller = Controller::new(Box::new(screen), UiConfig::default());
    controller.start().unwrap();
    let ui = controller.ui().clone();
    (controller, handle, ui)
}

fn field_in(ui: &Ui, owner: ComponentId, bounds: Rect) -> (Arc<Field>, ComponentId) {
    let field = Arc::new(Field::default());
    let id = ui.add_shared(owner, field.clone()).unwrap();
    ui.set_bounds(id, bounds).unwrap();
    (field, id)
}

#[test]
fn root_cannot_be_hidden() {
    let (_controller, _handle, ui) = started();
    ui.set_visible(ui.root(), false).unwrap();
    assert!(ui.is_visible(ui.root()));
}

#[test]
fn modal_pad_takes_focus_when_created() {
    let (mut controller, _handle, ui) = started();
    let (_under, under_id) = field_in(&ui, ui.root(), Rect::new(0, 0, 5, 1));
    ui.set_active(under_id);
    controller.pump();

    let pad = ui.new_modal_pad().unwrap();
    controller.pump();
    assert!(ui.is_active(pad));
    assert!(!ui.is_active(under_id));
}

#[test]
fn escape_closes_the_pad_and_its_children() {
    let (mut controller, handle, ui) = started();
    let pad = ui.new_modal_pad().unwrap();
    let (dialog, _) = field_in(&ui, pad, Rect::new(5, 5, 10, 3));
    controller.pump();

    handle.key(KeyCode::Esc);
    controller.pump();
    assert!(ui.children(ui.root()).is_empty());
    assert!(ui.component(pad).is_none());
    assert_eq!(dialog.closed.load(Ordering::SeqCst), 1);
}

#[test]
fn first_key_focuses_the_first_child() {
    let (mut controller, handle, ui) = started();
    let pad = ui.new_modal_pad().unwrap();
    let (first, first_id) = field_in(&ui, pad, Rect::new(1, 1, 5, 1));
    let (second, _) = field_in(&ui, pad, Rect::new(1, 2, 5, 1));
    controller.pump();

    handle.key(KeyCode::Char('x'));
    controller.pump();
    assert!(ui.is_active(first_id));
    assert_eq!(*first.keys.lock().unwrap(), vec![KeyCode::Char('x')]);
    assert!(second.keys.lock().unwrap().is_empty());

    handle.key(KeyCode::Char('y'));
    controller.pump();
    assert_eq!(
        *first.keys.lock().unwrap(),
        vec![KeyCode::Char('x'), KeyCode::Char('y')]
    );
}

#[test]
fn pad_swallows_clicks_outside_its_children() {
    let (mut controller, handle, ui) = started();
    let (under, _) = field_in(&ui, ui.root(), Rect::new(0, 0, 10, 1));
    let pad = ui.new_modal_pad().unwrap();
    let (dialog, _) = field_in(&ui, pad, Rect::new(5, 5, 10, 3));
    controller.pump();

    handle.click(1, 0);
    handle.wheel(
        crossterm::event::MouseEventKind::ScrollDown,
        1,
        0,
        KeyModifiers::NONE,
    );
    controller.pump();
    assert_eq!(under.presses.load(Ordering::SeqCst), 0);
    assert!(!ui.is_closed(pad));

    handle.click(6, 6);
    controller.pump();
    assert_eq!(dialog.presses.load(Ordering::SeqCst), 1);
}

#[test]
fn closing_a_child_closes_the_pad() {
    let (mut controller, _handle, ui) = started();
    let pad = ui.new_modal_pad().unwrap();
    let (_dialog, dialog_id) = field_in(&ui, pad, Rect::new(5, 5, 10, 3));
    let (other, _) = field_in(&ui, pad, Rect::new(5, 9, 10, 1));
    controller.pump();

    ui.close(dialog_id).unwrap();
    controller.pump();
    assert!(ui.component(pad).is_none());
    assert_eq!(other.closed.load(Ordering::SeqCst), 1);
}

#[test]
fn pad_follows_the_screen_size() {
    let (mut controller, handle, ui) = started();
    let pad = ui.new_modal_pad().unwrap();
    controller.pump();
    assert_eq!(ui.bounds(pad), Some(Rect::new(0, 0, 40, 12)));

    handle.resize(60, 20);
    controller.pump();
    assert_eq!(ui.bounds(pad), Some(Rect::new(0, 0, 60, 20)));
}

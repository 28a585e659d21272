use super::*;
use crate::ui::core::style::Color;

#[test]
fn wide_glyph_blanks_the_following_cell() {
    let mut screen = TestScreen::new(4, 1);
    let handle = screen.handle();
    screen.set_cell(2, 0, "x", Style::default());
    screen.set_cell(1, 0, "日", Style::default());
    assert_eq!(handle.cell(1, 0).unwrap().symbol, "日");
    assert_eq!(handle.cell(2, 0).unwrap().symbol, " ");
}

#[test]
fn writes_outside_the_buffer_are_dropped() {
    let mut screen = TestScreen::new(2, 2);
    let handle = screen.handle();
    screen.set_cell(-1, 0, "a", Style::default());
    screen.set_cell(2, 0, "a", Style::default());
    screen.set_cell(0, 5, "a", Style::default());
    assert_eq!(handle.row(0), "  ");
    assert_eq!(handle.row(1), "  ");
    assert!(handle.cell(2, 0).is_none());
}

#[test]
fn clear_resets_cells_and_styles() {
    let mut screen = TestScreen::new(2, 1);
    let handle = screen.handle();
    let style = Style::default().bg(Color::Indexed(15));
    screen.set_cell(0, 0, "a", style);
    screen.clear().unwrap();
    assert_eq!(handle.cell(0, 0), Some(Cell::default()));
    assert_eq!(handle.clears(), 1);
}

#[test]
fn queue_drains_in_order_then_reports_exhaustion() {
    let mut screen = TestScreen::new(2, 1);
    let handle = screen.handle();
    handle.key(KeyCode::Enter);
    screen.poster().post(Event::Wake);

    assert!(matches!(screen.poll_event(), Some(Event::Key(k)) if k.code == KeyCode::Enter));
    assert_eq!(screen.poll_event(), Some(Event::Wake));
    assert_eq!(screen.poll_event(), None);
}

#[test]
fn click_posts_press_and_release() {
    let mut screen = TestScreen::new(2, 1);
    let handle = screen.handle();
    handle.click(1, 0);

    let kinds: Vec<_> = std::iter::from_fn(|| screen.poll_event())
        .map(|event| match event {
            Event::Mouse(mouse) => mouse.kind,
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            MouseEventKind::Down(MouseButton::Left),
            MouseEventKind::Up(MouseButton::Left)
        ]
    );
}

#[test]
fn resize_replaces_the_buffer_and_queues_an_event() {
    let mut screen = TestScreen::new(2, 1);
    let handle = screen.handle();
    handle.resize(5, 3);
    assert_eq!(screen.size(), Size::new(5, 3));
    assert_eq!(handle.buffer().size(), Size::new(5, 3));
    assert_eq!(screen.poll_event(), Some(Event::Resize(5, 3)));
}

#[test]
fn handle_observes_lifecycle() {
    let mut screen = TestScreen::new(1, 1);
    let handle = screen.handle();
    screen.enable_mouse().unwrap();
    screen.show().unwrap();
    screen.fini();
    assert!(handle.mouse_enabled());
    assert_eq!(handle.shows(), 1);
    assert!(handle.is_finished());
}

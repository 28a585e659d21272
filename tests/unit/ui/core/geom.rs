use super::*;

#[test]
fn rect_contains_is_inclusive_exclusive() {
    let r = Rect::new(10, 20, 3, 2); // x:10..13, y:20..22
    assert!(r.contains(Pos::new(10, 20)));
    assert!(r.contains(Pos::new(12, 21)));

    // Right/bottom edges are exclusive.
    assert!(!r.contains(Pos::new(13, 20)));
    assert!(!r.contains(Pos::new(12, 22)));

    // Outside.
    assert!(!r.contains(Pos::new(9, 20)));
    assert!(!r.contains(Pos::new(10, 19)));
}

#[test]
fn rect_empty_never_contains() {
    let r = Rect::new(0, 0, 0, 10);
    assert!(!r.contains(Pos::new(0, 0)));
    let r = Rect::new(0, 0, 10, -3);
    assert!(!r.contains(Pos::new(0, 0)));
}

#[test]
fn normalized_size_clamps_negative_dimensions() {
    let r = Rect::new(-2, 5, -4, 3).normalized_size();
    assert_eq!(r, Rect::new(-2, 5, 0, 3));
}

#[test]
fn corners_are_inclusive() {
    let r = Rect::new(1, 2, 4, 3);
    assert_eq!(r.top_left(), Pos::new(1, 2));
    assert_eq!(r.top_right(), Pos::new(4, 2));
    assert_eq!(r.bottom_left(), Pos::new(1, 4));
    assert_eq!(r.bottom_right(), Pos::new(4, 4));
}

#[test]
fn intersect_of_disjoint_rects_is_empty() {
    let a = Rect::new(0, 0, 5, 5);
    let b = Rect::new(10, 10, 2, 2);
    assert!(a.intersect(b).is_empty());
    assert_eq!(a.intersect(Rect::new(3, -1, 5, 3)), Rect::new(3, 0, 2, 2));
}

#[test]
fn union_covers_both() {
    let a = Rect::new(2, 2, 2, 2);
    let b = Rect::new(-1, 3, 1, 5);
    assert_eq!(a.union(b), Rect::new(-1, 2, 5, 6));
}

#[test]
fn size_grow_saturates_at_zero() {
    assert_eq!(Size::new(3, 1).grow(-5, 2), Size::new(0, 3));
}

#[test]
fn moved_and_origin_keep_size() {
    let r = Rect::new(7, 8, 3, 4);
    assert_eq!(r.moved_to(Pos::new(1, 1)), Rect::new(1, 1, 3, 4));
    assert_eq!(r.at_origin(), Rect::new(0, 0, 3, 4));
}

use std::fmt;

/// A cell coordinate. Signed, because virtual (scrolled) coordinates can sit
/// left of or above the visible origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub w: i32,
    pub h: i32,
}

impl Size {
    pub const fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }

    /// Adds `dw`/`dh`, saturating each dimension at zero.
    pub fn grow(self, dw: i32, dh: i32) -> Self {
        Self::new((self.w + dw).max(0), (self.h + dh).max(0))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_parts(pos: Pos, size: Size) -> Self {
        Self::new(pos.x, pos.y, size.w, size.h)
    }

    /// Clamps negative width/height to zero.
    pub fn normalized_size(self) -> Self {
        Self::new(self.x, self.y, self.w.max(0), self.h.max(0))
    }

    /// Same size, placed at `p`.
    pub fn moved_to(self, p: Pos) -> Self {
        Self::new(p.x, p.y, self.w, self.h)
    }

    /// Same size, placed at the origin.
    pub fn at_origin(self) -> Self {
        Self::new(0, 0, self.w, self.h)
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    pub fn top_left(&self) -> Pos {
        Pos::new(self.x, self.y)
    }

    pub fn top_right(&self) -> Pos {
        Pos::new(self.x + self.w - 1, self.y)
    }

    pub fn bottom_left(&self) -> Pos {
        Pos::new(self.x, self.y + self.h - 1)
    }

    pub fn bottom_right(&self) -> Pos {
        Pos::new(self.x + self.w - 1, self.y + self.h - 1)
    }

    pub fn contains(&self, p: Pos) -> bool {
        if self.is_empty() {
            return false;
        }
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    pub fn intersect(&self, other: Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return Rect::new(x, y, 0, 0);
        }
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rect{{x:{}, y:{}, w:{}, h:{}}}", self.x, self.y, self.w, self.h)
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/ui/core/geom.rs"]
mod tests;

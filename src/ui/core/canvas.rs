//! Nested coordinate frames for drawing and hit-testing.
//!
//! Every container pushes one frame for its children: the frame records the
//! physical (terminal cell) region the children may occupy, already clipped
//! by all ancestors, plus the virtual point that maps onto the region's
//! top-left cell. Drawing and hit-testing walk the tree with the same stack,
//! so a point that is drawn at a cell is also hit at that cell.

use super::geom::{Pos, Rect, Size};
use super::style::Style;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Receives clipped cell writes in physical coordinates.
pub trait Surface {
    fn set_cell(&mut self, x: i32, y: i32, symbol: &str, style: Style);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Frame {
    /// Virtual point shown at `region`'s top-left cell.
    offset: Pos,
    /// Physical region, clipped by every enclosing frame.
    region: Rect,
}

pub struct CanvasContext<'a> {
    stack: Vec<Frame>,
    surface: Option<&'a mut dyn Surface>,
}

impl<'a> CanvasContext<'a> {
    /// A canvas without a drawing target, used for hit-testing.
    pub fn new(size: Size) -> Self {
        Self {
            stack: vec![Self::display_frame(size)],
            surface: None,
        }
    }

    pub fn with_surface(size: Size, surface: &'a mut dyn Surface) -> Self {
        Self {
            stack: vec![Self::display_frame(size)],
            surface: Some(surface),
        }
    }

    fn display_frame(size: Size) -> Frame {
        Frame {
            offset: Pos::default(),
            region: Rect::from_parts(Pos::default(), size).normalized_size(),
        }
    }

    fn top(&self) -> Frame {
        self.stack[self.stack.len() - 1]
    }

    /// Number of frames, the display frame included.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Pushes the frame for `r`, given in the current frame's virtual space.
    /// `offset` is the virtual point of `r`'s own content shown at its
    /// top-left; when `r` is clipped on the left or top the offset shifts by
    /// the clipped amount so visible content stays aligned.
    pub fn push_relative_region(&mut self, mut offset: Pos, mut r: Rect) {
        let top = self.top();
        let clip = top.region;
        r.x += clip.x - top.offset.x;
        r.y += clip.y - top.offset.y;
        if r.x < clip.x {
            r.w = (r.w - (clip.x - r.x)).max(0);
            offset.x += clip.x - r.x;
            r.x = clip.x;
        }
        if r.y < clip.y {
            r.h = (r.h - (clip.y - r.y)).max(0);
            offset.y += clip.y - r.y;
            r.y = clip.y;
        }
        r.w = r.w.min(clip.w - (r.x - clip.x)).max(0);
        r.h = r.h.min(clip.h - (r.y - clip.y)).max(0);
        self.stack.push(Frame { offset, region: r });
    }

    /// Removes the top frame.
    ///
    /// # Panics
    ///
    /// Panics when only the display frame is left; an unbalanced pop means
    /// the walk that owns this canvas is corrupt.
    pub fn pop(&mut self) {
        if self.stack.len() < 2 {
            panic!("CanvasContext::pop() called on the display frame");
        }
        self.stack.pop();
    }

    /// Maps a point of the current frame's virtual space to a terminal cell.
    pub fn physical_point(&self, p: Pos) -> Pos {
        let top = self.top();
        Pos::new(
            p.x - top.offset.x + top.region.x,
            p.y - top.offset.y + top.region.y,
        )
    }

    /// Maps a terminal cell back to the current frame's virtual space.
    pub fn relative_point(&self, p: Pos) -> Pos {
        let top = self.top();
        Pos::new(
            p.x - top.region.x + top.offset.x,
            p.y - top.region.y + top.offset.y,
        )
    }

    /// The clipped physical region of the current frame.
    pub fn physical_region(&self) -> Rect {
        self.top().region
    }

    /// Whether any cell of `r` (current frame's virtual space) is visible.
    pub fn is_visible(&self, r: Rect) -> bool {
        let p = self.physical_point(r.top_left());
        !Rect::from_parts(p, r.size())
            .intersect(self.physical_region())
            .is_empty()
    }

    /// Prints `text` at `p`. Glyphs are clipped one cell run at a time: a glyph
    /// is written only when all of its cells are inside the region, and output
    /// stops at the first glyph crossing the right edge.
    pub fn print(&mut self, p: Pos, text: &str, style: Style) {
        let mut pp = self.physical_point(p);
        let pr = self.physical_region();
        let Some(surface) = self.surface.as_deref_mut() else {
            return;
        };
        if pr.is_empty() || pp.y < pr.y || pp.y >= pr.bottom() {
            return;
        }
        for g in text.graphemes(true) {
            let (symbol, w) = match UnicodeWidthStr::width(g) {
                0 => (" ", 1),
                w => (g, w as i32),
            };
            if pp.x + w > pr.right() {
                return;
            }
            if pp.x >= pr.x {
                surface.set_cell(pp.x, pp.y, symbol, style);
            }
            pp.x += w;
        }
    }

    pub fn filled_rectangle(&mut self, r: Rect, style: Style) {
        if r.is_empty() {
            return;
        }
        let line = " ".repeat(r.w as usize);
        for dy in 0..r.h {
            self.print(Pos::new(r.x, r.y + dy), &line, style);
        }
    }

    /// Draws a single or double line border along the edges of `r`.
    pub fn rectangle(&mut self, r: Rect, double_lines: bool, style: Style) {
        if r.is_empty() {
            return;
        }
        let (h, v, tl, tr, bl, br) = if double_lines {
            ('═', '║', '╔', '╗', '╚', '╝')
        } else {
            ('─', '│', '┌', '┐', '└', '┘')
        };

        if r.w == 1 && r.h == 1 {
            self.print(r.top_left(), "+", style);
            return;
        }
        if r.h == 1 {
            self.print(r.top_left(), &h.to_string().repeat(r.w as usize), style);
            return;
        }
        let v = v.to_string();
        if r.w == 1 {
            for dy in 0..r.h {
                self.print(Pos::new(r.x, r.y + dy), &v, style);
            }
            return;
        }

        self.print(r.top_left(), &tl.to_string(), style);
        self.print(r.top_right(), &tr.to_string(), style);
        self.print(r.bottom_left(), &bl.to_string(), style);
        self.print(r.bottom_right(), &br.to_string(), style);
        if r.w > 2 {
            let line = h.to_string().repeat((r.w - 2) as usize);
            self.print(Pos::new(r.x + 1, r.y), &line, style);
            self.print(Pos::new(r.x + 1, r.bottom() - 1), &line, style);
        }
        for dy in 1..r.h - 1 {
            self.print(Pos::new(r.x, r.y + dy), &v, style);
            self.print(Pos::new(r.right() - 1, r.y + dy), &v, style);
        }
    }

    /// Draws a vertical scroll bar of `bar_len` cells starting at `pos`.
    /// `virtual_len` is the content length, `window_len` the visible part of
    /// it and `offset` the first visible content row.
    pub fn draw_v_scroll_bar(
        &mut self,
        mut pos: Pos,
        bar_len: i32,
        virtual_len: i32,
        window_len: i32,
        offset: i32,
        style: Style,
    ) {
        if bar_len <= 0 || virtual_len <= 0 || window_len <= 0 {
            return;
        }
        if bar_len <= 2 {
            for _ in 0..bar_len {
                self.print(pos, " ", style);
                pos.y += 1;
            }
            return;
        }

        self.print(pos, "▲", style);
        self.print(Pos::new(pos.x, pos.y + bar_len - 1), "▼", style);
        pos.y += 1;

        let (thumb_offset, thumb_len) = thumb(bar_len - 2, virtual_len, window_len, offset);
        let thumb_style = style.solid();
        for i in 0..bar_len - 2 {
            let in_thumb = i >= thumb_offset && i < thumb_offset + thumb_len;
            if in_thumb {
                self.print(pos, " ", thumb_style);
            } else {
                self.print(pos, "░", style);
            }
            pos.y += 1;
        }
    }

    /// Horizontal counterpart of [`CanvasContext::draw_v_scroll_bar`].
    pub fn draw_h_scroll_bar(
        &mut self,
        pos: Pos,
        bar_len: i32,
        virtual_len: i32,
        window_len: i32,
        offset: i32,
        style: Style,
    ) {
        if bar_len <= 0 || virtual_len <= 0 || window_len <= 0 {
            return;
        }
        if bar_len <= 2 {
            self.print(pos, &"█".repeat(bar_len as usize), style);
            return;
        }

        self.print(pos, "◀", style);
        self.print(Pos::new(pos.x + bar_len - 1, pos.y), "▶", style);

        let track_len = bar_len - 2;
        let (thumb_offset, thumb_len) = thumb(track_len, virtual_len, window_len, offset);
        self.print(
            Pos::new(pos.x + 1, pos.y),
            &"░".repeat(track_len as usize),
            style,
        );
        self.print(
            Pos::new(pos.x + 1 + thumb_offset, pos.y),
            &"█".repeat(thumb_len as usize),
            style,
        );
    }
}

/// Returns `(offset, len)` of the scroll thumb inside a track of `track_len`.
fn thumb(track_len: i32, virtual_len: i32, window_len: i32, offset: i32) -> (i32, i32) {
    let max_offset = (virtual_len - window_len).max(0);
    let offset = offset.clamp(0, max_offset);
    let len = (window_len * track_len / virtual_len).max(1).min(track_len);
    let pos = if max_offset > 0 {
        offset * (track_len - len) / max_offset
    } else {
        0
    };
    (pos, len)
}

#[cfg(test)]
#[path = "../../../tests/unit/ui/core/canvas.rs"]
mod tests;

//! Backend-neutral cell styling. The screens map these onto their own types.

use serde::{Deserialize, Serialize};
use std::ops::BitOr;

/// A terminal color. In config files it reads as `"reset"`,
/// `{"indexed": 4}` or `{"rgb": [255, 128, 0]}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Reset,
    Indexed(u8),
    Rgb(u8, u8, u8),
}

impl Color {
    pub const BLACK: Self = Self::Indexed(0);
}

/// Text attributes of a cell, combined with `|`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Mod(u8);

impl Mod {
    pub const BOLD: Self = Self(0b0_0001);
    pub const DIM: Self = Self(0b0_0010);
    pub const UNDERLINE: Self = Self(0b0_0100);
    pub const REVERSE: Self = Self(0b0_1000);
    pub const ITALIC: Self = Self(0b1_0000);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Mod {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// What a cell looks like. A `None` color keeps the terminal default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub mods: Mod,
}

impl Style {
    pub fn fg(self, color: Color) -> Self {
        Self {
            fg: Some(color),
            ..self
        }
    }

    pub fn bg(self, color: Color) -> Self {
        Self {
            bg: Some(color),
            ..self
        }
    }

    pub fn with_mods(self, mods: Mod) -> Self {
        Self {
            mods: self.mods | mods,
            ..self
        }
    }

    /// A blank cell filled with this style's foreground, for solid blocks
    /// such as a scroll-bar thumb.
    pub fn solid(self) -> Self {
        Self::default().bg(self.fg.unwrap_or(Color::Reset))
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/ui/core/style.rs"]
mod tests;

//! Component tree core: geometry, canvas frames, the arena and focus.

pub mod canvas;
pub mod component;
pub(crate) mod focus;
pub mod geom;
pub mod id;
pub mod input;
pub mod style;
pub mod tree;

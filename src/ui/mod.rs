//! Component tree, controller loop and screens.

pub mod backend;
pub mod controller;
pub mod core;
pub mod root;

//! Renderable tree structures produced by the view composer.

pub mod item;

pub use item::{SelectionState, ViewItem};

//! Cascading multi-selection over tree node ids.

pub mod engine;
pub mod policy;

pub use engine::{SelectionEngine, ToggleOutcome, selection_state};
pub use policy::{CascadePolicy, ImageAttachmentPolicy, NoCascade};

//! View composition: sorting, filtering, and the search overlay.

pub mod compose;
pub mod filter;
pub mod search;
pub mod sort;

pub use compose::{SearchView, ViewComposer, ViewInput};
pub use filter::{TypeFilter, name_matches};
pub use search::SearchOverlay;
pub use sort::{compare_nodes, sorted_order};

//! Server-side tree mutations and the cache maintenance they require.

pub mod coordinator;
pub mod refresh;
pub mod report;

pub use coordinator::MutationCoordinator;
pub use refresh::{RefreshReport, Refresher};
pub use report::{BatchMoveReport, CacheEffect, DropTarget};

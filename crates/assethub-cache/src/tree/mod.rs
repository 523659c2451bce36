//! Tree cache: lazily materialized roots and children entries.

pub mod snapshot;
pub mod store;

pub use snapshot::{CachedLevel, ParentRef, TreeSnapshot};
pub use store::TreeCache;

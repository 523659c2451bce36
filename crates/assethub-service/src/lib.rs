//! # assethub-service
//!
//! Explorer services layered on top of the tree cache: cascading
//! selection, view composition with the search overlay, mutation
//! coordination, and refresh. The [`AssetExplorer`] facade wires them
//! together behind a single async API.
//!
//! Services follow constructor injection: collaborators are provided at
//! construction time via `Arc` references.

pub mod backend;
pub mod context;
pub mod events;
pub mod explorer;
pub mod mutation;
pub mod selection;
pub mod view;

pub use backend::{MemoryBackend, SearchProvider, TreeMutator};
pub use context::WorkspaceContext;
pub use events::EventBus;
pub use explorer::AssetExplorer;
pub use mutation::{BatchMoveReport, CacheEffect, DropTarget, MutationCoordinator, RefreshReport, Refresher};
pub use selection::{CascadePolicy, ImageAttachmentPolicy, NoCascade, SelectionEngine, ToggleOutcome};
pub use view::{SearchOverlay, SearchView, TypeFilter, ViewComposer, ViewInput};

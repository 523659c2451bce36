//! Explorer integration tests.

mod helpers;

mod cache_test;
mod mutation_test;
mod refresh_test;
mod search_test;
mod selection_test;
mod view_test;

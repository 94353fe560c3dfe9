//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods that
//! accept `&PgPool` as the first argument. [`PgCatalogRepository`] adapts
//! them to the `storefront_core` port.

pub mod item_repo;

pub use item_repo::{ItemRepo, PgCatalogRepository};

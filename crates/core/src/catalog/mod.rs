//! Catalog items and the operations that keep them consistent with their assets.

pub mod item;
pub mod locks;
pub mod memory;
pub mod normalize;
pub mod repository;
pub mod service;

pub use item::{CatalogItem, ItemPayload, ItemRecord, ITEM_ENTITY};
pub use locks::{ItemGuard, ItemLocks};
pub use memory::InMemoryCatalogRepository;
pub use normalize::{normalize, RawItemInput};
pub use repository::{CatalogRepository, ReplaceOutcome};
pub use service::{CatalogService, DEFAULT_LOCK_TIMEOUT};

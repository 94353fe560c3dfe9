//! Domain logic for the storefront catalog.
//!
//! No database or HTTP dependencies. Storage is reached through the
//! [`catalog::CatalogRepository`] and [`assets::AssetStore`] ports, which the
//! `storefront-db` crate and [`assets::LocalAssetStore`] implement.

pub mod assets;
pub mod catalog;
pub mod error;
pub mod reclamation;
pub mod types;

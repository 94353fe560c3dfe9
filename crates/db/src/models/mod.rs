//! Row structs for database tables.
//!
//! Each submodule holds a `FromRow` struct matching the table and a
//! conversion into the domain type from `storefront_core`.

pub mod item;

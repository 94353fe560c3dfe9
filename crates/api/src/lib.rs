//! HTTP surface of the storefront catalog.
//!
//! Exposed as a library so integration tests can build the router without
//! binding a socket.

pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;

//! Data models
//!
//! Shared between the API client and the TUI. Wire field names follow
//! the remote product service contract and are not renamed.

pub mod producto;

pub use producto::{PLACEHOLDER_IMAGE_URL, Producto, ProductoPayload};

//! Shared types for the Inventario admin panel
//!
//! Domain models, auth DTOs and the pure catalog logic (facet index,
//! filter selection) used by both the API client and the TUI.

pub mod catalog;
pub mod client;
pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use catalog::{FacetIndex, FilterSelection};
pub use models::producto::{PLACEHOLDER_IMAGE_URL, Producto, ProductoPayload};

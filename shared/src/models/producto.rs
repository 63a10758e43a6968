//! Product Model

use serde::{Deserialize, Serialize};

/// Fallback image shown when a product has no usable image reference.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/250";

/// Product record as returned by the remote product service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Producto {
    pub id: i64,
    pub nombre: String,
    pub marca: String,
    pub categoria: String,
    /// Stock count, never negative.
    pub cantidad: u32,
    pub descripcion: String,
    /// Absent or blank means "use the placeholder".
    #[serde(default)]
    pub imagen_url: Option<String>,
}

impl Producto {
    /// Resolved image reference: the trimmed `imagen_url`, or the
    /// placeholder when the reference is absent or whitespace-only.
    pub fn imagen_or_placeholder(&self) -> &str {
        match self.imagen_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url,
            _ => PLACEHOLDER_IMAGE_URL,
        }
    }
}

/// Create/update product payload (no id; the server assigns it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductoPayload {
    pub nombre: String,
    pub marca: String,
    pub categoria: String,
    pub cantidad: u32,
    pub descripcion: String,
    #[serde(default)]
    pub imagen_url: Option<String>,
}

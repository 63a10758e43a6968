//! Inventario Client - HTTP client for the remote product and auth services
//!
//! Provides cookie-authenticated network calls against the inventory
//! API: product CRUD, image upload, auth and session introspection.

pub mod config;
pub mod error;
pub mod guard;
pub mod http;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use guard::{GuardOutcome, RequiredAccess, check_session};
pub use http::ApiClient;

// Re-export shared types for convenience
pub use shared::client::{CurrentUser, RedirectResponse, RegisterRequest, UsuarioInfo};
pub use shared::models::producto::{Producto, ProductoPayload};

//! Client-related types shared between the API client and the TUI
//!
//! Request/response DTOs for the remote auth service and the image
//! upload endpoint. Wire shapes follow the documented HTTP contract.

use serde::{Deserialize, Serialize};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login / logout response: where the client should navigate next.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectResponse {
    pub redirect_url: String,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub is_admin: bool,
}

impl RegisterRequest {
    /// Client-side precondition: all of username, email and password
    /// must be non-empty before any network call is issued.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.username.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.is_empty()
        {
            return Err("Por favor complete todos los campos");
        }
        Ok(())
    }
}

/// Registered user as returned by `/auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsuarioInfo {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

/// Session introspection response from `/auth/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
}

// =============================================================================
// Upload / error DTOs
// =============================================================================

/// Image upload response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Structured error body (`{"detail": ...}`) used by the remote
/// services on non-success statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (network/transport level)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Other non-success response from the server
    #[error("Server error ({status}): {detail}")]
    Api { status: u16, detail: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Message suitable for the user-facing notice banner.
    ///
    /// Non-success responses surface the server-supplied `detail`
    /// text; transport failures fall back to a generic message.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Http(_) => "Error de conexión. Intente nuevamente.".to_string(),
            ClientError::Unauthorized => "Sesión no válida".to_string(),
            ClientError::Forbidden(detail)
            | ClientError::NotFound(detail)
            | ClientError::Validation(detail) => detail.clone(),
            ClientError::Api { detail, .. } => detail.clone(),
            ClientError::InvalidResponse(_) | ClientError::Serialization(_) => {
                "Respuesta inesperada del servidor".to_string()
            }
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

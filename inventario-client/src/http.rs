//! HTTP client for network-based API calls

use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::client::{
    CurrentUser, ErrorDetail, LoginRequest, RedirectResponse, RegisterRequest, UploadResponse,
    UsuarioInfo,
};
use shared::models::producto::{Producto, ProductoPayload};

/// HTTP client for the remote product and auth services.
///
/// The underlying reqwest client keeps a cookie store, so the session
/// cookie issued by `/auth/login` accompanies every subsequent call
/// (the `credentials: include` contract of the API).
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client from configuration
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .cookie_store(true)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Server base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Make a GET request
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.client.get(self.url(path)).send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Make a PUT request with JSON body
    async fn put<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self.client.put(self.url(path)).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request without body
    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.client.post(self.url(path)).send().await?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response, extracting `{detail}` on failure
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let response = Self::ensure_success(response).await?;
        response.json().await.map_err(Into::into)
    }

    /// Single error-mapping point for non-success statuses.
    async fn ensure_success(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Self::error_for(status, text));
        }
        Ok(response)
    }

    fn error_for(status: StatusCode, body: String) -> ClientError {
        // FastAPI-style services wrap error text in {"detail": ...};
        // fall back to the raw body, then to the bare status.
        let detail = serde_json::from_str::<ErrorDetail>(&body)
            .map(|e| e.detail)
            .unwrap_or(body);
        let detail = if detail.trim().is_empty() {
            format!("HTTP {}", status.as_u16())
        } else {
            detail
        };

        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::FORBIDDEN => ClientError::Forbidden(detail),
            StatusCode::NOT_FOUND => ClientError::NotFound(detail),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ClientError::Validation(detail)
            }
            _ => ClientError::Api { status: status.as_u16(), detail },
        }
    }

    // ========== Product API ==========

    /// Fetch the full product collection
    pub async fn list_productos(&self) -> ClientResult<Vec<Producto>> {
        let productos: Vec<Producto> = self.get("/productos").await?;
        tracing::debug!(count = productos.len(), "Productos fetched");
        Ok(productos)
    }

    /// Create a product record
    pub async fn create_producto(&self, payload: &ProductoPayload) -> ClientResult<Producto> {
        let producto: Producto = self.post("/productos/", payload).await?;
        tracing::info!(id = producto.id, nombre = %producto.nombre, "Producto created");
        Ok(producto)
    }

    /// Update an existing product record
    pub async fn update_producto(&self, id: i64, payload: &ProductoPayload) -> ClientResult<Producto> {
        let producto: Producto = self.put(&format!("/productos/{id}"), payload).await?;
        tracing::info!(id, "Producto updated");
        Ok(producto)
    }

    /// Delete a product record
    pub async fn delete_producto(&self, id: i64) -> ClientResult<()> {
        let response = self.client.delete(self.url(&format!("/productos/{id}"))).send().await?;
        Self::ensure_success(response).await?;
        tracing::info!(id, "Producto deleted");
        Ok(())
    }

    /// Upload an image, returning the reference to store on the product
    pub async fn upload_imagen(&self, filename: &str, bytes: Vec<u8>) -> ClientResult<String> {
        let mime = mime_guess::from_path(filename).first_or_octet_stream();
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime.as_ref())
            .map_err(|e| ClientError::Validation(format!("Tipo de archivo no válido: {e}")))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self.client.post(self.url("/upload-imagen/")).multipart(form).send().await?;
        let uploaded: UploadResponse = Self::handle_response(response).await?;
        tracing::debug!(url = %uploaded.url, "Imagen uploaded");
        Ok(uploaded.url)
    }

    // ========== Auth API ==========

    /// Login with username and password. On success the session cookie
    /// lands in the cookie store and the redirect target is returned.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<RedirectResponse> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: RedirectResponse = self.post("/auth/login", &request).await?;
        tracing::debug!(username = %username, "Login succeeded");
        Ok(response)
    }

    /// Register a new user
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<UsuarioInfo> {
        let usuario: UsuarioInfo = self.post("/auth/register", request).await?;
        tracing::info!(username = %usuario.username, "Usuario registered");
        Ok(usuario)
    }

    /// Get the current session's user
    pub async fn me(&self) -> ClientResult<CurrentUser> {
        self.get("/auth/me").await
    }

    /// Logout, invalidating the session server-side
    pub async fn logout(&self) -> ClientResult<RedirectResponse> {
        let response: RedirectResponse = self.post_empty("/auth/logout").await?;
        tracing::debug!("Logout succeeded");
        Ok(response)
    }
}

//! Integration tests against an in-process fixture server.
//!
//! The fixture speaks the same HTTP contract as the remote product
//! and auth services: cookie sessions, FastAPI-style `{detail}`
//! error bodies, multipart image upload.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use serde_json::json;

use inventario_client::{
    ApiClient, ClientConfig, ClientError, GuardOutcome, RequiredAccess, check_session,
};
use shared::client::{LoginRequest, RegisterRequest};
use shared::models::producto::{Producto, ProductoPayload};

#[derive(Clone, Default)]
struct Fixture {
    productos: Arc<Mutex<Vec<Producto>>>,
    next_id: Arc<Mutex<i64>>,
    sessions: Arc<Mutex<HashSet<String>>>,
}

impl Fixture {
    fn session_of(&self, headers: &HeaderMap) -> Option<String> {
        let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
        for pair in cookies.split(';') {
            let pair = pair.trim();
            if let Some(token) = pair.strip_prefix("session_token=") {
                if self.sessions.lock().unwrap().contains(token) {
                    return Some(token.to_string());
                }
            }
        }
        None
    }
}

fn detail(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "detail": text }))).into_response()
}

async fn list_productos(State(fx): State<Fixture>) -> Json<Vec<Producto>> {
    Json(fx.productos.lock().unwrap().clone())
}

async fn create_producto(
    State(fx): State<Fixture>,
    Json(payload): Json<ProductoPayload>,
) -> Json<Producto> {
    let mut next_id = fx.next_id.lock().unwrap();
    *next_id += 1;
    let producto = Producto {
        id: *next_id,
        nombre: payload.nombre,
        marca: payload.marca,
        categoria: payload.categoria,
        cantidad: payload.cantidad,
        descripcion: payload.descripcion,
        imagen_url: payload.imagen_url,
    };
    fx.productos.lock().unwrap().push(producto.clone());
    Json(producto)
}

async fn update_producto(
    State(fx): State<Fixture>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductoPayload>,
) -> Response {
    let mut productos = fx.productos.lock().unwrap();
    match productos.iter_mut().find(|p| p.id == id) {
        Some(existing) => {
            *existing = Producto {
                id,
                nombre: payload.nombre,
                marca: payload.marca,
                categoria: payload.categoria,
                cantidad: payload.cantidad,
                descripcion: payload.descripcion,
                imagen_url: payload.imagen_url,
            };
            Json(existing.clone()).into_response()
        }
        None => detail(StatusCode::NOT_FOUND, "Producto no encontrado"),
    }
}

async fn delete_producto(State(fx): State<Fixture>, Path(id): Path<i64>) -> Response {
    let mut productos = fx.productos.lock().unwrap();
    let before = productos.len();
    productos.retain(|p| p.id != id);
    if productos.len() == before {
        return detail(StatusCode::NOT_FOUND, "Producto no encontrado");
    }
    Json(json!({ "ok": true })).into_response()
}

async fn upload_imagen(mut multipart: Multipart) -> Response {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("imagen").to_string();
            let bytes = field.bytes().await.unwrap_or_default();
            if bytes.is_empty() {
                return detail(StatusCode::BAD_REQUEST, "Archivo vacío");
            }
            return Json(json!({ "url": format!("/static/imagenes/{filename}") })).into_response();
        }
    }
    detail(StatusCode::BAD_REQUEST, "Falta el campo file")
}

async fn login(State(fx): State<Fixture>, Json(req): Json<LoginRequest>) -> Response {
    let token = match (req.username.as_str(), req.password.as_str()) {
        ("admin", "admin1234") => "tok-admin",
        ("ana", "secret") => "tok-ana",
        _ => return detail(StatusCode::UNAUTHORIZED, "Credenciales inválidas"),
    };
    fx.sessions.lock().unwrap().insert(token.to_string());
    let redirect = if token == "tok-admin" { "/admin" } else { "/" };
    (
        [(header::SET_COOKIE, format!("session_token={token}; Path=/"))],
        Json(json!({ "redirect_url": redirect })),
    )
        .into_response()
}

async fn register(Json(req): Json<RegisterRequest>) -> Response {
    if req.username == "taken" {
        return detail(StatusCode::BAD_REQUEST, "El usuario ya existe");
    }
    Json(json!({ "username": req.username, "email": req.email, "is_admin": req.is_admin }))
        .into_response()
}

async fn me(State(fx): State<Fixture>, headers: HeaderMap) -> Response {
    match fx.session_of(&headers) {
        Some(token) => {
            let is_admin = token == "tok-admin";
            let username = if is_admin { "admin" } else { "ana" };
            Json(json!({ "username": username, "is_admin": is_admin })).into_response()
        }
        None => detail(StatusCode::UNAUTHORIZED, "No autenticado"),
    }
}

async fn logout(State(fx): State<Fixture>, headers: HeaderMap) -> Response {
    if let Some(token) = fx.session_of(&headers) {
        fx.sessions.lock().unwrap().remove(&token);
    }
    Json(json!({ "redirect_url": "/login" })).into_response()
}

async fn spawn_fixture() -> (String, Fixture) {
    let fixture = Fixture::default();
    let app = axum::Router::new()
        .route("/productos", get(list_productos))
        .route("/productos/", post(create_producto))
        .route("/productos/{id}", put(update_producto))
        .route("/productos/{id}", delete(delete_producto))
        .route("/upload-imagen/", post(upload_imagen))
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout))
        .with_state(fixture.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), fixture)
}

fn client_for(base_url: &str) -> ApiClient {
    ClientConfig::new(base_url).with_timeout(5).build_client()
}

fn payload(nombre: &str, imagen_url: Option<&str>) -> ProductoPayload {
    ProductoPayload {
        nombre: nombre.into(),
        marca: "Acme".into(),
        categoria: "Hardware".into(),
        cantidad: 5,
        descripcion: "M8".into(),
        imagen_url: imagen_url.map(String::from),
    }
}

#[tokio::test]
async fn test_product_crud_round_trip() {
    let (base_url, _fx) = spawn_fixture().await;
    let client = client_for(&base_url);

    assert!(client.list_productos().await.unwrap().is_empty());

    let created = client.create_producto(&payload("Bolt", None)).await.unwrap();
    assert_eq!(created.nombre, "Bolt");
    assert!(created.id > 0);

    let mut updated = payload("Bolt", Some("http://x/y.png"));
    updated.cantidad = 9;
    let saved = client.update_producto(created.id, &updated).await.unwrap();
    assert_eq!(saved.cantidad, 9);
    assert_eq!(saved.imagen_url.as_deref(), Some("http://x/y.png"));

    let listed = client.list_productos().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].cantidad, 9);

    client.delete_producto(created.id).await.unwrap();
    assert!(client.list_productos().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_missing_product_surfaces_detail() {
    let (base_url, _fx) = spawn_fixture().await;
    let client = client_for(&base_url);

    let err = client.update_producto(999, &payload("Bolt", None)).await.unwrap_err();
    match err {
        ClientError::NotFound(detail) => assert_eq!(detail, "Producto no encontrado"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_missing_product_fails() {
    let (base_url, _fx) = spawn_fixture().await;
    let client = client_for(&base_url);

    assert!(matches!(
        client.delete_producto(42).await.unwrap_err(),
        ClientError::NotFound(_)
    ));
}

#[tokio::test]
async fn test_upload_imagen_multipart() {
    let (base_url, _fx) = spawn_fixture().await;
    let client = client_for(&base_url);

    let url = client.upload_imagen("foto.png", vec![1, 2, 3, 4]).await.unwrap();
    assert_eq!(url, "/static/imagenes/foto.png");
}

#[tokio::test]
async fn test_upload_empty_file_is_validation_error() {
    let (base_url, _fx) = spawn_fixture().await;
    let client = client_for(&base_url);

    assert!(matches!(
        client.upload_imagen("foto.png", Vec::new()).await.unwrap_err(),
        ClientError::Validation(_)
    ));
}

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let (base_url, _fx) = spawn_fixture().await;
    let client = client_for(&base_url);

    let response = client.login("admin", "admin1234").await.unwrap();
    assert_eq!(response.redirect_url, "/admin");

    // The session cookie must accompany the introspection call.
    let user = client.me().await.unwrap();
    assert_eq!(user.username, "admin");
    assert!(user.is_admin);
}

#[tokio::test]
async fn test_login_failure_surfaces_server_detail() {
    let (base_url, _fx) = spawn_fixture().await;
    let client = client_for(&base_url);

    let err = client.login("admin", "wrong").await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));
}

#[tokio::test]
async fn test_register_conflict_surfaces_detail() {
    let (base_url, _fx) = spawn_fixture().await;
    let client = client_for(&base_url);

    let request = RegisterRequest {
        username: "taken".into(),
        email: "taken@example.com".into(),
        password: "secret".into(),
        is_admin: false,
    };
    match client.register(&request).await.unwrap_err() {
        ClientError::Validation(detail) => assert_eq!(detail, "El usuario ya existe"),
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn test_register_returns_new_user() {
    let (base_url, _fx) = spawn_fixture().await;
    let client = client_for(&base_url);

    let request = RegisterRequest {
        username: "nueva".into(),
        email: "nueva@example.com".into(),
        password: "secret".into(),
        is_admin: false,
    };
    let usuario = client.register(&request).await.unwrap();
    assert_eq!(usuario.username, "nueva");
    assert!(!usuario.is_admin);
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let (base_url, _fx) = spawn_fixture().await;
    let client = client_for(&base_url);

    client.login("admin", "admin1234").await.unwrap();
    assert!(client.me().await.is_ok());

    let response = client.logout().await.unwrap();
    assert_eq!(response.redirect_url, "/login");
    assert!(matches!(client.me().await.unwrap_err(), ClientError::Unauthorized));
}

#[tokio::test]
async fn test_guard_without_session_redirects_to_login() {
    let (base_url, _fx) = spawn_fixture().await;
    let client = client_for(&base_url);

    let outcome = check_session(&client, RequiredAccess::Admin).await;
    assert_eq!(outcome, GuardOutcome::RedirectToLogin);
}

#[tokio::test]
async fn test_guard_non_admin_redirects_to_catalog() {
    let (base_url, _fx) = spawn_fixture().await;
    let client = client_for(&base_url);

    client.login("ana", "secret").await.unwrap();
    match check_session(&client, RequiredAccess::Admin).await {
        GuardOutcome::RedirectToCatalog(user) => {
            // The session survives the redirect; only the privilege is
            // insufficient.
            assert_eq!(user.username, "ana");
            assert!(!user.is_admin);
        }
        other => panic!("expected RedirectToCatalog, got {other:?}"),
    }

    // The same session is enough for non-admin screens.
    match check_session(&client, RequiredAccess::User).await {
        GuardOutcome::Proceed(user) => assert_eq!(user.username, "ana"),
        other => panic!("expected Proceed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_guard_admin_proceeds() {
    let (base_url, _fx) = spawn_fixture().await;
    let client = client_for(&base_url);

    client.login("admin", "admin1234").await.unwrap();
    match check_session(&client, RequiredAccess::Admin).await {
        GuardOutcome::Proceed(user) => assert!(user.is_admin),
        other => panic!("expected Proceed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_guard_fails_closed_on_transport_error() {
    // Nothing listens here; the guard must treat the failure as
    // unauthenticated rather than surface an error.
    let client = ClientConfig::new("http://127.0.0.1:9").with_timeout(1).build_client();
    let outcome = check_session(&client, RequiredAccess::User).await;
    assert_eq!(outcome, GuardOutcome::RedirectToLogin);
}

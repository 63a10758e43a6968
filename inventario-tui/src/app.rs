//! Application state and update logic
//!
//! All network work runs in spawned tasks that report back through an
//! mpsc channel, so the UI keeps redrawing while a request is in
//! flight. A busy flag rejects overlapping submissions of the same
//! handler.

use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use inventario_client::{
    ApiClient, GuardOutcome, RequiredAccess, check_session,
};
use ratatui::widgets::ListState;
use shared::catalog::{FacetIndex, FilterSelection};
use shared::client::{CurrentUser, RedirectResponse, UsuarioInfo};
use shared::models::producto::Producto;
use tokio::sync::mpsc;
use tui_input::backend::crossterm::EventHandler;

use crate::form::{LoginForm, ProductForm, RegisterForm};

const NOTICE_TTL: Duration = Duration::from_secs(5);

// =============================================================================
// State types
// =============================================================================

/// Which page the panel is on. Navigation between screens is decided
/// by the session guard and by auth actions, never implicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Catalog,
    Admin,
}

/// Lifecycle of the in-memory product collection. `NoResults` is a
/// render-time condition, not a state: see [`App::no_results`].
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogState {
    Loading,
    Loaded,
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// Transient banner, auto-dismissed after a few seconds.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    shown_at: Instant,
}

/// Focus on the admin screen: the edit form or the card list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminFocus {
    Form,
    List,
}

/// Results of spawned network tasks.
#[derive(Debug)]
pub enum AppEvent {
    SessionChecked(GuardOutcome),
    ProductosLoaded(Result<Vec<Producto>, String>),
    LoginFinished(Result<RedirectResponse, String>),
    RegisterFinished(Result<UsuarioInfo, String>),
    SaveFinished { result: Result<Producto, String>, was_update: bool },
    DeleteFinished(Result<i64, String>),
    LogoutFinished(Result<RedirectResponse, String>),
}

// =============================================================================
// App
// =============================================================================

pub struct App {
    client: ApiClient,
    tx: mpsc::UnboundedSender<AppEvent>,

    pub screen: Screen,
    pub session: Option<CurrentUser>,

    /// Full in-memory collection, replaced wholesale on every fetch.
    pub productos: Vec<Producto>,
    /// Currently visible subset per the filter selection.
    pub visible: Vec<Producto>,
    pub facets: FacetIndex,
    pub filters: FilterSelection,
    pub catalog_state: CatalogState,
    pub list_state: ListState,

    pub login: LoginForm,
    pub register: Option<RegisterForm>,
    pub form: ProductForm,
    pub admin_focus: AdminFocus,
    /// Pending delete awaiting explicit confirmation.
    pub confirm_delete: Option<i64>,

    pub notice: Option<Notice>,
    pub busy: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(client: ApiClient, tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            client,
            tx,
            screen: Screen::Login,
            session: None,
            productos: Vec::new(),
            visible: Vec::new(),
            facets: FacetIndex::default(),
            filters: FilterSelection::default(),
            catalog_state: CatalogState::Loading,
            list_state: ListState::default(),
            login: LoginForm::default(),
            register: None,
            form: ProductForm::default(),
            admin_focus: AdminFocus::List,
            confirm_delete: None,
            notice: None,
            busy: false,
            should_quit: false,
        }
    }

    // ========== Notices ==========

    pub fn notify(&mut self, kind: NoticeKind, text: impl Into<String>) {
        self.notice = Some(Notice { kind, text: text.into(), shown_at: Instant::now() });
    }

    /// Called every loop iteration; expires the notice banner.
    pub fn on_tick(&mut self) {
        if let Some(notice) = &self.notice
            && notice.shown_at.elapsed() > NOTICE_TTL
        {
            self.notice = None;
        }
    }

    /// Filtered result set is empty while the collection itself is
    /// loaded: render the explicit "no results" notice, not an empty
    /// region and not the loading/error states.
    pub fn no_results(&self) -> bool {
        matches!(self.catalog_state, CatalogState::Loaded) && self.visible.is_empty()
    }

    pub fn selected_producto(&self) -> Option<&Producto> {
        self.visible.get(self.list_state.selected()?)
    }

    // ========== Startup / navigation ==========

    /// Run the session guard. Evaluated once per protected screen
    /// entry; the outcome decides which screen comes up.
    pub fn start_session_check(&mut self) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = check_session(&client, RequiredAccess::Admin).await;
            let _ = tx.send(AppEvent::SessionChecked(outcome));
        });
    }

    fn start_fetch(&mut self, initial: bool) {
        if initial {
            self.catalog_state = CatalogState::Loading;
        }
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.list_productos().await.map_err(|e| e.user_message());
            let _ = tx.send(AppEvent::ProductosLoaded(result));
        });
    }

    fn enter_catalog(&mut self, screen: Screen) {
        self.screen = screen;
        self.productos.clear();
        self.visible.clear();
        self.facets = FacetIndex::default();
        self.filters.clear();
        self.list_state = ListState::default();
        self.start_fetch(true);
    }

    fn reset_to_login(&mut self) {
        self.screen = Screen::Login;
        self.session = None;
        self.productos.clear();
        self.visible.clear();
        self.facets = FacetIndex::default();
        self.filters.clear();
        self.form.clear();
        self.confirm_delete = None;
        self.list_state = ListState::default();
    }

    // ========== Filters ==========

    fn apply_filters(&mut self) {
        self.visible = self.filters.apply(&self.productos);
        self.list_state = ListState::default();
        if !self.visible.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    fn cycle_facet(current: &mut Option<String>, options: &[String], forward: bool) {
        // Position 0 is "all"; facet values follow in first-seen order.
        let len = options.len() + 1;
        let position = match current.as_deref() {
            None => 0,
            Some(value) => options.iter().position(|v| v == value).map_or(0, |i| i + 1),
        };
        let next = if forward { (position + 1) % len } else { (position + len - 1) % len };
        *current = if next == 0 { None } else { Some(options[next - 1].clone()) };
    }

    fn cycle_marca(&mut self, forward: bool) {
        Self::cycle_facet(&mut self.filters.marca, &self.facets.marcas, forward);
        self.apply_filters();
    }

    fn cycle_categoria(&mut self, forward: bool) {
        Self::cycle_facet(&mut self.filters.categoria, &self.facets.categorias, forward);
        self.apply_filters();
    }

    fn clear_filters(&mut self) {
        self.filters.clear();
        self.apply_filters();
    }

    // ========== Auth actions ==========

    fn submit_login(&mut self) {
        if self.busy {
            return;
        }
        let username = self.login.username.value().trim().to_string();
        let password = self.login.password.value().to_string();
        if username.is_empty() || password.is_empty() {
            self.notify(NoticeKind::Error, "Ingrese usuario y contraseña");
            return;
        }
        self.busy = true;
        self.notify(NoticeKind::Info, "Iniciando sesión...");
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.login(&username, &password).await.map_err(|e| e.user_message());
            let _ = tx.send(AppEvent::LoginFinished(result));
        });
    }

    fn submit_register(&mut self) {
        if self.busy {
            return;
        }
        let Some(register) = &self.register else { return };
        let request = register.to_request();
        // Precondition check: no network call with missing fields.
        if let Err(message) = request.validate() {
            self.notify(NoticeKind::Error, message);
            return;
        }
        self.busy = true;
        self.notify(NoticeKind::Info, "Registrando usuario...");
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.register(&request).await.map_err(|e| e.user_message());
            let _ = tx.send(AppEvent::RegisterFinished(result));
        });
    }

    fn start_logout(&mut self) {
        if self.busy {
            return;
        }
        self.busy = true;
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.logout().await.map_err(|e| e.user_message());
            let _ = tx.send(AppEvent::LogoutFinished(result));
        });
    }

    // ========== Form actions ==========

    fn edit_selected(&mut self) {
        if let Some(producto) = self.selected_producto().cloned() {
            self.form.load(&producto);
            self.admin_focus = AdminFocus::Form;
        }
    }

    fn submit_form(&mut self) {
        if self.busy {
            return;
        }
        let payload = match self.form.to_payload() {
            Ok(payload) => payload,
            Err(message) => {
                self.notify(NoticeKind::Error, message);
                return;
            }
        };
        let id = self.form.id;
        let imagen_path = self.form.imagen_path.value().trim().to_string();

        self.busy = true;
        self.notify(NoticeKind::Info, "Guardando producto...");
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = async {
                let mut payload = payload;
                // Image upload always completes before the save request.
                if !imagen_path.is_empty() {
                    let bytes = tokio::fs::read(&imagen_path)
                        .await
                        .map_err(|e| format!("No se pudo leer {imagen_path}: {e}"))?;
                    let filename = std::path::Path::new(&imagen_path)
                        .file_name()
                        .and_then(|n| n.to_str())
                        .unwrap_or("imagen")
                        .to_string();
                    let url = client
                        .upload_imagen(&filename, bytes)
                        .await
                        .map_err(|e| e.user_message())?;
                    payload.imagen_url = Some(url);
                }
                match id {
                    Some(id) => client.update_producto(id, &payload).await,
                    None => client.create_producto(&payload).await,
                }
                .map_err(|e| e.user_message())
            }
            .await;
            let _ = tx.send(AppEvent::SaveFinished { result, was_update: id.is_some() });
        });
    }

    fn request_delete(&mut self) {
        if let Some(producto) = self.selected_producto() {
            self.confirm_delete = Some(producto.id);
        }
    }

    fn execute_delete(&mut self, id: i64) {
        if self.busy {
            return;
        }
        self.busy = true;
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.delete_producto(id).await.map(|_| id).map_err(|e| e.user_message());
            let _ = tx.send(AppEvent::DeleteFinished(result));
        });
    }

    // ========== Task results ==========

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SessionChecked(outcome) => match outcome {
                GuardOutcome::Proceed(user) => {
                    tracing::info!(username = %user.username, "Admin session verified");
                    self.session = Some(user);
                    self.enter_catalog(Screen::Admin);
                }
                GuardOutcome::RedirectToCatalog(user) => {
                    tracing::info!(username = %user.username, "Session without admin access");
                    self.session = Some(user);
                    self.enter_catalog(Screen::Catalog);
                }
                GuardOutcome::RedirectToLogin => {
                    self.reset_to_login();
                }
            },
            AppEvent::ProductosLoaded(result) => match result {
                Ok(productos) => {
                    self.productos = productos;
                    self.facets = FacetIndex::build(&self.productos);
                    // A selection whose value vanished from the new
                    // collection falls back to "all".
                    self.filters.retain_known(&self.facets);
                    self.apply_filters();
                    self.catalog_state = CatalogState::Loaded;
                }
                Err(message) => {
                    if self.catalog_state == CatalogState::Loading {
                        self.catalog_state = CatalogState::Error(message);
                    } else {
                        // Keep showing the last good collection.
                        self.notify(NoticeKind::Error, message);
                    }
                }
            },
            AppEvent::LoginFinished(result) => {
                self.busy = false;
                match result {
                    Ok(redirect) => {
                        tracing::debug!(redirect_url = %redirect.redirect_url, "Login ok");
                        self.notify(NoticeKind::Success, "¡Login exitoso! Redirigiendo...");
                        self.login.password = tui_input::Input::default();
                        // The guard decides the target screen.
                        self.start_session_check();
                    }
                    Err(message) => self.notify(NoticeKind::Error, message),
                }
            }
            AppEvent::RegisterFinished(result) => {
                self.busy = false;
                match result {
                    Ok(usuario) => {
                        self.register = None;
                        self.login.username = tui_input::Input::from(usuario.username.clone());
                        self.notify(
                            NoticeKind::Success,
                            format!("¡Usuario {} registrado exitosamente!", usuario.username),
                        );
                    }
                    Err(message) => self.notify(NoticeKind::Error, message),
                }
            }
            AppEvent::SaveFinished { result, was_update } => {
                self.busy = false;
                match result {
                    Ok(_) => {
                        self.form.clear();
                        self.admin_focus = AdminFocus::List;
                        self.notify(
                            NoticeKind::Success,
                            if was_update {
                                "Producto actualizado exitosamente"
                            } else {
                                "Producto creado exitosamente"
                            },
                        );
                        self.start_fetch(false);
                    }
                    // The form stays populated; nothing is re-fetched.
                    Err(message) => self.notify(NoticeKind::Error, message),
                }
            }
            AppEvent::DeleteFinished(result) => {
                self.busy = false;
                match result {
                    Ok(_) => {
                        self.notify(NoticeKind::Success, "Producto eliminado");
                        self.start_fetch(false);
                    }
                    Err(message) => self.notify(NoticeKind::Error, message),
                }
            }
            AppEvent::LogoutFinished(result) => {
                self.busy = false;
                // Fail-safe navigation: leave the protected screen even
                // when the logout request itself failed.
                if let Err(message) = result {
                    tracing::warn!(error = %message, "Logout request failed");
                }
                self.reset_to_login();
            }
        }
    }

    // ========== Input ==========

    pub fn handle_key(&mut self, key: KeyEvent) {
        if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
            return;
        }
        match self.screen {
            Screen::Login => self.handle_login_key(key),
            Screen::Catalog => self.handle_catalog_key(key),
            Screen::Admin => self.handle_admin_key(key),
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) {
        if self.register.is_some() {
            self.handle_register_key(key);
            return;
        }
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Down | KeyCode::Up => self.login.next_field(),
            KeyCode::Enter => self.submit_login(),
            KeyCode::F(2) => self.register = Some(RegisterForm::default()),
            _ => {
                self.login.focused_input().handle_event(&Event::Key(key));
            }
        }
    }

    fn handle_register_key(&mut self, key: KeyEvent) {
        let Some(register) = self.register.as_mut() else { return };
        match key.code {
            KeyCode::Esc => self.register = None,
            KeyCode::Tab | KeyCode::Down => register.next_field(),
            KeyCode::Up => register.prev_field(),
            KeyCode::Enter => self.submit_register(),
            KeyCode::Char(' ') if register.focused_input().is_none() => {
                register.is_admin = !register.is_admin;
            }
            _ => {
                if let Some(input) = register.focused_input() {
                    input.handle_event(&Event::Key(key));
                }
            }
        }
    }

    fn handle_catalog_key(&mut self, key: KeyEvent) {
        if self.handle_list_key(key) {
            return;
        }
        if let KeyCode::Char('q') | KeyCode::Esc = key.code {
            self.should_quit = true;
        }
    }

    /// Keys shared by the catalog screen and the admin list focus.
    /// Returns true when the key was consumed.
    fn handle_list_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Down => {
                self.select_offset(1);
                true
            }
            KeyCode::Up => {
                self.select_offset(-1);
                true
            }
            KeyCode::Char('b') => {
                self.cycle_marca(true);
                true
            }
            KeyCode::Char('B') => {
                self.cycle_marca(false);
                true
            }
            KeyCode::Char('c') => {
                self.cycle_categoria(true);
                true
            }
            KeyCode::Char('C') => {
                self.cycle_categoria(false);
                true
            }
            KeyCode::Char('x') => {
                self.clear_filters();
                true
            }
            KeyCode::Char('r') => {
                self.start_fetch(false);
                true
            }
            KeyCode::Char('l') => {
                self.start_logout();
                true
            }
            _ => false,
        }
    }

    fn handle_admin_key(&mut self, key: KeyEvent) {
        // The confirmation dialog captures everything first.
        if let Some(id) = self.confirm_delete {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    self.confirm_delete = None;
                    self.execute_delete(id);
                }
                _ => self.confirm_delete = None,
            }
            return;
        }
        match self.admin_focus {
            AdminFocus::List => {
                if self.handle_list_key(key) {
                    return;
                }
                match key.code {
                    KeyCode::Tab => self.admin_focus = AdminFocus::Form,
                    KeyCode::Char('e') => self.edit_selected(),
                    KeyCode::Char('d') | KeyCode::Delete => self.request_delete(),
                    KeyCode::Char('n') => {
                        self.form.clear();
                        self.admin_focus = AdminFocus::Form;
                    }
                    KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                    _ => {}
                }
            }
            AdminFocus::Form => match key.code {
                KeyCode::Esc => self.admin_focus = AdminFocus::List,
                KeyCode::Tab | KeyCode::Down => self.form.next_field(),
                KeyCode::BackTab | KeyCode::Up => self.form.prev_field(),
                KeyCode::Enter => self.submit_form(),
                _ => {
                    self.form.focused_input().handle_event(&Event::Key(key));
                }
            },
        }
    }

    fn select_offset(&mut self, delta: i64) {
        if self.visible.is_empty() {
            self.list_state.select(None);
            return;
        }
        let current = self.list_state.selected().unwrap_or(0) as i64;
        let last = self.visible.len() as i64 - 1;
        let next = (current + delta).clamp(0, last);
        self.list_state.select(Some(next as usize));
    }
}

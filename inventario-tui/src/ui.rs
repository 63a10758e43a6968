//! Rendering for the three screens of the admin panel

use ratatui::{prelude::*, widgets::*};
use shared::models::producto::Producto;
use tui_input::Input;

use crate::app::{AdminFocus, App, CatalogState, NoticeKind, Screen};
use crate::form::{LoginField, ProductField, RegisterField};

pub fn draw(f: &mut Frame, app: &mut App) {
    match app.screen {
        Screen::Login => draw_login(f, app),
        Screen::Catalog => draw_catalog(f, app, false),
        Screen::Admin => {
            if app.admin_focus == AdminFocus::Form {
                draw_admin(f, app);
            } else {
                draw_catalog(f, app, true);
            }
        }
    }
    draw_notice(f, app);
    if app.confirm_delete.is_some() {
        draw_confirm(f);
    }
}

// =============================================================================
// Login screen
// =============================================================================

fn draw_login(f: &mut Frame, app: &mut App) {
    let area = centered_rect(44, 12, f.area());

    let outer = Block::default()
        .title(" Iniciar Sesión ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(Clear, area);
    f.render_widget(&outer, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Usuario
            Constraint::Length(3), // Contraseña
            Constraint::Length(1),
            Constraint::Length(1), // Help
        ])
        .split(area);

    let focus = app.login.focus;
    input_field(
        f,
        chunks[0],
        " Usuario ",
        &app.login.username,
        focus == LoginField::Username,
        false,
    );
    input_field(
        f,
        chunks[1],
        " Contraseña ",
        &app.login.password,
        focus == LoginField::Password,
        true,
    );

    let help = Paragraph::new("Enter: entrar | F2: registrarse | Esc: salir")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[3]);

    if let Some(register) = &app.register {
        draw_register(f, register);
    }
}

fn draw_register(f: &mut Frame, register: &crate::form::RegisterForm) {
    let area = centered_rect(48, 16, f.area());

    let outer = Block::default()
        .title(" Registrar Usuario ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    f.render_widget(Clear, area);
    f.render_widget(&outer, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Usuario
            Constraint::Length(3), // Email
            Constraint::Length(3), // Contraseña
            Constraint::Length(1), // Admin toggle
            Constraint::Length(1), // Help
        ])
        .split(area);

    let focus = register.focus;
    input_field(f, chunks[0], " Usuario ", &register.username, focus == RegisterField::Username, false);
    input_field(f, chunks[1], " Email ", &register.email, focus == RegisterField::Email, false);
    input_field(f, chunks[2], " Contraseña ", &register.password, focus == RegisterField::Password, true);

    let toggle_style = if focus == RegisterField::IsAdmin {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let toggle = Paragraph::new(Line::from(vec![
        Span::raw(" Administrador: "),
        Span::styled(if register.is_admin { "[x]" } else { "[ ]" }, toggle_style),
    ]));
    f.render_widget(toggle, chunks[3]);

    let help = Paragraph::new("Enter: registrar | Espacio: marcar | Esc: cerrar")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[4]);
}

// =============================================================================
// Catalog (public and admin list)
// =============================================================================

fn draw_catalog(f: &mut Frame, app: &mut App, admin: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Filters
            Constraint::Min(1),    // Cards
            Constraint::Length(1), // Help
        ])
        .split(f.area());

    draw_header(f, app, chunks[0], admin);
    draw_filters(f, app, chunks[1]);
    draw_cards(f, app, chunks[2], admin);

    let help = if admin {
        "↑↓: mover | e: editar | d: eliminar | n: nuevo | Tab: formulario | b/c: filtros | x: limpiar | r: recargar | l: salir de sesión | q: salir"
    } else {
        "↑↓: mover | b/c: filtros | x: limpiar | r: recargar | l: salir de sesión | q: salir"
    };
    let help = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, chunks[3]);
}

fn draw_header(f: &mut Frame, app: &App, area: Rect, admin: bool) {
    let title = if admin { " Panel de Administración " } else { " Catálogo de Productos " };
    let session = match &app.session {
        Some(user) => Span::styled(
            format!(" {} ", user.username),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        None => Span::styled(" invitado ", Style::default().fg(Color::DarkGray)),
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(title, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::raw("| "),
        session,
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(header, area);
}

fn draw_filters(f: &mut Frame, app: &App, area: Rect) {
    let marca = app.filters.marca.as_deref().unwrap_or("todas");
    let categoria = app.filters.categoria.as_deref().unwrap_or("todas");
    let active = !app.filters.is_empty();

    let filters = Paragraph::new(Line::from(vec![
        Span::raw(" Marca: "),
        Span::styled(marca, facet_style(app.filters.marca.is_some())),
        Span::raw("  Categoría: "),
        Span::styled(categoria, facet_style(app.filters.categoria.is_some())),
        Span::raw("  "),
        Span::styled(
            format!("({} de {})", app.visible.len(), app.productos.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .block(
        Block::default()
            .title(" Filtros ")
            .borders(Borders::ALL)
            .border_style(if active {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White).add_modifier(Modifier::DIM)
            }),
    );
    f.render_widget(filters, area);
}

fn facet_style(selected: bool) -> Style {
    if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn draw_cards(f: &mut Frame, app: &mut App, area: Rect, admin: bool) {
    let block = Block::default()
        .title(" Productos ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    match &app.catalog_state {
        CatalogState::Loading => {
            let loading = Paragraph::new("Cargando productos...")
                .style(Style::default().fg(Color::Yellow))
                .alignment(Alignment::Center)
                .block(block);
            f.render_widget(loading, area);
        }
        CatalogState::Error(message) => {
            let error = Paragraph::new(message.as_str())
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center)
                .block(block);
            f.render_widget(error, area);
        }
        CatalogState::Loaded if app.no_results() => {
            let empty = Paragraph::new("No se encontraron productos con los filtros seleccionados")
                .style(Style::default().fg(Color::Gray))
                .alignment(Alignment::Center)
                .block(block);
            f.render_widget(empty, area);
        }
        CatalogState::Loaded => {
            let items: Vec<ListItem> =
                app.visible.iter().map(|p| product_card(p, admin)).collect();
            let list = List::new(items)
                .block(block)
                .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
                .highlight_symbol("▶ ");
            f.render_stateful_widget(list, area, &mut app.list_state);
        }
    }
}

fn product_card(producto: &Producto, admin: bool) -> ListItem<'_> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                producto.nombre.as_str(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(format!("[{}]", producto.marca), Style::default().fg(Color::Yellow)),
            Span::raw("  "),
            Span::styled(producto.categoria.as_str(), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::raw("  Cantidad: "),
            Span::styled(producto.cantidad.to_string(), Style::default().fg(Color::Green)),
            Span::raw("  Imagen: "),
            Span::styled(producto.imagen_or_placeholder(), Style::default().fg(Color::DarkGray)),
        ]),
    ];
    if !producto.descripcion.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("  {}", producto.descripcion),
            Style::default().fg(Color::Gray),
        )));
    }
    if admin {
        lines.push(Line::from(Span::styled(
            format!("  id {}", producto.id),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
        )));
    }
    lines.push(Line::from(""));
    ListItem::new(lines)
}

// =============================================================================
// Admin form
// =============================================================================

fn draw_admin(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Form
            Constraint::Length(1), // Help
        ])
        .split(f.area());

    draw_header(f, app, chunks[0], true);

    let title = if app.form.is_edit() { " Editar Producto " } else { " Nuevo Producto " };
    let outer = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    f.render_widget(&outer, chunks[1]);

    let fields = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Nombre
            Constraint::Length(3), // Marca
            Constraint::Length(3), // Categoría
            Constraint::Length(3), // Cantidad
            Constraint::Length(3), // Descripción
            Constraint::Length(3), // Imagen
            Constraint::Length(1), // Imagen actual
            Constraint::Length(1), // Sugerencias
            Constraint::Min(0),
        ])
        .split(chunks[1]);

    let focus = app.form.focus;
    input_field(f, fields[0], " Nombre ", &app.form.nombre, focus == ProductField::Nombre, false);
    input_field(f, fields[1], " Marca ", &app.form.marca, focus == ProductField::Marca, false);
    input_field(f, fields[2], " Categoría ", &app.form.categoria, focus == ProductField::Categoria, false);
    input_field(f, fields[3], " Cantidad ", &app.form.cantidad, focus == ProductField::Cantidad, false);
    input_field(f, fields[4], " Descripción ", &app.form.descripcion, focus == ProductField::Descripcion, false);
    input_field(
        f,
        fields[5],
        " Imagen (ruta local) ",
        &app.form.imagen_path,
        focus == ProductField::Imagen,
        false,
    );

    if let Some(actual) = &app.form.imagen_actual {
        let current = Paragraph::new(Line::from(vec![
            Span::raw(" Imagen actual: "),
            Span::styled(actual.as_str(), Style::default().fg(Color::DarkGray)),
        ]));
        f.render_widget(current, fields[6]);
    }

    // Known facet values as typing suggestions (datalist equivalent).
    let suggestions = match focus {
        ProductField::Marca => Some(app.facets.marcas.join(", ")),
        ProductField::Categoria => Some(app.facets.categorias.join(", ")),
        _ => None,
    };
    if let Some(values) = suggestions
        && !values.is_empty()
    {
        let hint = Paragraph::new(Line::from(vec![
            Span::raw(" Existentes: "),
            Span::styled(values, Style::default().fg(Color::DarkGray)),
        ]));
        f.render_widget(hint, fields[7]);
    }

    let help = Paragraph::new("Enter: guardar | Tab/↑↓: campo | Esc: volver a la lista")
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, chunks[2]);
}

// =============================================================================
// Shared widgets
// =============================================================================

fn input_field(f: &mut Frame, area: Rect, title: &str, input: &Input, focused: bool, mask: bool) {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let value = if mask { "•".repeat(input.value().chars().count()) } else { input.value().to_string() };

    let width = area.width.saturating_sub(2) as usize;
    let scroll = input.visual_scroll(width);
    let widget = Paragraph::new(value)
        .style(style)
        .scroll((0, scroll as u16))
        .block(Block::default().borders(Borders::ALL).title(title).border_style(style));
    f.render_widget(widget, area);

    if focused {
        let x = area.x + (input.visual_cursor().saturating_sub(scroll)) as u16 + 1;
        f.set_cursor_position((x, area.y + 1));
    }
}

fn draw_notice(f: &mut Frame, app: &App) {
    let Some(notice) = &app.notice else { return };
    let style = match notice.kind {
        NoticeKind::Info => Style::default().fg(Color::Cyan),
        NoticeKind::Success => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        NoticeKind::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    };

    let area = f.area();
    let banner = Rect {
        x: area.x,
        y: area.bottom().saturating_sub(2),
        width: area.width,
        height: 1,
    };
    let text = if app.busy { format!("{} …", notice.text) } else { notice.text.clone() };
    f.render_widget(Clear, banner);
    f.render_widget(Paragraph::new(text).style(style).alignment(Alignment::Center), banner);
}

fn draw_confirm(f: &mut Frame) {
    let area = centered_rect(46, 5, f.area());
    let dialog = Paragraph::new("¿Eliminar este producto? (y/n)")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .title(" Confirmar ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
    f.render_widget(Clear, area);
    f.render_widget(dialog, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

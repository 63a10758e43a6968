//! Form state for the login screen, the registration dialog and the
//! admin product form.

use shared::client::RegisterRequest;
use shared::models::producto::{Producto, ProductoPayload};
use tui_input::Input;

// =============================================================================
// Login
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

#[derive(Debug, Default)]
pub struct LoginForm {
    pub username: Input,
    pub password: Input,
    pub focus: LoginField,
}

impl LoginForm {
    pub fn focused_input(&mut self) -> &mut Input {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }
}

// =============================================================================
// Registration dialog
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegisterField {
    #[default]
    Username,
    Email,
    Password,
    IsAdmin,
}

#[derive(Debug, Default)]
pub struct RegisterForm {
    pub username: Input,
    pub email: Input,
    pub password: Input,
    pub is_admin: bool,
    pub focus: RegisterField,
}

impl RegisterForm {
    pub fn focused_input(&mut self) -> Option<&mut Input> {
        match self.focus {
            RegisterField::Username => Some(&mut self.username),
            RegisterField::Email => Some(&mut self.email),
            RegisterField::Password => Some(&mut self.password),
            RegisterField::IsAdmin => None,
        }
    }

    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            RegisterField::Username => RegisterField::Email,
            RegisterField::Email => RegisterField::Password,
            RegisterField::Password => RegisterField::IsAdmin,
            RegisterField::IsAdmin => RegisterField::Username,
        };
    }

    pub fn prev_field(&mut self) {
        self.focus = match self.focus {
            RegisterField::Username => RegisterField::IsAdmin,
            RegisterField::Email => RegisterField::Username,
            RegisterField::Password => RegisterField::Email,
            RegisterField::IsAdmin => RegisterField::Password,
        };
    }

    pub fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            username: self.username.value().trim().to_string(),
            email: self.email.value().trim().to_string(),
            password: self.password.value().to_string(),
            is_admin: self.is_admin,
        }
    }
}

// =============================================================================
// Product form (admin)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductField {
    #[default]
    Nombre,
    Marca,
    Categoria,
    Cantidad,
    Descripcion,
    Imagen,
}

/// Admin create/edit form. `id == None` means create; edit mode is
/// entered by copying an existing record's fields via [`load`].
///
/// [`load`]: ProductForm::load
#[derive(Debug, Default)]
pub struct ProductForm {
    pub id: Option<i64>,
    pub nombre: Input,
    pub marca: Input,
    pub categoria: Input,
    pub cantidad: Input,
    pub descripcion: Input,
    /// Local file path of a new image to upload, if any.
    pub imagen_path: Input,
    /// Image reference already stored on the record being edited.
    pub imagen_actual: Option<String>,
    pub focus: ProductField,
}

impl ProductForm {
    pub fn focused_input(&mut self) -> &mut Input {
        match self.focus {
            ProductField::Nombre => &mut self.nombre,
            ProductField::Marca => &mut self.marca,
            ProductField::Categoria => &mut self.categoria,
            ProductField::Cantidad => &mut self.cantidad,
            ProductField::Descripcion => &mut self.descripcion,
            ProductField::Imagen => &mut self.imagen_path,
        }
    }

    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            ProductField::Nombre => ProductField::Marca,
            ProductField::Marca => ProductField::Categoria,
            ProductField::Categoria => ProductField::Cantidad,
            ProductField::Cantidad => ProductField::Descripcion,
            ProductField::Descripcion => ProductField::Imagen,
            ProductField::Imagen => ProductField::Nombre,
        };
    }

    pub fn prev_field(&mut self) {
        self.focus = match self.focus {
            ProductField::Nombre => ProductField::Imagen,
            ProductField::Marca => ProductField::Nombre,
            ProductField::Categoria => ProductField::Marca,
            ProductField::Cantidad => ProductField::Categoria,
            ProductField::Descripcion => ProductField::Cantidad,
            ProductField::Imagen => ProductField::Descripcion,
        };
    }

    /// True when the form holds an identifier, i.e. submit updates
    /// instead of creating.
    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    /// Copy a record's fields into the form (edit mode).
    pub fn load(&mut self, producto: &Producto) {
        self.id = Some(producto.id);
        self.nombre = Input::from(producto.nombre.clone());
        self.marca = Input::from(producto.marca.clone());
        self.categoria = Input::from(producto.categoria.clone());
        self.cantidad = Input::from(producto.cantidad.to_string());
        self.descripcion = Input::from(producto.descripcion.clone());
        self.imagen_path = Input::default();
        self.imagen_actual = producto.imagen_url.clone();
        self.focus = ProductField::Nombre;
    }

    /// Reset to create mode with empty fields.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Assemble the request payload, keeping the previously known
    /// image reference. Returns an inline validation message on bad
    /// input; nothing has gone over the network at this point.
    pub fn to_payload(&self) -> Result<ProductoPayload, String> {
        let nombre = self.nombre.value().trim();
        if nombre.is_empty() {
            return Err("El nombre es obligatorio".to_string());
        }
        let cantidad_raw = self.cantidad.value().trim();
        let cantidad: u32 = if cantidad_raw.is_empty() {
            0
        } else {
            cantidad_raw
                .parse()
                .map_err(|_| "La cantidad debe ser un número no negativo".to_string())?
        };

        Ok(ProductoPayload {
            nombre: nombre.to_string(),
            marca: self.marca.value().trim().to_string(),
            categoria: self.categoria.value().trim().to_string(),
            cantidad,
            descripcion: self.descripcion.value().to_string(),
            imagen_url: self.imagen_actual.clone(),
        })
    }
}

//! Catalog logic: facet index and client-side filtering
//!
//! Everything here is pure and synchronous. Filtering operates on the
//! already-fetched in-memory collection; no request is issued when a
//! selection changes.

use crate::models::producto::Producto;

// =============================================================================
// Facet Index
// =============================================================================

/// Distinct brand and category values derived from a product
/// collection, in first-seen order.
///
/// Values are trimmed and blank entries excluded. The index feeds both
/// the closed-choice filter selectors of the catalog view and the
/// free-text suggestions of the admin form, so it must be rebuilt
/// whenever the collection is replaced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacetIndex {
    pub marcas: Vec<String>,
    pub categorias: Vec<String>,
}

impl FacetIndex {
    /// Build the index from a product collection. Pure: the input is
    /// never mutated.
    pub fn build(productos: &[Producto]) -> Self {
        Self {
            marcas: distinct_trimmed(productos.iter().map(|p| p.marca.as_str())),
            categorias: distinct_trimmed(productos.iter().map(|p| p.categoria.as_str())),
        }
    }

    pub fn contains_marca(&self, value: &str) -> bool {
        self.marcas.iter().any(|m| m == value)
    }

    pub fn contains_categoria(&self, value: &str) -> bool {
        self.categorias.iter().any(|c| c == value)
    }
}

fn distinct_trimmed<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        if !out.iter().any(|v| v == value) {
            out.push(value.to_string());
        }
    }
    out
}

// =============================================================================
// Filter Selection
// =============================================================================

/// Current filter selection. `None` means "all" for that facet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSelection {
    pub marca: Option<String>,
    pub categoria: Option<String>,
}

impl FilterSelection {
    /// True when no criterion is set, i.e. the full collection is visible.
    pub fn is_empty(&self) -> bool {
        self.marca.is_none() && self.categoria.is_none()
    }

    /// Reset both criteria to "all". Idempotent.
    pub fn clear(&mut self) {
        self.marca = None;
        self.categoria = None;
    }

    /// Whether a single product passes every set criterion.
    ///
    /// Matching is exact and case-sensitive against the trimmed field;
    /// multiple criteria combine with logical AND.
    pub fn matches(&self, producto: &Producto) -> bool {
        if let Some(marca) = &self.marca
            && producto.marca.trim() != marca
        {
            return false;
        }
        if let Some(categoria) = &self.categoria
            && producto.categoria.trim() != categoria
        {
            return false;
        }
        true
    }

    /// Compute the visible subset, preserving collection order.
    /// An empty selection returns the collection unchanged.
    pub fn apply(&self, productos: &[Producto]) -> Vec<Producto> {
        productos.iter().filter(|p| self.matches(p)).cloned().collect()
    }

    /// Drop criteria whose value no longer exists in the facet index.
    ///
    /// Called after a re-fetch so the closed-choice selectors never
    /// hold a value that the freshly loaded collection cannot match.
    pub fn retain_known(&mut self, index: &FacetIndex) {
        if let Some(marca) = &self.marca
            && !index.contains_marca(marca)
        {
            self.marca = None;
        }
        if let Some(categoria) = &self.categoria
            && !index.contains_categoria(categoria)
        {
            self.categoria = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn producto(id: i64, nombre: &str, marca: &str, categoria: &str) -> Producto {
        Producto {
            id,
            nombre: nombre.into(),
            marca: marca.into(),
            categoria: categoria.into(),
            cantidad: 1,
            descripcion: String::new(),
            imagen_url: None,
        }
    }

    fn inventario() -> Vec<Producto> {
        vec![
            producto(1, "Bolt", "Acme", "Hardware"),
            producto(2, "Nut", "Acme", "Hardware"),
            producto(3, "Cable", "Volt", "Electrónica"),
            producto(4, "Tape", " Acme ", "  "),
            producto(5, "Fuse", "", "Electrónica"),
        ]
    }

    #[test]
    fn facets_are_distinct_trimmed_and_ordered() {
        let index = FacetIndex::build(&inventario());
        assert_eq!(index.marcas, vec!["Acme", "Volt"]);
        assert_eq!(index.categorias, vec!["Hardware", "Electrónica"]);
    }

    #[test]
    fn facets_of_empty_collection_are_empty() {
        assert_eq!(FacetIndex::build(&[]), FacetIndex::default());
    }

    #[test]
    fn empty_selection_returns_collection_unchanged() {
        let productos = inventario();
        let selection = FilterSelection::default();
        assert_eq!(selection.apply(&productos), productos);
    }

    #[test]
    fn filter_matches_trimmed_field_exactly() {
        let productos = inventario();
        let selection = FilterSelection { marca: Some("Acme".into()), categoria: None };
        let visible = selection.apply(&productos);
        // "Tape" has marca " Acme " which trims to a match.
        assert_eq!(visible.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2, 4]);
    }

    #[test]
    fn filter_is_case_sensitive_and_not_substring() {
        let productos = inventario();
        for marca in ["acme", "Acm", "ACME"] {
            let selection = FilterSelection { marca: Some(marca.into()), categoria: None };
            assert!(selection.apply(&productos).is_empty(), "{marca} should not match");
        }
    }

    #[test]
    fn criteria_combine_with_and() {
        let productos = inventario();
        let selection = FilterSelection {
            marca: Some("Acme".into()),
            categoria: Some("Hardware".into()),
        };
        let visible = selection.apply(&productos);
        assert_eq!(visible.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2]);

        let selection = FilterSelection {
            marca: Some("Volt".into()),
            categoria: Some("Hardware".into()),
        };
        assert!(selection.apply(&productos).is_empty());
    }

    #[test]
    fn clear_is_idempotent() {
        let productos = inventario();
        let mut selection = FilterSelection {
            marca: Some("Acme".into()),
            categoria: Some("Hardware".into()),
        };
        selection.clear();
        let once = selection.apply(&productos);
        selection.clear();
        let twice = selection.apply(&productos);
        assert_eq!(once, twice);
        assert_eq!(once, productos);
    }

    #[test]
    fn stale_selection_is_reset_against_new_index() {
        let mut selection = FilterSelection {
            marca: Some("Acme".into()),
            categoria: Some("Juguetes".into()),
        };
        let index = FacetIndex::build(&inventario());
        selection.retain_known(&index);
        assert_eq!(selection.marca.as_deref(), Some("Acme"));
        assert_eq!(selection.categoria, None);
    }

    #[test]
    fn single_brand_collection_filters_as_expected() {
        let productos = vec![
            Producto {
                id: 1,
                nombre: "Bolt".into(),
                marca: "Acme".into(),
                categoria: "Hardware".into(),
                cantidad: 5,
                descripcion: "M8".into(),
                imagen_url: Some(String::new()),
            },
            Producto {
                id: 2,
                nombre: "Nut".into(),
                marca: "Acme".into(),
                categoria: "Hardware".into(),
                cantidad: 0,
                descripcion: String::new(),
                imagen_url: Some("http://x/y.png".into()),
            },
        ];

        let index = FacetIndex::build(&productos);
        assert_eq!(index.marcas, vec!["Acme"]);
        assert_eq!(index.categorias, vec!["Hardware"]);

        let by_marca = FilterSelection { marca: Some("Acme".into()), categoria: None };
        assert_eq!(by_marca.apply(&productos).len(), 2);

        let by_categoria = FilterSelection { marca: None, categoria: Some("Other".into()) };
        assert!(by_categoria.apply(&productos).is_empty());
    }
}

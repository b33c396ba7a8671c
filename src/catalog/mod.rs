//! Client-side catalog browsing: filtering and pagination over a fetched
//! product list. Pure functions; the list itself comes from
//! [`crate::api::ApiClient::fetch_products`].

use crate::api::types::Product;

/// Filter over a product list. Build it up with the `with_*` methods and
/// run it with [`CatalogFilter::apply`].
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    categoria: Option<i64>,
    busqueda: Option<String>,
    talla: Option<String>,
    solo_promocion: bool,
    precio_max: Option<f64>,
}

impl CatalogFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only products in a category
    pub fn with_categoria(mut self, categoria_id: i64) -> Self {
        self.categoria = Some(categoria_id);
        self
    }

    /// Keep only products whose name or description contains the text,
    /// case-insensitively
    pub fn with_busqueda(mut self, texto: &str) -> Self {
        self.busqueda = Some(texto.to_lowercase());
        self
    }

    /// Keep only products stocked in a size
    pub fn with_talla(mut self, talla: &str) -> Self {
        self.talla = Some(talla.to_string());
        self
    }

    /// Keep only products with an active promotional price
    pub fn solo_promocion(mut self) -> Self {
        self.solo_promocion = true;
        self
    }

    /// Keep only products whose effective price is at most `max`
    pub fn with_precio_max(mut self, max: f64) -> Self {
        self.precio_max = Some(max);
        self
    }

    /// Run the filter, preserving the input order
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        products
            .iter()
            .filter(|p| self.accepts(p))
            .cloned()
            .collect()
    }

    fn accepts(&self, product: &Product) -> bool {
        if let Some(categoria) = self.categoria {
            if product.categoria_id != Some(categoria) {
                return false;
            }
        }
        if let Some(texto) = &self.busqueda {
            let in_nombre = product.nombre.to_lowercase().contains(texto);
            let in_descripcion = product
                .descripcion
                .as_ref()
                .map(|d| d.to_lowercase().contains(texto))
                .unwrap_or(false);
            if !in_nombre && !in_descripcion {
                return false;
            }
        }
        if let Some(talla) = &self.talla {
            let stocked = product
                .tallas
                .iter()
                .any(|v| v.talla == *talla && v.stock > 0);
            if !stocked {
                return false;
            }
        }
        if self.solo_promocion && product.effective_price() >= product.precio {
            return false;
        }
        if let Some(max) = self.precio_max {
            if product.effective_price() > max {
                return false;
            }
        }
        true
    }
}

/// One page of a paginated list
#[derive(Debug, Clone, PartialEq)]
pub struct PageOf<T> {
    pub items: Vec<T>,
    /// 1-based, clamped into the valid range
    pub page: u32,
    pub per_page: u32,
    pub total_items: usize,
    pub total_pages: u32,
}

/// Slice a list into a display page. `page` is 1-based and clamped; an
/// empty list yields a single empty page.
pub fn paginate<T: Clone>(items: &[T], page: u32, per_page: u32) -> PageOf<T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = ((total_items as u32).div_ceil(per_page)).max(1);
    let page = page.clamp(1, total_pages);

    let start = ((page - 1) * per_page) as usize;
    let end = (start + per_page as usize).min(total_items);
    let items = if start < total_items {
        items[start..end].to_vec()
    } else {
        Vec::new()
    };

    PageOf {
        items,
        page,
        per_page,
        total_items,
        total_pages,
    }
}

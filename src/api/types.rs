//! Wire types for the Leopardo API. Field names follow the backend's
//! Spanish vocabulary exactly so every payload round-trips untouched.

use serde::{Deserialize, Serialize};

/// Stock for one shoe-size variant of a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeVariant {
    pub talla: String,
    pub stock: i64,
}

/// Product record as returned by `GET /productos/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    pub precio: f64,
    #[serde(default)]
    pub precio_promocional: Option<f64>,
    /// Stock for products sold without size variants
    #[serde(default)]
    pub stock: Option<i64>,
    /// Per-size stock; empty for products without size variants
    #[serde(default)]
    pub tallas: Vec<SizeVariant>,
    #[serde(default)]
    pub categoria_id: Option<i64>,
    #[serde(default)]
    pub imagen: Option<String>,
}

impl Product {
    /// The price a buyer actually pays: the promotional price when set and
    /// lower than the regular one
    pub fn effective_price(&self) -> f64 {
        match self.precio_promocional {
            Some(promo) if promo > 0.0 && promo < self.precio => promo,
            _ => self.precio,
        }
    }

    /// Remaining stock for a size, or the flat stock for products without
    /// variants. `None` means the stock is unknown, not zero.
    pub fn stock_for(&self, talla: Option<&str>) -> Option<i64> {
        match talla {
            Some(t) => self.tallas.iter().find(|v| v.talla == t).map(|v| v.stock),
            None => self.stock,
        }
    }

    /// Whether the product is sold by size variant
    pub fn has_sizes(&self) -> bool {
        !self.tallas.is_empty()
    }
}

/// Category record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
}

/// Canonical cart payload from `GET /carrito`
#[derive(Debug, Clone, Deserialize)]
pub struct ServerCart {
    #[serde(default)]
    pub items: Vec<ServerCartItem>,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub cantidad_items: u32,
}

/// One line of the server-side cart
#[derive(Debug, Clone, Deserialize)]
pub struct ServerCartItem {
    pub id: i64,
    pub producto_id: i64,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub talla: Option<String>,
    pub cantidad: u32,
    pub precio_unitario: f64,
    #[serde(default)]
    pub stock_disponible: Option<i64>,
}

/// Body of `POST /carrito`
#[derive(Debug, Clone, Serialize)]
pub struct AddItemRequest {
    pub producto_id: i64,
    pub cantidad: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub talla: Option<String>,
}

/// Body of `PUT /carrito/{itemId}`
#[derive(Debug, Clone, Serialize)]
pub struct UpdateQuantityRequest {
    pub cantidad: u32,
}

/// Body of `POST /productos` (admin)
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub nombre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    pub precio: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precio_promocional: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tallas: Vec<SizeVariant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoria_id: Option<i64>,
}

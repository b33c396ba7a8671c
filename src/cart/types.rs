//! Cart data types.
//!
//! `Cart` is pure serializable data: it is what gets written wholesale to
//! local storage in guest mode and what gets rebuilt from the server
//! payload in authenticated mode. The mode itself lives on the engine.

use serde::{Deserialize, Serialize};

use crate::api::types::ServerCart;

/// Where cart mutations are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartMode {
    /// Local storage only, no server-side counterpart
    Guest,
    /// The server cart is the single source of truth
    Authenticated,
}

/// One line of the cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Server-issued id in authenticated mode, locally generated
    /// (timestamp-based) in guest mode
    pub id: String,
    pub producto_id: i64,
    pub nombre: String,
    #[serde(default)]
    pub talla: Option<String>,
    pub cantidad: u32,
    /// Effective unit price at the time the item was added or last
    /// refreshed
    pub precio_unitario: f64,
    /// Stock snapshot for `(producto_id, talla)`, used only for client-side
    /// upper-bound checks. `None` means unknown.
    #[serde(default)]
    pub stock_disponible: Option<i64>,
}

impl CartItem {
    pub fn subtotal(&self) -> f64 {
        f64::from(self.cantidad) * self.precio_unitario
    }

    /// Identity within a cart is the `(producto_id, talla)` pair
    pub fn matches(&self, producto_id: i64, talla: Option<&str>) -> bool {
        self.producto_id == producto_id && self.talla.as_deref() == talla
    }
}

/// The cart: an ordered item list plus cached derived totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
    pub total: f64,
    pub cantidad: u32,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Recompute the cached totals from the items. Idempotent; called after
    /// every guest-mode mutation so the derived fields can never drift.
    pub fn recalculate(&mut self) {
        self.total = self.items.iter().map(CartItem::subtotal).sum();
        self.cantidad = self.items.iter().map(|i| i.cantidad).sum();
    }

    pub fn find(&self, item_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub(crate) fn find_mut(&mut self, item_id: &str) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|i| i.id == item_id)
    }

    pub(crate) fn find_variant_mut(
        &mut self,
        producto_id: i64,
        talla: Option<&str>,
    ) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|i| i.matches(producto_id, talla))
    }
}

impl From<ServerCart> for Cart {
    /// Authenticated carts display the server's totals as-is; the client
    /// never recomputes them.
    fn from(server: ServerCart) -> Self {
        let items = server
            .items
            .into_iter()
            .map(|item| CartItem {
                id: item.id.to_string(),
                producto_id: item.producto_id,
                nombre: item.nombre.unwrap_or_default(),
                talla: item.talla,
                cantidad: item.cantidad,
                precio_unitario: item.precio_unitario,
                stock_disponible: item.stock_disponible,
            })
            .collect();
        Self {
            items,
            total: server.total,
            cantidad: server.cantidad_items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, cantidad: u32, precio: f64) -> CartItem {
        CartItem {
            id: id.to_string(),
            producto_id: 1,
            nombre: "Tenis Urbano".to_string(),
            talla: None,
            cantidad,
            precio_unitario: precio,
            stock_disponible: None,
        }
    }

    #[test]
    fn recalculate_derives_totals_from_items() {
        let mut cart = Cart {
            items: vec![item("a", 2, 50000.0), item("b", 1, 120000.0)],
            total: 0.0,
            cantidad: 0,
        };
        cart.recalculate();
        assert_eq!(cart.total, 220000.0);
        assert_eq!(cart.cantidad, 3);
    }

    #[test]
    fn variant_identity_distinguishes_sizes() {
        let mut a = item("a", 1, 10.0);
        a.talla = Some("40".to_string());
        assert!(a.matches(1, Some("40")));
        assert!(!a.matches(1, Some("41")));
        assert!(!a.matches(1, None));
        assert!(!a.matches(2, Some("40")));
    }

    #[test]
    fn server_cart_totals_are_displayed_verbatim() {
        let server: ServerCart = serde_json::from_value(serde_json::json!({
            "items": [
                { "id": 9, "producto_id": 3, "nombre": "Bota Cuero",
                  "talla": "41", "cantidad": 2, "precio_unitario": 150000.0,
                  "stock_disponible": 4 }
            ],
            "total": 300000.0,
            "cantidad_items": 2
        }))
        .unwrap();
        let cart = Cart::from(server);
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].id, "9");
        assert_eq!(cart.total, 300000.0);
        assert_eq!(cart.cantidad, 2);
    }
}

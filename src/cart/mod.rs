//! The dual-mode cart engine.
//!
//! In `Guest` mode every mutation is applied locally and the whole cart is
//! serialized to local storage. In `Authenticated` mode every mutation is a
//! server request followed by a reload of the canonical cart; the client
//! never keeps an optimistic local edit, so a failed write leaves the cart
//! exactly as the server last confirmed it. The guest-to-server handover at
//! login lives in [`migration`].

mod migration;
pub mod types;

pub use migration::{MigrationFailure, MigrationOutcome};
pub use types::{Cart, CartItem, CartMode};

use std::sync::Arc;

use chrono::Utc;

use crate::api::types::AddItemRequest;
use crate::api::ApiClient;
use crate::error::Error;
use crate::notify::Notifier;
use crate::storage::{self, KeyValueStorage, CART_STORAGE_KEY};

/// The cart state machine
pub struct CartEngine {
    api: Arc<ApiClient>,
    storage: Arc<dyn KeyValueStorage>,
    notifier: Arc<dyn Notifier>,
    mode: CartMode,
    cart: Cart,
    local_seq: u64,
}

impl CartEngine {
    /// A fresh engine starts as an empty guest cart
    pub fn new(
        api: Arc<ApiClient>,
        storage: Arc<dyn KeyValueStorage>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            storage,
            notifier,
            mode: CartMode::Guest,
            cart: Cart::default(),
            local_seq: 0,
        }
    }

    pub fn mode(&self) -> CartMode {
        self.mode
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn count(&self) -> u32 {
        self.cart.cantidad
    }

    pub fn total(&self) -> f64 {
        self.cart.total
    }

    /// Load the cart for the current mode.
    ///
    /// Guest: the persisted local cart, or empty when absent or corrupt.
    /// Authenticated: the canonical server cart; on fetch failure the cart
    /// falls back to empty (never stale local data) and the failure has
    /// already been surfaced as a notification by the API client.
    pub async fn load(&mut self) {
        match self.mode {
            CartMode::Guest => {
                self.cart = storage::read_json(self.storage.as_ref(), CART_STORAGE_KEY)
                    .unwrap_or_default();
                self.cart.recalculate();
            }
            CartMode::Authenticated => match self.api.fetch_cart().await {
                Ok(server) => self.cart = Cart::from(server),
                Err(err) => {
                    log::warn!("cart fetch failed, showing an empty cart: {}", err);
                    self.cart = Cart::default();
                }
            },
        }
    }

    /// Add `cantidad` units of a product (with its size, when the product
    /// is sold by size) to the cart. An existing `(producto_id, talla)`
    /// line grows instead of duplicating; a known-stock shortfall rejects
    /// the whole mutation with the exact shortfall.
    pub async fn add(
        &mut self,
        producto_id: i64,
        talla: Option<String>,
        cantidad: u32,
    ) -> Result<(), Error> {
        if cantidad == 0 {
            return Err(Error::validation("La cantidad debe ser al menos 1"));
        }

        let product = self.api.fetch_product(producto_id).await?;
        if product.has_sizes() {
            let talla = talla
                .as_deref()
                .ok_or_else(|| Error::validation("Selecciona una talla"))?;
            if !product.tallas.iter().any(|v| v.talla == talla) {
                return Err(Error::validation(format!(
                    "La talla {} no está disponible",
                    talla
                )));
            }
        }

        let stock = product.stock_for(talla.as_deref());
        let already_in_cart = self
            .cart
            .items
            .iter()
            .find(|i| i.matches(producto_id, talla.as_deref()))
            .map(|i| i.cantidad)
            .unwrap_or(0);
        let requested = already_in_cart + cantidad;
        if let Some(available) = stock {
            if i64::from(requested) > available {
                return Err(Error::InsufficientStock { requested, available });
            }
        }

        match self.mode {
            CartMode::Authenticated => {
                let req = AddItemRequest { producto_id, cantidad, talla };
                self.api.add_cart_item(&req).await?;
                self.load().await;
                Ok(())
            }
            CartMode::Guest => {
                let precio = product.effective_price();
                match self.cart.find_variant_mut(producto_id, talla.as_deref()) {
                    Some(item) => {
                        item.cantidad = requested;
                        // Re-adding refreshes the price and stock snapshots.
                        item.precio_unitario = precio;
                        item.stock_disponible = stock;
                    }
                    None => {
                        let id = self.next_local_id();
                        self.cart.items.push(CartItem {
                            id,
                            producto_id,
                            nombre: product.nombre.clone(),
                            talla,
                            cantidad,
                            precio_unitario: precio,
                            stock_disponible: stock,
                        });
                    }
                }
                self.cart.recalculate();
                self.persist();
                Ok(())
            }
        }
    }

    /// Set an item's quantity. Zero removes the item; a known-stock
    /// shortfall rejects without touching the item.
    pub async fn update_quantity(&mut self, item_id: &str, cantidad: u32) -> Result<(), Error> {
        if cantidad == 0 {
            return self.remove(item_id).await;
        }

        let item = self
            .cart
            .find(item_id)
            .ok_or_else(|| Error::ItemNotFound(item_id.to_string()))?;
        if let Some(available) = item.stock_disponible {
            if i64::from(cantidad) > available {
                return Err(Error::InsufficientStock { requested: cantidad, available });
            }
        }

        match self.mode {
            CartMode::Authenticated => {
                self.api.update_cart_item(item_id, cantidad).await?;
                self.load().await;
                Ok(())
            }
            CartMode::Guest => {
                if let Some(item) = self.cart.find_mut(item_id) {
                    item.cantidad = cantidad;
                }
                self.cart.recalculate();
                self.persist();
                Ok(())
            }
        }
    }

    /// Remove an item from the cart
    pub async fn remove(&mut self, item_id: &str) -> Result<(), Error> {
        match self.mode {
            CartMode::Authenticated => {
                self.api.remove_cart_item(item_id).await?;
                self.load().await;
                Ok(())
            }
            CartMode::Guest => {
                let before = self.cart.items.len();
                self.cart.items.retain(|i| i.id != item_id);
                if self.cart.items.len() == before {
                    return Err(Error::ItemNotFound(item_id.to_string()));
                }
                self.cart.recalculate();
                self.persist();
                Ok(())
            }
        }
    }

    /// Empty the cart
    pub async fn clear(&mut self) -> Result<(), Error> {
        match self.mode {
            CartMode::Authenticated => {
                self.api.clear_cart().await?;
                self.load().await;
                Ok(())
            }
            CartMode::Guest => {
                self.cart = Cart::default();
                self.persist();
                Ok(())
            }
        }
    }

    /// Logout tears the cart down to an empty guest cart and clears its
    /// storage; the authenticated cart stays durable server-side for the
    /// next login.
    pub fn on_logout(&mut self) {
        self.mode = CartMode::Guest;
        self.cart = Cart::default();
        self.storage.remove(CART_STORAGE_KEY);
    }

    /// Switch to authenticated mode without a migration pass. Used when an
    /// existing session is restored at startup; migration only runs on an
    /// actual login event.
    pub(crate) fn enter_authenticated(&mut self) {
        self.mode = CartMode::Authenticated;
    }

    fn persist(&self) {
        storage::write_json(self.storage.as_ref(), CART_STORAGE_KEY, &self.cart);
    }

    fn next_local_id(&mut self) -> String {
        self.local_seq += 1;
        format!("local-{}-{}", Utc::now().timestamp_millis(), self.local_seq)
    }
}

//! Guest-to-server cart migration, run once per login event.
//!
//! The pass is an all-or-nothing attempt, not a transaction: each item is
//! sent as its own add request, requests that fail do not roll back the
//! ones that succeeded, and the user is told explicitly when the transfer
//! was only partial. Quantities are deliberately not re-validated against
//! live stock here; the server rejects the individual items that no longer
//! fit, which is exactly the signal the partial outcome reports.

use crate::api::types::AddItemRequest;
use crate::notify::Notifier;
use crate::storage::CART_STORAGE_KEY;

use super::{CartEngine, CartMode};

/// One guest item that did not make it into the server cart
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationFailure {
    pub producto_id: i64,
    pub talla: Option<String>,
    pub cantidad: u32,
    pub reason: String,
}

/// Result of the migration pass
#[derive(Debug, Clone, PartialEq)]
pub enum MigrationOutcome {
    /// The guest cart was empty; no add requests were issued
    Skipped,
    /// Every item transferred
    Complete { migrated: usize },
    /// Some items transferred, some did not. Never conflated with success
    /// or total failure.
    Partial {
        migrated: usize,
        failed: Vec<MigrationFailure>,
    },
}

impl CartEngine {
    /// Consume the login-success signal: move the engine to authenticated
    /// mode and reconcile any pre-login guest items into the server cart.
    pub async fn on_login(&mut self) -> MigrationOutcome {
        let snapshot = match self.mode() {
            CartMode::Guest => self.cart().items.clone(),
            // Already authenticated (re-login): nothing local to migrate.
            CartMode::Authenticated => Vec::new(),
        };
        self.enter_authenticated();

        if snapshot.is_empty() {
            self.storage.remove(CART_STORAGE_KEY);
            self.load().await;
            return MigrationOutcome::Skipped;
        }

        let mut failed = Vec::new();
        for item in &snapshot {
            let req = AddItemRequest {
                producto_id: item.producto_id,
                cantidad: item.cantidad,
                talla: item.talla.clone(),
            };
            // Each request stands alone: a failure is recorded and the rest
            // of the snapshot still gets its chance.
            if let Err(err) = self.api.add_cart_item(&req).await {
                log::warn!(
                    "cart migration: producto {} (talla {:?}) not transferred: {}",
                    item.producto_id,
                    item.talla,
                    err
                );
                failed.push(MigrationFailure {
                    producto_id: item.producto_id,
                    talla: item.talla.clone(),
                    cantidad: item.cantidad,
                    reason: err.user_message(),
                });
            }
        }

        // The guest copy is finished either way; what transferred lives on
        // the server and what failed is reported, not retried from storage.
        self.storage.remove(CART_STORAGE_KEY);
        self.load().await;

        let migrated = snapshot.len() - failed.len();
        if failed.is_empty() {
            self.notifier
                .success("Tu carrito se transfirió a tu cuenta.");
            MigrationOutcome::Complete { migrated }
        } else {
            self.notifier.warning(&format!(
                "{} de {} artículos no se pudieron transferir a tu cuenta.",
                failed.len(),
                snapshot.len()
            ));
            MigrationOutcome::Partial { migrated, failed }
        }
    }
}

impl MigrationOutcome {
    /// Whether every pre-login item is now in the server cart
    pub fn is_complete(&self) -> bool {
        matches!(
            self,
            MigrationOutcome::Skipped | MigrationOutcome::Complete { .. }
        )
    }
}

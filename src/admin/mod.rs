//! Admin CRUD client for products, categories and users.
//!
//! A thin, role-guarded layer over [`ApiClient`]; it has no relationship
//! with the cart engine. Every method checks the session's admin flag
//! locally before issuing a request, so a non-admin caller fails fast and
//! the server check stays the authority.

use std::sync::Arc;

use serde_json::Value;

use crate::api::types::{Category, NewProduct, Product};
use crate::api::ApiClient;
use crate::auth::{AuthState, User};
use crate::error::Error;

/// Admin panel API
pub struct AdminPanel {
    api: Arc<ApiClient>,
    auth: Arc<AuthState>,
}

impl AdminPanel {
    pub(crate) fn new(api: Arc<ApiClient>, auth: Arc<AuthState>) -> Self {
        Self { api, auth }
    }

    fn require_admin(&self) -> Result<(), Error> {
        match self.auth.current_user() {
            None => Err(Error::NotAuthenticated),
            Some(user) if !user.es_admin => Err(Error::Forbidden),
            Some(_) => Ok(()),
        }
    }

    // --- Products ---

    pub async fn list_products(&self) -> Result<Vec<Product>, Error> {
        self.require_admin()?;
        self.api.fetch_products().await
    }

    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, Error> {
        self.require_admin()?;
        self.api.create_product(product).await
    }

    /// Partial update; `attributes` carries only the fields to change,
    /// e.g. `json!({ "precio_promocional": 99000 })`
    pub async fn update_product(&self, id: i64, attributes: Value) -> Result<Product, Error> {
        self.require_admin()?;
        self.api.update_product(id, attributes).await
    }

    pub async fn delete_product(&self, id: i64) -> Result<(), Error> {
        self.require_admin()?;
        self.api.delete_product(id).await
    }

    // --- Categories ---

    pub async fn list_categories(&self) -> Result<Vec<Category>, Error> {
        self.require_admin()?;
        self.api.fetch_categories().await
    }

    pub async fn create_category(&self, nombre: &str) -> Result<Category, Error> {
        self.require_admin()?;
        self.api.create_category(nombre).await
    }

    pub async fn delete_category(&self, id: i64) -> Result<(), Error> {
        self.require_admin()?;
        self.api.delete_category(id).await
    }

    // --- Users ---

    pub async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.require_admin()?;
        self.api.list_users().await
    }

    /// Partial update, e.g. `json!({ "es_admin": true })`
    pub async fn update_user(&self, id: i64, attributes: Value) -> Result<User, Error> {
        self.require_admin()?;
        self.api.update_user(id, attributes).await
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), Error> {
        self.require_admin()?;
        self.api.delete_user(id).await
    }
}

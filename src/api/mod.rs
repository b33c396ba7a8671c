//! Typed client for the Leopardo JSON API.
//!
//! Every endpoint of the backend contract lives here; callers never build
//! requests themselves. Failures are normalized into [`Error`] and reported
//! once through the [`Notifier`], and a 401 on any session-bearing endpoint
//! runs the registered forced-logout hook.

pub mod types;

pub use types::{
    AddItemRequest, Category, NewProduct, Product, ServerCart, ServerCartItem,
    UpdateQuantityRequest,
};

use std::sync::{Arc, RwLock};

use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::types::{AuthUserResponse, Credentials, RegisterRequest, User};
use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::{Fetch, FetchBuilder};
use crate::notify::Notifier;

type UnauthorizedHook = Box<dyn Fn() + Send + Sync>;

/// Client for the Leopardo storefront API
pub struct ApiClient {
    base_url: Url,
    http: Client,
    notifier: Arc<dyn Notifier>,
    on_unauthorized: RwLock<Option<UnauthorizedHook>>,
}

impl ApiClient {
    /// Create a new API client. The backend authenticates with a session
    /// cookie, so the underlying HTTP client carries a cookie store; the
    /// request timeout comes from the options (30 s by default).
    pub fn new(
        base_url: &str,
        options: &ClientOptions,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)?;
        let mut builder = Client::builder().cookie_store(true);
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            base_url,
            http,
            notifier,
            on_unauthorized: RwLock::new(None),
        })
    }

    /// Register the hook run when any session-bearing request comes back
    /// 401. Auth state installs its forced-logout here.
    pub fn set_unauthorized_hook(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.on_unauthorized.write().unwrap() = Some(Box::new(hook));
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    /// Normalize and report a failed request: run the forced-logout hook on
    /// 401, then notify the user once with the mapped message.
    fn report(&self, err: &Error) {
        if err.is_unauthorized() {
            if let Some(hook) = self.on_unauthorized.read().unwrap().as_ref() {
                hook();
            }
        }
        self.notifier.error(&err.user_message());
    }

    async fn dispatch<T: DeserializeOwned>(&self, builder: FetchBuilder<'_>) -> Result<T, Error> {
        match builder.execute::<T>().await {
            Ok(value) => Ok(value),
            Err(err) => {
                self.report(&err);
                Err(err)
            }
        }
    }

    async fn dispatch_empty(&self, builder: FetchBuilder<'_>) -> Result<(), Error> {
        match builder.execute_empty().await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.report(&err);
                Err(err)
            }
        }
    }

    // --- Cart ---

    /// `GET /carrito`: the canonical authenticated cart
    pub async fn fetch_cart(&self) -> Result<ServerCart, Error> {
        self.dispatch(Fetch::get(&self.http, &self.endpoint("/carrito")))
            .await
    }

    /// `POST /carrito`: add an item to the authenticated cart
    pub async fn add_cart_item(&self, req: &AddItemRequest) -> Result<ServerCartItem, Error> {
        let builder = Fetch::post(&self.http, &self.endpoint("/carrito")).json(req)?;
        self.dispatch(builder).await
    }

    /// `PUT /carrito/{itemId}`: set an item's quantity
    pub async fn update_cart_item(
        &self,
        item_id: &str,
        cantidad: u32,
    ) -> Result<ServerCartItem, Error> {
        let url = self.endpoint(&format!("/carrito/{}", item_id));
        let builder =
            Fetch::put(&self.http, &url).json(&UpdateQuantityRequest { cantidad })?;
        self.dispatch(builder).await
    }

    /// `DELETE /carrito/{itemId}`: remove one item
    pub async fn remove_cart_item(&self, item_id: &str) -> Result<(), Error> {
        let url = self.endpoint(&format!("/carrito/{}", item_id));
        self.dispatch_empty(Fetch::delete(&self.http, &url)).await
    }

    /// `DELETE /carrito`: empty the authenticated cart
    pub async fn clear_cart(&self) -> Result<(), Error> {
        self.dispatch_empty(Fetch::delete(&self.http, &self.endpoint("/carrito")))
            .await
    }

    // --- Catalog ---

    /// `GET /productos/{id}`
    pub async fn fetch_product(&self, id: i64) -> Result<Product, Error> {
        let url = self.endpoint(&format!("/productos/{}", id));
        self.dispatch(Fetch::get(&self.http, &url)).await
    }

    /// `GET /productos`
    pub async fn fetch_products(&self) -> Result<Vec<Product>, Error> {
        self.dispatch(Fetch::get(&self.http, &self.endpoint("/productos")))
            .await
    }

    /// `GET /categorias`
    pub async fn fetch_categories(&self) -> Result<Vec<Category>, Error> {
        self.dispatch(Fetch::get(&self.http, &self.endpoint("/categorias")))
            .await
    }

    // --- Auth ---

    /// `GET /auth/check`: who the session cookie belongs to, if anyone.
    /// A 401 here just means "no session", so it neither notifies nor runs
    /// the forced-logout hook.
    pub async fn check_auth(&self) -> Result<Option<User>, Error> {
        let builder = Fetch::get(&self.http, &self.endpoint("/auth/check"));
        match builder.execute::<AuthUserResponse>().await {
            Ok(resp) => Ok(Some(resp.user)),
            Err(Error::Api { status: 401, .. }) => Ok(None),
            Err(err) => {
                self.notifier.error(&err.user_message());
                Err(err)
            }
        }
    }

    /// `POST /auth/login`. A 401 here means bad credentials, not an expired
    /// session, so it gets its own message and bypasses the hook.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, Error> {
        let builder =
            Fetch::post(&self.http, &self.endpoint("/auth/login")).json(credentials)?;
        match builder.execute::<AuthUserResponse>().await {
            Ok(resp) => Ok(resp.user),
            Err(Error::Api { status: 401, .. }) => {
                let err = Error::api(401, "Correo o contraseña incorrectos");
                self.notifier.error("Correo o contraseña incorrectos");
                Err(err)
            }
            Err(err) => {
                self.report(&err);
                Err(err)
            }
        }
    }

    /// `POST /auth/register`
    pub async fn register(&self, req: &RegisterRequest) -> Result<User, Error> {
        let builder = Fetch::post(&self.http, &self.endpoint("/auth/register")).json(req)?;
        let resp: AuthUserResponse = self.dispatch(builder).await?;
        Ok(resp.user)
    }

    /// `POST /auth/logout`
    pub async fn logout(&self) -> Result<(), Error> {
        self.dispatch_empty(Fetch::post(&self.http, &self.endpoint("/auth/logout")))
            .await
    }

    // --- Admin ---

    /// `POST /productos` (admin)
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, Error> {
        let builder = Fetch::post(&self.http, &self.endpoint("/productos")).json(product)?;
        self.dispatch(builder).await
    }

    /// `PUT /productos/{id}` (admin), partial attribute update
    pub async fn update_product(
        &self,
        id: i64,
        attributes: serde_json::Value,
    ) -> Result<Product, Error> {
        let url = self.endpoint(&format!("/productos/{}", id));
        let builder = Fetch::put(&self.http, &url).json(&attributes)?;
        self.dispatch(builder).await
    }

    /// `DELETE /productos/{id}` (admin)
    pub async fn delete_product(&self, id: i64) -> Result<(), Error> {
        let url = self.endpoint(&format!("/productos/{}", id));
        self.dispatch_empty(Fetch::delete(&self.http, &url)).await
    }

    /// `POST /categorias` (admin)
    pub async fn create_category(&self, nombre: &str) -> Result<Category, Error> {
        let builder = Fetch::post(&self.http, &self.endpoint("/categorias"))
            .json(&serde_json::json!({ "nombre": nombre }))?;
        self.dispatch(builder).await
    }

    /// `DELETE /categorias/{id}` (admin)
    pub async fn delete_category(&self, id: i64) -> Result<(), Error> {
        let url = self.endpoint(&format!("/categorias/{}", id));
        self.dispatch_empty(Fetch::delete(&self.http, &url)).await
    }

    /// `GET /usuarios` (admin)
    pub async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.dispatch(Fetch::get(&self.http, &self.endpoint("/usuarios")))
            .await
    }

    /// `PUT /usuarios/{id}` (admin), partial attribute update
    pub async fn update_user(
        &self,
        id: i64,
        attributes: serde_json::Value,
    ) -> Result<User, Error> {
        let url = self.endpoint(&format!("/usuarios/{}", id));
        let builder = Fetch::put(&self.http, &url).json(&attributes)?;
        self.dispatch(builder).await
    }

    /// `DELETE /usuarios/{id}` (admin)
    pub async fn delete_user(&self, id: i64) -> Result<(), Error> {
        let url = self.endpoint(&format!("/usuarios/{}", id));
        self.dispatch_empty(Fetch::delete(&self.http, &url)).await
    }
}

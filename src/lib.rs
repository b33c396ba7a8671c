//! Leopardo storefront client engine
//!
//! A headless Rust client for the Leopardo shop API: catalog browsing,
//! the dual-mode (guest / authenticated) cart state machine with its
//! login migration protocol, session state, client-side page routing,
//! WhatsApp checkout and the admin CRUD panel.

pub mod admin;
pub mod api;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod fetch;
pub mod notify;
pub mod router;
pub mod storage;
pub mod util;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::admin::AdminPanel;
use crate::api::ApiClient;
use crate::auth::{AuthState, User};
use crate::cart::{CartEngine, MigrationOutcome};
use crate::checkout::{order_message, whatsapp_link, CheckoutInfo};
use crate::config::ClientOptions;
use crate::error::Error;
use crate::notify::{LogNotifier, Notifier};
use crate::router::pages::{
    AdminPage, CartPage, HomePage, LoginPage, ProductDetailPage, ProductListPage,
};
use crate::router::Router;
use crate::storage::{KeyValueStorage, MemoryStorage};

/// The application context: one instance per session, owned by the router
/// and shared with every page. Replaces the global singletons of older
/// storefront clients with explicit references.
pub struct AppContext {
    pub api: Arc<ApiClient>,
    pub auth: Arc<AuthState>,
    /// The cart engine. All mutation goes through this lock, which is what
    /// serializes interleaved async operations in place of the browser's
    /// single-threaded event loop.
    pub cart: Mutex<CartEngine>,
    pub notifier: Arc<dyn Notifier>,
}

/// The main entry point for the Leopardo client
pub struct Leopardo {
    ctx: Arc<AppContext>,
    options: ClientOptions,
}

impl Leopardo {
    /// Create a client with default options, in-memory storage and
    /// log-backed notifications
    ///
    /// # Example
    ///
    /// ```no_run
    /// use leopardo_client::Leopardo;
    ///
    /// let shop = Leopardo::new("https://api.leopardo.co").unwrap();
    /// ```
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Self::with_options(
            base_url,
            ClientOptions::default(),
            Arc::new(MemoryStorage::new()),
            Arc::new(LogNotifier),
        )
    }

    /// Create a client with explicit options, storage backend and
    /// notification sink
    pub fn with_options(
        base_url: &str,
        options: ClientOptions,
        storage: Arc<dyn KeyValueStorage>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, Error> {
        let api = Arc::new(ApiClient::new(base_url, &options, notifier.clone())?);
        let auth = AuthState::new(api.clone(), storage.clone());
        let cart = Mutex::new(CartEngine::new(api.clone(), storage, notifier.clone()));

        let ctx = Arc::new(AppContext {
            api,
            auth,
            cart,
            notifier,
        });

        Ok(Self { ctx, options })
    }

    /// The shared application context
    pub fn context(&self) -> Arc<AppContext> {
        self.ctx.clone()
    }

    /// The session state
    pub fn auth(&self) -> Arc<AuthState> {
        self.ctx.auth.clone()
    }

    /// Restore state on startup: if a persisted session snapshot exists,
    /// verify it with the server and enter authenticated mode; then load
    /// whichever cart the mode calls for. A failed verification stays in
    /// guest mode rather than trusting stale local session data.
    pub async fn resume(&self) {
        let mut cart = self.ctx.cart.lock().await;
        if self.ctx.auth.is_authenticated() {
            match self.ctx.auth.check().await {
                Ok(Some(_)) => cart.enter_authenticated(),
                Ok(None) => {}
                Err(err) => log::warn!("session check failed, staying as guest: {}", err),
            }
        }
        cart.load().await;
    }

    /// Log in and run the guest-cart migration pass. The migration outcome
    /// is reported alongside the user so callers can distinguish a clean
    /// transfer from a partial one.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(User, MigrationOutcome), Error> {
        let user = self.ctx.auth.login(email, password).await?;
        let outcome = self.ctx.cart.lock().await.on_login().await;
        Ok((user, outcome))
    }

    /// Register a new account; the backend signs the user in, so the cart
    /// migrates exactly as on login
    pub async fn register(
        &self,
        nombre: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, MigrationOutcome), Error> {
        let user = self.ctx.auth.register(nombre, email, password).await?;
        let outcome = self.ctx.cart.lock().await.on_login().await;
        Ok((user, outcome))
    }

    /// Log out: best-effort server call, unconditional local teardown of
    /// both the session and the cart
    pub async fn logout(&self) {
        self.ctx.auth.logout().await;
        self.ctx.cart.lock().await.on_logout();
    }

    /// The admin CRUD panel
    pub fn admin(&self) -> AdminPanel {
        AdminPanel::new(self.ctx.api.clone(), self.ctx.auth.clone())
    }

    /// A router preloaded with the storefront's route table
    pub fn router(&self) -> Router {
        Router::new(self.ctx.clone())
            .route("/", Arc::new(HomePage))
            .route("/productos", Arc::new(ProductListPage))
            .route("/productos/:id", Arc::new(ProductDetailPage))
            .route("/carrito", Arc::new(CartPage))
            .route("/login", Arc::new(LoginPage))
            .route("/admin", Arc::new(AdminPage))
    }

    /// Build the WhatsApp checkout link for the current cart contents
    pub async fn whatsapp_checkout(&self, info: &CheckoutInfo) -> Result<String, Error> {
        let cart = self.ctx.cart.lock().await;
        let message = order_message(cart.cart(), info)?;
        Ok(whatsapp_link(&self.options.store_phone, &message))
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::cart::{Cart, CartItem, CartMode, MigrationOutcome};
    pub use crate::checkout::CheckoutInfo;
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::notify::{Level, Notifier};
    pub use crate::{AppContext, Leopardo};
}

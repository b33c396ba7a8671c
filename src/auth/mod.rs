//! Authenticated-session state.
//!
//! Holds the current user (or none), persists a snapshot under
//! `leopardo_user` so a reload keeps the session, and installs the
//! forced-logout hook the API client runs on any 401.

pub mod types;

pub use types::{Credentials, RegisterRequest, User};

use std::sync::{Arc, RwLock};

use crate::api::ApiClient;
use crate::error::Error;
use crate::storage::{self, KeyValueStorage, USER_STORAGE_KEY};

/// Client-side session state
pub struct AuthState {
    api: Arc<ApiClient>,
    storage: Arc<dyn KeyValueStorage>,
    session: Arc<RwLock<Option<User>>>,
}

impl AuthState {
    /// Restore the persisted session snapshot (a corrupt snapshot reads as
    /// signed-out) and wire the 401 forced-logout hook into the API client.
    pub fn new(api: Arc<ApiClient>, storage: Arc<dyn KeyValueStorage>) -> Arc<Self> {
        let restored = storage::read_json::<User>(storage.as_ref(), USER_STORAGE_KEY);
        let session = Arc::new(RwLock::new(restored));

        let hook_session = session.clone();
        let hook_storage = storage.clone();
        api.set_unauthorized_hook(move || {
            log::warn!("session rejected by the server, signing out locally");
            *hook_session.write().unwrap() = None;
            hook_storage.remove(USER_STORAGE_KEY);
        });

        Arc::new(Self { api, storage, session })
    }

    /// Log in with email and password. On success the session snapshot is
    /// persisted; the `Ok(User)` return is the login-success signal the
    /// application context uses to run cart migration.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, Error> {
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let user = self.api.login(&credentials).await?;
        self.store(&user);
        Ok(user)
    }

    /// Register a new account. The backend signs the new user in, so the
    /// post-conditions match [`AuthState::login`].
    pub async fn register(
        &self,
        nombre: &str,
        email: &str,
        password: &str,
    ) -> Result<User, Error> {
        let req = RegisterRequest {
            nombre: nombre.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let user = self.api.register(&req).await?;
        self.store(&user);
        Ok(user)
    }

    /// Log out. The server call is best-effort: the local session and its
    /// snapshot are cleared unconditionally so the user can always leave
    /// the authenticated state.
    pub async fn logout(&self) {
        if let Err(err) = self.api.logout().await {
            log::warn!("server logout failed, clearing local session anyway: {}", err);
        }
        self.clear_local();
    }

    /// Ask the server who the session cookie belongs to and reconcile the
    /// local snapshot with the answer.
    pub async fn check(&self) -> Result<Option<User>, Error> {
        match self.api.check_auth().await? {
            Some(user) => {
                self.store(&user);
                Ok(Some(user))
            }
            None => {
                self.clear_local();
                Ok(None)
            }
        }
    }

    /// The current user, if a session exists
    pub fn current_user(&self) -> Option<User> {
        self.session.read().unwrap().clone()
    }

    /// Whether a session exists
    pub fn is_authenticated(&self) -> bool {
        self.session.read().unwrap().is_some()
    }

    fn store(&self, user: &User) {
        *self.session.write().unwrap() = Some(user.clone());
        storage::write_json(self.storage.as_ref(), USER_STORAGE_KEY, user);
    }

    fn clear_local(&self) {
        *self.session.write().unwrap() = None;
        self.storage.remove(USER_STORAGE_KEY);
    }
}

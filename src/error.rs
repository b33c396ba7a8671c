//! Error handling for the Leopardo client

use std::fmt;
use thiserror::Error;

/// Unified error type for the Leopardo client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Non-2xx response from the API, with the server's `{ "error": ... }`
    /// message when one was present
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Input rejected locally before any network call
    #[error("validation error: {0}")]
    Validation(String),

    /// A quantity-increasing mutation would exceed the known stock.
    /// Rejected, never clamped, so the caller can report the shortfall.
    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: i64 },

    /// The referenced cart item does not exist
    #[error("cart item not found: {0}")]
    ItemNotFound(String),

    /// The operation requires an authenticated session
    #[error("not authenticated")]
    NotAuthenticated,

    /// The session lacks the required role
    #[error("forbidden")]
    Forbidden,

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new validation error
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Error::Validation(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }

    /// Create a new API error from a status code and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Error::Api {
            status,
            message: message.into(),
        }
    }

    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether this error means the session is no longer valid (401)
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Map the error onto the user-facing notification text. Status codes
    /// get distinct templates; validation and stock errors carry their own
    /// wording.
    pub fn user_message(&self) -> String {
        match self {
            Error::Http(err) if err.is_timeout() => {
                "La solicitud tardó demasiado. Intenta de nuevo.".to_string()
            }
            Error::Http(_) => {
                "No se pudo conectar con el servidor. Revisa tu conexión.".to_string()
            }
            Error::Json(_) => "El servidor devolvió una respuesta inesperada.".to_string(),
            Error::Url(_) => "Dirección inválida.".to_string(),
            Error::Api { status, message } => match status {
                401 => "Tu sesión ha expirado. Inicia sesión de nuevo.".to_string(),
                403 => "No tienes permisos para realizar esta acción.".to_string(),
                404 => "El recurso solicitado no existe.".to_string(),
                // 422 carries the server's own validation detail.
                422 => message.clone(),
                429 => "Demasiadas solicitudes. Espera un momento e intenta de nuevo.".to_string(),
                500..=599 => "Error del servidor. Intenta más tarde.".to_string(),
                _ => message.clone(),
            },
            Error::Validation(msg) => msg.clone(),
            Error::InsufficientStock { requested, available } => format!(
                "Stock insuficiente: pediste {} y quedan {} disponibles.",
                requested, available
            ),
            Error::ItemNotFound(_) => "Ese artículo ya no está en el carrito.".to_string(),
            Error::NotAuthenticated => "Debes iniciar sesión para continuar.".to_string(),
            Error::Forbidden => "No tienes permisos para realizar esta acción.".to_string(),
            Error::General(msg) => msg.clone(),
        }
    }
}

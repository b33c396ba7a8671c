//! Configuration options for the Leopardo client

use std::time::Duration;

/// Configuration options for the Leopardo client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout applied to every API call
    pub request_timeout: Option<Duration>,

    /// The store's WhatsApp number for checkout links, digits only with
    /// country code
    pub store_phone: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            store_phone: "573001234567".to_string(),
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the store's WhatsApp number
    pub fn with_store_phone(mut self, value: &str) -> Self {
        self.store_phone = value.to_string();
        self
    }
}

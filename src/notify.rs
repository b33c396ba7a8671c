//! Non-blocking user notifications.
//!
//! Every user-facing failure or confirmation flows through the [`Notifier`]
//! seam: the API client reports normalized request errors here, the cart
//! engine reports migration outcomes, pages report what they need to. The
//! host UI decides how a notification is actually shown.

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

/// Sink for user-facing notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.notify(Level::Info, message);
    }

    fn success(&self, message: &str) {
        self.notify(Level::Success, message);
    }

    fn warning(&self, message: &str) {
        self.notify(Level::Warning, message);
    }

    fn error(&self, message: &str) {
        self.notify(Level::Error, message);
    }
}

/// Routes notifications to the `log` facade. The default sink for headless
/// and test runs.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, level: Level, message: &str) {
        match level {
            Level::Info | Level::Success => log::info!("{}", message),
            Level::Warning => log::warn!("{}", message),
            Level::Error => log::error!("{}", message),
        }
    }
}

/// Discards every notification
#[derive(Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _level: Level, _message: &str) {}
}

//! User-facing notifications queued by the controller.

use std::time::Instant;

use crate::error::SupportError;
use crate::lang;

/// Severity level for notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A notification waiting to be shown
#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    /// Translation key, or a server message shown verbatim
    pub key: String,
    /// Positional values for the translated message
    pub args: Vec<String>,
    pub timestamp: Instant,
}

impl Notification {
    pub fn new(level: NotificationLevel, key: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            level,
            key: key.into(),
            args,
            timestamp: Instant::now(),
        }
    }

    pub fn info(key: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, key, vec![])
    }

    pub fn success(key: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, key, vec![])
    }

    pub fn error(key: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, key, vec![])
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }

    /// The translated message
    pub fn message(&self) -> String {
        lang::translate_with(&self.key, &self.args)
    }
}

impl From<&SupportError> for Notification {
    fn from(error: &SupportError) -> Self {
        Notification::error(error.i18n_key()).with_args(error.i18n_args())
    }
}

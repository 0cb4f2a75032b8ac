//! # Status Line Model
//!
//! Encapsulates the state shown under the profile table: transient
//! notifications and the active profile.

use std::collections::VecDeque;

/// Severity of a transient notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl NotificationLevel {
    pub fn tag(&self) -> &'static str {
        match self {
            NotificationLevel::Success => "ok",
            NotificationLevel::Info => "info",
            NotificationLevel::Warning => "warn",
            NotificationLevel::Error => "error",
        }
    }
}

/// A one-shot message surfaced to the user after an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success<S: Into<String>>(message: S) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn info<S: Into<String>>(message: S) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning<S: Into<String>>(message: S) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error<S: Into<String>>(message: S) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Status line model containing all status bar display state
#[derive(Debug, Clone)]
pub struct StatusLine {
    /// Notifications not yet shown
    notifications: VecDeque<Notification>,

    /// Profile name and path
    profile_name: String,
    profile_path: String,
}

impl StatusLine {
    /// Create a new StatusLine with default values
    pub fn new() -> Self {
        Self {
            notifications: VecDeque::new(),
            profile_name: "default".to_string(),
            profile_path: crate::config::DEFAULT_PROFILE_PATH.to_string(),
        }
    }

    // === Notification Methods ===

    /// Queue a notification for the next render
    pub fn notify(&mut self, notification: Notification) {
        tracing::debug!(
            "Notification [{}]: {}",
            notification.level.tag(),
            notification.message
        );
        self.notifications.push_back(notification);
    }

    /// Peek at queued notifications without draining them
    pub fn notifications(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter()
    }

    /// Drain all queued notifications
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    // === Profile Methods ===

    /// Set profile information
    pub fn set_profile(&mut self, name: String, path: String) {
        self.profile_name = name;
        self.profile_path = path;
    }

    /// Get profile name
    pub fn profile_name(&self) -> &str {
        &self.profile_name
    }

    /// Get profile path
    pub fn profile_path(&self) -> &str {
        &self.profile_path
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new()
    }
}

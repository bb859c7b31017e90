//! User-visible notifications (toasts)

use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Anything that can show a notification to the user
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Toasts waiting to be drawn, each shown for `ttl`
#[derive(Debug)]
pub struct ToastQueue {
    ttl: Duration,
    toasts: Mutex<Vec<(Instant, Notification)>>,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(Duration::from_secs(4))
    }
}

impl ToastQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            toasts: Mutex::new(Vec::new()),
        }
    }

    /// Drop expired toasts and return the rest, oldest first
    pub fn visible(&self, now: Instant) -> Vec<Notification> {
        let Ok(mut toasts) = self.toasts.lock() else {
            return Vec::new();
        };
        toasts.retain(|(shown_at, _)| now.duration_since(*shown_at) < self.ttl);
        toasts.iter().map(|(_, n)| n.clone()).collect()
    }
}

impl NotificationSink for ToastQueue {
    fn notify(&self, notification: Notification) {
        if let Ok(mut toasts) = self.toasts.lock() {
            toasts.push((Instant::now(), notification));
        }
    }
}

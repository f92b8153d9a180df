//! Transient notices queued for whatever presentation layer is attached

use std::collections::VecDeque;
use std::fmt;

use log::{info, warn};

use crate::error::Error;
use crate::state::Shared;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A transient, user-facing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Queue of notices waiting to be shown. Clones share one queue.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    queue: Shared<VecDeque<Notice>>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, level: NoticeLevel, message: impl Into<String>) {
        let notice = Notice {
            level,
            message: message.into(),
        };
        self.queue.write(|queue| queue.push_back(notice));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message);
    }

    /// Log a failed call and queue its user-facing message
    pub fn report(&self, err: &Error) {
        if err.is_auth_failure() {
            info!("{err}");
        } else {
            warn!("{err}");
        }
        self.error(err.user_message());
    }

    /// Take every pending notice, oldest first
    pub fn drain(&self) -> Vec<Notice> {
        self.queue.write(|queue| queue.drain(..).collect())
    }

    pub fn len(&self) -> usize {
        self.queue.read(VecDeque::len)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.read(VecDeque::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_queue() {
        let notifications = Notifications::new();
        let other = notifications.clone();

        notifications.success("Added to cart");
        other.report(&Error::NotAuthenticated);

        assert_eq!(notifications.len(), 2);
        let drained = other.drain();
        assert_eq!(drained[0].level, NoticeLevel::Success);
        assert_eq!(drained[1].message, "Please sign in to continue.");
        assert!(notifications.is_empty());
    }
}

//! User-facing notification queue

use std::time::{Duration, Instant};

/// Default lifetime of a transient notification
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Dismissed automatically after the queue's TTL
    Transient,
    /// Stays until dismissed
    Blocking,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    pub raised_at: Instant,
}

/// Ordered queue of notifications, oldest first
#[derive(Debug, Clone)]
pub struct Notifications {
    items: Vec<Notification>,
    next_id: u64,
    ttl: Duration,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_TTL)
    }
}

impl Notifications {
    pub fn new(ttl: Duration) -> Self {
        Self {
            items: Vec::new(),
            next_id: 0,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn push_at(&mut self, kind: NotificationKind, message: impl Into<String>, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Notification {
            id,
            kind,
            message: message.into(),
            raised_at: now,
        });
        id
    }

    pub fn transient(&mut self, message: impl Into<String>) -> u64 {
        self.push_at(NotificationKind::Transient, message, Instant::now())
    }

    pub fn blocking(&mut self, message: impl Into<String>) -> u64 {
        self.push_at(NotificationKind::Blocking, message, Instant::now())
    }

    /// Drop transient notifications older than the TTL
    pub fn expire(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.items.retain(|item| {
            item.kind == NotificationKind::Blocking
                || now.saturating_duration_since(item.raised_at) < ttl
        });
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    /// Remove and return everything queued
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_blocking(&self) -> bool {
        self.items
            .iter()
            .any(|item| item.kind == NotificationKind::Blocking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_expires_blocking_stays() {
        let mut queue = Notifications::default();
        let start = Instant::now();
        queue.push_at(NotificationKind::Transient, "not found", start);
        queue.push_at(NotificationKind::Blocking, "save failed", start);

        queue.expire(start + Duration::from_secs(2));
        assert_eq!(queue.len(), 2);

        queue.expire(start + Duration::from_secs(3));
        assert_eq!(queue.len(), 1);
        assert!(queue.has_blocking());
    }

    #[test]
    fn test_dismiss() {
        let mut queue = Notifications::default();
        let id = queue.blocking("save failed");
        assert!(queue.dismiss(id));
        assert!(!queue.dismiss(id));
        assert!(queue.is_empty());
    }
}

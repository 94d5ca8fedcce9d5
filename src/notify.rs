//! User-facing notifications.
//!
//! The session core and the mutation paths raise fire-and-forget toasts;
//! the status bar shows the most recent one for a few seconds. `Notifier`
//! is the seam: production code hands out a `ToastQueue`, tests record
//! calls in memory.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// How long a toast stays visible in the status bar.
const TOAST_DURATION_SECS: u64 = 4;

/// Cap on queued toasts; beyond this the oldest are dropped.
const MAX_QUEUED_TOASTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Normal,
    Destructive,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub title: String,
    pub description: Option<String>,
    pub severity: Severity,
}

pub trait Notifier {
    fn notify(&self, title: &str, description: Option<&str>, severity: Severity);
}

#[derive(Debug)]
struct Toast {
    notification: Notification,
    raised_at: Instant,
}

/// Shared toast queue drained by the renderer.
/// Clones share the same queue.
#[derive(Clone, Default)]
pub struct ToastQueue {
    inner: Arc<Mutex<VecDeque<Toast>>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// The toast to display right now, if any. Expired entries are dropped.
    pub fn current(&self) -> Option<Notification> {
        let mut queue = match self.inner.lock() {
            Ok(queue) => queue,
            Err(_) => return None,
        };
        while let Some(front) = queue.front() {
            if front.raised_at.elapsed().as_secs() >= TOAST_DURATION_SECS {
                queue.pop_front();
            } else {
                return Some(front.notification.clone());
            }
        }
        None
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, title: &str, description: Option<&str>, severity: Severity) {
        let Ok(mut queue) = self.inner.lock() else {
            return;
        };
        if queue.len() >= MAX_QUEUED_TOASTS {
            queue.pop_front();
        }
        queue.push_back(Toast {
            notification: Notification {
                title: title.to_string(),
                description: description.map(str::to_string),
                severity,
            },
            raised_at: Instant::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_one_queue() {
        let queue = ToastQueue::new();
        let handle = queue.clone();
        handle.notify("Saved", None, Severity::Normal);

        let current = queue.current().expect("toast visible");
        assert_eq!(current.title, "Saved");
        assert_eq!(current.severity, Severity::Normal);
    }

    #[test]
    fn test_queue_is_bounded() {
        let queue = ToastQueue::new();
        for i in 0..20 {
            queue.notify(&format!("t{}", i), None, Severity::Normal);
        }
        let inner = queue.inner.lock().expect("lock");
        assert!(inner.len() <= MAX_QUEUED_TOASTS);
    }

    #[test]
    fn test_empty_queue_has_no_current() {
        let queue = ToastQueue::new();
        assert!(queue.current().is_none());
    }
}

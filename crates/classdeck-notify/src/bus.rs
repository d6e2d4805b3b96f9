//! Publish/subscribe channel for toasts.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use crate::toast::{Severity, Toast};

type Listener = Arc<dyn Fn(&Toast) + Send + Sync>;

#[derive(Default)]
struct BusInner {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(u64, Listener)>>,
}

impl BusInner {
    fn remove(&self, id: u64) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(listener_id, _)| *listener_id != id);
    }
}

/// Toast channel. Cloning shares the same subscriber list.
#[derive(Clone, Default)]
pub struct ToastBus {
    inner: Arc<BusInner>,
}

impl ToastBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` until the returned handle is dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Toast) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));
        Subscription {
            id,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver `toast` to every current subscriber.
    ///
    /// Subscribers are snapshotted first; one added or removed while the
    /// publish is running may or may not see it.
    pub fn publish_toast(&self, toast: &Toast) {
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        tracing::debug!(
            toast_id = %toast.id,
            severity = %toast.severity,
            subscribers = listeners.len(),
            "publishing toast"
        );
        for listener in listeners {
            listener(toast);
        }
    }

    /// Create a toast from `text` and publish it.
    pub fn publish(&self, text: impl Into<String>, severity: Severity) -> Toast {
        let toast = Toast::new(text, severity);
        self.publish_toast(&toast);
        toast
    }

    pub fn success(&self, text: impl Into<String>) -> Toast {
        self.publish(text, Severity::Success)
    }

    pub fn error(&self, text: impl Into<String>) -> Toast {
        self.publish(text, Severity::Error)
    }

    pub fn warning(&self, text: impl Into<String>) -> Toast {
        self.publish(text, Severity::Warning)
    }

    pub fn info(&self, text: impl Into<String>) -> Toast {
        self.publish(text, Severity::Info)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Scoped subscription. Unsubscribes on drop.
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    bus: Weak<BusInner>,
}

impl Subscription {
    /// Unsubscribe now rather than at end of scope.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.remove(self.id);
        }
    }
}

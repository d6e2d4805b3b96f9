//! Active toast set with per-toast expiry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use uuid::Uuid;

use crate::bus::{Subscription, ToastBus};
use crate::error::NotifyError;
use crate::toast::Toast;

/// How long a toast stays visible unless dismissed.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5);

struct TrayInner {
    ttl: Duration,
    runtime: Handle,
    active: Mutex<Vec<Toast>>,
    timers: Mutex<HashMap<Uuid, AbortHandle>>,
    removed: AtomicU64,
}

impl TrayInner {
    fn admit(self: &Arc<Self>, toast: Toast) {
        let id = toast.id;
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(toast);

        // Holding the timer map while spawning keeps a fast-firing timer from
        // running before its handle is recorded.
        let mut timers = self.timers.lock().unwrap_or_else(PoisonError::into_inner);
        let weak: Weak<Self> = Arc::downgrade(self);
        let ttl = self.ttl;
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Some(tray) = weak.upgrade() {
                tray.expire(id);
            }
        });
        timers.insert(id, handle.abort_handle());
    }

    fn expire(&self, id: Uuid) {
        self.timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        if self.remove_active(id) {
            tracing::debug!(toast_id = %id, "toast expired");
        }
    }

    /// Remove `id` from the active set. Returns whether it was still there.
    fn remove_active(&self, id: Uuid) -> bool {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        match active.iter().position(|t| t.id == id) {
            Some(pos) => {
                active.remove(pos);
                self.removed.fetch_add(1, Ordering::SeqCst);
                true
            }
            None => false,
        }
    }
}

/// Display-side subscriber holding the toasts currently on screen.
pub struct ToastTray {
    inner: Arc<TrayInner>,
    _subscription: Subscription,
}

impl ToastTray {
    /// Subscribe a new tray to `bus`. Must be called inside a Tokio runtime.
    pub fn attach(bus: &ToastBus, ttl: Duration) -> Result<Self, NotifyError> {
        let runtime = Handle::try_current().map_err(|_| NotifyError::NoRuntime)?;
        let inner = Arc::new(TrayInner {
            ttl,
            runtime,
            active: Mutex::new(Vec::new()),
            timers: Mutex::new(HashMap::new()),
            removed: AtomicU64::new(0),
        });

        let weak = Arc::downgrade(&inner);
        let subscription = bus.subscribe(move |toast| {
            if let Some(tray) = weak.upgrade() {
                tray.admit(toast.clone());
            }
        });

        Ok(Self {
            inner,
            _subscription: subscription,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    /// Toasts currently visible, oldest first.
    pub fn active(&self) -> Vec<Toast> {
        self.inner
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove a toast before it expires and cancel its timer.
    ///
    /// Returns `false` if the toast was already gone.
    pub fn dismiss(&self, id: Uuid) -> bool {
        if let Some(timer) = self
            .inner
            .timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
        {
            timer.abort();
        }
        self.inner.remove_active(id)
    }

    /// Total number of toasts removed so far, by expiry or dismissal.
    pub fn removed_count(&self) -> u64 {
        self.inner.removed.load(Ordering::SeqCst)
    }

    /// Expiry timers still pending.
    pub fn pending_timers(&self) -> usize {
        self.inner
            .timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Drop for ToastTray {
    fn drop(&mut self) {
        for (_, timer) in self
            .inner
            .timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain()
        {
            timer.abort();
        }
    }
}

//! Dashboard application state.

use classdeck_core::{Catalog, ClassdeckConfig, MatrixLayout, RoleMatrix};
use classdeck_notify::{Toast, ToastBus, ToastTray};
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use uuid::Uuid;

use crate::error::DashboardError;

/// Settings editable from the settings screen. Changes live in memory only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Platform name shown in the header.
    pub project: String,
    /// Rows per page on paginated screens.
    pub items_per_page: usize,
    /// Seconds a toast stays visible.
    pub toast_ttl_secs: u64,
}

impl Settings {
    pub fn from_config(config: &ClassdeckConfig) -> Self {
        Self {
            project: config.project.clone(),
            items_per_page: config.dashboard.items_per_page,
            toast_ttl_secs: config.toasts.ttl_secs,
        }
    }

    pub fn toast_ttl(&self) -> Duration {
        Duration::from_secs(self.toast_ttl_secs)
    }
}

/// Shared application state for the dashboard.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    settings: RwLock<Settings>,
    catalog: RwLock<Catalog>,
    /// Replaced wholesale on every edit; readers keep the version they saw.
    roles: RwLock<RoleMatrix>,
    layout: MatrixLayout,
    bus: ToastBus,
    tray: RwLock<ToastTray>,
}

impl AppState {
    /// Create the state. Must be called inside a Tokio runtime because the
    /// toast tray schedules expiry timers on it.
    pub fn new(config: &ClassdeckConfig, catalog: Catalog) -> Result<Self, DashboardError> {
        let settings = Settings::from_config(config);
        let roles = catalog.role_matrix()?;
        let bus = ToastBus::new();
        let tray = ToastTray::attach(&bus, config.toasts.ttl())?;

        tracing::debug!(
            courses = catalog.courses.len(),
            roles = roles.len(),
            "dashboard state ready"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                settings: RwLock::new(settings),
                catalog: RwLock::new(catalog),
                roles: RwLock::new(roles),
                layout: MatrixLayout::default(),
                bus,
                tray: RwLock::new(tray),
            }),
        })
    }

    pub fn settings(&self) -> Settings {
        self.inner
            .settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the settings. A new toast duration applies to toasts
    /// published afterwards; toasts already on screen are cleared.
    pub fn update_settings(&self, settings: Settings) -> Result<(), DashboardError> {
        if settings.items_per_page == 0 || settings.toast_ttl_secs == 0 {
            return Err(DashboardError::InvalidRequest(
                "items per page and toast duration must be greater than zero".to_string(),
            ));
        }

        let mut current = self
            .inner
            .settings
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let mut tray = self.inner.tray.write().unwrap_or_else(PoisonError::into_inner);
        if tray.ttl() != settings.toast_ttl() {
            *tray = ToastTray::attach(&self.inner.bus, settings.toast_ttl())?;
        }
        *current = settings;
        Ok(())
    }

    /// Rows per page on paginated screens.
    pub fn items_per_page(&self) -> usize {
        self.inner
            .settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .items_per_page
    }

    pub fn catalog(&self) -> RwLockReadGuard<'_, Catalog> {
        self.inner.catalog.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn catalog_mut(&self) -> RwLockWriteGuard<'_, Catalog> {
        self.inner.catalog.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current role matrix. Cheap: roles are shared, not copied.
    pub fn roles(&self) -> RoleMatrix {
        self.inner
            .roles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Apply one permission edit.
    ///
    /// Edits are serialized by the write lock, so concurrent toggles never
    /// lose each other. Returns `false` when the role or the permission does
    /// not exist.
    pub fn set_permission(&self, role_id: &str, resource: &str, action: &str, value: bool) -> bool {
        let mut roles = self.inner.roles.write().unwrap_or_else(PoisonError::into_inner);
        let known = roles
            .get(role_id)
            .is_some_and(|role| role.permissions.get(resource, action).is_some());
        if known {
            *roles = roles.set_permission(role_id, resource, action, value);
        }
        known
    }

    pub fn layout(&self) -> &MatrixLayout {
        &self.inner.layout
    }

    /// The channel screens publish toasts on.
    pub fn toasts(&self) -> &ToastBus {
        &self.inner.bus
    }

    /// Toasts currently on screen, oldest first.
    pub fn active_toasts(&self) -> Vec<Toast> {
        self.inner
            .tray
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .active()
    }

    pub fn dismiss_toast(&self, id: Uuid) -> bool {
        self.inner
            .tray
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .dismiss(id)
    }
}

//! Dashboard configuration.
//!
//! This module defines configuration for the admin dashboard web UI.

use serde::{Deserialize, Serialize};

/// Configuration for the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Host to bind the dashboard to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Rows per page on paginated screens.
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            items_per_page: default_items_per_page(),
        }
    }
}

impl DashboardConfig {
    /// `host:port` string for binding the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_items_per_page() -> usize {
    10
}

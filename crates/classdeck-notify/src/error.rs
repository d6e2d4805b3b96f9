//! Error types for the notify crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    /// Expiry timers need a Tokio runtime to run on.
    #[error("toast tray must be created inside a tokio runtime")]
    NoRuntime,
}

//! # classdeck-notify
//!
//! Transient status messages ("Course deleted successfully") for the
//! dashboard.
//!
//! A [`ToastBus`] is an explicit publish/subscribe channel owned by whoever
//! creates it. Subscribing returns a [`Subscription`] that unsubscribes when
//! dropped. A [`ToastTray`] is the display-side subscriber: it keeps the
//! active set and expires each toast after a fixed duration unless it is
//! dismissed first.

pub mod bus;
pub mod error;
pub mod toast;
pub mod tray;

pub use bus::{Subscription, ToastBus};
pub use error::NotifyError;
pub use toast::{Severity, Toast};
pub use tray::{DEFAULT_TTL, ToastTray};

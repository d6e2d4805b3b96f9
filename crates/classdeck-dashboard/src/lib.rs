//! # classdeck-dashboard
//!
//! Admin web dashboard for the Classdeck learning platform.
//!
//! This crate provides an embedded web UI for:
//! - Dashboard overview (KPIs, recent activity, charts)
//! - Courses, lessons and tasks (search, filters, sorting, paging, deletion,
//!   lesson reordering)
//! - Users (search and filters)
//! - Roles (permissions matrix editing)
//! - Statistics and code review
//! - Settings
//!
//! ## Tech Stack
//!
//! - Embedded in single binary (no separate deploy)
//! - Axum for HTTP server
//! - Static assets bundled via `rust-embed`
//! - HTMX + Alpine.js for interactivity, Chart.js for charts
//! - Tailwind CSS for styling
//!
//! All edits are applied to in-memory state and reported through toasts.

pub mod api_types;
pub mod assets;
pub mod charts;
pub mod error;
pub mod handlers;
pub mod pages;
pub mod pages_extra;
pub mod routes;
pub mod server;
pub mod state;
pub mod tables;
pub mod templates;

pub use error::DashboardError;
pub use routes::create_router;
pub use server::DashboardServer;
pub use state::{AppState, Settings};

//! Classdeck core: configuration, domain records and the role permission
//! matrix.
//!
//! The dashboard and CLI crates build on the types here; nothing in this
//! crate performs I/O beyond reading YAML files.

pub mod catalog;
pub mod config;
pub mod models;
pub mod permissions;
pub mod seed;

pub use catalog::{Catalog, CatalogIssue, CourseDraft, CourseEditError};
pub use config::{ClassdeckConfig, ConfigError, DEFAULT_CONFIG_FILE};
pub use permissions::{
    ActionSet, MatrixCell, MatrixLayout, MatrixRow, MatrixSection, PermissionError,
    PermissionTree, Role, RoleMatrix, set_permission,
};

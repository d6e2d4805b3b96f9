//! # classdeck-grid
//!
//! Table plumbing shared by every Classdeck screen.
//!
//! - [`field`]: resolve nested field paths against a record
//! - [`pagination`]: page windows (numbers + ellipsis) and slice bounds
//! - [`table`]: column-driven rendering with row identity and click targets
//! - [`sort`]: ordering records by a sortable column
//!
//! Records are any `serde::Serialize` value. Field lookups run against the
//! record's JSON projection, so the table never assumes a fixed shape beyond
//! what its columns declare.

pub mod error;
pub mod field;
pub mod pagination;
pub mod sort;
pub mod table;

pub use error::GridError;
pub use field::{FieldPath, display_value, resolve};
pub use pagination::{PageState, PageToken, compute_slice, compute_window, page_of};
pub use sort::{SortDirection, SortSpec, sort_records};
pub use table::{
    Align, Cell, CellContent, Column, ColumnKey, HeaderCell, RenderedRow, RenderedTable, RowKey,
    Table, TableBody,
};

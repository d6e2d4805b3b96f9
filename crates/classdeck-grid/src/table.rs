//! Column-driven tables.
//!
//! A [`Table`] is a list of [`Column`] descriptors plus optional row identity
//! and click callbacks. [`Table::render`] turns a slice of records into a
//! [`RenderedTable`] that the HTML layer prints without further decisions.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

use crate::error::GridError;
use crate::field::{FieldPath, display_value, resolve};
use crate::sort::{SortSpec, sort_by_path};

type Renderer<T> = Box<dyn Fn(&T) -> CellContent + Send + Sync>;
type RowFn<T> = Box<dyn Fn(&T) -> String + Send + Sync>;

/// What a column reads from a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    /// A field path resolved against the record.
    Field(FieldPath),
    /// A key with no data behind it, such as an "actions" column.
    Synthetic(String),
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKey::Field(path) => write!(f, "{path}"),
            ColumnKey::Synthetic(key) => f.write_str(key),
        }
    }
}

/// Horizontal alignment of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Content of one cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CellContent {
    /// Plain text, escaped by whoever prints it.
    Text(String),
    /// Pre-built markup from a custom renderer, printed as is.
    Markup(String),
}

impl CellContent {
    pub fn text(value: impl Into<String>) -> Self {
        CellContent::Text(value.into())
    }

    pub fn markup(value: impl Into<String>) -> Self {
        CellContent::Markup(value.into())
    }
}

/// Declarative description of one table column.
pub struct Column<T> {
    key: ColumnKey,
    header: String,
    sortable: bool,
    renderer: Option<Renderer<T>>,
    align: Align,
    width: Option<String>,
}

impl<T> Column<T> {
    /// A column showing the field at `path` (dot-delimited).
    pub fn field(path: &str, header: impl Into<String>) -> Self {
        let path = FieldPath::parse(path).unwrap_or_else(|_| FieldPath::literal(path));
        Self::with_key(ColumnKey::Field(path), header)
    }

    /// A column with no data path. Renders empty unless given a renderer.
    pub fn synthetic(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self::with_key(ColumnKey::Synthetic(key.into()), header)
    }

    fn with_key(key: ColumnKey, header: impl Into<String>) -> Self {
        Self {
            key,
            header: header.into(),
            sortable: false,
            renderer: None,
            align: Align::Left,
            width: None,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Width hint, passed through to the presentation layer.
    pub fn width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }

    /// Render cells with `renderer`, which sees the whole record.
    pub fn render<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&T) -> CellContent + Send + Sync + 'static,
    {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn key(&self) -> &ColumnKey {
        &self.key
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    fn header_cell(&self) -> HeaderCell {
        HeaderCell {
            key: self.key.to_string(),
            label: self.header.clone(),
            sortable: self.sortable,
            align: self.align,
            width: self.width.clone(),
        }
    }

    fn cell(&self, record: &T, projected: &Value) -> Cell {
        let content = match (&self.renderer, &self.key) {
            (Some(render), _) => render(record),
            (None, ColumnKey::Field(path)) => CellContent::Text(display_value(resolve(projected, path))),
            (None, ColumnKey::Synthetic(_)) => CellContent::Text(String::new()),
        };
        Cell {
            column: self.key.to_string(),
            content,
            align: self.align,
            width: self.width.clone(),
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("sortable", &self.sortable)
            .field("custom_renderer", &self.renderer.is_some())
            .field("align", &self.align)
            .field("width", &self.width)
            .finish()
    }
}

impl<T> fmt::Debug for Table<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("columns", &self.columns)
            .field("empty_message", &self.empty_message)
            .field("row_id", &self.row_id.is_some())
            .field("on_row_click", &self.on_row_click.is_some())
            .finish()
    }
}

/// Stable identity of a rendered row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum RowKey {
    /// Identity taken from the record itself.
    Id(String),
    /// Position in the rendered slice. Only stable while the order is.
    Index(usize),
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Id(id) => f.write_str(id),
            RowKey::Index(i) => write!(f, "{i}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
    pub sortable: bool,
    pub align: Align,
    pub width: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub column: String,
    pub content: CellContent,
    pub align: Align,
    pub width: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedRow {
    pub key: RowKey,
    pub cells: Vec<Cell>,
    /// Click target produced by the table's row-click callback.
    pub link: Option<String>,
}

impl RenderedRow {
    /// Rows are interactive only when the table has a click callback.
    pub fn is_clickable(&self) -> bool {
        self.link.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TableBody {
    Rows { rows: Vec<RenderedRow> },
    /// A single row spanning every column, shown for an empty collection.
    Placeholder { message: String, colspan: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedTable {
    pub headers: Vec<HeaderCell>,
    pub body: TableBody,
}

impl RenderedTable {
    /// Number of body rows, the placeholder included.
    pub fn row_count(&self) -> usize {
        match &self.body {
            TableBody::Rows { rows } => rows.len(),
            TableBody::Placeholder { .. } => 1,
        }
    }
}

/// A column-driven table definition.
pub struct Table<T> {
    columns: Vec<Column<T>>,
    empty_message: String,
    row_id: Option<RowFn<T>>,
    on_row_click: Option<RowFn<T>>,
}

impl<T: Serialize> Table<T> {
    /// Build a table. Column keys must be unique.
    pub fn new(columns: Vec<Column<T>>) -> Result<Self, GridError> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.key.to_string()) {
                return Err(GridError::DuplicateColumn(column.key.to_string()));
            }
        }
        Ok(Self {
            columns,
            empty_message: "No data available".to_string(),
            row_id: None,
            on_row_click: None,
        })
    }

    /// Message shown in the placeholder row of an empty table.
    pub fn empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    /// Derive each row's identity from its record.
    pub fn row_id<F>(mut self, id: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.row_id = Some(Box::new(id));
        self
    }

    /// Make rows clickable. The callback receives the full record and returns
    /// the row's click target.
    pub fn on_row_click<F>(mut self, on_click: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.on_row_click = Some(Box::new(on_click));
        self
    }

    /// Look up a column by its rendered key.
    pub fn column(&self, key: &str) -> Option<&Column<T>> {
        self.columns.iter().find(|c| c.key.to_string() == key)
    }

    /// Invoke the row-click callback for `record`, if the table has one.
    pub fn click(&self, record: &T) -> Option<String> {
        self.on_row_click.as_ref().map(|on_click| on_click(record))
    }

    /// Sort `records` by a sortable column.
    ///
    /// Unknown keys, synthetic columns and columns not flagged sortable leave
    /// the order untouched.
    pub fn sort(&self, records: &mut Vec<T>, spec: &SortSpec) {
        let Some(column) = self.column(&spec.key) else {
            tracing::debug!(key = %spec.key, "ignoring sort on unknown column");
            return;
        };
        match (&column.key, column.sortable) {
            (ColumnKey::Field(path), true) => sort_by_path(records, path, spec.direction),
            _ => tracing::debug!(key = %spec.key, "ignoring sort on non-sortable column"),
        }
    }

    /// Render `records` into header and body rows.
    pub fn render(&self, records: &[T]) -> RenderedTable {
        let headers = self.columns.iter().map(Column::header_cell).collect();

        if records.is_empty() {
            return RenderedTable {
                headers,
                body: TableBody::Placeholder {
                    message: self.empty_message.clone(),
                    colspan: self.columns.len(),
                },
            };
        }

        let needs_projection = self.columns.iter().any(|c| c.renderer.is_none());
        let rows = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let projected = if needs_projection {
                    project(record)
                } else {
                    Value::Null
                };
                RenderedRow {
                    key: match &self.row_id {
                        Some(id) => RowKey::Id(id(record)),
                        None => RowKey::Index(index),
                    },
                    cells: self
                        .columns
                        .iter()
                        .map(|column| column.cell(record, &projected))
                        .collect(),
                    link: self.click(record),
                }
            })
            .collect();

        RenderedTable {
            headers,
            body: TableBody::Rows { rows },
        }
    }
}

/// JSON projection of a record used for field lookups.
pub(crate) fn project<T: Serialize>(record: &T) -> Value {
    serde_json::to_value(record).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "record could not be projected; rendering empty cells");
        Value::Null
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::SortDirection;
    use serde::Serialize;

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Title {
        en: String,
        ru: String,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Course {
        id: String,
        title: Title,
        status: String,
        students_count: u32,
        version: Option<String>,
    }

    fn course(id: &str, en: &str, students: u32) -> Course {
        Course {
            id: id.to_string(),
            title: Title {
                en: en.to_string(),
                ru: format!("ru:{en}"),
            },
            status: "active".to_string(),
            students_count: students,
            version: None,
        }
    }

    fn columns() -> Vec<Column<Course>> {
        vec![
            Column::field("title.en", "Course Title").sortable(),
            Column::field("status", "Status")
                .render(|c: &Course| CellContent::markup(format!("<b>{}</b>", c.status))),
            Column::field("studentsCount", "Students").sortable().align(Align::Right).width("w-24"),
            Column::field("version", "Version"),
            Column::synthetic("actions", "Actions").align(Align::Center),
        ]
    }

    fn text(row: &RenderedRow, i: usize) -> &str {
        match &row.cells[i].content {
            CellContent::Text(s) | CellContent::Markup(s) => s.as_str(),
        }
    }

    #[test]
    fn renders_resolved_and_custom_cells() {
        let table = Table::new(columns()).unwrap().row_id(|c: &Course| c.id.clone());
        let rendered = table.render(&[course("1", "HTML & CSS", 1543)]);

        assert_eq!(rendered.headers.len(), 5);
        assert_eq!(rendered.headers[0].key, "title.en");
        assert!(rendered.headers[0].sortable);
        assert_eq!(rendered.headers[2].width.as_deref(), Some("w-24"));

        let TableBody::Rows { rows } = &rendered.body else {
            panic!("expected rows");
        };
        let row = &rows[0];
        assert_eq!(row.key, RowKey::Id("1".to_string()));
        assert_eq!(text(row, 0), "HTML & CSS");
        assert_eq!(row.cells[1].content, CellContent::markup("<b>active</b>"));
        assert_eq!(text(row, 2), "1543");
        assert_eq!(row.cells[2].align, Align::Right);
        assert_eq!(text(row, 3), "", "null renders as empty string");
        assert_eq!(text(row, 4), "", "synthetic column without renderer");
    }

    #[test]
    fn renderer_sees_fields_beyond_its_key() {
        let table = Table::new(vec![Column::field("title", "Course").render(|c: &Course| {
            CellContent::text(format!("{} / {}", c.title.en, c.id))
        })])
        .unwrap();
        let rendered = table.render(&[course("7", "React", 1)]);
        let TableBody::Rows { rows } = rendered.body else {
            panic!("expected rows");
        };
        assert_eq!(rows[0].cells[0].content, CellContent::text("React / 7"));
    }

    #[test]
    fn empty_collection_renders_one_spanning_placeholder() {
        let table = Table::new(columns()).unwrap().empty_message("No courses found");
        let rendered = table.render(&[]);
        assert_eq!(rendered.row_count(), 1);
        assert_eq!(
            rendered.body,
            TableBody::Placeholder {
                message: "No courses found".to_string(),
                colspan: 5,
            }
        );
    }

    #[test]
    fn rows_fall_back_to_positional_keys_and_are_inert_without_callback() {
        let table = Table::new(columns()).unwrap();
        let rendered = table.render(&[course("a", "A", 1), course("b", "B", 2)]);
        let TableBody::Rows { rows } = rendered.body else {
            panic!("expected rows");
        };
        assert_eq!(rows[0].key, RowKey::Index(0));
        assert_eq!(rows[1].key, RowKey::Index(1));
        assert!(rows.iter().all(|r| !r.is_clickable()));
        assert_eq!(table.click(&course("a", "A", 1)), None);
    }

    #[test]
    fn click_callback_receives_the_full_record() {
        let table = Table::new(columns())
            .unwrap()
            .on_row_click(|c: &Course| format!("/lessons?course={}&students={}", c.id, c.students_count));
        let rendered = table.render(&[course("3", "React", 892)]);
        let TableBody::Rows { rows } = rendered.body else {
            panic!("expected rows");
        };
        assert!(rows[0].is_clickable());
        assert_eq!(rows[0].link.as_deref(), Some("/lessons?course=3&students=892"));
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let err = Table::new(vec![
            Column::<Course>::field("status", "Status"),
            Column::synthetic("status", "Again"),
        ])
        .unwrap_err();
        assert_eq!(err, GridError::DuplicateColumn("status".to_string()));
    }

    #[test]
    fn sorting_respects_the_sortable_flag() {
        let table = Table::new(columns()).unwrap();
        let mut records = vec![course("1", "b", 10), course("2", "A", 30), course("3", "c", 20)];

        table.sort(&mut records, &SortSpec::new("studentsCount", SortDirection::Desc));
        let ids: Vec<_> = records.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["2", "3", "1"]);

        table.sort(&mut records, &SortSpec::new("title.en", SortDirection::Asc));
        let ids: Vec<_> = records.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["2", "1", "3"]);

        // "version" is not sortable, "missing" is unknown
        table.sort(&mut records, &SortSpec::new("version", SortDirection::Desc));
        table.sort(&mut records, &SortSpec::new("missing", SortDirection::Desc));
        let ids: Vec<_> = records.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["2", "1", "3"]);
    }
}

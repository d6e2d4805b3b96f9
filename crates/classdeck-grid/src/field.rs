//! Field resolution.
//!
//! A [`FieldPath`] addresses a possibly nested field (`title.en`). Parsing a
//! string splits on `.`; a field whose real name contains a dot must be built
//! with [`FieldPath::literal`] instead.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::GridError;

/// Path to a (possibly nested) field of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Parse a dot-delimited path. Empty segments are dropped, so `"a..b"`
    /// addresses `a.b`.
    pub fn parse(path: &str) -> Result<Self, GridError> {
        let segments: Vec<String> = path
            .split('.')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if segments.is_empty() {
            return Err(GridError::EmptyPath);
        }
        Ok(Self { segments })
    }

    /// A single-segment path taken verbatim, dots included.
    pub fn literal(name: impl Into<String>) -> Self {
        Self {
            segments: vec![name.into()],
        }
    }

    /// The individual segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl FromStr for FieldPath {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// Walk `path` through `record`.
///
/// Returns `None` as soon as a segment is missing or an intermediate value is
/// not an object. Array elements can be addressed by numeric segments.
pub fn resolve<'a>(record: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    path.segments
        .iter()
        .try_fold(record, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

/// Stringify a resolved value for display.
///
/// Missing values and `null` become the empty string, arrays are joined with
/// commas and objects fall back to compact JSON.
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| display_value(Some(item)))
            .collect::<Vec<_>>()
            .join(","),
        Some(obj @ Value::Object(_)) => obj.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn course() -> Value {
        json!({
            "id": "1",
            "title": { "en": "HTML & CSS Fundamentals", "ru": "Основы HTML и CSS" },
            "technologies": ["HTML", "CSS"],
            "lessonsCount": 12,
            "archived": false,
            "reviewedAt": null,
        })
    }

    #[test]
    fn resolves_top_level_field() {
        let path = FieldPath::parse("lessonsCount").unwrap();
        assert_eq!(path.segments(), ["lessonsCount"]);
        assert_eq!(resolve(&course(), &path), Some(&json!(12)));
    }

    #[test]
    fn resolves_nested_path() {
        let path = FieldPath::parse("title.en").unwrap();
        assert_eq!(
            display_value(resolve(&course(), &path)),
            "HTML & CSS Fundamentals"
        );
    }

    #[test]
    fn missing_intermediate_yields_none() {
        let record = course();
        assert_eq!(resolve(&record, &"author.name".parse().unwrap()), None);
        assert_eq!(resolve(&record, &"id.value".parse().unwrap()), None);
        assert_eq!(display_value(resolve(&record, &"author.name".parse().unwrap())), "");
    }

    #[test]
    fn null_displays_as_empty() {
        let path = FieldPath::parse("reviewedAt").unwrap();
        assert_eq!(resolve(&course(), &path), Some(&Value::Null));
        assert_eq!(display_value(resolve(&course(), &path)), "");
    }

    #[test]
    fn arrays_join_with_commas_and_index_by_segment() {
        let record = course();
        assert_eq!(
            display_value(resolve(&record, &"technologies".parse().unwrap())),
            "HTML,CSS"
        );
        assert_eq!(
            display_value(resolve(&record, &"technologies.1".parse().unwrap())),
            "CSS"
        );
        assert_eq!(display_value(Some(&json!(false))), "false");
    }

    #[test]
    fn literal_path_keeps_dots() {
        let record = json!({ "version.major": 2, "version": { "major": 3 } });
        assert_eq!(
            resolve(&record, &FieldPath::literal("version.major")),
            Some(&json!(2))
        );
        assert_eq!(
            resolve(&record, &"version.major".parse().unwrap()),
            Some(&json!(3))
        );
    }

    #[test]
    fn empty_path_is_rejected() {
        assert_eq!(FieldPath::parse(""), Err(GridError::EmptyPath));
        assert_eq!(FieldPath::parse("..."), Err(GridError::EmptyPath));
    }

    #[test]
    fn reading_is_idempotent_across_noop_edit() {
        let path = FieldPath::parse("title.ru").unwrap();
        let before = display_value(resolve(&course(), &path));

        let mut edited = course();
        if let Some(Value::Object(map)) = edited.get_mut("title") {
            let same = map["ru"].clone();
            map.insert("ru".to_string(), same);
        }

        assert_eq!(display_value(resolve(&edited, &path)), before);
        assert_eq!(path.to_string(), "title.ru");
    }
}

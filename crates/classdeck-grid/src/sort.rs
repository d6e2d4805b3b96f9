//! Record ordering by resolved field values.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::field::{FieldPath, resolve};
use crate::table::project;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// The opposite direction, used for header toggles.
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction: {other}")),
        }
    }
}

/// Requested ordering: a column key and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: key.into(),
            direction,
        }
    }
}

/// Stable sort of `records` by the value at `path`.
///
/// Missing and `null` values go last in both directions.
pub fn sort_records<T: Serialize>(records: &mut Vec<T>, path: &str, direction: SortDirection) {
    let path = FieldPath::parse(path).unwrap_or_else(|_| FieldPath::literal(path));
    sort_by_path(records, &path, direction);
}

pub(crate) fn sort_by_path<T: Serialize>(records: &mut Vec<T>, path: &FieldPath, direction: SortDirection) {
    let mut keyed: Vec<(Option<Value>, T)> = records
        .drain(..)
        .map(|record| {
            let key = resolve(&project(&record), path)
                .filter(|v| !v.is_null())
                .cloned();
            (key, record)
        })
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => {
            let ord = compare_values(a, b);
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    records.extend(keyed.into_iter().map(|(_, record)| record));
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => {
            let (a, b) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Value::String(a), Value::String(b)) => a
            .to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => type_rank(a)
            .cmp(&type_rank(b))
            .then_with(|| a.to_string().cmp(&b.to_string())),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_compare_numerically() {
        let mut records = vec![json!({"n": 10}), json!({"n": 9}), json!({"n": 100})];
        sort_records(&mut records, "n", SortDirection::Asc);
        assert_eq!(records, vec![json!({"n": 9}), json!({"n": 10}), json!({"n": 100})]);
    }

    #[test]
    fn strings_ignore_case() {
        let mut records = vec![json!({"s": "beta"}), json!({"s": "Alpha"}), json!({"s": "gamma"})];
        sort_records(&mut records, "s", SortDirection::Desc);
        let values: Vec<_> = records.iter().map(|r| r["s"].as_str().unwrap_or_default()).collect();
        assert_eq!(values, ["gamma", "beta", "Alpha"]);
    }

    #[test]
    fn missing_values_go_last_in_both_directions() {
        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let mut records = vec![json!({"id": 1}), json!({"id": 2, "d": "2024-12-01"}), json!({"id": 3, "d": null})];
            sort_records(&mut records, "d", direction);
            assert_eq!(records[0]["id"], json!(2));
        }
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let mut records = vec![
            json!({"id": "a", "status": "active"}),
            json!({"id": "b", "status": "draft"}),
            json!({"id": "c", "status": "active"}),
        ];
        sort_records(&mut records, "status", SortDirection::Asc);
        let ids: Vec<_> = records.iter().map(|r| r["id"].as_str().unwrap_or_default()).collect();
        assert_eq!(ids, ["a", "c", "b"]);
    }

    #[test]
    fn direction_parses_and_toggles() {
        assert_eq!("DESC".parse::<SortDirection>(), Ok(SortDirection::Desc));
        assert!("sideways".parse::<SortDirection>().is_err());
        assert_eq!(SortDirection::Asc.toggled(), SortDirection::Desc);
        assert_eq!(SortDirection::Desc.to_string(), "desc");
    }
}

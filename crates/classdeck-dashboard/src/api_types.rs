//! Query, form and response types.

use classdeck_core::CourseDraft;
use classdeck_core::models::{CourseStatus, LocalizedText};
use classdeck_grid::{SortDirection, SortSpec};
use serde::{Deserialize, Serialize};

// =============================================================================
// Screen Queries
// =============================================================================

/// Query string shared by the list screens. Each screen reads the fields it
/// understands and ignores the rest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub status: Option<String>,
    pub role: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    pub page: Option<usize>,
    pub course: Option<String>,
    pub lesson: Option<String>,
    pub review: Option<String>,
    /// `new` or a course id: opens the course editor.
    pub edit: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ListQuery {
    /// Search text, trimmed; `None` when blank.
    pub fn search(&self) -> Option<&str> {
        non_empty(&self.q)
    }

    /// Status filter; `None` for blank or `all`.
    pub fn status(&self) -> Option<&str> {
        non_empty(&self.status).filter(|s| *s != "all")
    }

    /// Role filter; `None` for blank or `all`.
    pub fn role(&self) -> Option<&str> {
        non_empty(&self.role).filter(|r| *r != "all")
    }

    /// Requested sort. An unparseable direction falls back to ascending.
    pub fn sort_spec(&self) -> Option<SortSpec> {
        let key = non_empty(&self.sort)?;
        let direction = self
            .dir
            .as_deref()
            .and_then(|d| d.parse::<SortDirection>().ok())
            .unwrap_or_default();
        Some(SortSpec::new(key, direction))
    }

    /// Requested page, 1 when absent.
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1)
    }
}

/// Statistics filters. Shown on the page; the series are not filtered.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatisticsQuery {
    pub range: Option<String>,
    pub course: Option<String>,
}

// =============================================================================
// Forms
// =============================================================================

/// Checkbox toggle. An unchecked checkbox sends no value.
#[derive(Debug, Default, Deserialize)]
pub struct PermissionForm {
    pub value: Option<String>,
}

impl PermissionForm {
    pub fn granted(&self) -> bool {
        matches!(self.value.as_deref(), Some("on" | "true" | "1"))
    }
}

/// Course editor. Technologies arrive comma-separated.
#[derive(Debug, Deserialize)]
pub struct CourseForm {
    pub title_en: String,
    #[serde(default)]
    pub title_ru: String,
    pub slug: String,
    pub status: String,
    pub version: String,
    #[serde(default)]
    pub technologies: String,
}

impl CourseForm {
    /// `None` when the status is not a known course status.
    pub fn draft(&self) -> Option<CourseDraft> {
        Some(CourseDraft {
            title: LocalizedText::new(self.title_en.as_str(), self.title_ru.as_str()),
            slug: self.slug.clone(),
            status: CourseStatus::from_label(self.status.trim())?,
            version: self.version.clone(),
            technologies: self.technologies.split(',').map(str::to_string).collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ReorderForm {
    pub dragged: String,
    pub target: String,
}

#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    pub project: String,
    pub items_per_page: usize,
    pub toast_ttl_secs: u64,
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_all_filters_are_ignored() {
        let query = ListQuery {
            q: Some("   ".into()),
            status: Some("all".into()),
            role: Some(" teacher ".into()),
            ..Default::default()
        };
        assert_eq!(query.search(), None);
        assert_eq!(query.status(), None);
        assert_eq!(query.role(), Some("teacher"));
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn sort_spec_defaults_to_ascending() {
        let query = ListQuery {
            sort: Some("students_count".into()),
            dir: Some("sideways".into()),
            ..Default::default()
        };
        assert_eq!(
            query.sort_spec(),
            Some(SortSpec::new("students_count", SortDirection::Asc))
        );
        assert_eq!(ListQuery::default().sort_spec(), None);
    }

    #[test]
    fn course_form_splits_technologies() {
        let form = CourseForm {
            title_en: "Rust".into(),
            title_ru: String::new(),
            slug: "rust".into(),
            status: "active".into(),
            version: "1.0.0".into(),
            technologies: "Rust, Tokio".into(),
        };
        let draft = form.draft().unwrap();
        assert_eq!(draft.status, CourseStatus::Active);
        assert_eq!(draft.technologies, ["Rust", " Tokio"]);

        let unknown = CourseForm { status: "published".into(), ..form };
        assert!(unknown.draft().is_none());
    }

    #[test]
    fn checkbox_values() {
        assert!(PermissionForm { value: Some("on".into()) }.granted());
        assert!(!PermissionForm { value: None }.granted());
        assert!(!PermissionForm { value: Some("false".into()) }.granted());
    }
}

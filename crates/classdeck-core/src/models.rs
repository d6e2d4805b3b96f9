//! Domain records shown by the dashboard screens.
//!
//! Field names serialize in snake_case; table columns address them by the
//! same names (`students_count`, `title.en`).

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Generates `as_str`, `ALL` and `Display` for a fieldless enum whose serde
/// names match the given strings.
macro_rules! labelled_enum {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn from_label(label: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.as_str() == label)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Text in the platform's two content languages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub en: String,
    pub ru: String,
}

impl LocalizedText {
    pub fn new(en: impl Into<String>, ru: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ru: ru.into(),
        }
    }

    /// Case-insensitive substring match against either language.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.en.to_lowercase().contains(&needle) || self.ru.to_lowercase().contains(&needle)
    }
}

// =============================================================================
// Courses, lessons, tasks
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    Draft,
    Active,
    Inactive,
    Archived,
}

labelled_enum!(CourseStatus {
    Draft => "draft",
    Active => "active",
    Inactive => "inactive",
    Archived => "archived",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: LocalizedText,
    pub slug: String,
    pub status: CourseStatus,
    pub technologies: Vec<String>,
    pub lessons_count: u32,
    pub students_count: u32,
    pub created_at: NaiveDate,
    pub updated_at: NaiveDate,
    pub version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonStatus {
    Draft,
    Active,
    Inactive,
}

labelled_enum!(LessonStatus {
    Draft => "draft",
    Active => "active",
    Inactive => "inactive",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub course_id: String,
    pub title: LocalizedText,
    pub order: u32,
    pub status: LessonStatus,
    pub tasks_count: u32,
    /// Minutes.
    pub duration: u32,
    pub created_at: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Code,
    Quiz,
    Project,
}

labelled_enum!(TaskType {
    Code => "code",
    Quiz => "quiz",
    Project => "project",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidatorStatus {
    Configured,
    Error,
    NotConfigured,
}

labelled_enum!(ValidatorStatus {
    Configured => "configured",
    Error => "error",
    NotConfigured => "not-configured",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

labelled_enum!(Difficulty {
    Easy => "easy",
    Medium => "medium",
    Hard => "hard",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub lesson_id: String,
    pub title: LocalizedText,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub order: u32,
    pub status: LessonStatus,
    pub validator_status: ValidatorStatus,
    pub difficulty: Difficulty,
    pub created_at: NaiveDate,
}

// =============================================================================
// Users and activity
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Moderator,
    Teacher,
    Student,
    User,
    Guest,
}

labelled_enum!(UserRole {
    Admin => "admin",
    Moderator => "moderator",
    Teacher => "teacher",
    Student => "student",
    User => "user",
    Guest => "guest",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
    Banned,
}

labelled_enum!(UserStatus {
    Active => "active",
    Inactive => "inactive",
    Banned => "banned",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub created_at: NaiveDate,
    pub last_login_at: NaiveDate,
    pub courses_enrolled: u32,
    pub tasks_completed: u32,
}

impl User {
    /// First letter of the name, for avatar placeholders.
    pub fn initial(&self) -> String {
        self.name.chars().next().map(String::from).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub action: String,
    pub resource: String,
    pub timestamp: NaiveDateTime,
}

// =============================================================================
// Code review
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewStatus {
    Pending,
    Approved,
    ChangesRequested,
}

labelled_enum!(ReviewStatus {
    Pending => "pending",
    Approved => "approved",
    ChangesRequested => "changes-requested",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResults {
    pub passed: u32,
    pub failed: u32,
    pub total: u32,
}

impl ValidationResults {
    /// Share of passed checks, 0 to 100.
    pub fn pass_rate(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        self.passed * 100 / self.total
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeReview {
    pub id: String,
    pub task_id: String,
    pub task_title: String,
    pub student_id: String,
    pub student_name: String,
    pub status: ReviewStatus,
    pub submitted_at: NaiveDateTime,
    #[serde(default)]
    pub reviewed_at: Option<NaiveDateTime>,
    pub validation_results: ValidationResults,
}

// =============================================================================
// Statistics series (fed to the charting library as is)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardKpis {
    pub courses_count: u32,
    pub lessons_count: u32,
    pub tasks_count: u32,
    pub students_count: u32,
    pub reviews_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStudents {
    pub date: NaiveDate,
    pub students: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseShare {
    pub name: String,
    pub value: u32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechSuccess {
    pub tech: String,
    pub success: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveUsers {
    pub date: NaiveDate,
    pub dau: u32,
    pub wau: u32,
    pub mau: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseCompletion {
    pub course: String,
    pub started: u32,
    pub completed: u32,
    pub completion: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Engagement {
    pub week: String,
    pub sessions: f64,
    /// Minutes per session.
    pub duration: u32,
}

/// Aggregated platform statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformStats {
    pub kpis: DashboardKpis,
    #[serde(default)]
    pub student_activity: Vec<DailyStudents>,
    #[serde(default)]
    pub students_by_course: Vec<CourseShare>,
    #[serde(default)]
    pub task_success_by_tech: Vec<TechSuccess>,
    #[serde(default)]
    pub active_users: Vec<ActiveUsers>,
    #[serde(default)]
    pub course_completion: Vec<CourseCompletion>,
    #[serde(default)]
    pub engagement: Vec<Engagement>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_labels_match_serde_names() {
        for status in ValidatorStatus::ALL {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, status.as_str());
        }
        for status in ReviewStatus::ALL {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, status.as_str());
        }
        assert_eq!(UserRole::ALL.len(), 6);
    }

    #[test]
    fn labels_parse_back() {
        assert_eq!(CourseStatus::from_label("archived"), Some(CourseStatus::Archived));
        assert_eq!(CourseStatus::from_label("Archived"), None);
        assert_eq!(UserRole::from_label("teacher"), Some(UserRole::Teacher));
    }

    #[test]
    fn localized_search_checks_both_languages() {
        let title = LocalizedText::new("Advanced React", "React: Продвинутый уровень");
        assert!(title.matches("advanced"));
        assert!(title.matches("продвинутый"));
        assert!(!title.matches("vue"));
    }

    #[test]
    fn pass_rate_handles_empty_runs() {
        let results = ValidationResults { passed: 8, failed: 2, total: 10 };
        assert_eq!(results.pass_rate(), 80);
        assert_eq!(ValidationResults { passed: 0, failed: 0, total: 0 }.pass_rate(), 0);
    }
}

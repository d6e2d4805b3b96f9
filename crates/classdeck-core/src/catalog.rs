//! The full data set behind the dashboard.
//!
//! A catalog is either the built-in seed data or a YAML file with the same
//! shape (see [`Catalog::from_file`]).

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::config::ConfigError;
use crate::models::{
    Activity, CodeReview, Course, CourseStatus, Lesson, LessonStatus, LocalizedText,
    PlatformStats, ReviewStatus, Task, User,
};
use crate::permissions::{PermissionError, Role, RoleMatrix};
use crate::seed;

/// Every record the dashboard can show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub reviews: Vec<CodeReview>,
    #[serde(default)]
    pub roles: Vec<Role>,
    pub stats: PlatformStats,
}

/// A consistency problem found by [`Catalog::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogIssue {
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },

    #[error("lesson '{lesson}' refers to unknown course '{course}'")]
    UnknownCourse { lesson: String, course: String },

    #[error("task '{task}' refers to unknown lesson '{lesson}'")]
    UnknownLesson { task: String, lesson: String },

    #[error("review '{review}' refers to unknown task '{task}'")]
    UnknownTask { review: String, task: String },

    #[error("review '{review}' refers to unknown student '{student}'")]
    UnknownStudent { review: String, student: String },

    #[error(transparent)]
    Permissions(#[from] PermissionError),
}

/// The editable part of a course. Counters and dates are kept by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseDraft {
    pub title: LocalizedText,
    pub slug: String,
    pub status: CourseStatus,
    pub version: String,
    pub technologies: Vec<String>,
}

impl CourseDraft {
    /// Trim every field and drop blank or repeated technologies.
    fn normalized(self) -> Self {
        let mut technologies: Vec<String> = Vec::new();
        for tech in self.technologies {
            let tech = tech.trim();
            if !tech.is_empty() && !technologies.iter().any(|t| t == tech) {
                technologies.push(tech.to_string());
            }
        }
        Self {
            title: LocalizedText::new(self.title.en.trim(), self.title.ru.trim()),
            slug: self.slug.trim().to_string(),
            status: self.status,
            version: self.version.trim().to_string(),
            technologies,
        }
    }
}

/// Why a course could not be created or updated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CourseEditError {
    #[error("course '{0}' not found")]
    NotFound(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("slug '{0}' is already used by another course")]
    DuplicateSlug(String),
}

/// Collect ids, recording duplicates.
fn unique_ids<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
    issues: &mut Vec<CatalogIssue>,
) -> HashSet<&'a str> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            issues.push(CatalogIssue::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    seen
}

impl Catalog {
    /// The built-in demonstration catalog.
    pub fn seed() -> Self {
        Self {
            courses: seed::courses(),
            lessons: seed::lessons(),
            tasks: seed::tasks(),
            users: seed::users(),
            activities: seed::activities(),
            reviews: seed::reviews(),
            roles: seed::roles(),
            stats: seed::stats(),
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(ConfigError::from)
    }

    /// Build the role matrix, checking permission parity.
    pub fn role_matrix(&self) -> Result<RoleMatrix, PermissionError> {
        RoleMatrix::new(self.roles.clone())
    }

    /// Lessons of one course ordered by position.
    pub fn lessons_of(&self, course_id: &str) -> Vec<Lesson> {
        let mut lessons: Vec<Lesson> = self
            .lessons
            .iter()
            .filter(|l| l.course_id == course_id)
            .cloned()
            .collect();
        lessons.sort_by_key(|l| l.order);
        lessons
    }

    /// Tasks of one lesson ordered by position.
    pub fn tasks_of(&self, lesson_id: &str) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|t| t.lesson_id == lesson_id)
            .cloned()
            .collect();
        tasks.sort_by_key(|t| t.order);
        tasks
    }

    pub fn pending_reviews(&self) -> Vec<CodeReview> {
        self.reviews
            .iter()
            .filter(|r| r.status == ReviewStatus::Pending)
            .cloned()
            .collect()
    }

    /// Remove a course together with its lessons, their tasks and the
    /// reviews of those tasks.
    pub fn delete_course(&mut self, id: &str) -> Option<Course> {
        let pos = self.courses.iter().position(|c| c.id == id)?;
        let course = self.courses.remove(pos);

        let lesson_ids: Vec<String> = self
            .lessons
            .iter()
            .filter(|l| l.course_id == id)
            .map(|l| l.id.clone())
            .collect();
        for lesson_id in &lesson_ids {
            self.delete_lesson(lesson_id);
        }
        Some(course)
    }

    fn check_course(&self, draft: &CourseDraft, except: Option<&str>) -> Result<(), CourseEditError> {
        if draft.title.en.is_empty() {
            return Err(CourseEditError::MissingField("title"));
        }
        if draft.slug.is_empty() {
            return Err(CourseEditError::MissingField("slug"));
        }
        if draft.version.is_empty() {
            return Err(CourseEditError::MissingField("version"));
        }
        let taken = self
            .courses
            .iter()
            .any(|c| c.slug == draft.slug && except != Some(c.id.as_str()));
        if taken {
            return Err(CourseEditError::DuplicateSlug(draft.slug.clone()));
        }
        Ok(())
    }

    /// Next free course id: one past the largest numeric id.
    fn next_course_id(&self) -> String {
        let mut next = self
            .courses
            .iter()
            .filter_map(|c| c.id.parse::<u64>().ok())
            .max()
            .map_or(1, |max| max + 1);
        while self.courses.iter().any(|c| c.id == next.to_string()) {
            next += 1;
        }
        next.to_string()
    }

    /// Add a new course with no lessons or students.
    pub fn create_course(
        &mut self,
        draft: CourseDraft,
        today: NaiveDate,
    ) -> Result<&Course, CourseEditError> {
        let draft = draft.normalized();
        self.check_course(&draft, None)?;

        let id = self.next_course_id();
        self.courses.push(Course {
            id,
            title: draft.title,
            slug: draft.slug,
            status: draft.status,
            technologies: draft.technologies,
            lessons_count: 0,
            students_count: 0,
            created_at: today,
            updated_at: today,
            version: draft.version,
        });
        let index = self.courses.len() - 1;
        Ok(&self.courses[index])
    }

    /// Replace the editable fields of a course and bump `updated_at`.
    pub fn update_course(
        &mut self,
        id: &str,
        draft: CourseDraft,
        today: NaiveDate,
    ) -> Result<&Course, CourseEditError> {
        let draft = draft.normalized();
        let index = self
            .courses
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CourseEditError::NotFound(id.to_string()))?;
        self.check_course(&draft, Some(id))?;

        let course = &mut self.courses[index];
        course.title = draft.title;
        course.slug = draft.slug;
        course.status = draft.status;
        course.version = draft.version;
        course.technologies = draft.technologies;
        course.updated_at = today;
        Ok(course)
    }

    /// Remove a lesson and its tasks, then renumber the remaining lessons of
    /// the course.
    pub fn delete_lesson(&mut self, id: &str) -> Option<Lesson> {
        let pos = self.lessons.iter().position(|l| l.id == id)?;
        let lesson = self.lessons.remove(pos);

        let task_ids: Vec<String> = self
            .tasks
            .iter()
            .filter(|t| t.lesson_id == id)
            .map(|t| t.id.clone())
            .collect();
        for task_id in &task_ids {
            self.delete_task(task_id);
        }
        self.renumber_lessons(&lesson.course_id);
        Some(lesson)
    }

    /// Remove a task and the reviews submitted for it.
    pub fn delete_task(&mut self, id: &str) -> Option<Task> {
        let pos = self.tasks.iter().position(|t| t.id == id)?;
        let task = self.tasks.remove(pos);
        self.reviews.retain(|r| r.task_id != id);
        Some(task)
    }

    /// Move `dragged` to the position held by `target` within its course and
    /// renumber the course's lessons from 1.
    ///
    /// Returns `false` when either lesson is unknown, when they belong to
    /// different courses, or when they are the same lesson.
    pub fn reorder_lessons(&mut self, dragged: &str, target: &str) -> bool {
        if dragged == target {
            return false;
        }
        let (Some(from), Some(to)) = (
            self.lessons.iter().find(|l| l.id == dragged),
            self.lessons.iter().find(|l| l.id == target),
        ) else {
            return false;
        };
        if from.course_id != to.course_id {
            return false;
        }
        let course_id = from.course_id.clone();

        let mut ids: Vec<String> = self.lessons_of(&course_id).into_iter().map(|l| l.id).collect();
        let (Some(from_pos), Some(to_pos)) = (
            ids.iter().position(|id| id == dragged),
            ids.iter().position(|id| id == target),
        ) else {
            return false;
        };
        let moved = ids.remove(from_pos);
        ids.insert(to_pos, moved);

        for lesson in self.lessons.iter_mut().filter(|l| l.course_id == course_id) {
            if let Some(pos) = ids.iter().position(|id| *id == lesson.id) {
                lesson.order = pos as u32 + 1;
            }
        }
        true
    }

    fn renumber_lessons(&mut self, course_id: &str) {
        let ids: Vec<String> = self.lessons_of(course_id).into_iter().map(|l| l.id).collect();
        for lesson in self.lessons.iter_mut().filter(|l| l.course_id == course_id) {
            if let Some(pos) = ids.iter().position(|id| *id == lesson.id) {
                lesson.order = pos as u32 + 1;
            }
        }
    }

    /// Switch a lesson between active and inactive. Drafts become active.
    pub fn toggle_lesson_status(&mut self, id: &str) -> Option<LessonStatus> {
        let lesson = self.lessons.iter_mut().find(|l| l.id == id)?;
        lesson.status = match lesson.status {
            LessonStatus::Active => LessonStatus::Inactive,
            LessonStatus::Draft | LessonStatus::Inactive => LessonStatus::Active,
        };
        Some(lesson.status)
    }

    /// Record a review decision. Only pending reviews can be decided.
    pub fn decide_review(
        &mut self,
        id: &str,
        status: ReviewStatus,
        at: NaiveDateTime,
    ) -> Option<&CodeReview> {
        let review = self
            .reviews
            .iter_mut()
            .find(|r| r.id == id && r.status == ReviewStatus::Pending)?;
        review.status = status;
        review.reviewed_at = Some(at);
        Some(review)
    }

    /// Check ids and cross references. An empty result means the catalog is
    /// consistent.
    pub fn validate(&self) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();

        let courses = unique_ids("course", self.courses.iter().map(|c| c.id.as_str()), &mut issues);
        let lessons = unique_ids("lesson", self.lessons.iter().map(|l| l.id.as_str()), &mut issues);
        let tasks = unique_ids("task", self.tasks.iter().map(|t| t.id.as_str()), &mut issues);
        let users = unique_ids("user", self.users.iter().map(|u| u.id.as_str()), &mut issues);
        unique_ids("review", self.reviews.iter().map(|r| r.id.as_str()), &mut issues);

        for lesson in &self.lessons {
            if !courses.contains(lesson.course_id.as_str()) {
                issues.push(CatalogIssue::UnknownCourse {
                    lesson: lesson.id.clone(),
                    course: lesson.course_id.clone(),
                });
            }
        }
        for task in &self.tasks {
            if !lessons.contains(task.lesson_id.as_str()) {
                issues.push(CatalogIssue::UnknownLesson {
                    task: task.id.clone(),
                    lesson: task.lesson_id.clone(),
                });
            }
        }
        for review in &self.reviews {
            if !tasks.contains(review.task_id.as_str()) {
                issues.push(CatalogIssue::UnknownTask {
                    review: review.id.clone(),
                    task: review.task_id.clone(),
                });
            }
            if !users.contains(review.student_id.as_str()) {
                issues.push(CatalogIssue::UnknownStudent {
                    review: review.id.clone(),
                    student: review.student_id.clone(),
                });
            }
        }

        if let Err(err) = self.role_matrix() {
            issues.push(err.into());
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn seed_catalog_is_consistent() {
        let catalog = Catalog::seed();
        assert_eq!(catalog.validate(), vec![]);
        assert_eq!(catalog.courses.len(), 5);
        assert_eq!(catalog.role_matrix().unwrap().len(), 4);
    }

    fn draft(slug: &str) -> CourseDraft {
        CourseDraft {
            title: LocalizedText::new("  Rust in Practice ", "Rust на практике"),
            slug: slug.to_string(),
            status: CourseStatus::Draft,
            version: "0.1.0".to_string(),
            technologies: vec!["Rust".into(), " ".into(), "Rust".into(), "Tokio".into()],
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    #[test]
    fn created_course_gets_next_id_and_clean_fields() {
        let mut catalog = Catalog::seed();
        let course = catalog.create_course(draft("rust-in-practice"), today()).unwrap().clone();

        assert_eq!(course.id, "6");
        assert_eq!(course.title.en, "Rust in Practice");
        assert_eq!(course.technologies, ["Rust", "Tokio"]);
        assert_eq!((course.lessons_count, course.students_count), (0, 0));
        assert_eq!(course.created_at, today());
        assert_eq!(catalog.courses.len(), 6);
        assert_eq!(catalog.validate(), vec![]);
    }

    #[test]
    fn course_edits_are_checked() {
        let mut catalog = Catalog::seed();
        assert_eq!(
            catalog.create_course(draft("advanced-react"), today()),
            Err(CourseEditError::DuplicateSlug("advanced-react".to_string()))
        );
        assert_eq!(
            catalog.create_course(draft("  "), today()),
            Err(CourseEditError::MissingField("slug"))
        );
        assert_eq!(
            catalog.update_course("99", draft("x"), today()),
            Err(CourseEditError::NotFound("99".to_string()))
        );
        assert_eq!(catalog.courses.len(), 5);
    }

    #[test]
    fn update_keeps_counters_and_own_slug() {
        let mut catalog = Catalog::seed();
        let mut edit = draft("advanced-react");
        edit.status = CourseStatus::Archived;

        let course = catalog.update_course("3", edit, today()).unwrap();
        assert_eq!(course.slug, "advanced-react");
        assert_eq!(course.status, CourseStatus::Archived);
        assert_eq!(course.students_count, 892);
        assert_eq!(course.created_at, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert_eq!(course.updated_at, today());
    }

    #[test]
    fn broken_links_are_reported() {
        let mut catalog = Catalog::seed();
        catalog.lessons[0].course_id = "missing".to_string();
        catalog.reviews[1].student_id = "u404".to_string();
        catalog.tasks.push(catalog.tasks[0].clone());

        let issues = catalog.validate();
        assert!(issues.contains(&CatalogIssue::DuplicateId {
            kind: "task",
            id: "t1".to_string()
        }));
        assert!(issues.contains(&CatalogIssue::UnknownCourse {
            lesson: "l1".to_string(),
            course: "missing".to_string()
        }));
        assert!(issues.contains(&CatalogIssue::UnknownStudent {
            review: "r2".to_string(),
            student: "u404".to_string()
        }));
        assert_eq!(issues.len(), 3);
    }

    #[test]
    fn parity_problems_surface_as_issues() {
        let mut catalog = Catalog::seed();
        catalog.roles[3].permissions = catalog.roles[3]
            .permissions
            .clone()
            .with_resource("billing", [("read", true)]);
        let issues = catalog.validate();
        assert!(matches!(
            issues.as_slice(),
            [CatalogIssue::Permissions(PermissionError::ParityMismatch { .. })]
        ));
    }

    fn lesson_order(catalog: &Catalog) -> Vec<(String, u32)> {
        catalog
            .lessons_of("1")
            .into_iter()
            .map(|l| (l.id, l.order))
            .collect()
    }

    #[test]
    fn reorder_moves_lesson_to_target_position() {
        let mut catalog = Catalog::seed();
        assert!(catalog.reorder_lessons("l4", "l2"));
        assert_eq!(
            lesson_order(&catalog),
            [
                ("l1".to_string(), 1),
                ("l4".to_string(), 2),
                ("l2".to_string(), 3),
                ("l3".to_string(), 4),
            ]
        );

        assert!(catalog.reorder_lessons("l1", "l3"));
        let ids: Vec<_> = lesson_order(&catalog).into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, ["l4", "l2", "l3", "l1"]);
    }

    #[test]
    fn reorder_rejects_unknown_or_identical_lessons() {
        let mut catalog = Catalog::seed();
        assert!(!catalog.reorder_lessons("l1", "l1"));
        assert!(!catalog.reorder_lessons("l1", "l99"));
        assert_eq!(catalog.lessons, Catalog::seed().lessons);
    }

    #[test]
    fn deleting_a_course_cascades() {
        let mut catalog = Catalog::seed();
        let removed = catalog.delete_course("1").unwrap();
        assert_eq!(removed.slug, "html-css-fundamentals");
        assert!(catalog.lessons.is_empty());
        assert!(catalog.tasks.is_empty());
        assert!(catalog.reviews.is_empty());
        assert_eq!(catalog.validate(), vec![]);
        assert!(catalog.delete_course("1").is_none());
    }

    #[test]
    fn deleting_a_lesson_renumbers_the_rest() {
        let mut catalog = Catalog::seed();
        catalog.delete_lesson("l2").unwrap();
        assert_eq!(
            lesson_order(&catalog),
            [
                ("l1".to_string(), 1),
                ("l3".to_string(), 2),
                ("l4".to_string(), 3),
            ]
        );
    }

    #[test]
    fn lesson_status_toggles() {
        let mut catalog = Catalog::seed();
        assert_eq!(catalog.toggle_lesson_status("l1"), Some(LessonStatus::Inactive));
        assert_eq!(catalog.toggle_lesson_status("l1"), Some(LessonStatus::Active));
        assert_eq!(catalog.toggle_lesson_status("l4"), Some(LessonStatus::Active));
        assert_eq!(catalog.toggle_lesson_status("nope"), None);
    }

    #[test]
    fn only_pending_reviews_can_be_decided() {
        let mut catalog = Catalog::seed();
        let at = chrono::NaiveDate::from_ymd_opt(2024, 12, 24)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();

        let review = catalog.decide_review("r1", ReviewStatus::Approved, at).unwrap();
        assert_eq!(review.reviewed_at, Some(at));
        assert_eq!(catalog.pending_reviews().len(), 1);

        assert!(catalog.decide_review("r1", ReviewStatus::ChangesRequested, at).is_none());
        assert!(catalog.decide_review("r3", ReviewStatus::ChangesRequested, at).is_none());
    }

    #[test]
    fn catalog_loads_from_yaml_file() {
        let mut seed = Catalog::seed();
        seed.courses.truncate(2);
        let yaml = seed.to_yaml().unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let loaded = Catalog::from_file(file.path()).unwrap();
        assert_eq!(loaded.courses.len(), 2);
        assert_eq!(loaded.roles, seed.roles);
        assert_eq!(loaded.stats.kpis, seed.stats.kpis);
    }
}

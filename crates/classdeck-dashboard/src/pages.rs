//! Page templates for the content screens.

use classdeck_core::Catalog;
use classdeck_core::models::{Course, CourseStatus, Lesson, User, UserRole, UserStatus};

use crate::api_types::ListQuery;
use crate::tables::Listing;
use crate::templates::{
    Chrome, ListLinks, card, chart, data_table, empty_state, escape_html, href, layout,
    page_header, pager, select, stats_card, status_badge,
};

fn filter_options(all_label: &str, values: &[&str], selected: Option<&str>) -> Vec<(String, String, bool)> {
    std::iter::once(("all".to_string(), all_label.to_string(), selected.is_none()))
        .chain(
            values
                .iter()
                .map(|v| (v.to_string(), v.to_string(), selected == Some(*v))),
        )
        .collect()
}

fn search_box(value: &str, placeholder: &str) -> String {
    format!(
        r##"<div class="flex-1 relative">
            <i class="fas fa-search absolute left-3 top-3 text-gray-400"></i>
            <input type="search" name="q" value="{value}" placeholder="{placeholder}"
                   class="w-full pl-10 pr-4 py-2 border border-gray-300 dark:border-gray-600 rounded-lg bg-white dark:bg-gray-800 text-gray-900 dark:text-white focus:ring-2 focus:ring-primary-500">
        </div>"##,
        value = escape_html(value),
    )
}

/// Keeps the active sort when a filter form is submitted.
fn sort_inputs(links: &ListLinks<'_>) -> String {
    match &links.sort {
        Some(spec) => format!(
            r#"<input type="hidden" name="sort" value="{}"><input type="hidden" name="dir" value="{}">"#,
            escape_html(&spec.key),
            spec.direction.as_str(),
        ),
        None => String::new(),
    }
}

fn table_card(listing: &Listing, links: &ListLinks<'_>) -> String {
    format!(
        r##"<div class="bg-white dark:bg-gray-800 rounded-xl shadow-sm border border-gray-200 dark:border-gray-700 overflow-hidden">
            {table}
            {pager}
        </div>"##,
        table = data_table(&listing.table, links),
        pager = pager(&listing.page, links),
    )
}

// =============================================================================
// Dashboard
// =============================================================================

pub fn dashboard_page(chrome: &Chrome, catalog: &Catalog) -> String {
    let kpis = &catalog.stats.kpis;
    let stats = format!(
        r##"<div class="grid grid-cols-1 md:grid-cols-3 lg:grid-cols-5 gap-6 mb-8">
            {courses}
            {lessons}
            {tasks}
            {students}
            {reviews}
        </div>"##,
        courses = stats_card("Courses", &kpis.courses_count.to_string(), "book", "blue"),
        lessons = stats_card("Lessons", &kpis.lessons_count.to_string(), "list-ol", "green"),
        tasks = stats_card("Tasks", &kpis.tasks_count.to_string(), "tasks", "purple"),
        students = stats_card("Students", &kpis.students_count.to_string(), "users", "orange"),
        reviews = stats_card(
            "Pending Reviews",
            &chrome.pending_reviews.to_string(),
            "clock",
            "yellow"
        ),
    );

    let activity: String = if catalog.activities.is_empty() {
        empty_state("history", "No activity yet", "Recent actions will appear here.", None)
    } else {
        catalog
            .activities
            .iter()
            .map(|a| {
                format!(
                    r##"<div class="flex items-start gap-3 py-3 border-b border-gray-100 dark:border-gray-700 last:border-0">
                        <div class="w-8 h-8 rounded-full bg-primary-100 dark:bg-primary-900/30 text-primary-600 flex items-center justify-center text-sm font-medium">{initial}</div>
                        <div class="flex-1">
                            <p class="text-sm text-gray-900 dark:text-white"><span class="font-medium">{user}</span> {action} <span class="font-medium">{resource}</span></p>
                            <p class="text-xs text-gray-500 dark:text-gray-400">{at}</p>
                        </div>
                    </div>"##,
                    initial = escape_html(&a.user_name.chars().next().map(String::from).unwrap_or_default()),
                    user = escape_html(&a.user_name),
                    action = escape_html(&a.action),
                    resource = escape_html(&a.resource),
                    at = a.timestamp.format("%Y-%m-%d %H:%M"),
                )
            })
            .collect()
    };

    let content = format!(
        r##"{header}
        {stats}
        <div class="grid grid-cols-1 lg:grid-cols-2 gap-6 mb-6">
            {activity_chart}
            {course_chart}
        </div>
        {recent}"##,
        header = page_header(
            "Dashboard",
            "Overview of the learning platform",
            r#"<a href="/statistics" class="text-primary-600 hover:underline">Detailed statistics <i class="fas fa-arrow-right"></i></a>"#,
        ),
        activity_chart = card(
            "Student Activity (last 30 days)",
            &chart("student-activity", "line", "/api/statistics/student-activity"),
        ),
        course_chart = card(
            "Students by Course",
            &chart("students-by-course", "doughnut", "/api/statistics/students-by-course"),
        ),
        recent = card("Recent Activity", &activity),
    );

    layout(chrome, "Dashboard", &content)
}

// =============================================================================
// Courses
// =============================================================================

/// What the course editor is editing.
#[derive(Debug, Clone, Copy)]
pub enum CourseEditor<'a> {
    New,
    Existing(&'a Course),
}

fn text_field(name: &str, label: &str, value: &str, placeholder: &str, required: bool) -> String {
    format!(
        r##"<div>
            <label for="course-{name}" class="block text-sm font-medium text-gray-700 dark:text-gray-300 mb-1">{label}{mark}</label>
            <input type="text" name="{name}" id="course-{name}" value="{value}" placeholder="{placeholder}" {required}
                   class="w-full px-4 py-2 border border-gray-300 dark:border-gray-600 rounded-lg bg-white dark:bg-gray-800 text-gray-900 dark:text-white focus:ring-2 focus:ring-primary-500">
        </div>"##,
        mark = if required { r#" <span class="text-red-500">*</span>"# } else { "" },
        value = escape_html(value),
        placeholder = escape_html(placeholder),
        required = if required { "required" } else { "" },
    )
}

/// Create/edit dialog for one course.
fn course_editor(editor: CourseEditor<'_>) -> String {
    let (title, submit, target, course) = match editor {
        CourseEditor::New => (
            "Create New Course".to_string(),
            "Create",
            r#"hx-post="/api/courses""#.to_string(),
            None,
        ),
        CourseEditor::Existing(course) => (
            "Edit Course".to_string(),
            "Update",
            format!(r#"hx-put="/api/courses/{}""#, escape_html(&urlencoding::encode(&course.id))),
            Some(course),
        ),
    };
    let field = |get: fn(&Course) -> String| course.map(get).unwrap_or_default();
    let status = course.map_or(CourseStatus::Draft, |c| c.status);
    let statuses: String = CourseStatus::ALL
        .iter()
        .map(|s| {
            format!(
                r#"<option value="{v}" {sel}>{v}</option>"#,
                v = s.as_str(),
                sel = if *s == status { "selected" } else { "" },
            )
        })
        .collect();

    format!(
        r##"<div class="fixed inset-0 z-40 flex items-center justify-center bg-black/50">
            <form {target} hx-swap="none"
                  class="w-full max-w-2xl bg-white dark:bg-gray-800 rounded-xl shadow-xl border border-gray-200 dark:border-gray-700">
                <div class="px-6 py-4 border-b border-gray-200 dark:border-gray-700">
                    <h2 class="text-lg font-semibold text-gray-900 dark:text-white">{title}</h2>
                </div>
                <div class="p-6 space-y-4">
                    {title_en}
                    {title_ru}
                    {slug}
                    <div class="grid grid-cols-2 gap-4">
                        <div>
                            <label for="course-status" class="block text-sm font-medium text-gray-700 dark:text-gray-300 mb-1">Status <span class="text-red-500">*</span></label>
                            <select name="status" id="course-status"
                                    class="w-full px-4 py-2 border border-gray-300 dark:border-gray-600 rounded-lg bg-white dark:bg-gray-800 text-gray-900 dark:text-white">{statuses}</select>
                        </div>
                        {version}
                    </div>
                    {technologies}
                </div>
                <div class="px-6 py-4 border-t border-gray-200 dark:border-gray-700 flex justify-end gap-3">
                    <a href="/courses" class="px-4 py-2 rounded-lg border border-gray-300 dark:border-gray-600 text-gray-700 dark:text-gray-300">Cancel</a>
                    <button type="submit" class="bg-primary-600 hover:bg-primary-700 text-white px-4 py-2 rounded-lg font-medium">{submit}</button>
                </div>
            </form>
        </div>"##,
        title = escape_html(&title),
        title_en = text_field("title_en", "Course Title (English)", &field(|c| c.title.en.clone()), "Enter course title", true),
        title_ru = text_field("title_ru", "Course Title (Русский)", &field(|c| c.title.ru.clone()), "Введите название курса", false),
        slug = text_field("slug", "Slug", &field(|c| c.slug.clone()), "course-slug", true),
        version = text_field("version", "Version", &field(|c| c.version.clone()), "1.0.0", true),
        technologies = text_field(
            "technologies",
            "Technologies (comma-separated)",
            &field(|c| c.technologies.join(", ")),
            "HTML, CSS, JavaScript",
            false,
        ),
    )
}

pub fn courses_page(
    chrome: &Chrome,
    listing: &Listing,
    links: &ListLinks<'_>,
    query: &ListQuery,
    editor: Option<CourseEditor<'_>>,
) -> String {
    let statuses: Vec<&str> = CourseStatus::ALL.iter().map(|s| s.as_str()).collect();
    let filters = format!(
        r##"<form method="get" action="/courses" class="flex flex-wrap items-end gap-4 mb-6">
            {search}
            <div class="w-48">{status}</div>
            {sort}
            <button type="submit" class="bg-primary-600 hover:bg-primary-700 text-white px-4 py-2 rounded-lg font-medium">Apply</button>
        </form>"##,
        search = search_box(query.search().unwrap_or_default(), "Search courses..."),
        status = select("status", "Status", &filter_options("All statuses", &statuses, query.status())),
        sort = sort_inputs(links),
    );

    let content = format!(
        "{header}{filters}{table}{editor}",
        header = page_header(
            "Courses",
            "Manage courses and their content",
            r#"<a href="/courses?edit=new" class="bg-primary-600 hover:bg-primary-700 text-white px-4 py-2 rounded-lg font-medium"><i class="fas fa-plus"></i> Create Course</a>"#,
        ),
        table = table_card(listing, links),
        editor = editor.map(course_editor).unwrap_or_default(),
    );
    layout(chrome, "Courses", &content)
}

// =============================================================================
// Lessons
// =============================================================================

fn lesson_item(lesson: &Lesson) -> String {
    let checked = if lesson.status.as_str() == "active" { "checked" } else { "" };
    format!(
        r##"<li draggable="true" data-lesson-id="{id}"
                class="lesson-item flex items-center gap-4 p-4 bg-white dark:bg-gray-800 border border-gray-200 dark:border-gray-700 rounded-lg">
            <i class="fas fa-grip-vertical text-gray-400 cursor-move"></i>
            <div class="w-8 h-8 rounded-full bg-primary-100 dark:bg-primary-900/30 text-primary-600 flex items-center justify-center font-medium">{order}</div>
            <div class="flex-1">
                <div class="flex items-center gap-2 mb-1">
                    <a href="{tasks_href}" class="font-medium text-gray-900 dark:text-white hover:underline">{title}</a>
                    {status}
                </div>
                <div class="flex gap-4 text-sm text-gray-500 dark:text-gray-400">
                    <span>{tasks} tasks</span>
                    <span>{duration} minutes</span>
                    <span>Created: {created}</span>
                </div>
            </div>
            <label class="flex items-center gap-2 cursor-pointer">
                <input type="checkbox" {checked} hx-post="/api/lessons/{id}/toggle-status" hx-swap="none" class="w-4 h-4">
                <span class="text-sm text-gray-500 dark:text-gray-400">Active</span>
            </label>
            <button hx-delete="/api/lessons/{id}" hx-confirm="Delete this lesson and its tasks?" hx-swap="none"
                    class="p-2 text-red-600 hover:bg-red-50 dark:hover:bg-red-900/30 rounded-lg" title="Delete">
                <i class="fas fa-trash"></i>
            </button>
        </li>"##,
        id = escape_html(&lesson.id),
        order = lesson.order,
        tasks_href = escape_html(&href("/tasks", &[("lesson", &lesson.id)])),
        title = escape_html(&lesson.title.en),
        status = status_badge(lesson.status.as_str()),
        tasks = lesson.tasks_count,
        duration = lesson.duration,
        created = lesson.created_at,
    )
}

/// Lessons of the selected course, in order, with drag-and-drop reordering.
pub fn lessons_page(chrome: &Chrome, catalog: &Catalog, course_id: Option<&str>) -> String {
    let options: Vec<(String, String, bool)> = catalog
        .courses
        .iter()
        .map(|c| (c.id.clone(), c.title.en.clone(), course_id == Some(c.id.as_str())))
        .collect();
    let picker = format!(
        r##"<form method="get" action="/lessons" class="w-80 mb-6">{}</form>"##,
        select("course", "Course", &options).replace("<select ", r#"<select onchange="this.form.submit()" "#),
    );

    let course = course_id.and_then(|id| catalog.courses.iter().find(|c| c.id == id));
    let body = match course {
        None => empty_state("book", "No course selected", "Pick a course to see its lessons.", Some(("Back to Courses", "/courses"))),
        Some(course) => {
            let lessons = catalog.lessons_of(&course.id);
            if lessons.is_empty() {
                empty_state("list-ol", "No lessons yet", "This course has no lessons.", None)
            } else {
                format!(
                    r##"<p class="mb-3 text-sm text-gray-500 dark:text-gray-400"><i class="fas fa-info-circle"></i> Drag lessons to change their order.</p>
                    <ul id="lesson-list" class="space-y-2" data-course-id="{course_id}">{items}</ul>"##,
                    course_id = escape_html(&course.id),
                    items = lessons.iter().map(lesson_item).collect::<String>(),
                )
            }
        }
    };

    let content = format!(
        "{header}{picker}{body}",
        header = page_header("Lessons", "Manage lessons and their ordering", ""),
    );
    layout(chrome, "Lessons", &content)
}

// =============================================================================
// Tasks
// =============================================================================

pub fn tasks_page(
    chrome: &Chrome,
    catalog: &Catalog,
    lesson_id: Option<&str>,
    listing: Option<(&Listing, &ListLinks<'_>)>,
) -> String {
    let options: Vec<(String, String, bool)> = catalog
        .lessons
        .iter()
        .map(|l| {
            let course = catalog
                .courses
                .iter()
                .find(|c| c.id == l.course_id)
                .map(|c| c.title.en.as_str())
                .unwrap_or("?");
            (
                l.id.clone(),
                format!("{course} / {}. {}", l.order, l.title.en),
                lesson_id == Some(l.id.as_str()),
            )
        })
        .collect();
    let picker = format!(
        r##"<form method="get" action="/tasks" class="w-96 mb-6">{}</form>"##,
        select("lesson", "Lesson", &options).replace("<select ", r#"<select onchange="this.form.submit()" "#),
    );

    let body = match listing {
        Some((listing, links)) => table_card(listing, links),
        None => empty_state("tasks", "No lesson selected", "Pick a lesson to see its tasks.", Some(("Back to Lessons", "/lessons"))),
    };

    let content = format!(
        "{header}{picker}{body}",
        header = page_header("Tasks", "Manage tasks and their validators", ""),
    );
    layout(chrome, "Tasks", &content)
}

// =============================================================================
// Users
// =============================================================================

/// Counts over the whole user collection, ignoring filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserSummary {
    pub total: usize,
    pub active: usize,
    pub students: usize,
    pub teachers: usize,
}

impl UserSummary {
    pub fn of(users: &[User]) -> Self {
        Self {
            total: users.len(),
            active: users.iter().filter(|u| u.status == UserStatus::Active).count(),
            students: users.iter().filter(|u| u.role == UserRole::Student).count(),
            teachers: users.iter().filter(|u| u.role == UserRole::Teacher).count(),
        }
    }
}

pub fn users_page(
    chrome: &Chrome,
    listing: &Listing,
    links: &ListLinks<'_>,
    query: &ListQuery,
    summary: UserSummary,
) -> String {
    let roles: Vec<&str> = UserRole::ALL.iter().map(|r| r.as_str()).collect();
    let statuses: Vec<&str> = UserStatus::ALL.iter().map(|s| s.as_str()).collect();
    let filters = format!(
        r##"<form method="get" action="/users" class="flex flex-wrap items-end gap-4 mb-6">
            {search}
            <div class="w-40">{role}</div>
            <div class="w-40">{status}</div>
            {sort}
            <button type="submit" class="bg-primary-600 hover:bg-primary-700 text-white px-4 py-2 rounded-lg font-medium">Apply</button>
        </form>"##,
        search = search_box(query.search().unwrap_or_default(), "Search by name or email..."),
        role = select("role", "Role", &filter_options("All roles", &roles, query.role())),
        status = select("status", "Status", &filter_options("All statuses", &statuses, query.status())),
        sort = sort_inputs(links),
    );
    let cards = format!(
        r##"<div class="grid grid-cols-2 md:grid-cols-4 gap-4 mb-6">
            {total}
            {active}
            {students}
            {teachers}
        </div>"##,
        total = stats_card("Total Users", &summary.total.to_string(), "users", "blue"),
        active = stats_card("Active", &summary.active.to_string(), "user-check", "green"),
        students = stats_card("Students", &summary.students.to_string(), "user-graduate", "purple"),
        teachers = stats_card("Teachers", &summary.teachers.to_string(), "chalkboard-teacher", "orange"),
    );

    let content = format!(
        "{header}{filters}{cards}{table}",
        header = page_header("Users", "Manage platform users", ""),
        table = table_card(listing, links),
    );
    layout(chrome, "Users", &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use classdeck_grid::{SortDirection, SortSpec};

    #[test]
    fn user_summary_counts_the_whole_collection() {
        let mut users = Catalog::seed().users;
        assert_eq!(
            UserSummary::of(&users),
            UserSummary { total: 5, active: 5, students: 2, teachers: 1 }
        );

        users[2].status = UserStatus::Banned;
        let summary = UserSummary::of(&users);
        assert_eq!(summary.active, 4);
        assert_eq!(summary.students, 2);
    }

    #[test]
    fn filter_forms_keep_the_active_sort() {
        let links = ListLinks {
            path: "/courses",
            params: Vec::new(),
            sort: Some(SortSpec::new("students_count", SortDirection::Desc)),
        };
        let html = sort_inputs(&links);
        assert!(html.contains(r#"name="sort" value="students_count""#));
        assert!(html.contains(r#"name="dir" value="desc""#));

        let unsorted = ListLinks { sort: None, ..links };
        assert_eq!(sort_inputs(&unsorted), "");
    }

    #[test]
    fn editor_targets_match_the_mode() {
        let catalog = Catalog::seed();
        let new = course_editor(CourseEditor::New);
        assert!(new.contains(r#"hx-post="/api/courses""#));
        assert!(new.contains("Create New Course"));

        let edit = course_editor(CourseEditor::Existing(&catalog.courses[1]));
        assert!(edit.contains(r#"hx-put="/api/courses/2""#));
        assert!(edit.contains(r#"value="javascript-beginners""#));
        assert!(edit.contains(r#"<option value="active" selected>"#));
    }
}

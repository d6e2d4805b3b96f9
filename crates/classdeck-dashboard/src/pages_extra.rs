//! Page templates for roles, statistics, code review and settings.

use classdeck_core::models::{CodeReview, Course, PlatformStats, ReviewStatus};
use classdeck_core::{MatrixSection, RoleMatrix};

use crate::api_types::StatisticsQuery;
use crate::state::Settings;
use crate::tables::Listing;
use crate::templates::{
    Chrome, ListLinks, badge, card, chart, code_block, data_table, empty_state, escape_html,
    input, layout, page_header, pager, select, stats_card, status_badge,
};

// =============================================================================
// Roles
// =============================================================================

fn role_card(role: &classdeck_core::Role, granted: usize, total: usize) -> String {
    format!(
        r##"<div class="bg-white dark:bg-gray-800 rounded-xl shadow-sm border border-gray-200 dark:border-gray-700 p-6">
            <div class="flex items-center gap-3 mb-2">
                <div class="w-10 h-10 rounded-full bg-primary-100 dark:bg-primary-900/30 flex items-center justify-center">
                    <i class="fas fa-user-shield text-primary-600"></i>
                </div>
                <div>
                    <h3 class="font-semibold text-gray-900 dark:text-white">{name}</h3>
                    <p class="text-xs text-gray-500 dark:text-gray-400">{users} users</p>
                </div>
            </div>
            <p class="text-sm text-gray-600 dark:text-gray-300 mb-3">{description}</p>
            {permissions}
        </div>"##,
        name = escape_html(&role.name),
        users = role.users_count,
        description = escape_html(&role.description),
        permissions = badge(&format!("{granted} of {total} permissions"), "blue"),
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn matrix_html(matrix: &RoleMatrix, sections: &[MatrixSection]) -> String {
    let role_headers: String = matrix
        .roles()
        .iter()
        .map(|r| {
            format!(
                r#"<th class="px-4 py-3 text-center text-xs font-medium text-gray-500 dark:text-gray-400 uppercase">{}</th>"#,
                escape_html(&r.name)
            )
        })
        .collect();
    let colspan = matrix.len() + 1;

    let body: String = sections
        .iter()
        .map(|section| {
            let rows: String = section
                .rows
                .iter()
                .map(|row| {
                    let cells: String = row
                        .cells
                        .iter()
                        .map(|cell| {
                            format!(
                                r##"<td class="px-4 py-2 text-center">
                                    <input type="checkbox" name="value" value="on" {checked}
                                           aria-label="{role} {resource} {action}"
                                           hx-post="/api/roles/{role_id}/permissions/{resource}/{action}" hx-swap="none"
                                           class="w-4 h-4 text-primary-600 rounded">
                                </td>"##,
                                checked = if cell.granted { "checked" } else { "" },
                                role = escape_html(&cell.role_name),
                                role_id = escape_html(&cell.role_id),
                                resource = escape_html(&section.resource),
                                action = escape_html(&row.action),
                            )
                        })
                        .collect();
                    format!(
                        r#"<tr class="hover:bg-gray-50 dark:hover:bg-gray-700/50"><td class="px-6 py-2 text-sm text-gray-700 dark:text-gray-300">{}</td>{cells}</tr>"#,
                        capitalize(&row.action)
                    )
                })
                .collect();
            format!(
                r#"<tr class="bg-gray-50 dark:bg-gray-800"><td colspan="{colspan}" class="px-6 py-2 text-xs font-semibold text-gray-500 dark:text-gray-400 uppercase tracking-wider">{}</td></tr>{rows}"#,
                escape_html(&capitalize(&section.resource))
            )
        })
        .collect();

    format!(
        r##"<div class="overflow-x-auto">
            <table class="min-w-full divide-y divide-gray-200 dark:divide-gray-700">
                <thead>
                    <tr>
                        <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 dark:text-gray-400 uppercase">Permission</th>
                        {role_headers}
                    </tr>
                </thead>
                <tbody class="divide-y divide-gray-100 dark:divide-gray-700">{body}</tbody>
            </table>
        </div>"##
    )
}

pub fn roles_page(chrome: &Chrome, matrix: &RoleMatrix, sections: &[MatrixSection]) -> String {
    let total: usize = sections.iter().map(|s| s.rows.len()).sum();
    let cards: String = matrix
        .roles()
        .iter()
        .map(|role| {
            let granted = sections
                .iter()
                .flat_map(|s| s.rows.iter().map(move |r| (s.resource.as_str(), r.action.as_str())))
                .filter(|(resource, action)| role.permissions.allows(resource, action))
                .count();
            role_card(role, granted, total)
        })
        .collect();

    let content = format!(
        r##"{header}
        <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-6 mb-8">{cards}</div>
        {matrix}"##,
        header = page_header("Roles & Permissions", "Manage what each role can do", ""),
        matrix = card("Permissions Matrix", &matrix_html(matrix, sections)),
    );
    layout(chrome, "Roles", &content)
}

// =============================================================================
// Statistics
// =============================================================================

const RANGES: &[(&str, &str)] = &[
    ("7d", "Last 7 days"),
    ("30d", "Last 30 days"),
    ("90d", "Last 90 days"),
    ("1y", "Last year"),
];

pub fn statistics_page(
    chrome: &Chrome,
    stats: &PlatformStats,
    courses: &[Course],
    query: &StatisticsQuery,
) -> String {
    let range = query.range.as_deref().unwrap_or("30d");
    let range_options: Vec<(String, String, bool)> = RANGES
        .iter()
        .map(|(value, label)| (value.to_string(), label.to_string(), *value == range))
        .collect();
    let selected_course = query.course.as_deref().unwrap_or("all");
    let course_options: Vec<(String, String, bool)> =
        std::iter::once(("all".to_string(), "All courses".to_string(), selected_course == "all"))
            .chain(
                courses
                    .iter()
                    .map(|c| (c.id.clone(), c.title.en.clone(), c.id == selected_course)),
            )
            .collect();

    let filters = format!(
        r##"<form method="get" action="/statistics" class="flex flex-wrap items-end gap-4 mb-6">
            <div class="w-48">{range}</div>
            <div class="w-64">{course}</div>
            <button type="submit" class="bg-primary-600 hover:bg-primary-700 text-white px-4 py-2 rounded-lg font-medium">Apply</button>
        </form>"##,
        range = select("range", "Period", &range_options),
        course = select("course", "Course", &course_options),
    );

    let k = &stats.kpis;
    let kpis = format!(
        r##"<div class="grid grid-cols-1 md:grid-cols-3 lg:grid-cols-5 gap-6 mb-8">{}{}{}{}{}</div>"##,
        stats_card("Courses", &k.courses_count.to_string(), "book", "blue"),
        stats_card("Lessons", &k.lessons_count.to_string(), "list-ol", "green"),
        stats_card("Tasks", &k.tasks_count.to_string(), "tasks", "purple"),
        stats_card("Students", &k.students_count.to_string(), "users", "orange"),
        stats_card("Reviews", &k.reviews_count.to_string(), "code", "yellow"),
    );

    let charts = [
        ("Student Activity", "student-activity", "line"),
        ("Students by Course", "students-by-course", "doughnut"),
        ("Task Success by Technology", "task-success", "bar"),
        ("Active Users (DAU / WAU / MAU)", "active-users", "line"),
        ("Course Completion", "course-completion", "bar"),
        ("Engagement", "engagement", "bar"),
    ]
    .iter()
    .map(|(title, name, kind)| card(title, &chart(name, kind, &format!("/api/statistics/{name}"))))
    .collect::<String>();

    let content = format!(
        r##"{header}{filters}{kpis}
        <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">{charts}</div>"##,
        header = page_header("Statistics", "Platform analytics and insights", ""),
    );
    layout(chrome, "Statistics", &content)
}

// =============================================================================
// Code Review
// =============================================================================

const SUBMISSION_FILES: &[&str] = &["index.html", "styles.css", "script.js", "README.md"];

const SAMPLE_SUBMISSION: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>My First Web Page</title>
    <link rel="stylesheet" href="styles.css">
</head>
<body>
    <header>
        <h1>Welcome to My Website</h1>
        <nav>
            <ul>
                <li><a href="#home">Home</a></li>
                <li><a href="#about">About</a></li>
                <li><a href="#contact">Contact</a></li>
            </ul>
        </nav>
    </header>

    <main>
        <section id="home">
            <h2>Home Section</h2>
            <p>This is a simple website created with HTML.</p>
        </section>
    </main>

    <footer>
        <p>&copy; 2024 My Website</p>
    </footer>

    <script src="script.js"></script>
</body>
</html>"##;

fn review_detail(review: &CodeReview) -> String {
    let v = review.validation_results;
    let files: String = SUBMISSION_FILES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let active = if i == 0 {
                "bg-primary-50 dark:bg-primary-900/50 text-primary-600"
            } else {
                "text-gray-700 dark:text-gray-300"
            };
            format!(r#"<li class="px-3 py-2 rounded {active}"><i class="fas fa-file-code mr-2"></i>{name}</li>"#)
        })
        .collect();

    let actions = if review.status == ReviewStatus::Pending {
        format!(
            r##"<div class="flex justify-end gap-2 mt-4">
                <button hx-post="/api/reviews/{id}/request-changes" hx-swap="none"
                        class="bg-yellow-500 hover:bg-yellow-600 text-white px-4 py-2 rounded-lg font-medium">
                    <i class="fas fa-times mr-2"></i>Request Changes
                </button>
                <button hx-post="/api/reviews/{id}/approve" hx-swap="none"
                        class="bg-green-600 hover:bg-green-700 text-white px-4 py-2 rounded-lg font-medium">
                    <i class="fas fa-check mr-2"></i>Approve
                </button>
            </div>"##,
            id = escape_html(&review.id),
        )
    } else {
        String::new()
    };

    card(
        &format!("Review: {}", escape_html(&review.task_title)),
        &format!(
            r##"<div class="flex flex-wrap gap-6 mb-4 text-sm text-gray-600 dark:text-gray-300">
                <span><i class="fas fa-user mr-1"></i>{student}</span>
                <span><i class="fas fa-clock mr-1"></i>{submitted}</span>
                {status}
            </div>
            <div class="grid grid-cols-3 gap-4 mb-4">
                {passed}
                {failed}
                {rate}
            </div>
            <div class="grid grid-cols-4 gap-4">
                <ul class="col-span-1 space-y-1 text-sm">{files}</ul>
                <div class="col-span-3">{code}</div>
            </div>
            {actions}"##,
            student = escape_html(&review.student_name),
            submitted = review.submitted_at.format("%Y-%m-%d %H:%M"),
            status = status_badge(review.status.as_str()),
            passed = stats_card("Passed", &v.passed.to_string(), "check-circle", "green"),
            failed = stats_card("Failed", &v.failed.to_string(), "times-circle", "red"),
            rate = stats_card("Pass rate", &format!("{}%", v.pass_rate()), "percent", "blue"),
            code = code_block(SAMPLE_SUBMISSION, "html"),
        ),
    )
}

pub fn code_review_page(
    chrome: &Chrome,
    listing: &Listing,
    links: &ListLinks<'_>,
    selected: Option<&CodeReview>,
) -> String {
    let detail = selected.map(review_detail).unwrap_or_default();
    let content = format!(
        r##"{header}
        <div class="bg-white dark:bg-gray-800 rounded-xl shadow-sm border border-gray-200 dark:border-gray-700 overflow-hidden mb-6">
            {table}
            {pager}
        </div>
        {detail}"##,
        header = page_header("Code Review", "Review student submissions", ""),
        table = data_table(&listing.table, links),
        pager = pager(&listing.page, links),
    );
    layout(chrome, "Code Review", &content)
}

// =============================================================================
// Settings
// =============================================================================

pub fn settings_page(chrome: &Chrome, settings: &Settings) -> String {
    let form = format!(
        r##"<form hx-post="/api/settings" hx-swap="none" class="space-y-4">
            {project}
            {per_page}
            {ttl}
            <div class="flex justify-end">
                <button type="submit" class="bg-primary-600 hover:bg-primary-700 text-white px-4 py-2 rounded-lg font-medium">Save Settings</button>
            </div>
        </form>"##,
        project = input("project", "Platform name", "text", &settings.project, "Classdeck"),
        per_page = input(
            "items_per_page",
            "Items per page",
            "number",
            &settings.items_per_page.to_string(),
            "10"
        ),
        ttl = input(
            "toast_ttl_secs",
            "Notification duration (seconds)",
            "number",
            &settings.toast_ttl_secs.to_string(),
            "5"
        ),
    );

    let about = format!(
        r##"<dl class="space-y-3 text-sm">
            <div class="flex justify-between"><dt class="text-gray-500 dark:text-gray-400">Version</dt><dd class="text-gray-900 dark:text-white">{version}</dd></div>
            <div class="flex justify-between"><dt class="text-gray-500 dark:text-gray-400">Storage</dt><dd class="text-gray-900 dark:text-white">In memory</dd></div>
        </dl>
        <p class="mt-4 text-xs text-gray-500 dark:text-gray-400">Changes last until the server restarts.</p>"##,
        version = env!("CARGO_PKG_VERSION"),
    );

    let content = format!(
        r##"{header}
        <div class="grid grid-cols-1 lg:grid-cols-3 gap-6">
            <div class="lg:col-span-2">{general}</div>
            {about}
        </div>"##,
        header = page_header("Settings", "Platform configuration", ""),
        general = card("General", &form),
        about = card("About", &about),
    );
    layout(chrome, "Settings", &content)
}

// =============================================================================
// Not Found
// =============================================================================

pub fn not_found_page(chrome: &Chrome, what: &str, back: (&str, &str)) -> String {
    layout(
        chrome,
        "Not Found",
        &empty_state(
            "exclamation-triangle",
            "Not Found",
            &format!("{what} does not exist."),
            Some(back),
        ),
    )
}

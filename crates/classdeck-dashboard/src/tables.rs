//! Column definitions for the list screens and the shared
//! filter → sort → paginate → render step.

use classdeck_core::models::{CodeReview, Course, Task, User};
use classdeck_grid::{
    Align, CellContent, Column, GridError, PageState, RenderedTable, SortSpec, Table,
};
use serde::Serialize;

use crate::templates::{badge, escape_html, role_badge, status_badge};

/// One rendered page of a list screen.
#[derive(Debug, Clone)]
pub struct Listing {
    pub table: RenderedTable,
    pub page: PageState,
}

/// Sort `records`, clamp `page` to what is left, and render that page.
pub fn list<T: Serialize>(
    table: &Table<T>,
    mut records: Vec<T>,
    sort: Option<&SortSpec>,
    page: usize,
    items_per_page: usize,
) -> Listing {
    if let Some(spec) = sort {
        table.sort(&mut records, spec);
    }
    let page = PageState::clamped(page, items_per_page, records.len());
    Listing {
        table: table.render(page.slice(&records)),
        page,
    }
}

fn delete_button(url: String, confirm: &str) -> String {
    format!(
        r##"<button hx-delete="{url}" hx-confirm="{confirm}" hx-swap="none"
                class="p-2 text-red-600 hover:bg-red-50 dark:hover:bg-red-900/30 rounded-lg" title="Delete">
            <i class="fas fa-trash"></i>
        </button>"##,
        url = escape_html(&url),
        confirm = escape_html(confirm),
    )
}

fn edit_link(href: String) -> String {
    format!(
        r##"<a href="{href}" class="inline-block p-2 text-primary-600 hover:bg-primary-50 dark:hover:bg-primary-900/30 rounded-lg" title="Edit">
            <i class="fas fa-edit"></i>
        </a>"##,
        href = escape_html(&href),
    )
}

pub fn courses() -> Result<Table<Course>, GridError> {
    let table = Table::new(vec![
        Column::field("title.en", "Title").sortable().render(|c: &Course| {
            CellContent::markup(format!(
                r#"<div class="font-medium">{}</div><div class="text-xs text-gray-500 dark:text-gray-400">{}</div>"#,
                escape_html(&c.title.en),
                escape_html(&c.title.ru),
            ))
        }),
        Column::field("slug", "Slug"),
        Column::field("status", "Status")
            .sortable()
            .render(|c: &Course| CellContent::markup(status_badge(c.status.as_str()))),
        Column::field("technologies", "Technologies").render(|c: &Course| {
            CellContent::markup(
                c.technologies
                    .iter()
                    .map(|t| badge(t, "indigo"))
                    .collect::<Vec<_>>()
                    .join(" "),
            )
        }),
        Column::field("lessons_count", "Lessons").sortable().align(Align::Right),
        Column::field("students_count", "Students").sortable().align(Align::Right),
        Column::field("updated_at", "Updated").sortable(),
        Column::field("version", "Version"),
        Column::synthetic("actions", "")
            .align(Align::Right)
            .width("7rem")
            .render(|c: &Course| {
                CellContent::markup(format!(
                    "{}{}",
                    edit_link(format!("/courses?edit={}", urlencoding::encode(&c.id))),
                    delete_button(
                        format!("/api/courses/{}", c.id),
                        "Delete this course and all of its lessons?",
                    ),
                ))
            }),
    ])?;

    Ok(table
        .empty_message("No courses found")
        .row_id(|c| c.id.clone())
        .on_row_click(|c| format!("/lessons?course={}", urlencoding::encode(&c.id))))
}

pub fn tasks() -> Result<Table<Task>, GridError> {
    let table = Table::new(vec![
        Column::field("order", "#").sortable().width("3rem"),
        Column::field("title.en", "Title").sortable(),
        Column::field("type", "Type").sortable(),
        Column::field("difficulty", "Difficulty")
            .sortable()
            .render(|t: &Task| {
                let color = match t.difficulty.as_str() {
                    "easy" => "green",
                    "medium" => "yellow",
                    _ => "red",
                };
                CellContent::markup(badge(t.difficulty.as_str(), color))
            }),
        Column::field("validator_status", "Validator")
            .render(|t: &Task| CellContent::markup(status_badge(t.validator_status.as_str()))),
        Column::field("status", "Status")
            .render(|t: &Task| CellContent::markup(status_badge(t.status.as_str()))),
        Column::field("created_at", "Created").sortable(),
        Column::synthetic("actions", "")
            .align(Align::Right)
            .width("4rem")
            .render(|t: &Task| {
                CellContent::markup(delete_button(format!("/api/tasks/{}", t.id), "Delete this task?"))
            }),
    ])?;

    Ok(table.empty_message("No tasks in this lesson").row_id(|t| t.id.clone()))
}

pub fn users() -> Result<Table<User>, GridError> {
    let table = Table::new(vec![
        Column::field("name", "User").sortable().render(|u: &User| {
            CellContent::markup(format!(
                r#"<div class="flex items-center gap-3">
                    <div class="w-8 h-8 rounded-full bg-primary-100 dark:bg-primary-900/30 text-primary-600 flex items-center justify-center font-medium">{initial}</div>
                    <div><div class="font-medium">{name}</div><div class="text-xs text-gray-500 dark:text-gray-400">{email}</div></div>
                </div>"#,
                initial = escape_html(&u.initial()),
                name = escape_html(&u.name),
                email = escape_html(&u.email),
            ))
        }),
        Column::field("role", "Role")
            .sortable()
            .render(|u: &User| CellContent::markup(role_badge(u.role.as_str()))),
        Column::field("status", "Status")
            .sortable()
            .render(|u: &User| CellContent::markup(status_badge(u.status.as_str()))),
        Column::field("courses_enrolled", "Courses").sortable().align(Align::Right),
        Column::field("tasks_completed", "Tasks").sortable().align(Align::Right),
        Column::field("last_login_at", "Last login").sortable(),
    ])?;

    Ok(table.empty_message("No users found").row_id(|u| u.id.clone()))
}

pub fn reviews() -> Result<Table<CodeReview>, GridError> {
    let table = Table::new(vec![
        Column::field("task_title", "Task").sortable(),
        Column::field("student_name", "Student").sortable(),
        Column::field("submitted_at", "Submitted").sortable().render(|r: &CodeReview| {
            CellContent::text(r.submitted_at.format("%Y-%m-%d %H:%M").to_string())
        }),
        Column::field("validation_results.passed", "Tests")
            .align(Align::Center)
            .render(|r: &CodeReview| {
                let v = r.validation_results;
                let color = if v.failed == 0 { "green" } else { "yellow" };
                CellContent::markup(badge(&format!("{}/{} passed", v.passed, v.total), color))
            }),
        Column::field("status", "Status")
            .render(|r: &CodeReview| CellContent::markup(status_badge(r.status.as_str()))),
        Column::synthetic("actions", "")
            .align(Align::Right)
            .render(|r: &CodeReview| {
                let id = escape_html(&r.id);
                CellContent::markup(format!(
                    r##"<div class="flex justify-end gap-2">
                        <button hx-post="/api/reviews/{id}/request-changes" hx-swap="none"
                                class="p-2 text-yellow-600 hover:bg-yellow-50 dark:hover:bg-yellow-900/30 rounded-lg" title="Request changes">
                            <i class="fas fa-times"></i>
                        </button>
                        <button hx-post="/api/reviews/{id}/approve" hx-swap="none"
                                class="p-2 text-green-600 hover:bg-green-50 dark:hover:bg-green-900/30 rounded-lg" title="Approve">
                            <i class="fas fa-check"></i>
                        </button>
                    </div>"##
                ))
            }),
    ])?;

    Ok(table
        .empty_message("No submissions waiting for review")
        .row_id(|r| r.id.clone())
        .on_row_click(|r| format!("/code-review?review={}", urlencoding::encode(&r.id))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use classdeck_core::Catalog;
    use classdeck_grid::{RowKey, SortDirection, TableBody};

    fn row_keys(listing: &Listing) -> Vec<String> {
        match &listing.table.body {
            TableBody::Rows { rows } => rows.iter().map(|r| r.key.to_string()).collect(),
            TableBody::Placeholder { .. } => vec![],
        }
    }

    #[test]
    fn courses_sort_by_students_descending() {
        let table = courses().unwrap();
        let spec = SortSpec::new("students_count", SortDirection::Desc);
        let listing = list(&table, Catalog::seed().courses, Some(&spec), 1, 10);
        assert_eq!(row_keys(&listing), ["2", "1", "5", "3", "4"]);
    }

    #[test]
    fn non_sortable_column_keeps_catalog_order() {
        let table = courses().unwrap();
        let spec = SortSpec::new("slug", SortDirection::Desc);
        let listing = list(&table, Catalog::seed().courses, Some(&spec), 1, 10);
        assert_eq!(row_keys(&listing), ["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn page_is_clamped_after_the_collection_shrinks() {
        let table = courses().unwrap();
        let listing = list(&table, Catalog::seed().courses, None, 3, 2);
        assert_eq!(listing.page.current_page, 3);
        assert_eq!(row_keys(&listing), ["5"]);

        let mut courses = Catalog::seed().courses;
        courses.pop();
        let listing = list(&table, courses, None, 3, 2);
        assert_eq!(listing.page.current_page, 2);
        assert_eq!(row_keys(&listing), ["3", "4"]);
    }

    #[test]
    fn course_rows_link_to_their_lessons() {
        let table = courses().unwrap();
        let listing = list(&table, Catalog::seed().courses, None, 1, 10);
        let TableBody::Rows { rows } = &listing.table.body else {
            panic!("expected rows");
        };
        assert_eq!(rows[0].key, RowKey::Id("1".to_string()));
        assert_eq!(rows[0].link.as_deref(), Some("/lessons?course=1"));
    }

    #[test]
    fn course_actions_offer_edit_and_delete() {
        let table = courses().unwrap();
        let listing = list(&table, Catalog::seed().courses, None, 1, 10);
        let TableBody::Rows { rows } = &listing.table.body else {
            panic!("expected rows");
        };
        let actions = rows[2].cells.last().unwrap();
        let CellContent::Markup(html) = &actions.content else {
            panic!("expected markup");
        };
        assert!(html.contains(r#"href="/courses?edit=3""#));
        assert!(html.contains(r#"hx-delete="/api/courses/3""#));
    }

    #[test]
    fn user_rows_are_not_clickable() {
        let table = users().unwrap();
        let listing = list(&table, Catalog::seed().users, None, 1, 10);
        let TableBody::Rows { rows } = &listing.table.body else {
            panic!("expected rows");
        };
        assert!(rows.iter().all(|r| !r.is_clickable()));
    }

    #[test]
    fn empty_review_queue_shows_placeholder() {
        let table = reviews().unwrap();
        let listing = list(&table, Vec::new(), None, 1, 10);
        assert_eq!(
            listing.table.body,
            TableBody::Placeholder {
                message: "No submissions waiting for review".to_string(),
                colspan: 6,
            }
        );
        assert_eq!(listing.page.current_page, 1);
    }
}

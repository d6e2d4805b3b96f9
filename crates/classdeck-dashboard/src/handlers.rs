//! Request handlers for the dashboard.

use axum::{
    extract::{Path, Query, State},
    response::Html,
};
use classdeck_core::Catalog;
use classdeck_core::models::ReviewStatus;

use crate::api_types::{ListQuery, StatisticsQuery};
use crate::error::DashboardError;
use crate::pages;
use crate::pages_extra;
use crate::state::AppState;
use crate::tables;
use crate::templates::{Chrome, ListLinks};

fn chrome(state: &AppState, catalog: &Catalog, active: &'static str) -> Chrome {
    Chrome {
        project: state.settings().project,
        active,
        pending_reviews: catalog
            .reviews
            .iter()
            .filter(|r| r.status == ReviewStatus::Pending)
            .count(),
    }
}

fn owned(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

// =============================================================================
// Page Handlers (HTML responses)
// =============================================================================

/// Handler for the dashboard home page.
pub async fn home(State(state): State<AppState>) -> Html<String> {
    let catalog = state.catalog();
    let chrome = chrome(&state, &catalog, "/");
    Html(pages::dashboard_page(&chrome, &catalog))
}

/// Handler for the courses list.
pub async fn courses(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>, DashboardError> {
    let catalog = state.catalog();
    let chrome = chrome(&state, &catalog, "/courses");

    let records: Vec<_> = catalog
        .courses
        .iter()
        .filter(|c| query.search().is_none_or(|q| c.title.matches(q)))
        .filter(|c| query.status().is_none_or(|s| c.status.as_str() == s))
        .cloned()
        .collect();
    let sort = query.sort_spec();
    let listing = tables::list(
        &tables::courses()?,
        records,
        sort.as_ref(),
        query.page(),
        state.items_per_page(),
    );
    let links = ListLinks {
        path: "/courses",
        params: vec![("q", owned(query.search())), ("status", owned(query.status()))],
        sort,
    };

    let editor = match query.edit.as_deref() {
        Some("new") => Some(pages::CourseEditor::New),
        Some(id) => catalog
            .courses
            .iter()
            .find(|c| c.id == id)
            .map(pages::CourseEditor::Existing),
        None => None,
    };

    Ok(Html(pages::courses_page(&chrome, &listing, &links, &query, editor)))
}

/// Handler for the lessons of one course. Defaults to the first course.
pub async fn lessons(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Html<String> {
    let catalog = state.catalog();
    let chrome = chrome(&state, &catalog, "/lessons");
    let course_id = query
        .course
        .clone()
        .or_else(|| catalog.courses.first().map(|c| c.id.clone()));
    Html(pages::lessons_page(&chrome, &catalog, course_id.as_deref()))
}

/// Handler for the tasks of one lesson. Defaults to the first lesson.
pub async fn tasks(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>, DashboardError> {
    let catalog = state.catalog();
    let chrome = chrome(&state, &catalog, "/tasks");
    let lesson = match &query.lesson {
        Some(id) => catalog.lessons.iter().find(|l| l.id == *id),
        None => catalog.lessons.first(),
    };

    let Some(lesson) = lesson else {
        return Ok(Html(pages::tasks_page(&chrome, &catalog, None, None)));
    };
    let sort = query.sort_spec();
    let listing = tables::list(
        &tables::tasks()?,
        catalog.tasks_of(&lesson.id),
        sort.as_ref(),
        query.page(),
        state.items_per_page(),
    );
    let links = ListLinks {
        path: "/tasks",
        params: vec![("lesson", lesson.id.clone())],
        sort,
    };

    Ok(Html(pages::tasks_page(
        &chrome,
        &catalog,
        Some(&lesson.id),
        Some((&listing, &links)),
    )))
}

/// Handler for the users list.
pub async fn users(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>, DashboardError> {
    let catalog = state.catalog();
    let chrome = chrome(&state, &catalog, "/users");

    let needle = query.search().map(str::to_lowercase);
    let records: Vec<_> = catalog
        .users
        .iter()
        .filter(|u| {
            needle.as_deref().is_none_or(|q| {
                u.name.to_lowercase().contains(q) || u.email.to_lowercase().contains(q)
            })
        })
        .filter(|u| query.role().is_none_or(|r| u.role.as_str() == r))
        .filter(|u| query.status().is_none_or(|s| u.status.as_str() == s))
        .cloned()
        .collect();
    let sort = query.sort_spec();
    let listing = tables::list(
        &tables::users()?,
        records,
        sort.as_ref(),
        query.page(),
        state.items_per_page(),
    );
    let links = ListLinks {
        path: "/users",
        params: vec![
            ("q", owned(query.search())),
            ("role", owned(query.role())),
            ("status", owned(query.status())),
        ],
        sort,
    };

    let summary = pages::UserSummary::of(&catalog.users);
    Ok(Html(pages::users_page(&chrome, &listing, &links, &query, summary)))
}

/// Handler for the roles page and permissions matrix.
pub async fn roles(State(state): State<AppState>) -> Html<String> {
    let chrome = chrome(&state, &state.catalog(), "/roles");
    let matrix = state.roles();
    let sections = matrix.sections(state.layout());
    Html(pages_extra::roles_page(&chrome, &matrix, &sections))
}

/// Handler for the statistics page.
pub async fn statistics(
    State(state): State<AppState>,
    Query(query): Query<StatisticsQuery>,
) -> Html<String> {
    let catalog = state.catalog();
    let chrome = chrome(&state, &catalog, "/statistics");
    Html(pages_extra::statistics_page(
        &chrome,
        &catalog.stats,
        &catalog.courses,
        &query,
    ))
}

/// Handler for the code review queue.
pub async fn code_review(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>, DashboardError> {
    let catalog = state.catalog();
    let chrome = chrome(&state, &catalog, "/code-review");

    let sort = query.sort_spec();
    let listing = tables::list(
        &tables::reviews()?,
        catalog.pending_reviews(),
        sort.as_ref(),
        query.page(),
        state.items_per_page(),
    );
    let links = ListLinks {
        path: "/code-review",
        params: Vec::new(),
        sort,
    };
    let selected = query
        .review
        .as_deref()
        .and_then(|id| catalog.reviews.iter().find(|r| r.id == id));

    Ok(Html(pages_extra::code_review_page(&chrome, &listing, &links, selected)))
}

/// Handler for the settings page.
pub async fn settings(State(state): State<AppState>) -> Html<String> {
    let chrome = chrome(&state, &state.catalog(), "/settings");
    Html(pages_extra::settings_page(&chrome, &state.settings()))
}

/// Fallback for unknown paths.
pub async fn not_found(State(state): State<AppState>) -> (axum::http::StatusCode, Html<String>) {
    let chrome = chrome(&state, &state.catalog(), "");
    (
        axum::http::StatusCode::NOT_FOUND,
        Html(pages_extra::not_found_page(&chrome, "This page", ("Back to Dashboard", "/"))),
    )
}

// =============================================================================
// API Handlers (JSON/HTMX responses)
// =============================================================================

pub mod api {
    use super::*;
    use crate::api_types::*;
    use crate::charts::{self, ChartData};
    use axum::{
        Form, Json,
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    use classdeck_notify::Toast;
    use uuid::Uuid;

    /// Tells the page to refresh its toast stack.
    const TOAST_TRIGGER: (&str, &str) = ("HX-Trigger", "toast");

    fn toast_only() -> Response {
        ([TOAST_TRIGGER], "").into_response()
    }

    /// The toast survives the reload because it lives server-side.
    fn toast_and_reload() -> Response {
        ([TOAST_TRIGGER, ("HX-Refresh", "true")], "").into_response()
    }

    pub async fn healthz() -> Json<HealthResponse> {
        Json(HealthResponse {
            ok: true,
            service: "classdeck".to_string(),
        })
    }

    // -------------------------------------------------------------------------
    // Toasts API
    // -------------------------------------------------------------------------

    pub async fn toasts_list(State(state): State<AppState>) -> Json<Vec<Toast>> {
        Json(state.active_toasts())
    }

    pub async fn toast_dismiss(State(state): State<AppState>, Path(id): Path<Uuid>) -> StatusCode {
        if state.dismiss_toast(id) {
            StatusCode::NO_CONTENT
        } else {
            StatusCode::NOT_FOUND
        }
    }

    // -------------------------------------------------------------------------
    // Content API
    // -------------------------------------------------------------------------

    /// Back to the course list once the editor is done; a reload would
    /// reopen it.
    fn toast_and_close_editor() -> Response {
        ([TOAST_TRIGGER, ("HX-Redirect", "/courses")], "").into_response()
    }

    fn course_draft(form: &CourseForm) -> Result<classdeck_core::CourseDraft, DashboardError> {
        form.draft().ok_or_else(|| {
            DashboardError::InvalidRequest(format!("unknown course status '{}'", form.status))
        })
    }

    pub async fn course_create(
        State(state): State<AppState>,
        Form(form): Form<CourseForm>,
    ) -> Result<Response, DashboardError> {
        let draft = course_draft(&form)?;
        let today = chrono::Utc::now().date_naive();
        let id = state.catalog_mut().create_course(draft, today)?.id.clone();
        tracing::info!(course_id = %id, slug = %form.slug.trim(), "course created");
        state.toasts().success("Course created successfully");
        Ok(toast_and_close_editor())
    }

    pub async fn course_update(
        State(state): State<AppState>,
        Path(id): Path<String>,
        Form(form): Form<CourseForm>,
    ) -> Result<Response, DashboardError> {
        let draft = course_draft(&form)?;
        let today = chrono::Utc::now().date_naive();
        state.catalog_mut().update_course(&id, draft, today)?;
        tracing::info!(course_id = %id, "course updated");
        state.toasts().success("Course updated successfully");
        Ok(toast_and_close_editor())
    }

    pub async fn course_delete(
        State(state): State<AppState>,
        Path(id): Path<String>,
    ) -> Result<Response, DashboardError> {
        let course = state
            .catalog_mut()
            .delete_course(&id)
            .ok_or_else(|| DashboardError::NotFound(format!("course '{id}'")))?;
        tracing::info!(course_id = %id, slug = %course.slug, "course deleted");
        state.toasts().success("Course deleted successfully");
        Ok(toast_and_reload())
    }

    pub async fn lesson_delete(
        State(state): State<AppState>,
        Path(id): Path<String>,
    ) -> Result<Response, DashboardError> {
        state
            .catalog_mut()
            .delete_lesson(&id)
            .ok_or_else(|| DashboardError::NotFound(format!("lesson '{id}'")))?;
        tracing::info!(lesson_id = %id, "lesson deleted");
        state.toasts().success("Lesson deleted");
        Ok(toast_and_reload())
    }

    pub async fn lesson_toggle_status(
        State(state): State<AppState>,
        Path(id): Path<String>,
    ) -> Result<Response, DashboardError> {
        let status = state
            .catalog_mut()
            .toggle_lesson_status(&id)
            .ok_or_else(|| DashboardError::NotFound(format!("lesson '{id}'")))?;
        tracing::info!(lesson_id = %id, %status, "lesson status changed");
        state.toasts().success("Lesson status updated");
        Ok(toast_and_reload())
    }

    pub async fn lessons_reorder(
        State(state): State<AppState>,
        Form(form): Form<ReorderForm>,
    ) -> Result<Response, DashboardError> {
        if form.dragged == form.target {
            return Ok(StatusCode::NO_CONTENT.into_response());
        }
        if !state.catalog_mut().reorder_lessons(&form.dragged, &form.target) {
            return Err(DashboardError::InvalidRequest(format!(
                "cannot move lesson '{}' to '{}'",
                form.dragged, form.target
            )));
        }
        tracing::info!(dragged = %form.dragged, target = %form.target, "lessons reordered");
        state.toasts().success("Lesson order updated");
        Ok(toast_and_reload())
    }

    pub async fn task_delete(
        State(state): State<AppState>,
        Path(id): Path<String>,
    ) -> Result<Response, DashboardError> {
        state
            .catalog_mut()
            .delete_task(&id)
            .ok_or_else(|| DashboardError::NotFound(format!("task '{id}'")))?;
        tracing::info!(task_id = %id, "task deleted");
        state.toasts().success("Task deleted");
        Ok(toast_and_reload())
    }

    // -------------------------------------------------------------------------
    // Roles API
    // -------------------------------------------------------------------------

    pub async fn permission_set(
        State(state): State<AppState>,
        Path((role_id, resource, action)): Path<(String, String, String)>,
        Form(form): Form<PermissionForm>,
    ) -> Result<Response, DashboardError> {
        let granted = form.granted();
        if !state.set_permission(&role_id, &resource, &action, granted) {
            tracing::debug!(%role_id, %resource, %action, "ignoring edit of unknown permission");
            return Err(DashboardError::NotFound(format!(
                "permission {resource}.{action} of role '{role_id}'"
            )));
        }
        tracing::info!(%role_id, %resource, %action, granted, "permission updated");
        state.toasts().success("Permission updated");
        Ok(toast_only())
    }

    // -------------------------------------------------------------------------
    // Code Review API
    // -------------------------------------------------------------------------

    fn decide(state: &AppState, id: &str, status: ReviewStatus) -> Result<(), DashboardError> {
        let now = chrono::Utc::now().naive_utc();
        state
            .catalog_mut()
            .decide_review(id, status, now)
            .ok_or_else(|| DashboardError::NotFound(format!("pending review '{id}'")))?;
        tracing::info!(review_id = %id, %status, "review decided");
        Ok(())
    }

    pub async fn review_approve(
        State(state): State<AppState>,
        Path(id): Path<String>,
    ) -> Result<Response, DashboardError> {
        decide(&state, &id, ReviewStatus::Approved)?;
        state.toasts().success("Submission approved");
        Ok(toast_and_reload())
    }

    pub async fn review_request_changes(
        State(state): State<AppState>,
        Path(id): Path<String>,
    ) -> Result<Response, DashboardError> {
        decide(&state, &id, ReviewStatus::ChangesRequested)?;
        state.toasts().warning("Changes requested");
        Ok(toast_and_reload())
    }

    // -------------------------------------------------------------------------
    // Statistics API
    // -------------------------------------------------------------------------

    pub async fn statistics_chart(
        State(state): State<AppState>,
        Path(chart): Path<String>,
    ) -> Result<Json<ChartData>, DashboardError> {
        charts::chart_data(&state.catalog().stats, &chart)
            .map(Json)
            .ok_or_else(|| DashboardError::NotFound(format!("chart '{chart}'")))
    }

    // -------------------------------------------------------------------------
    // Settings API
    // -------------------------------------------------------------------------

    pub async fn settings_update(
        State(state): State<AppState>,
        Form(form): Form<SettingsForm>,
    ) -> Result<Response, DashboardError> {
        let mut settings = state.settings();
        settings.project = form.project.trim().to_string();
        settings.items_per_page = form.items_per_page;
        settings.toast_ttl_secs = form.toast_ttl_secs;
        if settings.project.is_empty() {
            return Err(DashboardError::InvalidRequest(
                "platform name must not be empty".to_string(),
            ));
        }

        state.update_settings(settings)?;
        tracing::info!("settings updated");
        state.toasts().success("Settings saved");
        Ok(toast_and_reload())
    }
}

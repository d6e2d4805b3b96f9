//! Route definitions for the dashboard.

use crate::assets;
use crate::handlers::{self, api};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the dashboard router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Screens
        .route("/", get(handlers::home))
        .route("/courses", get(handlers::courses))
        .route("/lessons", get(handlers::lessons))
        .route("/tasks", get(handlers::tasks))
        .route("/users", get(handlers::users))
        .route("/roles", get(handlers::roles))
        .route("/statistics", get(handlers::statistics))
        .route("/code-review", get(handlers::code_review))
        .route("/settings", get(handlers::settings))
        // API
        .route("/healthz", get(api::healthz))
        .route("/api/toasts", get(api::toasts_list))
        .route("/api/toasts/{id}/dismiss", post(api::toast_dismiss))
        .route("/api/courses", post(api::course_create))
        .route(
            "/api/courses/{id}",
            put(api::course_update).delete(api::course_delete),
        )
        .route("/api/lessons/reorder", post(api::lessons_reorder))
        .route("/api/lessons/{id}", delete(api::lesson_delete))
        .route("/api/lessons/{id}/toggle-status", post(api::lesson_toggle_status))
        .route("/api/tasks/{id}", delete(api::task_delete))
        .route(
            "/api/roles/{role_id}/permissions/{resource}/{action}",
            post(api::permission_set),
        )
        .route("/api/reviews/{id}/approve", post(api::review_approve))
        .route("/api/reviews/{id}/request-changes", post(api::review_request_changes))
        .route("/api/statistics/{chart}", get(api::statistics_chart))
        .route("/api/settings", post(api::settings_update))
        .route("/assets/{*path}", get(assets::serve))
        .fallback(handlers::not_found)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use classdeck_core::{Catalog, ClassdeckConfig};
    use tower::ServiceExt;

    fn state() -> AppState {
        AppState::new(&ClassdeckConfig::default(), Catalog::seed()).unwrap()
    }

    async fn send(state: &AppState, request: Request<Body>) -> Response {
        create_router(state.clone()).oneshot(request).await.unwrap()
    }

    async fn get(state: &AppState, uri: &str) -> Response {
        send(state, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn healthz_reports_service() {
        let response = get(&state(), "/healthz").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&text(response).await).unwrap();
        assert_eq!(body["ok"], true);
        assert_eq!(body["service"], "classdeck");
    }

    #[tokio::test]
    async fn courses_sort_descending_by_students() {
        let response = get(&state(), "/courses?sort=students_count&dir=desc").await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = text(response).await;
        let js = html.find("JavaScript for Beginners").unwrap();
        let react = html.find("Advanced React").unwrap();
        assert!(js < react);
    }

    #[tokio::test]
    async fn page_past_the_end_shows_the_last_page() {
        let state = state();
        let mut settings = state.settings();
        settings.items_per_page = 2;
        state.update_settings(settings).unwrap();

        let html = text(get(&state, "/courses?page=99").await).await;
        assert!(html.contains("TypeScript: Zero to Hero"));
        assert!(!html.contains("Advanced React"));
    }

    #[tokio::test]
    async fn deleting_a_course_toasts_and_reloads() {
        let state = state();
        let response = send(
            &state,
            Request::delete("/api/courses/4").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["HX-Trigger"], "toast");
        assert_eq!(response.headers()["HX-Refresh"], "true");
        assert!(state.catalog().courses.iter().all(|c| c.id != "4"));

        let toasts: serde_json::Value =
            serde_json::from_str(&text(get(&state, "/api/toasts").await).await).unwrap();
        assert_eq!(toasts[0]["text"], "Course deleted successfully");
        assert_eq!(toasts[0]["severity"], "success");

        let again = send(
            &state,
            Request::delete("/api/courses/4").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(again.status(), StatusCode::NOT_FOUND);
    }

    fn form(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn creating_a_course_adds_it_and_toasts() {
        let state = state();
        let response = send(
            &state,
            form(
                "POST",
                "/api/courses",
                "title_en=Rust+in+Practice&title_ru=&slug=rust-in-practice&status=draft&version=0.1.0&technologies=Rust%2C+Tokio",
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["HX-Trigger"], "toast");
        assert_eq!(response.headers()["HX-Redirect"], "/courses");

        let created = state
            .catalog()
            .courses
            .iter()
            .find(|c| c.slug == "rust-in-practice")
            .cloned()
            .unwrap();
        assert_eq!(created.id, "6");
        assert_eq!(created.technologies, ["Rust", "Tokio"]);

        let toasts: serde_json::Value =
            serde_json::from_str(&text(get(&state, "/api/toasts").await).await).unwrap();
        assert_eq!(toasts[0]["text"], "Course created successfully");

        let duplicate = send(
            &state,
            form(
                "POST",
                "/api/courses",
                "title_en=Again&slug=rust-in-practice&status=draft&version=1.0.0",
            ),
        )
        .await;
        assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn updating_a_course_replaces_its_fields() {
        let state = state();
        let response = send(
            &state,
            form(
                "PUT",
                "/api/courses/1",
                "title_en=HTML+%26+CSS&title_ru=HTML+%D0%B8+CSS&slug=html-css&status=archived&version=3.0.0&technologies=HTML",
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        {
            let catalog = state.catalog();
            let course = &catalog.courses[0];
            assert_eq!(course.title.en, "HTML & CSS");
            assert_eq!(course.slug, "html-css");
            assert_eq!(course.status.as_str(), "archived");
            assert_eq!(course.students_count, 1543);
        }
        let toasts: serde_json::Value =
            serde_json::from_str(&text(get(&state, "/api/toasts").await).await).unwrap();
        assert_eq!(toasts[0]["text"], "Course updated successfully");

        let missing = send(
            &state,
            form("PUT", "/api/courses/99", "title_en=X&slug=x&status=draft&version=1"),
        )
        .await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let bad_status = send(
            &state,
            form("PUT", "/api/courses/1", "title_en=X&slug=x&status=published&version=1"),
        )
        .await;
        assert_eq!(bad_status.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn course_editor_opens_from_the_query() {
        let state = state();
        let html = text(get(&state, "/courses?edit=3").await).await;
        assert!(html.contains(r#"hx-put="/api/courses/3""#));
        assert!(html.contains("Edit Course"));

        let html = text(get(&state, "/courses?edit=new").await).await;
        assert!(html.contains("Create New Course"));

        let html = text(get(&state, "/courses").await).await;
        assert!(!html.contains("Create New Course"));
    }

    #[tokio::test]
    async fn users_screen_shows_summary_cards() {
        let html = text(get(&state(), "/users?role=teacher&sort=name&dir=desc").await).await;
        assert!(html.contains("Total Users"));
        assert!(html.contains("Teachers"));
        assert!(html.contains(r#"<input type="hidden" name="sort" value="name">"#));
        assert!(html.contains(r#"<input type="hidden" name="dir" value="desc">"#));
    }

    #[tokio::test]
    async fn checkbox_grants_permission() {
        let state = state();
        let response = send(
            &state,
            Request::post("/api/roles/r3/permissions/courses/update")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("value=on"))
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["HX-Trigger"], "toast");
        assert!(response.headers().get("HX-Refresh").is_none());
        assert_eq!(
            state.roles().get("r3").unwrap().permissions.get("courses", "update"),
            Some(true)
        );

        let unchecked = send(
            &state,
            Request::post("/api/roles/r3/permissions/courses/update")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(unchecked.status(), StatusCode::OK);
        assert_eq!(
            state.roles().get("r3").unwrap().permissions.get("courses", "update"),
            Some(false)
        );
    }

    #[tokio::test]
    async fn unknown_permission_is_not_found() {
        let response = send(
            &state(),
            Request::post("/api/roles/r3/permissions/courses/publish")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("value=on"))
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn chart_series_and_unknown_chart() {
        let state = state();
        let response = get(&state, "/api/statistics/engagement").await;
        assert_eq!(response.status(), StatusCode::OK);
        let chart: serde_json::Value = serde_json::from_str(&text(response).await).unwrap();
        assert_eq!(chart["datasets"].as_array().unwrap().len(), 2);

        let missing = get(&state, "/api/statistics/nope").await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_page_is_not_found() {
        let response = get(&state(), "/nowhere").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(text(response).await.contains("Back to Dashboard"));
    }

    #[tokio::test]
    async fn every_screen_renders() {
        let state = state();
        for uri in [
            "/",
            "/courses",
            "/lessons",
            "/lessons?course=1",
            "/tasks",
            "/users?role=student",
            "/roles",
            "/statistics",
            "/code-review",
            "/code-review?review=r1",
            "/settings",
        ] {
            let response = get(&state, uri).await;
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn reordering_lessons_renumbers() {
        let state = state();
        let response = send(
            &state,
            Request::post("/api/lessons/reorder")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("dragged=l3&target=l1"))
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let order: Vec<String> = state
            .catalog()
            .lessons_of("1")
            .into_iter()
            .map(|l| l.id.clone())
            .collect();
        assert_eq!(order, ["l3", "l1", "l2", "l4"]);
    }

    #[tokio::test]
    async fn assets_are_served_with_content_type() {
        let response = get(&state(), "/assets/app.css").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/css")
        );
        assert_eq!(get(&state(), "/assets/nope.js").await.status(), StatusCode::NOT_FOUND);
    }
}

//! Router tests for paths that are decided before any database query.
//!
//! These run without a database: the app's pool points at a closed port.

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::{
    admin_principal, body_json, flash_messages, form_body, lazy_app, location, session_cookie,
    set_cookie_value, student_principal,
};
use tower::ServiceExt;

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, cookie: Option<&str>, pairs: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(form_body(pairs)).unwrap()
}

// ============================================================================
// Role guard
// ============================================================================

#[tokio::test]
async fn test_anonymous_student_page_redirects_to_login() {
    let response = lazy_app().oneshot(get("/student/", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/auth/login"));
    assert_eq!(
        flash_messages(&response),
        vec!["Please log in to access this page.".to_string()]
    );
}

#[tokio::test]
async fn test_anonymous_admin_page_redirects_to_login() {
    let response = lazy_app()
        .oneshot(get("/admin/analytics", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/auth/login"));
}

#[tokio::test]
async fn test_student_on_admin_page_goes_to_student_home() {
    let cookie = session_cookie(&student_principal(4001));
    let response = lazy_app()
        .oneshot(get("/admin/report", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/student/"));
    let messages = flash_messages(&response);
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("Access denied"));
}

#[tokio::test]
async fn test_admin_on_student_page_goes_to_admin_home() {
    let cookie = session_cookie(&admin_principal());
    let response = lazy_app()
        .oneshot(get("/student/gpa", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin/"));
}

#[tokio::test]
async fn test_tampered_session_counts_as_anonymous() {
    let cookie = format!("{}x", session_cookie(&admin_principal()));
    let response = lazy_app()
        .oneshot(get("/admin/", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/auth/login"));
}

// ============================================================================
// Login pages
// ============================================================================

#[tokio::test]
async fn test_login_page_renders_for_anonymous() {
    let response = lazy_app().oneshot(get("/auth/login", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["action"], "/auth/login");
    assert_eq!(body["notices"], serde_json::json!([]));
}

#[tokio::test]
async fn test_login_page_redirects_when_signed_in() {
    let cookie = session_cookie(&student_principal(4001));
    let response = lazy_app()
        .oneshot(get("/auth/login", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/student/"));
}

#[tokio::test]
async fn test_login_with_empty_password_is_rejected_before_lookup() {
    let response = lazy_app()
        .oneshot(post_form(
            "/auth/login",
            None,
            &[("username", "teststudent"), ("password", "")],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/auth/login"));
    assert_eq!(
        flash_messages(&response),
        vec!["Please enter both username and password.".to_string()]
    );
    assert!(set_cookie_value(&response, "ct_session").is_none());
}

#[tokio::test]
async fn test_logout_clears_session() {
    let cookie = session_cookie(&admin_principal());
    let response = lazy_app()
        .oneshot(get("/auth/logout", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));
    assert_eq!(set_cookie_value(&response, "ct_session").as_deref(), Some(""));
    assert_eq!(
        flash_messages(&response),
        vec!["You have been logged out. Goodbye, testadmin!".to_string()]
    );
}

#[tokio::test]
async fn test_flash_notices_render_once() {
    let logout = lazy_app()
        .oneshot(get("/auth/logout", None))
        .await
        .unwrap();
    let flash = set_cookie_value(&logout, "ct_flash").expect("flash cookie");

    let response = lazy_app()
        .oneshot(get("/", Some(&format!("ct_flash={}", flash))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(set_cookie_value(&response, "ct_flash").as_deref(), Some(""));
    let body = body_json(response).await;
    assert_eq!(body["notices"][0]["level"], "info");
    assert_eq!(body["notices"][0]["message"], "You have been logged out.");
}

// ============================================================================
// Home, enrollment validation, fallbacks
// ============================================================================

#[tokio::test]
async fn test_home_redirects_signed_in_users() {
    let cookie = session_cookie(&admin_principal());
    let response = lazy_app().oneshot(get("/", Some(&cookie))).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin/"));
}

#[tokio::test]
async fn test_enroll_without_section_is_rejected_before_database() {
    let cookie = session_cookie(&student_principal(4001));
    let response = lazy_app()
        .oneshot(post_form(
            "/student/enroll",
            Some(&cookie),
            &[("course_id", "101"), ("section_no", " ")],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/student/courses"));
    assert_eq!(
        flash_messages(&response),
        vec!["Please select both a course and a section.".to_string()]
    );
}

#[tokio::test]
async fn test_drop_with_non_numeric_path_redirects_with_notice() {
    let cookie = session_cookie(&student_principal(4001));
    let response = lazy_app()
        .oneshot(post_form("/student/drop/abc/1", Some(&cookie), &[]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/student/my-courses"));
    assert_eq!(
        flash_messages(&response),
        vec!["Invalid course or section".to_string()]
    );
}

#[tokio::test]
async fn test_unknown_path_is_json_404() {
    let response = lazy_app()
        .oneshot(get("/registrar/secret", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_liveness_and_request_id() {
    let request = Request::builder()
        .uri("/health/live")
        .header("X-Request-ID", "req-42")
        .body(Body::empty())
        .unwrap();
    let response = lazy_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn test_readiness_fails_without_database() {
    let response = lazy_app().oneshot(get("/health/ready", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

//! Login against stored credentials.
//!
//! Requires `TEST_DATABASE_URL`; tests return early when it is unset.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{
    create_test_app, create_test_pool, flash_messages, location, set_cookie_value, TestStudent,
};
use course_tracker_api::services::AuthService;
use domain::models::Role;
use persistence::repositories::CredentialRepository;
use persistence::Gateway;
use sqlx::PgPool;
use tower::ServiceExt;

const PASSWORD: &str = "correct horse battery";

fn auth_service(pool: &PgPool) -> AuthService {
    AuthService::new(CredentialRepository::new(Gateway::new(pool.clone())))
}

fn login_request(username: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("username={}&password={}", username, password)))
        .unwrap()
}

#[tokio::test]
async fn test_authenticate_with_correct_password() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let student = TestStudent::create(&pool).await;
    let username = student.create_account(&pool, PASSWORD).await;

    let principal = auth_service(&pool)
        .authenticate(&username, PASSWORD)
        .await
        .expect("lookup succeeds")
        .expect("credentials match");

    assert_eq!(principal.username, username);
    assert_eq!(principal.role, Role::Student);
    assert_eq!(principal.student_id, Some(student.student_id));

    student.cleanup(&pool).await;
}

#[tokio::test]
async fn test_authenticate_rejects_wrong_password_and_unknown_user() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let student = TestStudent::create(&pool).await;
    let username = student.create_account(&pool, PASSWORD).await;
    let service = auth_service(&pool);

    let wrong = service.authenticate(&username, "not the password").await;
    assert!(matches!(wrong, Ok(None)));

    let unknown = service
        .authenticate("nobody_by_this_name", PASSWORD)
        .await;
    assert!(matches!(unknown, Ok(None)));

    student.cleanup(&pool).await;
}

#[tokio::test]
async fn test_http_login_sets_session_cookie() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let student = TestStudent::create(&pool).await;
    let username = student.create_account(&pool, "hunter2").await;
    let app = create_test_app(pool.clone());

    let response = app
        .clone()
        .oneshot(login_request(&username, "hunter2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/student/"));
    let token = set_cookie_value(&response, "ct_session").expect("session cookie");
    assert!(!token.is_empty());

    let response = app
        .oneshot(login_request(&username, "hunter3"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/auth/login"));
    assert!(set_cookie_value(&response, "ct_session").is_none());
    assert_eq!(
        flash_messages(&response),
        vec!["Invalid username or password. Please try again.".to_string()]
    );

    student.cleanup(&pool).await;
}

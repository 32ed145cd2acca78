//! Common test utilities for integration tests.
//!
//! Router tests use a pool that never connects. Database tests read
//! `TEST_DATABASE_URL`; when it is unset they return early.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use axum::{body::Body, http::header, response::Response, Router};
use course_tracker_api::{
    app::create_app,
    config::{
        BootstrapConfig, Config, DatabaseConfig, LoggingConfig, ServerConfig, SessionConfig,
    },
};
use domain::models::{Principal, Role};
use fake::Fake;
use serde_json::Value;
use shared::password::hash_password;
use shared::session_token::SessionSigner;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Test configuration pointing at a port nothing listens on.
pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5000,
            request_timeout_secs: 30,
        },
        database: DatabaseConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            user: "course_tracker".to_string(),
            password: String::new(),
            name: "course_tracker_test".to_string(),
            max_connections: 2,
            min_connections: 0,
            connect_timeout_secs: 1,
            idle_timeout_secs: 60,
        },
        logging: LoggingConfig {
            level: "warn".to_string(),
            format: "compact".to_string(),
        },
        session: SessionConfig {
            secret_key: TEST_SECRET.to_string(),
            cookie_name: "ct_session".to_string(),
            flash_cookie_name: "ct_flash".to_string(),
            ttl_secs: 3600,
            secure: false,
        },
        bootstrap: BootstrapConfig::default(),
    }
}

/// Router over a pool that connects lazily, for paths decided before any query.
pub fn lazy_app() -> Router {
    let config = test_config();
    let pool = persistence::db::create_lazy_pool(&config.database.pool_config());
    create_app(config, pool).expect("test app")
}

/// Pool for `TEST_DATABASE_URL` with migrations applied, or `None` when unset.
pub async fn create_test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set; skipping database test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    run_migrations(&pool).await;
    Some(pool)
}

pub async fn run_migrations(pool: &PgPool) {
    sqlx::migrate!("../persistence/src/migrations")
        .run(pool)
        .await
        .expect("Failed to run migrations");
}

pub fn create_test_app(pool: PgPool) -> Router {
    create_app(test_config(), pool).expect("test app")
}

pub fn student_principal(student_id: i32) -> Principal {
    Principal {
        user_id: 1,
        username: "teststudent".to_string(),
        role: Role::Student,
        student_id: Some(student_id),
        student_name: Some("Test Student".to_string()),
    }
}

pub fn admin_principal() -> Principal {
    Principal {
        user_id: 2,
        username: "testadmin".to_string(),
        role: Role::Admin,
        student_id: None,
        student_name: None,
    }
}

/// `Cookie` header value carrying a session signed with the test secret.
pub fn session_cookie(principal: &Principal) -> String {
    let signer = SessionSigner::new(TEST_SECRET, 3600).expect("signer");
    format!("ct_session={}", signer.issue(principal).expect("token"))
}

pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

pub fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok().map(str::to_string))
        .collect()
}

/// Value of the named cookie set on the response, if any.
pub fn set_cookie_value(response: &Response, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    set_cookies(response).into_iter().find_map(|cookie| {
        cookie
            .strip_prefix(&prefix)
            .and_then(|rest| rest.split(';').next())
            .map(str::to_string)
    })
}

/// Messages of the flash notices set on a redirect.
pub fn flash_messages(response: &Response) -> Vec<String> {
    set_cookie_value(response, "ct_flash")
        .map(|value| {
            course_tracker_api::extractors::flash::decode_notices(&value)
                .into_iter()
                .map(|n| n.message)
                .collect()
        })
        .unwrap_or_default()
}

pub async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}

pub fn form_body(pairs: &[(&str, &str)]) -> Body {
    let encoded = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");
    Body::from(encoded)
}

/// A student row with a random id, for tests that write enrollments.
pub struct TestStudent {
    pub student_id: i32,
}

impl TestStudent {
    pub async fn create(pool: &PgPool) -> Self {
        let student_id: i32 = (900_000..999_999).fake();
        sqlx::query(
            "INSERT INTO student (student_id, name, major_dept_id, enrollment_year) VALUES ($1, $2, 1, 2025)",
        )
        .bind(student_id)
        .bind(format!("Fixture Student {}", student_id))
        .execute(pool)
        .await
        .expect("insert fixture student");
        Self { student_id }
    }

    /// Records a finished course; completed rows bypass the enrollment rules.
    pub async fn complete(&self, pool: &PgPool, course_id: i32, section_no: i32, grade: &str) {
        sqlx::query(
            r#"
            INSERT INTO enrolls_in (student_id, course_id, section_no, status, grade, enrolled_date)
            VALUES ($1, $2, $3, 'completed', $4, DATE '2024-09-02')
            "#,
        )
        .bind(self.student_id)
        .bind(course_id)
        .bind(section_no)
        .bind(grade)
        .execute(pool)
        .await
        .expect("insert completed course");
    }

    /// Login account linked to this student. Returns the username.
    pub async fn create_account(&self, pool: &PgPool, password: &str) -> String {
        let username = format!("fixture_{}", self.student_id);
        let hash = hash_password(password).expect("hash");
        sqlx::query(
            "INSERT INTO app_users (username, password_hash, role, student_id) VALUES ($1, $2, 'student', $3)",
        )
        .bind(&username)
        .bind(hash)
        .bind(self.student_id)
        .execute(pool)
        .await
        .expect("insert fixture account");
        username
    }

    /// Marks the active enrollment in a section as withdrawn.
    pub async fn withdraw(&self, pool: &PgPool, course_id: i32, section_no: i32) {
        sqlx::query(
            r#"
            UPDATE enrolls_in SET status = 'withdrawn'
            WHERE student_id = $1 AND course_id = $2 AND section_no = $3 AND status = 'enrolled'
            "#,
        )
        .bind(self.student_id)
        .bind(course_id)
        .bind(section_no)
        .execute(pool)
        .await
        .expect("withdraw enrollment");
    }

    /// Rows for a section in any status.
    pub async fn all_rows(&self, pool: &PgPool, course_id: i32, section_no: i32) -> i64 {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM enrolls_in WHERE student_id = $1 AND course_id = $2 AND section_no = $3",
        )
        .bind(self.student_id)
        .bind(course_id)
        .bind(section_no)
        .fetch_one(pool)
        .await
        .expect("count rows")
    }

    pub async fn active_rows(&self, pool: &PgPool, course_id: i32, section_no: i32) -> i64 {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM enrolls_in
            WHERE student_id = $1 AND course_id = $2 AND section_no = $3 AND status = 'enrolled'
            "#,
        )
        .bind(self.student_id)
        .bind(course_id)
        .bind(section_no)
        .fetch_one(pool)
        .await
        .expect("count enrollments")
    }

    pub async fn cleanup(self, pool: &PgPool) {
        for sql in [
            "DELETE FROM app_users WHERE student_id = $1",
            "DELETE FROM enrolls_in WHERE student_id = $1",
            "DELETE FROM student WHERE student_id = $1",
        ] {
            sqlx::query(sql)
                .bind(self.student_id)
                .execute(pool)
                .await
                .expect("cleanup fixture student");
        }

        sqlx::query(
            r#"
            UPDATE section AS s
               SET num_enrolled = (
                       SELECT COUNT(*)::INTEGER FROM enrolls_in AS e
                        WHERE e.course_id = s.course_id
                          AND e.section_no = s.section_no
                          AND e.status = 'enrolled'
                   )
            "#,
        )
        .execute(pool)
        .await
        .expect("recount seats");
    }
}

pub async fn num_enrolled(pool: &PgPool, course_id: i32, section_no: i32) -> i32 {
    sqlx::query_scalar("SELECT num_enrolled FROM section WHERE course_id = $1 AND section_no = $2")
        .bind(course_id)
        .bind(section_no)
        .fetch_one(pool)
        .await
        .expect("section row")
}

/// `CURRENT_DATE` as the database sees it.
pub async fn database_today(pool: &PgPool) -> chrono::NaiveDate {
    sqlx::query_scalar("SELECT CURRENT_DATE")
        .fetch_one(pool)
        .await
        .expect("current date")
}

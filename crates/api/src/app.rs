use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use persistence::repositories::{
    CatalogRepository, CredentialRepository, EnrollmentRepository, ReportRepository,
};
use persistence::Gateway;
use shared::session_token::{SessionSigner, SessionTokenError};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::Config;
use crate::error::not_found;
use crate::middleware::{
    init_metrics, metrics_handler, metrics_middleware, require_admin, require_student, trace_id,
};
use crate::routes::{admin, auth, health, home, student};
use crate::services::{AuthService, CookieHelper, EnrollmentService, ReportingService};

/// Shared request state: the pool, immutable configuration and the services built on them.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub signer: SessionSigner,
    pub cookies: CookieHelper,
    pub auth: AuthService,
    pub enrollment: EnrollmentService,
    pub reporting: ReportingService,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool) -> Result<Self, SessionTokenError> {
        let signer = SessionSigner::new(&config.session.secret_key, config.session.ttl_secs)?;
        let cookies = CookieHelper::new(&config.session);
        let gateway = Gateway::new(pool.clone());
        let enrollments = EnrollmentRepository::new(gateway.clone());

        Ok(Self {
            auth: AuthService::new(CredentialRepository::new(gateway.clone())),
            enrollment: EnrollmentService::new(enrollments.clone()),
            reporting: ReportingService::new(
                CatalogRepository::new(gateway.clone()),
                enrollments,
                ReportRepository::new(gateway),
            ),
            pool,
            config: Arc::new(config),
            signer,
            cookies,
        })
    }
}

pub fn create_app(config: Config, pool: PgPool) -> Result<Router, SessionTokenError> {
    init_metrics();

    let timeout = Duration::from_secs(config.server.request_timeout_secs);
    let state = AppState::new(config, pool)?;

    let student_routes = Router::new()
        .route("/student/", get(student::dashboard))
        .route("/student/courses", get(student::courses))
        .route("/student/my-courses", get(student::my_courses))
        .route(
            "/student/enroll",
            get(student::enroll_form).post(student::enroll),
        )
        .route(
            "/student/drop/:course_id/:section_no",
            post(student::drop_course),
        )
        .route("/student/gpa", get(student::gpa))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_student));

    let admin_routes = Router::new()
        .route("/admin/", get(admin::dashboard))
        .route("/admin/analytics", get(admin::analytics))
        .route("/admin/statistics", get(admin::statistics))
        .route("/admin/students", get(admin::students))
        .route("/admin/courses", get(admin::courses))
        .route("/admin/report", get(admin::salary_report))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    let public_routes = Router::new()
        .route("/", get(home::index))
        .route("/auth/login", get(auth::login_page).post(auth::login))
        .route("/auth/logout", get(auth::logout))
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .route("/metrics", get(metrics_handler));

    Ok(Router::new()
        .merge(public_routes)
        .merge(student_routes)
        .merge(admin_routes)
        .fallback(not_found)
        // Global middleware (bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(timeout))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .with_state(state))
}

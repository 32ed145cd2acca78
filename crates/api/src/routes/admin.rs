//! Admin area: dashboard, analytics, statistics, rosters and the salary report.

use axum::{extract::State, response::Response};
use domain::models::AdminOverview;
use serde::Serialize;

use crate::app::AppState;
use crate::extractors::{CurrentPrincipal, Flash};
use crate::services::Report;

use super::render;

#[derive(Debug, Serialize)]
pub struct AdminDashboardView {
    pub username: String,
    pub overview: AdminOverview,
}

/// `GET /admin/`
pub async fn dashboard(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    flash: Flash,
) -> Response {
    let report = state.reporting.admin_overview().await;
    render(
        flash,
        Report {
            view: AdminDashboardView {
                username: principal.username,
                overview: report.view,
            },
            failures: report.failures,
        },
    )
}

/// `GET /admin/analytics`
pub async fn analytics(State(state): State<AppState>, flash: Flash) -> Response {
    render(flash, state.reporting.grade_analytics().await)
}

/// `GET /admin/statistics`
pub async fn statistics(State(state): State<AppState>, flash: Flash) -> Response {
    render(flash, state.reporting.enrollment_statistics().await)
}

/// `GET /admin/students`
pub async fn students(State(state): State<AppState>, flash: Flash) -> Response {
    render(flash, state.reporting.students().await)
}

/// `GET /admin/courses`
pub async fn courses(State(state): State<AppState>, flash: Flash) -> Response {
    render(flash, state.reporting.courses().await)
}

/// `GET /admin/report`
pub async fn salary_report(State(state): State<AppState>, flash: Flash) -> Response {
    render(flash, state.reporting.salary_report().await)
}

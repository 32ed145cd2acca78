//! Student area: dashboard, catalog, own courses, enrollment and GPA.

use axum::{
    extract::{Path, Query, State},
    response::Response,
    Form,
};
use domain::models::{EnrollForm, EnrollmentRejection, GpaSummary, Principal, StudentOverview};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::extractors::{CurrentPrincipal, Flash, Notice};
use crate::services::{EnrollmentError, Report};

use super::render;

const MY_COURSES_PATH: &str = "/student/my-courses";
const COURSES_PATH: &str = "/student/courses";

#[derive(Debug, Serialize)]
pub struct Viewer {
    pub username: String,
    pub display_name: String,
    pub student_id: Option<i32>,
}

impl From<&Principal> for Viewer {
    fn from(p: &Principal) -> Self {
        Self {
            username: p.username.clone(),
            display_name: p.display_name().to_string(),
            student_id: p.student_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub viewer: Viewer,
    pub overview: StudentOverview,
}

#[derive(Debug, Serialize)]
pub struct GpaView {
    pub viewer: Viewer,
    #[serde(flatten)]
    pub summary: GpaSummary,
}

/// Query string for `GET /student/enroll`.
#[derive(Debug, Default, Deserialize)]
pub struct EnrollQuery {
    pub course_id: Option<String>,
    pub section_no: Option<String>,
}

/// Student accounts are always linked to a student row; a session without one is stale.
fn linked_student(principal: &Principal, flash: Flash) -> Result<i32, Response> {
    principal.student_id.ok_or_else(|| {
        tracing::error!(user_id = principal.user_id, "Student session without a student id");
        flash
            .with(Notice::error(
                "Your account is not linked to a student record. Please log in again.",
            ))
            .redirect("/auth/logout")
    })
}

/// `GET /student/`
pub async fn dashboard(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    flash: Flash,
) -> Response {
    let student_id = match linked_student(&principal, flash.clone()) {
        Ok(id) => id,
        Err(redirect) => return redirect,
    };

    let report = state.reporting.student_overview(student_id).await;
    render(
        flash,
        Report {
            view: DashboardView {
                viewer: Viewer::from(&principal),
                overview: report.view,
            },
            failures: report.failures,
        },
    )
}

/// `GET /student/courses`
pub async fn courses(State(state): State<AppState>, flash: Flash) -> Response {
    render(flash, state.reporting.catalog().await)
}

/// `GET /student/my-courses`
pub async fn my_courses(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    flash: Flash,
) -> Response {
    let student_id = match linked_student(&principal, flash.clone()) {
        Ok(id) => id,
        Err(redirect) => return redirect,
    };
    render(flash, state.reporting.my_courses(student_id).await)
}

/// `GET /student/enroll`
pub async fn enroll_form(
    State(state): State<AppState>,
    mut flash: Flash,
    Query(query): Query<EnrollQuery>,
) -> Response {
    let requested = query.course_id.is_some() || query.section_no.is_some();
    let form = EnrollForm {
        course_id: query.course_id,
        section_no: query.section_no,
    };

    let selected = match form.selection() {
        Ok(key) => Some(key),
        Err(_) if requested => {
            flash.push(Notice::error("Invalid course or section"));
            None
        }
        Err(_) => None,
    };

    let report = state.reporting.enroll_form(selected).await;
    if selected.is_some() && report.view.selected.is_none() && report.failures.is_empty() {
        flash.push(Notice::error("Course not found"));
    }
    render(flash, report)
}

/// `POST /student/enroll`
pub async fn enroll(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    flash: Flash,
    Form(form): Form<EnrollForm>,
) -> Response {
    let student_id = match linked_student(&principal, flash.clone()) {
        Ok(id) => id,
        Err(redirect) => return redirect,
    };

    match state.enrollment.enroll(student_id, &form).await {
        Ok(key) => flash
            .with(Notice::success(format!(
                "Successfully enrolled in course {} section {}!",
                key.course_id, key.section_no
            )))
            .redirect(MY_COURSES_PATH),
        Err(err) => flash
            .with(Notice::error(err.user_message()))
            .redirect(COURSES_PATH),
    }
}

/// `POST /student/drop/:course_id/:section_no`
pub async fn drop_course(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    mut flash: Flash,
    Path((course_id, section_no)): Path<(String, String)>,
) -> Response {
    let student_id = match linked_student(&principal, flash.clone()) {
        Ok(id) => id,
        Err(redirect) => return redirect,
    };
    let selection = EnrollForm {
        course_id: Some(course_id),
        section_no: Some(section_no),
    }
    .selection();
    let key = match selection {
        Ok(key) => key,
        Err(_) => {
            flash.push(Notice::error("Invalid course or section"));
            return flash.redirect(MY_COURSES_PATH);
        }
    };

    match state.enrollment.drop(student_id, key).await {
        Ok(outcome) => {
            if outcome.rows_affected > 0 {
                flash.push(Notice::success("Course dropped."));
            } else {
                flash.push(Notice::info("You had no active enrollment in that section."));
            }
            if !outcome.seats_refreshed {
                flash.push(Notice::warning(
                    "Seat counts could not be refreshed and may be out of date.",
                ));
            }
        }
        Err(EnrollmentError::Rejected(EnrollmentRejection::Unclassified(raw))) => {
            flash.push(Notice::error(format!("Could not drop course: {}", raw)));
        }
        Err(err) => {
            flash.push(Notice::error(err.user_message()));
        }
    }
    flash.redirect(MY_COURSES_PATH)
}

/// `GET /student/gpa`
pub async fn gpa(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    flash: Flash,
) -> Response {
    let student_id = match linked_student(&principal, flash.clone()) {
        Ok(id) => id,
        Err(redirect) => return redirect,
    };

    let report = state.reporting.gpa(student_id).await;
    render(
        flash,
        Report {
            view: GpaView {
                viewer: Viewer::from(&principal),
                summary: report.view,
            },
            failures: report.failures,
        },
    )
}

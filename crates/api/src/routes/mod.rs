//! HTTP route handlers.

pub mod admin;
pub mod auth;
pub mod health;
pub mod home;
pub mod student;

use axum::response::Response;
use serde::Serialize;

use crate::extractors::{Flash, Notice};
use crate::services::Report;

/// Renders a report page with one error notice per part that failed to load.
pub(crate) fn render<T: Serialize>(mut flash: Flash, report: Report<T>) -> Response {
    for message in report.failure_messages() {
        flash.push(Notice::error(message));
    }
    flash.page(report.view)
}

//! Enrollment workflow: enroll in a section or drop one.
//!
//! Business rules live in the `enrolls_in_validate` trigger. This service
//! validates the selection, keeps seat counts fresh, and turns an engine
//! refusal into one [`EnrollmentRejection`].

use domain::models::{DropOutcome, EnrollForm, EnrollmentRejection, SectionKey};
use domain::services::classify_rejection;
use persistence::repositories::EnrollmentRepository;
use persistence::GatewayError;
use thiserror::Error;

use crate::middleware::metrics::record_enrollment_attempt;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnrollmentError {
    /// The request was refused for a reason the student can act on.
    #[error("{0}")]
    Rejected(EnrollmentRejection),

    /// The database could not be reached.
    #[error("database unavailable: {0}")]
    Unavailable(String),
}

impl EnrollmentError {
    pub fn user_message(&self) -> String {
        match self {
            EnrollmentError::Rejected(rejection) => rejection.user_message(),
            EnrollmentError::Unavailable(_) => {
                "The course database is unavailable right now. Please try again shortly."
                    .to_string()
            }
        }
    }

    fn outcome(&self) -> &'static str {
        match self {
            EnrollmentError::Rejected(rejection) => rejection.code(),
            EnrollmentError::Unavailable(_) => "unavailable",
        }
    }
}

impl From<GatewayError> for EnrollmentError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Unavailable(detail) => EnrollmentError::Unavailable(detail),
            GatewayError::Engine { code, message } => {
                EnrollmentError::Rejected(classify_rejection(code.as_deref(), &message))
            }
        }
    }
}

#[derive(Clone)]
pub struct EnrollmentService {
    enrollments: EnrollmentRepository,
}

impl EnrollmentService {
    pub fn new(enrollments: EnrollmentRepository) -> Self {
        Self { enrollments }
    }

    /// Enrolls the student in the selected section.
    pub async fn enroll(
        &self,
        student_id: i32,
        form: &EnrollForm,
    ) -> Result<SectionKey, EnrollmentError> {
        let result = self.try_enroll(student_id, form).await;

        match &result {
            Ok(key) => {
                record_enrollment_attempt("enrolled");
                tracing::info!(
                    student_id,
                    course_id = key.course_id,
                    section_no = key.section_no,
                    "Enrollment created"
                );
            }
            Err(err) => {
                record_enrollment_attempt(err.outcome());
                match err {
                    EnrollmentError::Rejected(rejection) => tracing::info!(
                        student_id,
                        reason = rejection.code(),
                        "Enrollment rejected"
                    ),
                    EnrollmentError::Unavailable(detail) => tracing::error!(
                        student_id,
                        error = %detail,
                        "Enrollment failed: database unavailable"
                    ),
                }
            }
        }

        result
    }

    async fn try_enroll(
        &self,
        student_id: i32,
        form: &EnrollForm,
    ) -> Result<SectionKey, EnrollmentError> {
        let key = form.selection().map_err(EnrollmentError::Rejected)?;

        // The count refresh is advisory; the insert trigger is authoritative.
        if self.enrollments.refresh_seats(key).await.is_none() {
            tracing::warn!(
                course_id = key.course_id,
                section_no = key.section_no,
                "Seat count refresh failed before enrollment"
            );
        }

        self.enrollments.enroll(student_id, key).await?;
        Ok(key)
    }

    /// Drops the student's active enrollment in `key`, then refreshes the seat count.
    ///
    /// Dropping something that is not an active enrollment succeeds with zero
    /// rows. A failed refresh does not undo the delete.
    pub async fn drop(
        &self,
        student_id: i32,
        key: SectionKey,
    ) -> Result<DropOutcome, EnrollmentError> {
        let rows_affected = self
            .enrollments
            .drop_active(student_id, key)
            .await
            .map_err(|err| match err {
                GatewayError::Unavailable(detail) => EnrollmentError::Unavailable(detail),
                GatewayError::Engine { message, .. } => {
                    EnrollmentError::Rejected(EnrollmentRejection::Unclassified(message))
                }
            })?;

        let seats_refreshed = self.enrollments.refresh_seats(key).await.is_some();
        if !seats_refreshed {
            tracing::warn!(
                course_id = key.course_id,
                section_no = key.section_no,
                "Seat count refresh failed after drop"
            );
        }

        tracing::info!(
            student_id,
            course_id = key.course_id,
            section_no = key.section_no,
            rows_affected,
            "Enrollment dropped"
        );

        Ok(DropOutcome {
            rows_affected,
            seats_refreshed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(code: Option<&str>, message: &str) -> GatewayError {
        GatewayError::Engine {
            code: code.map(str::to_string),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_trigger_codes_become_rejections() {
        let err: EnrollmentError = engine(Some("CT003"), "Section 310-1 is full").into();
        assert_eq!(err, EnrollmentError::Rejected(EnrollmentRejection::SectionFull));

        let err: EnrollmentError = engine(Some("23505"), "duplicate key value").into();
        assert_eq!(
            err,
            EnrollmentError::Rejected(EnrollmentRejection::AlreadyEnrolled)
        );
    }

    #[test]
    fn test_unknown_engine_error_keeps_raw_message() {
        let err: EnrollmentError = engine(Some("23503"), "violates foreign key constraint").into();
        assert_eq!(
            err,
            EnrollmentError::Rejected(EnrollmentRejection::Unclassified(
                "violates foreign key constraint".to_string()
            ))
        );
        assert_eq!(err.outcome(), "enrollment_failed");
    }

    #[test]
    fn test_unavailable_is_not_a_rejection() {
        let err: EnrollmentError = GatewayError::Unavailable("pool timed out".to_string()).into();
        assert!(matches!(err, EnrollmentError::Unavailable(_)));
        assert_eq!(err.outcome(), "unavailable");
        assert!(!err.user_message().contains("pool"));
    }

    #[test]
    fn test_rejection_user_message_passes_through() {
        let err = EnrollmentError::Rejected(EnrollmentRejection::PrerequisiteNotMet);
        assert_eq!(
            err.user_message(),
            "You have not completed the prerequisites for this course."
        );
    }
}

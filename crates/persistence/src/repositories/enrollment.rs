//! Enrollment repository: seat accounting, enroll, drop and per-student views.

use domain::models::{EnrollmentRecord, SectionKey, StudentCourse, StudentOverview};

use crate::entities::{
    EnrollmentEntity, SeatCountEntity, StudentCourseEntity, StudentOverviewEntity,
};
use crate::gateway::{Gateway, GatewayError, SqlParam};

/// Name of the seat-accounting routine.
pub const REFRESH_SECTION_SEATS: &str = "refresh_section_seats";

#[derive(Clone)]
pub struct EnrollmentRepository {
    gateway: Gateway,
}

impl EnrollmentRepository {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Recompute a section's enrolled count.
    ///
    /// `None` when the routine failed; `Some(None)` for an unknown section.
    pub async fn refresh_seats(&self, key: SectionKey) -> Option<Option<SeatCountEntity>> {
        let result_sets = self
            .gateway
            .call_procedure::<SeatCountEntity>(REFRESH_SECTION_SEATS, &key_params(key))
            .await?;
        Some(result_sets.into_iter().flatten().next())
    }

    /// Insert an active enrollment dated today. The enrollment trigger decides.
    pub async fn enroll(&self, student_id: i32, key: SectionKey) -> Result<u64, GatewayError> {
        self.gateway
            .run_mutation(
                r#"
                INSERT INTO enrolls_in (student_id, course_id, section_no, status, grade, enrolled_date)
                VALUES ($1, $2, $3, 'enrolled', NULL, CURRENT_DATE)
                "#,
                &[
                    SqlParam::Int(student_id),
                    SqlParam::Int(key.course_id),
                    SqlParam::Int(key.section_no),
                ],
            )
            .await
    }

    /// Delete the student's active enrollment in a section. Returns rows deleted.
    pub async fn drop_active(&self, student_id: i32, key: SectionKey) -> Result<u64, GatewayError> {
        self.gateway
            .run_mutation(
                r#"
                DELETE FROM enrolls_in
                WHERE student_id = $1
                  AND course_id = $2
                  AND section_no = $3
                  AND status = 'enrolled'
                "#,
                &[
                    SqlParam::Int(student_id),
                    SqlParam::Int(key.course_id),
                    SqlParam::Int(key.section_no),
                ],
            )
            .await
    }

    /// The student's active enrollment in a section, if any.
    pub async fn find_active(
        &self,
        student_id: i32,
        key: SectionKey,
    ) -> Option<Option<EnrollmentRecord>> {
        let row = self
            .gateway
            .query_one::<EnrollmentEntity>(
                r#"
                SELECT student_id, course_id, section_no, status, grade, enrolled_date
                FROM enrolls_in
                WHERE student_id = $1 AND course_id = $2 AND section_no = $3
                  AND status = 'enrolled'
                "#,
                &[
                    SqlParam::Int(student_id),
                    SqlParam::Int(key.course_id),
                    SqlParam::Int(key.section_no),
                ],
            )
            .await?;
        Some(row.map(Into::into))
    }

    /// Every enrollment the student has, newest first.
    pub async fn courses_for_student(&self, student_id: i32) -> Option<Vec<StudentCourse>> {
        let rows = self
            .gateway
            .query_all::<StudentCourseEntity>(
                r#"
                SELECT
                    c.course_id,
                    c.title,
                    c.credits,
                    e.section_no,
                    COALESCE(
                        (SELECT string_agg(cl.code, ' / ' ORDER BY cl.code)
                           FROM cross_lists cl
                          WHERE cl.course_id = c.course_id),
                        ''
                    ) AS code,
                    e.status,
                    e.grade,
                    e.enrolled_date
                FROM enrolls_in e
                JOIN course c ON c.course_id = e.course_id
                WHERE e.student_id = $1
                ORDER BY e.enrolled_date DESC, c.title
                "#,
                &[SqlParam::Int(student_id)],
            )
            .await?;
        Some(rows.into_iter().map(Into::into).collect())
    }

    /// Counts for the student landing page.
    pub async fn student_overview(&self, student_id: i32) -> Option<StudentOverview> {
        let row = self
            .gateway
            .query_one::<StudentOverviewEntity>(
                r#"
                SELECT
                    COUNT(*) FILTER (WHERE e.status = 'enrolled') AS active_enrollments,
                    COUNT(*) FILTER (WHERE e.status = 'completed') AS completed_courses,
                    COALESCE(SUM(c.credits) FILTER (WHERE e.status = 'completed'), 0)::BIGINT
                        AS completed_credits
                FROM enrolls_in e
                JOIN course c ON c.course_id = e.course_id
                WHERE e.student_id = $1
                "#,
                &[SqlParam::Int(student_id)],
            )
            .await?;
        Some(row.map(Into::into).unwrap_or_default())
    }
}

fn key_params(key: SectionKey) -> [SqlParam; 2] {
    [SqlParam::Int(key.course_id), SqlParam::Int(key.section_no)]
}

//! Enrollment entities (database row mappings).

use chrono::NaiveDate;
use domain::models::{EnrollmentRecord, EnrollmentStatus, LetterGrade, StudentCourse};
use sqlx::FromRow;

/// Database enum for enrollment_status that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "enrollment_status", rename_all = "lowercase")]
pub enum EnrollmentStatusDb {
    Enrolled,
    Completed,
    Withdrawn,
}

impl From<EnrollmentStatusDb> for EnrollmentStatus {
    fn from(db_status: EnrollmentStatusDb) -> Self {
        match db_status {
            EnrollmentStatusDb::Enrolled => EnrollmentStatus::Enrolled,
            EnrollmentStatusDb::Completed => EnrollmentStatus::Completed,
            EnrollmentStatusDb::Withdrawn => EnrollmentStatus::Withdrawn,
        }
    }
}

/// Database row mapping for the enrolls_in table.
#[derive(Debug, Clone, FromRow)]
pub struct EnrollmentEntity {
    pub student_id: i32,
    pub course_id: i32,
    pub section_no: i32,
    pub status: EnrollmentStatusDb,
    pub grade: Option<String>,
    pub enrolled_date: NaiveDate,
}

impl From<EnrollmentEntity> for EnrollmentRecord {
    fn from(entity: EnrollmentEntity) -> Self {
        Self {
            student_id: entity.student_id,
            course_id: entity.course_id,
            section_no: entity.section_no,
            status: entity.status.into(),
            grade: LetterGrade::parse_stored(entity.grade.as_deref()),
            enrolled_date: entity.enrolled_date,
        }
    }
}

/// A student's enrollment joined with its course and cross-listing.
#[derive(Debug, Clone, FromRow)]
pub struct StudentCourseEntity {
    pub course_id: i32,
    pub title: String,
    pub credits: i32,
    pub section_no: i32,
    pub code: String,
    pub status: EnrollmentStatusDb,
    pub grade: Option<String>,
    pub enrolled_date: NaiveDate,
}

impl From<StudentCourseEntity> for StudentCourse {
    fn from(entity: StudentCourseEntity) -> Self {
        Self {
            course_id: entity.course_id,
            title: entity.title,
            credits: entity.credits,
            section_no: entity.section_no,
            code: entity.code,
            status: entity.status.into(),
            grade: LetterGrade::parse_stored(entity.grade.as_deref()),
            enrolled_date: entity.enrolled_date,
        }
    }
}

/// Row returned by `refresh_section_seats`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct SeatCountEntity {
    pub course_id: i32,
    pub section_no: i32,
    pub capacity: i32,
    pub num_enrolled: i32,
    pub open_seats: i32,
}

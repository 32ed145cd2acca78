//! Read-only course catalog projections.

use chrono::NaiveDate;
use serde::Serialize;

use super::enrollment::EnrollmentStatus;
use super::grade::LetterGrade;

/// One section in the catalog, with its cross-listing and staff.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub course_id: i32,
    pub title: String,
    pub credits: i32,
    pub building: Option<String>,
    pub section_no: i32,
    pub capacity: i32,
    pub num_enrolled: i32,
    pub open_seats: i32,
    pub code: String,
    pub dept_name: String,
    pub professors: Option<String>,
    pub teaching_assistants: Option<String>,
}

/// A section offered on the enrollment form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionAvailability {
    pub course_id: i32,
    pub title: String,
    pub section_no: i32,
    pub capacity: i32,
    pub num_enrolled: i32,
    pub open_seats: i32,
}

impl SectionAvailability {
    pub fn is_full(&self) -> bool {
        self.open_seats <= 0
    }
}

/// Detail of the section preselected on the enrollment form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionDetail {
    pub course_id: i32,
    pub title: String,
    pub credits: i32,
    pub section_no: i32,
    pub capacity: i32,
    pub code: String,
}

/// A row on the student's "my courses" page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentCourse {
    pub course_id: i32,
    pub title: String,
    pub credits: i32,
    pub section_no: i32,
    pub code: String,
    pub status: EnrollmentStatus,
    pub grade: Option<LetterGrade>,
    pub enrolled_date: NaiveDate,
}

impl StudentCourse {
    /// Only active enrollments can be dropped.
    pub fn can_drop(&self) -> bool {
        self.status == EnrollmentStatus::Enrolled
    }
}

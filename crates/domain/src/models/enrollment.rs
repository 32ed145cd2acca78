//! Enrollment records, the enrollment form and its rejection categories.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::grade::LetterGrade;

lazy_static! {
    static ref NUMERIC_KEY: Regex = Regex::new(r"^[0-9]{1,9}$").expect("static regex");
}

/// Lifecycle status of an enrollment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Enrolled,
    Completed,
    Withdrawn,
}

impl EnrollmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::Enrolled => "enrolled",
            EnrollmentStatus::Completed => "completed",
            EnrollmentStatus::Withdrawn => "withdrawn",
        }
    }
}

impl FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "enrolled" => Ok(EnrollmentStatus::Enrolled),
            "completed" => Ok(EnrollmentStatus::Completed),
            "withdrawn" => Ok(EnrollmentStatus::Withdrawn),
            _ => Err(format!("Invalid enrollment status: {}", s)),
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A student's relationship to one course section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrollmentRecord {
    pub student_id: i32,
    pub course_id: i32,
    pub section_no: i32,
    pub status: EnrollmentStatus,
    pub grade: Option<LetterGrade>,
    pub enrolled_date: NaiveDate,
}

/// Raw `POST /student/enroll` form. Both fields arrive as optional text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnrollForm {
    pub course_id: Option<String>,
    pub section_no: Option<String>,
}

/// A validated course/section pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionKey {
    pub course_id: i32,
    pub section_no: i32,
}

impl EnrollForm {
    /// Validates the form before any database work.
    ///
    /// Absent, blank and non-numeric values are all "no selection".
    pub fn selection(&self) -> Result<SectionKey, EnrollmentRejection> {
        let course_id = parse_key(self.course_id.as_deref());
        let section_no = parse_key(self.section_no.as_deref());

        match (course_id, section_no) {
            (Some(course_id), Some(section_no)) => Ok(SectionKey {
                course_id,
                section_no,
            }),
            _ => Err(EnrollmentRejection::MissingSelection),
        }
    }
}

fn parse_key(raw: Option<&str>) -> Option<i32> {
    let value = raw?.trim();
    if !NUMERIC_KEY.is_match(value) {
        return None;
    }
    value.parse().ok()
}

/// Why an enrollment attempt did not create a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "category", content = "detail", rename_all = "snake_case")]
pub enum EnrollmentRejection {
    /// Course or section was not chosen.
    MissingSelection,
    /// The student already holds an active enrollment for this course.
    AlreadyEnrolled,
    /// A prerequisite course has not been completed.
    PrerequisiteNotMet,
    /// The section has no open seats.
    SectionFull,
    /// The student has already completed this course.
    AlreadyCompleted,
    /// An engine error no rule recognised; carries the raw message.
    Unclassified(String),
}

impl EnrollmentRejection {
    /// Stable machine-readable category.
    pub fn code(&self) -> &'static str {
        match self {
            EnrollmentRejection::MissingSelection => "missing_selection",
            EnrollmentRejection::AlreadyEnrolled => "already_enrolled",
            EnrollmentRejection::PrerequisiteNotMet => "prerequisite_not_met",
            EnrollmentRejection::SectionFull => "section_full",
            EnrollmentRejection::AlreadyCompleted => "already_completed",
            EnrollmentRejection::Unclassified(_) => "enrollment_failed",
        }
    }

    /// Guidance shown to the student.
    pub fn user_message(&self) -> String {
        match self {
            EnrollmentRejection::MissingSelection => {
                "Please select both a course and a section.".to_string()
            }
            EnrollmentRejection::AlreadyEnrolled => {
                "You are already enrolled in this course.".to_string()
            }
            EnrollmentRejection::PrerequisiteNotMet => {
                "You have not completed the prerequisites for this course.".to_string()
            }
            EnrollmentRejection::SectionFull => {
                "This section is full. Please choose another section.".to_string()
            }
            EnrollmentRejection::AlreadyCompleted => {
                "You have already completed this course.".to_string()
            }
            EnrollmentRejection::Unclassified(raw) => format!("Enrollment failed: {}", raw),
        }
    }
}

impl fmt::Display for EnrollmentRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

/// Result of a drop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DropOutcome {
    /// Rows deleted; zero when nothing active matched.
    pub rows_affected: u64,
    /// Whether the seat-accounting refresh after the delete succeeded.
    pub seats_refreshed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(course: Option<&str>, section: Option<&str>) -> EnrollForm {
        EnrollForm {
            course_id: course.map(str::to_string),
            section_no: section.map(str::to_string),
        }
    }

    #[test]
    fn test_selection_parses_trimmed_numbers() {
        let key = form(Some(" 101 "), Some("2")).selection().unwrap();
        assert_eq!(
            key,
            SectionKey {
                course_id: 101,
                section_no: 2
            }
        );
    }

    #[test]
    fn test_selection_missing_fields() {
        for f in [
            form(None, Some("1")),
            form(Some("101"), None),
            form(Some(""), Some("1")),
            form(Some("101"), Some("   ")),
            form(None, None),
        ] {
            assert_eq!(f.selection(), Err(EnrollmentRejection::MissingSelection));
        }
    }

    #[test]
    fn test_selection_rejects_non_numeric() {
        assert_eq!(
            form(Some("CS101"), Some("1")).selection(),
            Err(EnrollmentRejection::MissingSelection)
        );
        assert_eq!(
            form(Some("-5"), Some("1")).selection(),
            Err(EnrollmentRejection::MissingSelection)
        );
        assert_eq!(
            form(Some("101"), Some("99999999999")).selection(),
            Err(EnrollmentRejection::MissingSelection)
        );
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            EnrollmentStatus::Enrolled,
            EnrollmentStatus::Completed,
            EnrollmentStatus::Withdrawn,
        ] {
            assert_eq!(status.as_str().parse::<EnrollmentStatus>().unwrap(), status);
        }
        assert!("dropped".parse::<EnrollmentStatus>().is_err());
    }

    #[test]
    fn test_unclassified_surfaces_raw_message() {
        let rejection = EnrollmentRejection::Unclassified("deadlock detected".to_string());
        assert_eq!(rejection.code(), "enrollment_failed");
        assert!(rejection.user_message().contains("deadlock detected"));
    }

    #[test]
    fn test_rejection_serializes_with_category_tag() {
        let json = serde_json::to_value(EnrollmentRejection::SectionFull).unwrap();
        assert_eq!(json["category"], "section_full");
    }
}

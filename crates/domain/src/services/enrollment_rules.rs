//! Mapping of write-time rejections onto enrollment categories.
//!
//! The `enrolls_in` trigger raises one custom SQLSTATE per rule. Those codes
//! are matched first; free-text matching is the fallback for errors raised
//! by anything else (constraint names, hand-written SQL, older schemas).

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::enrollment::EnrollmentRejection;

/// SQLSTATE codes raised by the `enrolls_in_validate` trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionCode {
    AlreadyEnrolled,
    PrerequisiteNotMet,
    SectionFull,
    AlreadyCompleted,
}

impl RejectionCode {
    pub const ALL: [RejectionCode; 4] = [
        RejectionCode::AlreadyEnrolled,
        RejectionCode::PrerequisiteNotMet,
        RejectionCode::SectionFull,
        RejectionCode::AlreadyCompleted,
    ];

    pub fn sqlstate(&self) -> &'static str {
        match self {
            RejectionCode::AlreadyEnrolled => "CT001",
            RejectionCode::PrerequisiteNotMet => "CT002",
            RejectionCode::SectionFull => "CT003",
            RejectionCode::AlreadyCompleted => "CT004",
        }
    }

    pub fn from_sqlstate(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.sqlstate() == code)
    }

    fn rejection(&self) -> EnrollmentRejection {
        match self {
            RejectionCode::AlreadyEnrolled => EnrollmentRejection::AlreadyEnrolled,
            RejectionCode::PrerequisiteNotMet => EnrollmentRejection::PrerequisiteNotMet,
            RejectionCode::SectionFull => EnrollmentRejection::SectionFull,
            RejectionCode::AlreadyCompleted => EnrollmentRejection::AlreadyCompleted,
        }
    }
}

/// PostgreSQL `unique_violation`; the `enrolls_in` primary key.
const UNIQUE_VIOLATION: &str = "23505";

lazy_static! {
    // Order is the classification priority.
    static ref MESSAGE_RULES: Vec<(Regex, RejectionCode)> = vec![
        (
            Regex::new(r"(?i)already\s+enrolled|duplicate").expect("static regex"),
            RejectionCode::AlreadyEnrolled,
        ),
        (
            Regex::new(r"(?i)prerequisite").expect("static regex"),
            RejectionCode::PrerequisiteNotMet,
        ),
        (
            Regex::new(r"(?i)section\s+is\s+full|\bfull\b|capacity|no\s+open\s+seats")
                .expect("static regex"),
            RejectionCode::SectionFull,
        ),
        (
            Regex::new(r"(?i)already\s+completed|completed").expect("static regex"),
            RejectionCode::AlreadyCompleted,
        ),
    ];
}

/// Classifies an engine error raised by the enrollment insert.
///
/// Exactly one category is returned. Structured codes win; otherwise the
/// message is matched in priority order: duplicate, prerequisite, full,
/// completed. Anything else is `Unclassified` with the raw message.
pub fn classify_rejection(sqlstate: Option<&str>, message: &str) -> EnrollmentRejection {
    if let Some(code) = sqlstate {
        if let Some(rule) = RejectionCode::from_sqlstate(code) {
            return rule.rejection();
        }
        if code == UNIQUE_VIOLATION {
            return EnrollmentRejection::AlreadyEnrolled;
        }
    }

    MESSAGE_RULES
        .iter()
        .find(|(pattern, _)| pattern.is_match(message))
        .map(|(_, code)| code.rejection())
        .unwrap_or_else(|| EnrollmentRejection::Unclassified(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_codes() {
        assert_eq!(
            classify_rejection(Some("CT001"), "anything"),
            EnrollmentRejection::AlreadyEnrolled
        );
        assert_eq!(
            classify_rejection(Some("CT002"), "anything"),
            EnrollmentRejection::PrerequisiteNotMet
        );
        assert_eq!(
            classify_rejection(Some("CT003"), "anything"),
            EnrollmentRejection::SectionFull
        );
        assert_eq!(
            classify_rejection(Some("CT004"), "anything"),
            EnrollmentRejection::AlreadyCompleted
        );
    }

    #[test]
    fn test_code_beats_message() {
        // The message mentions a prerequisite but the trigger said "full".
        assert_eq!(
            classify_rejection(Some("CT003"), "prerequisite check passed; section is full"),
            EnrollmentRejection::SectionFull
        );
    }

    #[test]
    fn test_unique_violation_is_duplicate() {
        assert_eq!(
            classify_rejection(
                Some("23505"),
                "duplicate key value violates unique constraint \"enrolls_in_pkey\""
            ),
            EnrollmentRejection::AlreadyEnrolled
        );
    }

    #[test]
    fn test_message_fallback() {
        assert_eq!(
            classify_rejection(Some("P0001"), "Student is ALREADY ENROLLED in this course"),
            EnrollmentRejection::AlreadyEnrolled
        );
        assert_eq!(
            classify_rejection(None, "Prerequisite not satisfied: CS 101"),
            EnrollmentRejection::PrerequisiteNotMet
        );
        assert_eq!(
            classify_rejection(None, "Section is full"),
            EnrollmentRejection::SectionFull
        );
        assert_eq!(
            classify_rejection(None, "Course already completed by student"),
            EnrollmentRejection::AlreadyCompleted
        );
    }

    #[test]
    fn test_message_priority_order() {
        // Mentions both a duplicate and a full section: duplicate wins.
        assert_eq!(
            classify_rejection(None, "duplicate enrollment; section is full"),
            EnrollmentRejection::AlreadyEnrolled
        );
        // Prerequisite outranks completion wording.
        assert_eq!(
            classify_rejection(None, "prerequisite CS 101 not completed"),
            EnrollmentRejection::PrerequisiteNotMet
        );
    }

    #[test]
    fn test_unrecognised_keeps_raw_message() {
        let raw = "could not serialize access due to concurrent update";
        assert_eq!(
            classify_rejection(Some("40001"), raw),
            EnrollmentRejection::Unclassified(raw.to_string())
        );
    }

    #[test]
    fn test_sqlstate_roundtrip() {
        for code in RejectionCode::ALL {
            assert_eq!(RejectionCode::from_sqlstate(code.sqlstate()), Some(code));
        }
        assert_eq!(RejectionCode::from_sqlstate("CT999"), None);
    }
}

//! Credit-weighted GPA.

use crate::models::grade::LetterGrade;
use crate::models::report::{CompletedCourseRow, GpaSummary, GradedCourse};

/// Credit-weighted grade-point average.
///
/// Returns `None` when the credit sum is zero, so a student with no graded
/// work has no GPA rather than a GPA of zero.
pub fn compute_gpa<I>(graded: I) -> Option<f64>
where
    I: IntoIterator<Item = (LetterGrade, i32)>,
{
    let (weighted, credits) = graded
        .into_iter()
        .fold((0.0_f64, 0_i64), |(weighted, credits), (grade, hours)| {
            (
                weighted + grade.points() * f64::from(hours),
                credits + i64::from(hours),
            )
        });

    if credits <= 0 {
        return None;
    }
    Some(weighted / credits as f64)
}

/// Builds the GPA page model from completed-course rows.
///
/// Rows without a recognised letter grade are not eligible and are dropped
/// before weighting.
pub fn summarize_gpa(rows: Vec<CompletedCourseRow>) -> GpaSummary {
    let courses: Vec<GradedCourse> = rows
        .into_iter()
        .filter_map(|row| {
            row.grade.map(|grade| GradedCourse {
                course_id: row.course_id,
                title: row.title,
                credits: row.credits,
                grade,
            })
        })
        .collect();

    let gpa = compute_gpa(courses.iter().map(|c| (c.grade, c.credits)));
    let total_credits = courses.iter().map(|c| i64::from(c.credits)).sum();

    GpaSummary {
        gpa,
        total_credits,
        courses,
    }
}

//! Rows for the GPA page and the admin dashboards.

use chrono::NaiveDate;
use serde::Serialize;

use super::grade::LetterGrade;

/// A completed, graded course counted towards GPA.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradedCourse {
    pub course_id: i32,
    pub title: String,
    pub credits: i32,
    pub grade: LetterGrade,
}

/// GPA page model.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GpaSummary {
    /// `None` when no graded credits exist.
    pub gpa: Option<f64>,
    pub total_credits: i64,
    pub courses: Vec<GradedCourse>,
}

/// Average grade for one course.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseGradeStat {
    pub course_id: i32,
    pub title: String,
    pub avg_grade: f64,
    pub student_count: i64,
}

/// Average grade across everything one professor teaches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfessorGradeStat {
    pub employee_id: i32,
    pub name: String,
    pub avg_grade: f64,
    pub student_count: i64,
    pub courses_taught: i64,
}

/// Row of the `completed_student_courses` view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedCourseRow {
    pub student_id: i32,
    pub student_name: String,
    pub course_id: i32,
    pub title: String,
    pub credits: i32,
    pub grade: Option<LetterGrade>,
}

/// Row of the `current_student_enrollments` view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentEnrollmentRow {
    pub student_id: i32,
    pub student_name: String,
    pub course_id: i32,
    pub title: String,
    pub section_no: i32,
    pub enrolled_date: NaiveDate,
}

/// Admin analytics page model.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GradeAnalytics {
    pub course_grades: Vec<CourseGradeStat>,
    pub professor_grades: Vec<ProfessorGradeStat>,
    pub completed_courses: Vec<CompletedCourseRow>,
    pub current_enrollments: Vec<CurrentEnrollmentRow>,
}

/// Employee salary against the average for the same role.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryComparison {
    pub employee_id: i32,
    pub name: String,
    pub role: String,
    pub salary: f64,
    pub average_salary: f64,
    pub difference: f64,
}

/// Result of `average_department_salary` for one department.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentSalary {
    pub dept_id: i32,
    pub name: String,
    pub average_salary: f64,
}

/// Salary report page model.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalaryReport {
    pub employees: Vec<SalaryComparison>,
    pub department_averages: Vec<DepartmentSalary>,
}

/// Enrollment totals for one department.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentStatistics {
    pub dept_id: i32,
    pub name: String,
    pub course_count: i64,
    pub active_enrollments: i64,
    pub completed_enrollments: i64,
}

/// Capacity use of one section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionUtilization {
    pub course_id: i32,
    pub title: String,
    pub section_no: i32,
    pub capacity: i32,
    pub num_enrolled: i32,
    pub open_seats: i32,
    /// Enrolled over capacity, in `[0, 1]`; zero for zero-capacity sections.
    pub fill_rate: f64,
}

/// Admin statistics page model.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnrollmentStatistics {
    pub departments: Vec<DepartmentStatistics>,
    pub sections: Vec<SectionUtilization>,
}

/// A student with academic totals for the admin roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentStanding {
    pub student_id: i32,
    pub name: String,
    pub major: Option<String>,
    pub active_enrollments: i64,
    pub completed_credits: i64,
    pub gpa: Option<f64>,
}

/// Counts shown on the admin landing page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdminOverview {
    pub students: i64,
    pub courses: i64,
    pub sections: i64,
    pub active_enrollments: i64,
}

/// Counts shown on the student landing page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StudentOverview {
    pub active_enrollments: i64,
    pub completed_courses: i64,
    pub completed_credits: i64,
}

/// Share of `capacity` taken by `num_enrolled`, clamped to `[0, 1]`.
pub fn fill_rate(num_enrolled: i32, capacity: i32) -> f64 {
    if capacity <= 0 {
        return 0.0;
    }
    (f64::from(num_enrolled) / f64::from(capacity)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rate() {
        assert_eq!(fill_rate(15, 30), 0.5);
        assert_eq!(fill_rate(30, 30), 1.0);
        assert_eq!(fill_rate(0, 0), 0.0);
        assert_eq!(fill_rate(35, 30), 1.0);
    }
}

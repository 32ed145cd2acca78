//! Reporting entities (database row mappings).

use chrono::NaiveDate;
use domain::models::{
    fill_rate, AdminOverview, CompletedCourseRow, CourseGradeStat, CurrentEnrollmentRow,
    DepartmentSalary, DepartmentStatistics, LetterGrade, ProfessorGradeStat, SalaryComparison,
    SectionUtilization, StudentOverview, StudentStanding,
};
use sqlx::FromRow;

/// Row of the `completed_student_courses` view.
#[derive(Debug, Clone, FromRow)]
pub struct CompletedCourseEntity {
    pub student_id: i32,
    pub student_name: String,
    pub course_id: i32,
    pub title: String,
    pub credits: i32,
    pub grade: Option<String>,
}

impl From<CompletedCourseEntity> for CompletedCourseRow {
    fn from(entity: CompletedCourseEntity) -> Self {
        Self {
            student_id: entity.student_id,
            student_name: entity.student_name,
            course_id: entity.course_id,
            title: entity.title,
            credits: entity.credits,
            grade: LetterGrade::parse_stored(entity.grade.as_deref()),
        }
    }
}

/// Row of the `current_student_enrollments` view.
#[derive(Debug, Clone, FromRow)]
pub struct CurrentEnrollmentEntity {
    pub student_id: i32,
    pub student_name: String,
    pub course_id: i32,
    pub title: String,
    pub section_no: i32,
    pub enrolled_date: NaiveDate,
}

impl From<CurrentEnrollmentEntity> for CurrentEnrollmentRow {
    fn from(entity: CurrentEnrollmentEntity) -> Self {
        Self {
            student_id: entity.student_id,
            student_name: entity.student_name,
            course_id: entity.course_id,
            title: entity.title,
            section_no: entity.section_no,
            enrolled_date: entity.enrolled_date,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct CourseGradeEntity {
    pub course_id: i32,
    pub title: String,
    pub avg_grade: f64,
    pub student_count: i64,
}

impl From<CourseGradeEntity> for CourseGradeStat {
    fn from(entity: CourseGradeEntity) -> Self {
        Self {
            course_id: entity.course_id,
            title: entity.title,
            avg_grade: entity.avg_grade,
            student_count: entity.student_count,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ProfessorGradeEntity {
    pub employee_id: i32,
    pub name: String,
    pub avg_grade: f64,
    pub student_count: i64,
    pub courses_taught: i64,
}

impl From<ProfessorGradeEntity> for ProfessorGradeStat {
    fn from(entity: ProfessorGradeEntity) -> Self {
        Self {
            employee_id: entity.employee_id,
            name: entity.name,
            avg_grade: entity.avg_grade,
            student_count: entity.student_count,
            courses_taught: entity.courses_taught,
        }
    }
}

/// Employee salary next to the average of everyone with the same role.
#[derive(Debug, Clone, FromRow)]
pub struct SalaryComparisonEntity {
    pub employee_id: i32,
    pub name: String,
    pub role: String,
    pub salary: f64,
    pub average_salary: f64,
    pub difference: f64,
}

impl From<SalaryComparisonEntity> for SalaryComparison {
    fn from(entity: SalaryComparisonEntity) -> Self {
        Self {
            employee_id: entity.employee_id,
            name: entity.name,
            role: entity.role,
            salary: entity.salary,
            average_salary: entity.average_salary,
            difference: entity.difference,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DepartmentEntity {
    pub dept_id: i32,
    pub name: String,
}

impl DepartmentEntity {
    pub fn with_average(self, average_salary: f64) -> DepartmentSalary {
        DepartmentSalary {
            dept_id: self.dept_id,
            name: self.name,
            average_salary,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DepartmentStatisticsEntity {
    pub dept_id: i32,
    pub name: String,
    pub course_count: i64,
    pub active_enrollments: i64,
    pub completed_enrollments: i64,
}

impl From<DepartmentStatisticsEntity> for DepartmentStatistics {
    fn from(entity: DepartmentStatisticsEntity) -> Self {
        Self {
            dept_id: entity.dept_id,
            name: entity.name,
            course_count: entity.course_count,
            active_enrollments: entity.active_enrollments,
            completed_enrollments: entity.completed_enrollments,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct SectionUtilizationEntity {
    pub course_id: i32,
    pub title: String,
    pub section_no: i32,
    pub capacity: i32,
    pub num_enrolled: i32,
}

impl From<SectionUtilizationEntity> for SectionUtilization {
    fn from(entity: SectionUtilizationEntity) -> Self {
        Self {
            course_id: entity.course_id,
            title: entity.title,
            section_no: entity.section_no,
            capacity: entity.capacity,
            num_enrolled: entity.num_enrolled,
            open_seats: (entity.capacity - entity.num_enrolled).max(0),
            fill_rate: fill_rate(entity.num_enrolled, entity.capacity),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct StudentStandingEntity {
    pub student_id: i32,
    pub name: String,
    pub major: Option<String>,
    pub active_enrollments: i64,
    pub completed_credits: i64,
    pub gpa: Option<f64>,
}

impl From<StudentStandingEntity> for StudentStanding {
    fn from(entity: StudentStandingEntity) -> Self {
        Self {
            student_id: entity.student_id,
            name: entity.name,
            major: entity.major,
            active_enrollments: entity.active_enrollments,
            completed_credits: entity.completed_credits,
            gpa: entity.gpa,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct AdminOverviewEntity {
    pub students: i64,
    pub courses: i64,
    pub sections: i64,
    pub active_enrollments: i64,
}

impl From<AdminOverviewEntity> for AdminOverview {
    fn from(entity: AdminOverviewEntity) -> Self {
        Self {
            students: entity.students,
            courses: entity.courses,
            sections: entity.sections,
            active_enrollments: entity.active_enrollments,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct StudentOverviewEntity {
    pub active_enrollments: i64,
    pub completed_courses: i64,
    pub completed_credits: i64,
}

impl From<StudentOverviewEntity> for StudentOverview {
    fn from(entity: StudentOverviewEntity) -> Self {
        Self {
            active_enrollments: entity.active_enrollments,
            completed_courses: entity.completed_courses,
            completed_credits: entity.completed_credits,
        }
    }
}

//! Domain models for Course Tracker.

pub mod catalog;
pub mod credentials;
pub mod enrollment;
pub mod grade;
pub mod principal;
pub mod report;

pub use catalog::{CatalogEntry, SectionAvailability, SectionDetail, StudentCourse};
pub use credentials::LoginForm;
pub use enrollment::{
    DropOutcome, EnrollForm, EnrollmentRecord, EnrollmentRejection, EnrollmentStatus, SectionKey,
};
pub use grade::LetterGrade;
pub use principal::{Principal, Role};
pub use report::{
    fill_rate, AdminOverview, CompletedCourseRow, CourseGradeStat, CurrentEnrollmentRow,
    DepartmentSalary, DepartmentStatistics, EnrollmentStatistics, GpaSummary, GradeAnalytics,
    GradedCourse, ProfessorGradeStat, SalaryComparison, SalaryReport, SectionUtilization,
    StudentOverview, StudentStanding,
};

//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod catalog;
pub mod credential;
pub mod enrollment;
pub mod report;

pub use catalog::{CatalogEntryEntity, SectionAvailabilityEntity, SectionDetailEntity};
pub use credential::{CredentialEntity, RoleDb};
pub use enrollment::{
    EnrollmentEntity, EnrollmentStatusDb, SeatCountEntity, StudentCourseEntity,
};
pub use report::{
    AdminOverviewEntity, CompletedCourseEntity, CourseGradeEntity, CurrentEnrollmentEntity,
    DepartmentEntity, DepartmentStatisticsEntity, ProfessorGradeEntity, SalaryComparisonEntity,
    SectionUtilizationEntity, StudentOverviewEntity, StudentStandingEntity,
};

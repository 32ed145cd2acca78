//! Read-only page models for the student and admin areas.
//!
//! Every query is independent: one that fails contributes an empty
//! collection and its name in [`Report::failures`], and the page still
//! renders with whatever else loaded.

use domain::models::{
    AdminOverview, CatalogEntry, EnrollmentStatistics, GpaSummary, GradeAnalytics,
    SalaryReport, SectionAvailability, SectionDetail, SectionKey, StudentCourse,
    StudentOverview, StudentStanding,
};
use domain::services::summarize_gpa;
use persistence::repositories::{CatalogRepository, EnrollmentRepository, ReportRepository};
use serde::Serialize;

/// Rows shown in each of the admin analytics listings.
pub const ANALYTICS_ROW_LIMIT: i64 = 50;

/// A page model plus the names of the parts that failed to load.
#[derive(Debug, Clone)]
pub struct Report<T> {
    pub view: T,
    pub failures: Vec<&'static str>,
}

impl<T> Report<T> {
    fn new(view: T, failures: Vec<&'static str>) -> Self {
        Self { view, failures }
    }

    /// One notice text per failed part.
    pub fn failure_messages(&self) -> Vec<String> {
        self.failures
            .iter()
            .map(|what| format!("Could not load {}. Please try again later.", what))
            .collect()
    }
}

fn loaded<T: Default>(
    failures: &mut Vec<&'static str>,
    what: &'static str,
    value: Option<T>,
) -> T {
    value.unwrap_or_else(|| {
        failures.push(what);
        T::default()
    })
}

#[derive(Debug, Serialize)]
pub struct CatalogView {
    pub courses: Vec<CatalogEntry>,
}

#[derive(Debug, Serialize)]
pub struct MyCoursesView {
    pub courses: Vec<StudentCourse>,
}

#[derive(Debug, Serialize)]
pub struct EnrollFormView {
    pub sections: Vec<SectionAvailability>,
    pub selected: Option<SectionDetail>,
}

#[derive(Debug, Serialize)]
pub struct StudentsView {
    pub students: Vec<StudentStanding>,
}

#[derive(Debug, Serialize)]
pub struct CoursesView {
    pub sections: Vec<SectionAvailability>,
}

#[derive(Clone)]
pub struct ReportingService {
    catalog: CatalogRepository,
    enrollments: EnrollmentRepository,
    reports: ReportRepository,
}

impl ReportingService {
    pub fn new(
        catalog: CatalogRepository,
        enrollments: EnrollmentRepository,
        reports: ReportRepository,
    ) -> Self {
        Self {
            catalog,
            enrollments,
            reports,
        }
    }

    pub async fn student_overview(&self, student_id: i32) -> Report<StudentOverview> {
        let mut failures = Vec::new();
        let overview = loaded(
            &mut failures,
            "your enrollment summary",
            self.enrollments.student_overview(student_id).await,
        );
        Report::new(overview, failures)
    }

    pub async fn catalog(&self) -> Report<CatalogView> {
        let mut failures = Vec::new();
        let courses = loaded(&mut failures, "the course catalog", self.catalog.catalog().await);
        Report::new(CatalogView { courses }, failures)
    }

    pub async fn my_courses(&self, student_id: i32) -> Report<MyCoursesView> {
        let mut failures = Vec::new();
        let courses = loaded(
            &mut failures,
            "your courses",
            self.enrollments.courses_for_student(student_id).await,
        );
        Report::new(MyCoursesView { courses }, failures)
    }

    /// Sections to choose from, plus detail for a preselected section.
    pub async fn enroll_form(&self, selected: Option<SectionKey>) -> Report<EnrollFormView> {
        let mut failures = Vec::new();
        let sections = loaded(&mut failures, "available sections", self.catalog.sections().await);

        let selected = match selected {
            Some(key) => loaded(
                &mut failures,
                "the selected section",
                self.catalog.section_detail(key).await,
            ),
            None => None,
        };

        Report::new(EnrollFormView { sections, selected }, failures)
    }

    pub async fn gpa(&self, student_id: i32) -> Report<GpaSummary> {
        let mut failures = Vec::new();
        let rows = loaded(
            &mut failures,
            "your completed courses",
            self.reports.completed_for_student(student_id).await,
        );
        Report::new(summarize_gpa(rows), failures)
    }

    pub async fn admin_overview(&self) -> Report<AdminOverview> {
        let mut failures = Vec::new();
        let overview = loaded(&mut failures, "dashboard counts", self.reports.admin_overview().await);
        Report::new(overview, failures)
    }

    pub async fn grade_analytics(&self) -> Report<GradeAnalytics> {
        let mut failures = Vec::new();
        let view = GradeAnalytics {
            course_grades: loaded(
                &mut failures,
                "course grade averages",
                self.reports.course_grades().await,
            ),
            professor_grades: loaded(
                &mut failures,
                "professor grade averages",
                self.reports.professor_grades().await,
            ),
            completed_courses: loaded(
                &mut failures,
                "completed courses",
                self.reports.completed_courses(ANALYTICS_ROW_LIMIT).await,
            ),
            current_enrollments: loaded(
                &mut failures,
                "current enrollments",
                self.reports.current_enrollments(ANALYTICS_ROW_LIMIT).await,
            ),
        };
        Report::new(view, failures)
    }

    pub async fn enrollment_statistics(&self) -> Report<EnrollmentStatistics> {
        let mut failures = Vec::new();
        let view = EnrollmentStatistics {
            departments: loaded(
                &mut failures,
                "department statistics",
                self.reports.department_statistics().await,
            ),
            sections: loaded(
                &mut failures,
                "section utilization",
                self.reports.section_utilization().await,
            ),
        };
        Report::new(view, failures)
    }

    pub async fn students(&self) -> Report<StudentsView> {
        let mut failures = Vec::new();
        let students = loaded(&mut failures, "students", self.reports.student_standings().await);
        Report::new(StudentsView { students }, failures)
    }

    pub async fn courses(&self) -> Report<CoursesView> {
        let mut failures = Vec::new();
        let sections = loaded(&mut failures, "course sections", self.catalog.sections().await);
        Report::new(CoursesView { sections }, failures)
    }

    pub async fn salary_report(&self) -> Report<SalaryReport> {
        let mut failures = Vec::new();
        let view = SalaryReport {
            employees: loaded(
                &mut failures,
                "employee salaries",
                self.reports.salary_comparisons().await,
            ),
            department_averages: loaded(
                &mut failures,
                "department salary averages",
                self.reports.department_salaries().await,
            ),
        };
        Report::new(view, failures)
    }
}

//! Reporting repository: grade analytics, salaries, statistics and rosters.
//!
//! Everything here is read-only. Each method returns `None` when its query
//! failed so callers can render an empty section with an error notice.

use domain::models::{
    AdminOverview, CompletedCourseRow, CourseGradeStat, CurrentEnrollmentRow, DepartmentSalary,
    DepartmentStatistics, ProfessorGradeStat, SalaryComparison, SectionUtilization,
    StudentStanding,
};

use crate::entities::{
    AdminOverviewEntity, CompletedCourseEntity, CourseGradeEntity, CurrentEnrollmentEntity,
    DepartmentEntity, DepartmentStatisticsEntity, ProfessorGradeEntity, SalaryComparisonEntity,
    SectionUtilizationEntity, StudentStandingEntity,
};
use crate::gateway::{Gateway, SqlParam};

/// Name of the per-department salary function.
pub const AVERAGE_DEPARTMENT_SALARY: &str = "average_department_salary";

#[derive(Clone)]
pub struct ReportRepository {
    gateway: Gateway,
}

impl ReportRepository {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Completed, graded courses of one student from `completed_student_courses`.
    pub async fn completed_for_student(&self, student_id: i32) -> Option<Vec<CompletedCourseRow>> {
        let rows = self
            .gateway
            .query_all::<CompletedCourseEntity>(
                r#"
                SELECT student_id, student_name, course_id, title, credits, grade
                FROM completed_student_courses
                WHERE student_id = $1 AND grade IS NOT NULL
                ORDER BY title
                "#,
                &[SqlParam::Int(student_id)],
            )
            .await?;
        Some(rows.into_iter().map(Into::into).collect())
    }

    /// First `limit` rows of `completed_student_courses`.
    pub async fn completed_courses(&self, limit: i64) -> Option<Vec<CompletedCourseRow>> {
        let rows = self
            .gateway
            .query_all::<CompletedCourseEntity>(
                r#"
                SELECT student_id, student_name, course_id, title, credits, grade
                FROM completed_student_courses
                ORDER BY student_id, title
                LIMIT $1
                "#,
                &[SqlParam::BigInt(limit)],
            )
            .await?;
        Some(rows.into_iter().map(Into::into).collect())
    }

    /// First `limit` rows of `current_student_enrollments`.
    pub async fn current_enrollments(&self, limit: i64) -> Option<Vec<CurrentEnrollmentRow>> {
        let rows = self
            .gateway
            .query_all::<CurrentEnrollmentEntity>(
                r#"
                SELECT student_id, student_name, course_id, title, section_no, enrolled_date
                FROM current_student_enrollments
                ORDER BY student_id, title
                LIMIT $1
                "#,
                &[SqlParam::BigInt(limit)],
            )
            .await?;
        Some(rows.into_iter().map(Into::into).collect())
    }

    /// Average grade points per course over completed, graded enrollments.
    pub async fn course_grades(&self) -> Option<Vec<CourseGradeStat>> {
        let rows = self
            .gateway
            .query_all::<CourseGradeEntity>(
                r#"
                SELECT
                    c.course_id,
                    c.title,
                    AVG(grade_points(e.grade))::DOUBLE PRECISION AS avg_grade,
                    COUNT(e.student_id) AS student_count
                FROM course c
                JOIN enrolls_in e ON e.course_id = c.course_id
                WHERE e.status = 'completed' AND e.grade IS NOT NULL
                GROUP BY c.course_id, c.title
                ORDER BY avg_grade DESC, c.title
                "#,
                &[],
            )
            .await?;
        Some(rows.into_iter().map(Into::into).collect())
    }

    /// Average grade points per professor across the sections they teach.
    pub async fn professor_grades(&self) -> Option<Vec<ProfessorGradeStat>> {
        let rows = self
            .gateway
            .query_all::<ProfessorGradeEntity>(
                r#"
                SELECT
                    p.employee_id,
                    emp.name,
                    AVG(grade_points(e.grade))::DOUBLE PRECISION AS avg_grade,
                    COUNT(DISTINCT e.student_id) AS student_count,
                    COUNT(DISTINCT t.course_id) AS courses_taught
                FROM professor p
                JOIN employee emp ON emp.employee_id = p.employee_id
                JOIN teaches t ON t.employee_id = p.employee_id
                JOIN enrolls_in e ON e.course_id = t.course_id AND e.section_no = t.section_no
                WHERE e.status = 'completed' AND e.grade IS NOT NULL
                GROUP BY p.employee_id, emp.name
                ORDER BY avg_grade DESC, emp.name
                "#,
                &[],
            )
            .await?;
        Some(rows.into_iter().map(Into::into).collect())
    }

    /// Each employee's salary against the average salary for their role.
    pub async fn salary_comparisons(&self) -> Option<Vec<SalaryComparison>> {
        let rows = self
            .gateway
            .query_all::<SalaryComparisonEntity>(
                r#"
                SELECT
                    e.employee_id,
                    e.name,
                    e.role,
                    e.salary::DOUBLE PRECISION AS salary,
                    role_avg.average_salary::DOUBLE PRECISION AS average_salary,
                    (e.salary - role_avg.average_salary)::DOUBLE PRECISION AS difference
                FROM employee e
                JOIN (
                    SELECT role, AVG(salary) AS average_salary
                    FROM employee
                    GROUP BY role
                ) AS role_avg ON role_avg.role = e.role
                ORDER BY e.role, e.salary DESC
                "#,
                &[],
            )
            .await?;
        Some(rows.into_iter().map(Into::into).collect())
    }

    pub async fn departments(&self) -> Option<Vec<DepartmentEntity>> {
        self.gateway
            .query_all::<DepartmentEntity>("SELECT dept_id, name FROM department ORDER BY name", &[])
            .await
    }

    /// `average_department_salary(dept_id)`; `None` on failure, `Some(None)` for a department
    /// without staff.
    pub async fn average_department_salary(&self, dept_id: i32) -> Option<Option<f64>> {
        self.gateway
            .call_function::<f64>(AVERAGE_DEPARTMENT_SALARY, &[SqlParam::Int(dept_id)])
            .await
    }

    /// Average salary of every department that has staff.
    ///
    /// `None` if any per-department call failed.
    pub async fn department_salaries(&self) -> Option<Vec<DepartmentSalary>> {
        let departments = self.departments().await?;
        let mut averages = Vec::with_capacity(departments.len());
        for department in departments {
            let average = self.average_department_salary(department.dept_id).await;
            averages.push((department, average));
        }
        collect_department_averages(averages)
    }

    /// Course and enrollment counts per department, through cross-listings.
    pub async fn department_statistics(&self) -> Option<Vec<DepartmentStatistics>> {
        let rows = self
            .gateway
            .query_all::<DepartmentStatisticsEntity>(
                r#"
                SELECT
                    d.dept_id,
                    d.name,
                    COUNT(DISTINCT cl.course_id) AS course_count,
                    COUNT(*) FILTER (WHERE e.status = 'enrolled') AS active_enrollments,
                    COUNT(*) FILTER (WHERE e.status = 'completed') AS completed_enrollments
                FROM department d
                LEFT JOIN cross_lists cl ON cl.dept_id = d.dept_id
                LEFT JOIN enrolls_in e ON e.course_id = cl.course_id
                GROUP BY d.dept_id, d.name
                ORDER BY d.name
                "#,
                &[],
            )
            .await?;
        Some(rows.into_iter().map(Into::into).collect())
    }

    /// Sections ordered from fullest to emptiest.
    pub async fn section_utilization(&self) -> Option<Vec<SectionUtilization>> {
        let rows = self
            .gateway
            .query_all::<SectionUtilizationEntity>(
                r#"
                SELECT c.course_id, c.title, s.section_no, s.capacity, s.num_enrolled
                FROM section s
                JOIN course c ON c.course_id = s.course_id
                ORDER BY (s.num_enrolled::DOUBLE PRECISION / NULLIF(s.capacity, 0)) DESC NULLS LAST,
                         c.title, s.section_no
                "#,
                &[],
            )
            .await?;
        Some(rows.into_iter().map(Into::into).collect())
    }

    /// Every student with active load, completed credits and GPA computed in SQL.
    pub async fn student_standings(&self) -> Option<Vec<StudentStanding>> {
        let rows = self
            .gateway
            .query_all::<StudentStandingEntity>(
                r#"
                WITH graded AS (
                    SELECT e.student_id, c.credits, grade_points(e.grade) AS points
                    FROM enrolls_in e
                    JOIN course c ON c.course_id = e.course_id
                    WHERE e.status = 'completed'
                      AND btrim(e.grade) IN ('A+', 'A', 'A-', 'B+', 'B', 'B-', 'C+',
                                             'C', 'C-', 'D+', 'D', 'D-', 'F')
                ),
                gpa AS (
                    SELECT student_id,
                           (SUM(points * credits) / NULLIF(SUM(credits), 0))::DOUBLE PRECISION AS gpa
                    FROM graded
                    GROUP BY student_id
                )
                SELECT
                    st.student_id,
                    st.name,
                    d.name AS major,
                    COUNT(e.course_id) FILTER (WHERE e.status = 'enrolled') AS active_enrollments,
                    COALESCE(SUM(c.credits) FILTER (WHERE e.status = 'completed'), 0)::BIGINT
                        AS completed_credits,
                    g.gpa
                FROM student st
                LEFT JOIN department d ON d.dept_id = st.major_dept_id
                LEFT JOIN enrolls_in e ON e.student_id = st.student_id
                LEFT JOIN course c ON c.course_id = e.course_id
                LEFT JOIN gpa g ON g.student_id = st.student_id
                GROUP BY st.student_id, st.name, d.name, g.gpa
                ORDER BY st.student_id
                "#,
                &[],
            )
            .await?;
        Some(rows.into_iter().map(Into::into).collect())
    }

    /// Counts for the admin landing page.
    pub async fn admin_overview(&self) -> Option<AdminOverview> {
        let row = self
            .gateway
            .query_one::<AdminOverviewEntity>(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM student) AS students,
                    (SELECT COUNT(*) FROM course) AS courses,
                    (SELECT COUNT(*) FROM section) AS sections,
                    (SELECT COUNT(*) FROM enrolls_in WHERE status = 'enrolled') AS active_enrollments
                "#,
                &[],
            )
            .await?;
        Some(row.map(Into::into).unwrap_or_default())
    }
}

/// Keeps departments with an average, skips those without staff, and fails
/// the whole list when any call failed.
fn collect_department_averages(
    results: Vec<(DepartmentEntity, Option<Option<f64>>)>,
) -> Option<Vec<DepartmentSalary>> {
    let mut averages = Vec::with_capacity(results.len());
    for (department, average) in results {
        if let Some(average) = average? {
            averages.push(department.with_average(average));
        }
    }
    Some(averages)
}

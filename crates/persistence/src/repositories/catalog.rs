//! Course catalog repository.

use domain::models::{CatalogEntry, SectionAvailability, SectionDetail, SectionKey};

use crate::entities::{CatalogEntryEntity, SectionAvailabilityEntity, SectionDetailEntity};
use crate::gateway::{Gateway, SqlParam};

/// Read-only queries over courses and sections.
#[derive(Clone)]
pub struct CatalogRepository {
    gateway: Gateway,
}

impl CatalogRepository {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Every section with its cross-listing, department and staff names.
    pub async fn catalog(&self) -> Option<Vec<CatalogEntry>> {
        let rows = self
            .gateway
            .query_all::<CatalogEntryEntity>(
                r#"
                SELECT
                    c.course_id,
                    c.title,
                    c.credits,
                    c.building,
                    s.section_no,
                    s.capacity,
                    s.num_enrolled,
                    cl.code,
                    d.name AS dept_name,
                    (SELECT string_agg(pe.name, ', ' ORDER BY pe.name)
                       FROM teaches t
                       JOIN employee pe ON pe.employee_id = t.employee_id
                      WHERE t.course_id = s.course_id AND t.section_no = s.section_no
                    ) AS professors,
                    (SELECT string_agg(te.name, ', ' ORDER BY te.name)
                       FROM assists a
                       JOIN employee te ON te.employee_id = a.employee_id
                      WHERE a.course_id = s.course_id AND a.section_no = s.section_no
                    ) AS teaching_assistants
                FROM course c
                JOIN section s ON s.course_id = c.course_id
                JOIN cross_lists cl ON cl.course_id = c.course_id
                JOIN department d ON d.dept_id = cl.dept_id
                ORDER BY c.title, s.section_no, cl.code
                "#,
                &[],
            )
            .await?;
        Some(rows.into_iter().map(Into::into).collect())
    }

    /// Every section with capacity and current enrolled count.
    pub async fn sections(&self) -> Option<Vec<SectionAvailability>> {
        let rows = self
            .gateway
            .query_all::<SectionAvailabilityEntity>(
                r#"
                SELECT c.course_id, c.title, s.section_no, s.capacity, s.num_enrolled
                FROM section s
                JOIN course c ON c.course_id = s.course_id
                ORDER BY c.title, s.section_no
                "#,
                &[],
            )
            .await?;
        Some(rows.into_iter().map(Into::into).collect())
    }

    /// One section's detail. `Some(None)` when it does not exist.
    pub async fn section_detail(&self, key: SectionKey) -> Option<Option<SectionDetail>> {
        let row = self
            .gateway
            .query_one::<SectionDetailEntity>(
                r#"
                SELECT
                    c.course_id,
                    c.title,
                    c.credits,
                    s.section_no,
                    s.capacity,
                    COALESCE(
                        (SELECT string_agg(cl.code, ' / ' ORDER BY cl.code)
                           FROM cross_lists cl
                          WHERE cl.course_id = c.course_id),
                        ''
                    ) AS code
                FROM course c
                JOIN section s ON s.course_id = c.course_id
                WHERE c.course_id = $1 AND s.section_no = $2
                "#,
                &[SqlParam::Int(key.course_id), SqlParam::Int(key.section_no)],
            )
            .await?;
        Some(row.map(Into::into))
    }
}

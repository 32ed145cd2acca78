//! Course catalog entities (database row mappings).

use domain::models::{CatalogEntry, SectionAvailability, SectionDetail};
use sqlx::FromRow;

/// A section joined with its course, cross-listing, department and staff.
#[derive(Debug, Clone, FromRow)]
pub struct CatalogEntryEntity {
    pub course_id: i32,
    pub title: String,
    pub credits: i32,
    pub building: Option<String>,
    pub section_no: i32,
    pub capacity: i32,
    pub num_enrolled: i32,
    pub code: String,
    pub dept_name: String,
    pub professors: Option<String>,
    pub teaching_assistants: Option<String>,
}

impl From<CatalogEntryEntity> for CatalogEntry {
    fn from(entity: CatalogEntryEntity) -> Self {
        Self {
            course_id: entity.course_id,
            title: entity.title,
            credits: entity.credits,
            building: entity.building,
            section_no: entity.section_no,
            capacity: entity.capacity,
            num_enrolled: entity.num_enrolled,
            open_seats: (entity.capacity - entity.num_enrolled).max(0),
            code: entity.code,
            dept_name: entity.dept_name,
            professors: entity.professors,
            teaching_assistants: entity.teaching_assistants,
        }
    }
}

/// Seat counts for one section.
#[derive(Debug, Clone, FromRow)]
pub struct SectionAvailabilityEntity {
    pub course_id: i32,
    pub title: String,
    pub section_no: i32,
    pub capacity: i32,
    pub num_enrolled: i32,
}

impl From<SectionAvailabilityEntity> for SectionAvailability {
    fn from(entity: SectionAvailabilityEntity) -> Self {
        Self {
            course_id: entity.course_id,
            title: entity.title,
            section_no: entity.section_no,
            capacity: entity.capacity,
            num_enrolled: entity.num_enrolled,
            open_seats: (entity.capacity - entity.num_enrolled).max(0),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct SectionDetailEntity {
    pub course_id: i32,
    pub title: String,
    pub credits: i32,
    pub section_no: i32,
    pub capacity: i32,
    pub code: String,
}

impl From<SectionDetailEntity> for SectionDetail {
    fn from(entity: SectionDetailEntity) -> Self {
        Self {
            course_id: entity.course_id,
            title: entity.title,
            credits: entity.credits,
            section_no: entity.section_no,
            capacity: entity.capacity,
            code: entity.code,
        }
    }
}

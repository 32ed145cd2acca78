//! Login account entity (database row mapping).

use domain::models::{Principal, Role};
use sqlx::FromRow;

/// Database enum for user_role that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum RoleDb {
    Student,
    Admin,
}

impl From<RoleDb> for Role {
    fn from(db_role: RoleDb) -> Self {
        match db_role {
            RoleDb::Student => Role::Student,
            RoleDb::Admin => Role::Admin,
        }
    }
}

impl From<Role> for RoleDb {
    fn from(role: Role) -> Self {
        match role {
            Role::Student => RoleDb::Student,
            Role::Admin => RoleDb::Admin,
        }
    }
}

/// An `app_users` row joined with the linked student's name.
#[derive(Debug, Clone, FromRow)]
pub struct CredentialEntity {
    pub user_id: i32,
    pub username: String,
    pub password_hash: String,
    pub role: RoleDb,
    pub student_id: Option<i32>,
    pub student_name: Option<String>,
}

impl From<CredentialEntity> for Principal {
    fn from(entity: CredentialEntity) -> Self {
        Self {
            user_id: entity.user_id,
            username: entity.username,
            role: entity.role.into(),
            student_id: entity.student_id,
            student_name: entity.student_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_into_principal_drops_hash() {
        let entity = CredentialEntity {
            user_id: 3,
            username: "teststudent".to_string(),
            password_hash: "$argon2id$...".to_string(),
            role: RoleDb::Student,
            student_id: Some(4001),
            student_name: Some("Ada Byron".to_string()),
        };

        let principal = Principal::from(entity);
        assert_eq!(principal.role, Role::Student);
        assert_eq!(principal.student_id, Some(4001));
        assert_eq!(principal.display_name(), "Ada Byron");
    }

    #[test]
    fn test_role_roundtrip() {
        assert_eq!(Role::from(RoleDb::from(Role::Admin)), Role::Admin);
        assert_eq!(Role::from(RoleDb::from(Role::Student)), Role::Student);
    }
}

//! Login account repository.

use domain::models::Role;

use crate::entities::CredentialEntity;
use crate::gateway::{Gateway, GatewayError, SqlParam};

/// Repository for `app_users` lookups and account creation.
#[derive(Clone)]
pub struct CredentialRepository {
    gateway: Gateway,
}

impl CredentialRepository {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Find an account by username, with the linked student's name.
    ///
    /// `None` when the lookup itself failed.
    pub async fn find_by_username(&self, username: &str) -> Option<Option<CredentialEntity>> {
        self.gateway
            .query_one::<CredentialEntity>(
                r#"
                SELECT u.user_id, u.username, u.password_hash, u.role,
                       u.student_id, s.name AS student_name
                FROM app_users u
                LEFT JOIN student s ON s.student_id = u.student_id
                WHERE u.username = $1
                "#,
                &[SqlParam::from(username)],
            )
            .await
    }

    /// Whether an account with this username exists. `None` when the lookup failed.
    pub async fn exists(&self, username: &str) -> Option<bool> {
        self.gateway
            .query_one::<(bool,)>(
                "SELECT EXISTS (SELECT 1 FROM app_users WHERE username = $1)",
                &[SqlParam::from(username)],
            )
            .await
            .map(|row| row.map(|(exists,)| exists).unwrap_or(false))
    }

    /// Insert an account unless the username is taken. Returns rows inserted.
    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
        student_id: Option<i32>,
    ) -> Result<u64, GatewayError> {
        self.gateway
            .run_mutation(
                r#"
                INSERT INTO app_users (username, password_hash, role, student_id)
                VALUES ($1, $2, $3::user_role, $4::int)
                ON CONFLICT (username) DO NOTHING
                "#,
                &[
                    SqlParam::from(username),
                    SqlParam::from(password_hash),
                    SqlParam::from(role.as_str()),
                    SqlParam::from(student_id),
                ],
            )
            .await
    }
}

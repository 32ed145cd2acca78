//! Demo account bootstrap.
//!
//! Creates the configured student and admin logins on startup when they do
//! not exist yet. Existing accounts are never touched, so running it on
//! every boot is safe.

use domain::models::Role;
use persistence::repositories::CredentialRepository;
use persistence::GatewayError;
use shared::password::{hash_password, PasswordError};
use tracing::{info, warn};

use crate::config::BootstrapConfig;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Database error: {0}")]
    Database(#[from] GatewayError),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] PasswordError),

    #[error("Could not check whether account {0} exists")]
    Lookup(String),
}

/// One login to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedAccount<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub role: Role,
    pub student_id: Option<i32>,
}

/// Accounts the configuration asks for. Entries with a blank username or password are skipped.
pub fn seed_accounts(config: &BootstrapConfig) -> Vec<SeedAccount<'_>> {
    let candidates = [
        SeedAccount {
            username: config.student_username.trim(),
            password: &config.student_password,
            role: Role::Student,
            student_id: Some(config.student_id),
        },
        SeedAccount {
            username: config.admin_username.trim(),
            password: &config.admin_password,
            role: Role::Admin,
            student_id: None,
        },
    ];

    candidates
        .into_iter()
        .filter(|account| {
            let complete = !account.username.is_empty() && !account.password.is_empty();
            if !complete {
                warn!(role = %account.role, "Bootstrap account is missing a username or password - skipping");
            }
            complete
        })
        .collect()
}

/// Creates missing demo accounts. Returns how many were created.
pub async fn bootstrap_accounts(
    credentials: &CredentialRepository,
    config: &BootstrapConfig,
) -> Result<usize, BootstrapError> {
    if !config.enabled {
        return Ok(0);
    }

    let mut created = 0;
    for account in seed_accounts(config) {
        let exists = credentials
            .exists(account.username)
            .await
            .ok_or_else(|| BootstrapError::Lookup(account.username.to_string()))?;

        if exists {
            info!(username = %account.username, "Bootstrap account already exists - skipping");
            continue;
        }

        let password_hash = hash_password(account.password)?;
        let inserted = credentials
            .create(account.username, &password_hash, account.role, account.student_id)
            .await?;

        if inserted > 0 {
            created += 1;
            info!(
                username = %account.username,
                role = %account.role,
                student_id = ?account.student_id,
                "Bootstrap account created"
            );
        }
    }

    if created > 0 {
        warn!("SECURITY: demo accounts use configured passwords; disable bootstrap outside development");
    }

    Ok(created)
}

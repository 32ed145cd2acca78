//! Credential checks for the login form.

use domain::models::Principal;
use persistence::repositories::CredentialRepository;
use shared::password::{verify_password, verify_without_account, PasswordError};
use thiserror::Error;

/// Faults while checking credentials. A wrong password is not a fault.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Credential lookup failed")]
    LookupFailed,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),
}

#[derive(Clone)]
pub struct AuthService {
    credentials: CredentialRepository,
}

impl AuthService {
    pub fn new(credentials: CredentialRepository) -> Self {
        Self { credentials }
    }

    /// Returns the principal for a matching username and password.
    ///
    /// Unknown usernames and wrong passwords both yield `Ok(None)`.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Principal>, AuthError> {
        let account = self
            .credentials
            .find_by_username(username)
            .await
            .ok_or(AuthError::LookupFailed)?;

        let Some(account) = account else {
            verify_without_account(password);
            tracing::info!(username = %username, "Login failed: unknown username");
            return Ok(None);
        };

        if !verify_password(password, &account.password_hash)? {
            tracing::info!(username = %username, "Login failed: wrong password");
            return Ok(None);
        }

        let principal = Principal::from(account);
        tracing::info!(
            user_id = principal.user_id,
            role = %principal.role,
            "Login succeeded"
        );
        Ok(Some(principal))
    }
}

//! Login form and credential checks that run before any lookup.

use serde::Deserialize;
use validator::{Validate, ValidationError};

/// `POST /auth/login` form body.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    #[validate(length(max = 64, message = "Username is too long"))]
    pub username: String,

    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    #[validate(length(max = 256, message = "Password is too long"))]
    pub password: String,
}

impl LoginForm {
    /// Username as looked up; surrounding whitespace is not significant.
    pub fn normalized_username(&self) -> &str {
        self.username.trim()
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Please enter both username and password.".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::{Password, Username};
    use fake::Fake;

    fn form(username: &str, password: &str) -> LoginForm {
        LoginForm {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_form() {
        let username: String = Username().fake();
        let password: String = Password(8..20).fake();
        let f = form(&username, &password);
        assert!(f.validate().is_ok());
    }

    #[test]
    fn test_blank_fields_are_rejected() {
        assert!(form("", "secret").validate().is_err());
        assert!(form("   ", "secret").validate().is_err());
        assert!(form("teststudent", "").validate().is_err());
    }

    #[test]
    fn test_overlong_username_is_rejected() {
        assert!(form(&"x".repeat(65), "secret").validate().is_err());
    }

    #[test]
    fn test_username_is_trimmed() {
        assert_eq!(form("  testadmin ", "x").normalized_username(), "testadmin");
    }
}

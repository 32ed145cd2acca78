//! Authenticated identity carried by a session.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Application role stored on each credential row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Admin => "admin",
        }
    }

    /// Landing page for this role.
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::Student => "/student/",
            Role::Admin => "/admin/",
        }
    }

    /// Notice shown when a principal with this role opens a page meant for the other one.
    pub fn access_denied_message(&self) -> &'static str {
        match self {
            Role::Student => "Access denied. This page is for administrators only.",
            Role::Admin => "Access denied. This page is for students only.",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The signed-in user, created at login and held for the session lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: i32,
    pub username: String,
    pub role: Role,
    /// Linked `student.student_id`; set for students only.
    pub student_id: Option<i32>,
    pub student_name: Option<String>,
}

impl Principal {
    /// Name used in greetings: the student's name when linked, else the username.
    pub fn display_name(&self) -> &str {
        self.student_name.as_deref().unwrap_or(&self.username)
    }

    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

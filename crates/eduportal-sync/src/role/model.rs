//! Portal role enumeration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use eduportal_core::error::AppError;

/// Roles a portal session can run as.
///
/// The role selects which dashboard the shell renders; it is not an
/// access-control decision (the server enforces those).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Learner view: timetable, grades, resources.
    #[default]
    Student,
    /// Teaching view: class lists, grade entry, messaging.
    Teacher,
    /// Administration view: enrollment, fees, transport.
    Admin,
}

impl Role {
    /// Return the role as a lowercase string (the persisted form).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Admin => "admin",
        }
    }

    /// Human-readable name for headers and menus.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Teacher => "Teacher",
            Self::Admin => "Administrator",
        }
    }

    /// Title of the dashboard this role lands on.
    pub fn dashboard_title(&self) -> &'static str {
        match self {
            Self::Student => "Student Dashboard",
            Self::Teacher => "Teacher Dashboard",
            Self::Admin => "Administration Dashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "teacher" => Ok(Self::Teacher),
            "admin" => Ok(Self::Admin),
            _ => Err(AppError::validation(format!(
                "Invalid role: '{s}'. Expected one of: student, teacher, admin"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("student".parse::<Role>().unwrap(), Role::Student);
        assert_eq!("TEACHER".parse::<Role>().unwrap(), Role::Teacher);
        assert!("principal".parse::<Role>().is_err());
    }

    #[test]
    fn test_default_is_student() {
        assert_eq!(Role::default(), Role::Student);
    }

    #[test]
    fn test_display_matches_persisted_form() {
        for role in [Role::Student, Role::Teacher, Role::Admin] {
            assert_eq!(role.to_string(), role.as_str());
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_serde_uses_lowercase() {
        let json = serde_json::to_string(&Role::Admin).expect("serialize");
        assert_eq!(json, r#""admin""#);
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// Account role. Closed set; unrecognized strings are rejected at the
/// form boundary and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Teacher,
}

impl Role {
    pub fn parse(raw: &str) -> Option<Role> {
        match raw {
            "student" => Some(Role::Student),
            "teacher" => Some(Role::Teacher),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_known_roles_only() {
        assert_eq!(Role::parse("student"), Some(Role::Student));
        assert_eq!(Role::parse("teacher"), Some(Role::Teacher));
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::parse("Student"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn as_str_round_trips() {
        for role in [Role::Student, Role::Teacher] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }
}

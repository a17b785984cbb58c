//! Participant roles.
//!
//! The `type` field of a join payload and the `x-user-type` handshake
//! header both carry a role string. Known roles get their own variant;
//! anything else is kept verbatim so it survives a round trip.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a participant or connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// A hosted user who can enter areas.
    User,
    /// A viewer observing one or more hosts.
    Visitor,
    /// Any other role string.
    Unclassified(String),
}

impl Role {
    /// The wire representation of this role.
    pub fn as_str(&self) -> &str {
        match self {
            Self::User => "user",
            Self::Visitor => "visitor",
            Self::Unclassified(other) => other,
        }
    }

    /// Whether this is the [`Role::User`] role.
    pub fn is_user(&self) -> bool {
        matches!(self, Self::User)
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s {
            "user" => Self::User,
            "visitor" => Self::Visitor,
            other => Self::Unclassified(other.to_string()),
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.as_str() {
            "user" => Self::User,
            "visitor" => Self::Visitor,
            _ => Self::Unclassified(s),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::User => "user".to_string(),
            Role::Visitor => "visitor".to_string(),
            Role::Unclassified(other) => other,
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
    fn role_matching_is_case_sensitive() {
        assert_eq!(Role::from("user"), Role::User);
        assert_eq!(Role::from("User"), Role::Unclassified("User".to_string()));
    }

    #[test]
    fn unclassified_role_keeps_its_text() {
        let role: Role = serde_json::from_str(r#""moderator""#).unwrap();
        assert_eq!(role, Role::Unclassified("moderator".to_string()));
        assert_eq!(serde_json::to_string(&role).unwrap(), r#""moderator""#);
    }
}

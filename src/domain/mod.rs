//! Domain types for condominium accounts with strong typing.
//!
//! Provides the user identifier newtype and the closed set of account roles
//! recognised by the `users` table constraint.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unique identifier for a stored user.
///
/// Assigned by the database on insert and never changed afterwards.
///
/// # Examples
///
/// ```rust
/// use condominio::domain::UserId;
///
/// let id = UserId::new(42);
/// assert_eq!(id.value(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(i64);

impl UserId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying i64 value.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for i64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self::new(id)
    }
}

impl Serialize for UserId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(self.0)
    }
}

/// Account role.
///
/// The stored and wire representation is the lowercase Italian name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Resident
    Condomino,
    /// Administrator
    Amministratore,
    /// Doorkeeper
    Portinaio,
}

impl Role {
    pub const ALL: [Self; 3] = [Self::Condomino, Self::Amministratore, Self::Portinaio];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Condomino => "condomino",
            Self::Amministratore => "amministratore",
            Self::Portinaio => "portinaio",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role '{0}' (expected condomino, amministratore or portinaio)")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_roundtrip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn test_role_parse_is_exact() {
        assert!("guest".parse::<Role>().is_err());
        assert!("Condomino".parse::<Role>().is_err());
        assert!(" portinaio".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_uses_storage_names() {
        let json = serde_json::to_string(&Role::Amministratore).unwrap();
        assert_eq!(json, "\"amministratore\"");

        let role: Role = serde_json::from_str("\"portinaio\"").unwrap();
        assert_eq!(role, Role::Portinaio);
    }

    #[test]
    fn test_user_id_serializes_as_number() {
        let id = UserId::new(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
        assert_eq!(i64::from(id), 7);
    }
}

use serde::Serialize;

use crate::domain::{Role, UserId};

/// A stored account as seen by callers of the user store.
///
/// `password_hash` is the Argon2 PHC string and is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,

    pub username: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    pub role: Role,
}

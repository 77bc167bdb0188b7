use serde::{Deserialize, Serialize};

/// Directory record for one account. Only the bcrypt hash of the password is
/// ever stored or persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password_hash: String,
}

use std::collections::HashMap;

use crate::engine::EngineError;
use crate::models::User;
use crate::store::{JsonStore, StoreError};

/// Username -> credential records, bcrypt-hashed, durable through the same
/// flat-file store as the ledger.
///
/// Credential checks happen here; deciding what an authenticated caller may
/// do is the dispatcher's job.
#[derive(Debug)]
pub struct UserDirectory {
    users: HashMap<String, User>,
    store: JsonStore,
    bcrypt_cost: u32,
}

impl UserDirectory {
    pub async fn open(store: JsonStore, bcrypt_cost: u32) -> Result<Self, StoreError> {
        let users = store.load_users().await?;
        Ok(Self {
            users,
            store,
            bcrypt_cost,
        })
    }

    pub fn exists(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    pub fn validate_credentials(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username)
            .map(|user| bcrypt::verify(password, &user.password_hash).unwrap_or(false))
            .unwrap_or(false)
    }

    /// Create an account; `Ok(false)` when the username is taken.
    pub async fn create(&mut self, username: &str, password: &str) -> Result<bool, EngineError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(EngineError::invalid(
                "username and password must be non-empty",
            ));
        }
        if self.users.contains_key(username) {
            return Ok(false);
        }
        let password_hash = bcrypt::hash(password, self.bcrypt_cost)?;
        self.users.insert(
            username.to_string(),
            User {
                username: username.to_string(),
                password_hash,
            },
        );
        if let Err(e) = self.store.save_users(&self.users).await {
            self.users.remove(username);
            return Err(e.into());
        }
        Ok(true)
    }

    /// Delete an account; `Ok(false)` when it does not exist. The caller is
    /// responsible for cascading reservation removal.
    pub async fn delete(&mut self, username: &str) -> Result<bool, EngineError> {
        let Some(user) = self.users.remove(username) else {
            return Ok(false);
        };
        if let Err(e) = self.store.save_users(&self.users).await {
            self.users.insert(username.to_string(), user);
            return Err(e.into());
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // cost 4 is bcrypt's floor; keeps hashing out of the test runtime
    async fn directory(dir: &tempfile::TempDir) -> UserDirectory {
        let store = JsonStore::open(dir.path()).await.unwrap();
        UserDirectory::open(store, 4).await.unwrap()
    }

    #[tokio::test]
    async fn create_validate_delete_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut users = directory(&dir).await;

        assert!(users.create("tim", "secret").await.unwrap());
        assert!(!users.create("tim", "other").await.unwrap());
        assert!(users.exists("tim"));
        assert!(users.validate_credentials("tim", "secret"));
        assert!(!users.validate_credentials("tim", "wrong"));
        assert!(!users.validate_credentials("ghost", "secret"));

        assert!(users.delete("tim").await.unwrap());
        assert!(!users.delete("tim").await.unwrap());
        assert!(!users.exists("tim"));
    }

    #[tokio::test]
    async fn rejects_empty_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let mut users = directory(&dir).await;
        assert!(matches!(
            users.create("  ", "secret").await,
            Err(EngineError::InvalidArgument(_))
        ));
        assert!(matches!(
            users.create("tim", "").await,
            Err(EngineError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn accounts_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut users = directory(&dir).await;
            users.create("tim", "secret").await.unwrap();
        }
        let users = directory(&dir).await;
        assert!(users.validate_credentials("tim", "secret"));
    }
}

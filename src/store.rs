use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::models::{Reservation, User};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Flat-file store backing the user directory and the reservation ledger.
///
/// Two JSON documents under one data directory: `users.json` (map keyed by
/// username) and `reservations.json` (flat list). Load-at-startup reproduces
/// the last durably written state; a missing file means empty state.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    fn users_path(&self) -> PathBuf {
        self.dir.join("users.json")
    }

    fn reservations_path(&self) -> PathBuf {
        self.dir.join("reservations.json")
    }

    pub async fn load_users(&self) -> Result<HashMap<String, User>, StoreError> {
        Self::load(self.users_path()).await
    }

    pub async fn save_users(&self, users: &HashMap<String, User>) -> Result<(), StoreError> {
        Self::save(self.users_path(), users).await
    }

    pub async fn load_reservations(&self) -> Result<Vec<Reservation>, StoreError> {
        Self::load(self.reservations_path()).await
    }

    pub async fn save_reservations(&self, reservations: &[Reservation]) -> Result<(), StoreError> {
        Self::save(self.reservations_path(), reservations).await
    }

    async fn load<T>(path: PathBuf) -> Result<T, StoreError>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        match fs::read(&path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
            Err(e) => Err(e.into()),
        }
    }

    // Write to a temp file then rename, so a crash mid-write never truncates
    // the durable copy.
    async fn save<T>(path: PathBuf, value: &T) -> Result<(), StoreError>
    where
        T: serde::Serialize + ?Sized,
    {
        let bytes = serde_json::to_vec_pretty(value)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &bytes).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

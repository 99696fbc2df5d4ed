//! `Database` trait: the storage collaborator behind the wizard and the
//! grocery pipeline.
//!
//! Persistence is a plain per-user key/value table holding JSON blobs.
//! Writes are upserts (last write wins); reads of a never-written key
//! return `None`.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::DatabaseError;

/// Backend-agnostic key/value persistence.
#[async_trait]
pub trait Database: Send + Sync {
    /// Run all pending schema migrations.
    async fn init_schema(&self) -> Result<(), DatabaseError>;

    /// Read a setting. Returns `None` if it was never written.
    async fn get_setting(
        &self,
        user_id: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, DatabaseError>;

    /// Write (insert or replace) a setting.
    async fn set_setting(
        &self,
        user_id: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), DatabaseError>;

    /// Write several settings for one user atomically: either every entry is
    /// stored or none is.
    async fn set_settings(
        &self,
        user_id: &str,
        entries: &[(&str, serde_json::Value)],
    ) -> Result<(), DatabaseError>;

    /// Delete a setting. Returns whether a row was removed.
    async fn delete_setting(&self, user_id: &str, key: &str) -> Result<bool, DatabaseError>;
}

/// Read a setting and deserialize it into `T`.
pub async fn load_json<T: DeserializeOwned>(
    db: &dyn Database,
    user_id: &str,
    key: &str,
) -> Result<Option<T>, DatabaseError> {
    match db.get_setting(user_id, key).await? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| DatabaseError::Serialization(format!("{key}: {e}"))),
    }
}

/// Serialize `value` and write it under `key`.
pub async fn save_json<T: Serialize + ?Sized>(
    db: &dyn Database,
    user_id: &str,
    key: &str,
    value: &T,
) -> Result<(), DatabaseError> {
    let json = to_json(key, value)?;
    db.set_setting(user_id, key, &json).await
}

/// Serialize a value destined for `key`, tagging errors with the key.
pub fn to_json<T: Serialize + ?Sized>(
    key: &str,
    value: &T,
) -> Result<serde_json::Value, DatabaseError> {
    serde_json::to_value(value).map_err(|e| DatabaseError::Serialization(format!("{key}: {e}")))
}

//! libSQL backend: async `Database` trait implementation.
//!
//! Supports local file and in-memory databases.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info, warn};

use crate::error::DatabaseError;
use crate::store::migrations;
use crate::store::traits::Database;

/// libSQL database backend.
///
/// Stores a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let backend = Self::from_database(db)?;
        backend.init_schema().await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;

        let backend = Self::from_database(db)?;
        backend.init_schema().await?;
        Ok(backend)
    }

    fn from_database(db: LibSqlDatabase) -> Result<Self, DatabaseError> {
        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;
        Ok(Self {
            db: Arc::new(db),
            conn,
        })
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }
}

#[async_trait]
impl Database for LibSqlBackend {
    async fn init_schema(&self) -> Result<(), DatabaseError> {
        migrations::run_migrations(self.conn()).await
    }

    async fn get_setting(
        &self,
        user_id: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, DatabaseError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                "SELECT value FROM settings WHERE user_id = ?1 AND key = ?2",
                params![user_id, key],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_setting: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let value_str: String = row
                    .get(0)
                    .map_err(|e| DatabaseError::Query(format!("get_setting: {e}")))?;
                let value: serde_json::Value = serde_json::from_str(&value_str)
                    .map_err(|e| DatabaseError::Serialization(format!("{key}: {e}")))?;
                debug!(user_id, key, "Setting loaded");
                Ok(Some(value))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_setting: {e}"))),
        }
    }

    async fn set_setting(
        &self,
        user_id: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), DatabaseError> {
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();
        let value_str = serde_json::to_string(value)
            .map_err(|e| DatabaseError::Serialization(e.to_string()))?;

        conn.execute(
            "INSERT INTO settings (user_id, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (user_id, key) DO UPDATE SET value = ?3, updated_at = ?4",
            params![user_id, key, value_str, now],
        )
        .await
        .map_err(|e| DatabaseError::Query(format!("set_setting: {e}")))?;

        debug!(user_id, key, "Setting stored");
        Ok(())
    }

    async fn set_settings(
        &self,
        user_id: &str,
        entries: &[(&str, serde_json::Value)],
    ) -> Result<(), DatabaseError> {
        let now = Utc::now().to_rfc3339();
        let tx = self
            .conn()
            .transaction()
            .await
            .map_err(|e| DatabaseError::Query(format!("set_settings: {e}")))?;

        for (key, value) in entries {
            let written = match serde_json::to_string(value) {
                Ok(value_str) => tx
                    .execute(
                        "INSERT INTO settings (user_id, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
                         ON CONFLICT (user_id, key) DO UPDATE SET value = ?3, updated_at = ?4",
                        params![user_id, *key, value_str, now.as_str()],
                    )
                    .await
                    .map(|_| ())
                    .map_err(|e| DatabaseError::Query(format!("set_settings {key}: {e}"))),
                Err(e) => Err(DatabaseError::Serialization(format!("{key}: {e}"))),
            };
            if let Err(e) = written {
                if let Err(rollback) = tx.rollback().await {
                    warn!(user_id, error = %rollback, "Rollback failed");
                }
                return Err(e);
            }
        }

        tx.commit()
            .await
            .map_err(|e| DatabaseError::Query(format!("set_settings commit: {e}")))?;
        debug!(user_id, count = entries.len(), "Settings stored");
        Ok(())
    }

    async fn delete_setting(&self, user_id: &str, key: &str) -> Result<bool, DatabaseError> {
        let conn = self.conn();
        let count = conn
            .execute(
                "DELETE FROM settings WHERE user_id = ?1 AND key = ?2",
                params![user_id, key],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("delete_setting: {e}")))?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::store::traits::{load_json, save_json};

    async fn test_db() -> LibSqlBackend {
        LibSqlBackend::new_memory().await.unwrap()
    }

    #[tokio::test]
    async fn missing_setting_is_none() {
        let db = test_db().await;
        assert!(db.get_setting("default", "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_then_get() {
        let db = test_db().await;
        let value = serde_json::json!({"name": "Alice", "budget": 100});
        db.set_setting("default", "user_profile", &value).await.unwrap();

        let fetched = db.get_setting("default", "user_profile").await.unwrap().unwrap();
        assert_eq!(fetched["name"], "Alice");
        assert_eq!(fetched["budget"], 100);
    }

    #[tokio::test]
    async fn last_write_wins() {
        let db = test_db().await;
        db.set_setting("default", "k", &serde_json::json!(1)).await.unwrap();
        db.set_setting("default", "k", &serde_json::json!(2)).await.unwrap();
        let fetched = db.get_setting("default", "k").await.unwrap().unwrap();
        assert_eq!(fetched, serde_json::json!(2));
    }

    #[tokio::test]
    async fn settings_are_scoped_per_user() {
        let db = test_db().await;
        db.set_setting("alice", "k", &serde_json::json!("a")).await.unwrap();
        db.set_setting("bob", "k", &serde_json::json!("b")).await.unwrap();
        assert_eq!(
            db.get_setting("alice", "k").await.unwrap().unwrap(),
            serde_json::json!("a")
        );
        assert_eq!(
            db.get_setting("bob", "k").await.unwrap().unwrap(),
            serde_json::json!("b")
        );
    }

    #[tokio::test]
    async fn delete_setting_reports_removal() {
        let db = test_db().await;
        db.set_setting("default", "k", &serde_json::json!(true)).await.unwrap();
        assert!(db.delete_setting("default", "k").await.unwrap());
        assert!(!db.delete_setting("default", "k").await.unwrap());
        assert!(db.get_setting("default", "k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn batch_write_stores_every_entry() {
        let db = test_db().await;
        db.set_setting("default", "a", &serde_json::json!("old")).await.unwrap();
        db.set_settings(
            "default",
            &[
                ("a", serde_json::json!("new")),
                ("b", serde_json::json!([1, 2])),
            ],
        )
        .await
        .unwrap();

        assert_eq!(
            db.get_setting("default", "a").await.unwrap().unwrap(),
            serde_json::json!("new")
        );
        assert_eq!(
            db.get_setting("default", "b").await.unwrap().unwrap(),
            serde_json::json!([1, 2])
        );
    }

    #[tokio::test]
    async fn failed_batch_leaves_nothing_behind() {
        let db = test_db().await;
        db.set_setting("default", "a", &serde_json::json!("old")).await.unwrap();
        db.conn()
            .execute_batch(
                "CREATE TRIGGER reject_b BEFORE INSERT ON settings WHEN NEW.key = 'b'
                 BEGIN SELECT RAISE(ABORT, 'b rejected'); END;",
            )
            .await
            .unwrap();

        let err = db
            .set_settings(
                "default",
                &[
                    ("a", serde_json::json!("new")),
                    ("b", serde_json::json!(true)),
                ],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Query(_)));

        assert_eq!(
            db.get_setting("default", "a").await.unwrap().unwrap(),
            serde_json::json!("old")
        );
        assert!(db.get_setting("default", "b").await.unwrap().is_none());
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        items: Vec<String>,
    }

    #[tokio::test]
    async fn typed_json_helpers() {
        let db = test_db().await;
        let sample = Sample {
            items: vec!["Salt".to_string(), "Olive oil".to_string()],
        };
        save_json(&db, "default", "sample", &sample).await.unwrap();

        let loaded: Option<Sample> = load_json(&db, "default", "sample").await.unwrap();
        assert_eq!(loaded, Some(sample));

        let absent: Option<Sample> = load_json(&db, "default", "absent").await.unwrap();
        assert!(absent.is_none());
    }

    #[tokio::test]
    async fn typed_load_reports_shape_mismatch() {
        let db = test_db().await;
        db.set_setting("default", "sample", &serde_json::json!({"items": 3}))
            .await
            .unwrap();
        let err = load_json::<Sample>(&db, "default", "sample").await.unwrap_err();
        assert!(matches!(err, DatabaseError::Serialization(_)));
    }

    #[tokio::test]
    async fn new_local_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("nested").join("dir").join("test.db");
        let db = LibSqlBackend::new_local(&db_path).await.unwrap();
        db.set_setting("default", "k", &serde_json::json!(1)).await.unwrap();
        assert!(db_path.exists());
    }
}

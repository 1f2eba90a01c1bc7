// SPDX-FileCopyrightText: 2026 MIRACL UK LTD
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use mpin_common::SecretBytes;
use sqlx::SqlitePool;

use super::{AtRestCipher, NoOpCipher, StoreError, UserStore};
use crate::user_record::UserRecord;

struct SqlUserRecord {
    user_id: String,
    project_id: String,
    revoked: bool,
    pin_length: i64,
    mpin_id: Vec<u8>,
    token: Vec<u8>,
    dtas: String,
    public_key: Option<Vec<u8>>,
}

/// sqlx-backed [`UserStore`], one row per `(user_id, project_id)` in the
/// `user_records` table (§3.1). `token` is passed through `cipher` before
/// it is written and after it is read; every other field is plaintext.
pub struct SqliteUserStore {
    pool: SqlitePool,
    cipher: Arc<dyn AtRestCipher>,
}

impl SqliteUserStore {
    /// Opens `pool` and applies any pending migrations.
    pub async fn connect(pool: SqlitePool, cipher: Arc<dyn AtRestCipher>) -> Result<Self, StoreError> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool, cipher })
    }

    /// Convenience constructor for tests: an in-memory database with the
    /// identity cipher.
    pub async fn connect_in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePool::connect("sqlite::memory:").await?;
        Self::connect(pool, Arc::new(NoOpCipher)).await
    }

    fn decode(&self, row: SqlUserRecord) -> Result<UserRecord, StoreError> {
        let token = self.cipher.open(&row.token)?;
        Ok(UserRecord {
            user_id: row.user_id,
            project_id: row.project_id,
            revoked: row.revoked,
            pin_length: row.pin_length as u32,
            mpin_id: row.mpin_id,
            token: SecretBytes::new(token),
            dtas: row.dtas,
            public_key: row.public_key.filter(|key| !key.is_empty()),
        })
    }

    async fn upsert(&self, record: &UserRecord) -> Result<(), StoreError> {
        let token_ciphertext = self.cipher.seal(record.token.expose())?;
        let pin_length = record.pin_length as i64;
        sqlx::query!(
            "INSERT INTO user_records
                (user_id, project_id, revoked, pin_length, mpin_id, token, dtas, public_key)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(user_id, project_id) DO UPDATE SET
                revoked = excluded.revoked,
                pin_length = excluded.pin_length,
                mpin_id = excluded.mpin_id,
                token = excluded.token,
                dtas = excluded.dtas,
                public_key = excluded.public_key",
            record.user_id,
            record.project_id,
            record.revoked,
            pin_length,
            record.mpin_id,
            token_ciphertext,
            record.dtas,
            record.public_key,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl UserStore for SqliteUserStore {
    async fn add(&self, record: &UserRecord) -> Result<(), StoreError> {
        self.upsert(record).await
    }

    async fn update(&self, record: &UserRecord) -> Result<(), StoreError> {
        self.upsert(record).await
    }

    async fn delete(&self, user_id: &str, project_id: &str) -> Result<(), StoreError> {
        sqlx::query!(
            "DELETE FROM user_records WHERE user_id = ?1 AND project_id = ?2",
            user_id,
            project_id,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(
        &self,
        user_id: &str,
        project_id: &str,
    ) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query_as!(
            SqlUserRecord,
            r#"SELECT
                user_id,
                project_id,
                revoked,
                pin_length,
                mpin_id,
                token,
                dtas,
                public_key
            FROM user_records WHERE user_id = ?1 AND project_id = ?2"#,
            user_id,
            project_id,
        )
        .fetch_optional(&self.pool)
        .await?;
        row.map(|row| self.decode(row)).transpose()
    }

    async fn all(&self, project_id: &str) -> Result<Vec<UserRecord>, StoreError> {
        let rows = sqlx::query_as!(
            SqlUserRecord,
            r#"SELECT
                user_id,
                project_id,
                revoked,
                pin_length,
                mpin_id,
                token,
                dtas,
                public_key
            FROM user_records WHERE project_id = ?1"#,
            project_id,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(|row| self.decode(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(user_id: &str) -> UserRecord {
        UserRecord {
            user_id: user_id.to_string(),
            project_id: "proj-1".into(),
            revoked: false,
            pin_length: 4,
            mpin_id: vec![0x01, 0x02],
            token: SecretBytes::new(vec![0x03, 0x04]),
            dtas: "D".into(),
            public_key: None,
        }
    }

    #[tokio::test]
    async fn add_then_get_round_trips() {
        let store = SqliteUserStore::connect_in_memory().await.unwrap();
        store.add(&record("alice")).await.unwrap();

        let fetched = store.get("alice", "proj-1").await.unwrap().unwrap();
        assert_eq!(fetched.mpin_id, vec![0x01, 0x02]);
        assert_eq!(fetched.token.expose(), &[0x03, 0x04]);
    }

    #[tokio::test]
    async fn update_overwrites_existing_row() {
        let store = SqliteUserStore::connect_in_memory().await.unwrap();
        store.add(&record("alice")).await.unwrap();

        let mut updated = record("alice");
        updated.revoked = true;
        store.update(&updated).await.unwrap();

        let fetched = store.get("alice", "proj-1").await.unwrap().unwrap();
        assert!(fetched.revoked);
        assert_eq!(store.all("proj-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let store = SqliteUserStore::connect_in_memory().await.unwrap();
        store.add(&record("alice")).await.unwrap();
        store.delete("alice", "proj-1").await.unwrap();
        assert!(store.get("alice", "proj-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn all_is_scoped_to_project() {
        let store = SqliteUserStore::connect_in_memory().await.unwrap();
        store.add(&record("alice")).await.unwrap();
        let mut bob = record("bob");
        bob.project_id = "proj-2".into();
        store.add(&bob).await.unwrap();

        assert_eq!(store.all("proj-1").await.unwrap().len(), 1);
        assert_eq!(store.all("proj-2").await.unwrap().len(), 1);
    }
}

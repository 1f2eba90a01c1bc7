// SPDX-FileCopyrightText: 2026 MIRACL UK LTD
//
// SPDX-License-Identifier: Apache-2.0

//! Local persistence for [`UserRecord`]s (§3.1, §4.2.1).
//!
//! [`UserStore`] is the storage seam the facade depends on; [`sqlite`]
//! provides the production, sqlx-backed implementation. Callers who need
//! to keep the `token` encrypted at rest inject an [`AtRestCipher`]; tests
//! use [`NoOpCipher`].

pub mod sqlite;

use thiserror::Error;

use crate::user_record::UserRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no user record for user {user_id:?} in project {project_id:?}")]
    NotFound { user_id: String, project_id: String },
    #[error("at-rest cipher failed: {0}")]
    Cipher(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Seals and opens the `token` bytes before they touch disk. Production
/// hosts supply an AEAD-backed implementation (e.g. keyed by an
/// OS-keychain secret); [`NoOpCipher`] is for tests only.
pub trait AtRestCipher: Send + Sync {
    fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, StoreError>;
    fn open(&self, ciphertext: &[u8]) -> Result<Vec<u8>, StoreError>;
}

/// Identity cipher. Never use outside of tests: the token is the most
/// sensitive value this library persists.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpCipher;

impl AtRestCipher for NoOpCipher {
    fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, StoreError> {
        Ok(plaintext.to_vec())
    }

    fn open(&self, ciphertext: &[u8]) -> Result<Vec<u8>, StoreError> {
        Ok(ciphertext.to_vec())
    }
}

/// Storage seam for [`UserRecord`]s, keyed by `(user_id, project_id)`.
///
/// The facade (§4.8) holds this behind `Arc<dyn UserStore>`, so the trait
/// is boxed via `async-trait` rather than `trait-variant`: the latter
/// desugars to return-position `impl Future`, which is not object-safe.
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    async fn add(&self, record: &UserRecord) -> Result<(), StoreError>;
    async fn update(&self, record: &UserRecord) -> Result<(), StoreError>;
    async fn delete(&self, user_id: &str, project_id: &str) -> Result<(), StoreError>;
    async fn get(
        &self,
        user_id: &str,
        project_id: &str,
    ) -> Result<Option<UserRecord>, StoreError>;
    async fn all(&self, project_id: &str) -> Result<Vec<UserRecord>, StoreError>;
}

// SPDX-FileCopyrightText: 2026 MIRACL UK LTD
//
// SPDX-License-Identifier: Apache-2.0

use mpin_common::SecretBytes;
use thiserror::Error;

/// The persistent identity on this device (§3). `(user_id, project_id)` is
/// the primary key; `token` is sensitive and is never exposed through
/// `Debug`.
pub struct UserRecord {
    pub user_id: String,
    pub project_id: String,
    pub revoked: bool,
    pub pin_length: u32,
    pub mpin_id: Vec<u8>,
    pub token: SecretBytes,
    pub dtas: String,
    pub public_key: Option<Vec<u8>>,
}

impl Clone for UserRecord {
    fn clone(&self) -> Self {
        Self {
            user_id: self.user_id.clone(),
            project_id: self.project_id.clone(),
            revoked: self.revoked,
            pin_length: self.pin_length,
            mpin_id: self.mpin_id.clone(),
            token: self.token.clone_secret(),
            dtas: self.dtas.clone(),
            public_key: self.public_key.clone(),
        }
    }
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("user_id", &self.user_id)
            .field("project_id", &self.project_id)
            .field("revoked", &self.revoked)
            .field("pin_length", &self.pin_length)
            .field("mpin_id", &hex::encode(&self.mpin_id))
            .field("token", &"<redacted>")
            .field("dtas", &self.dtas)
            .field(
                "public_key",
                &self.public_key.as_deref().map(hex::encode),
            )
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum UserDataError {
    #[error("user record is revoked")]
    Revoked,
    #[error("user record is missing required fields (mpinId, token or dtas)")]
    InvalidUserData,
    #[error("user record has no public key; it does not support signing")]
    EmptyPublicKey,
}

impl UserRecord {
    /// A record is "usable" iff `mpinId`, `token` and `dtas` are all
    /// non-empty.
    pub fn is_usable(&self) -> bool {
        !self.mpin_id.is_empty() && !self.token.is_empty() && !self.dtas.is_empty()
    }

    pub fn require_not_revoked_and_usable(&self) -> Result<(), UserDataError> {
        if self.revoked {
            return Err(UserDataError::Revoked);
        }
        if !self.is_usable() {
            return Err(UserDataError::InvalidUserData);
        }
        Ok(())
    }

    pub fn require_signing_key(&self) -> Result<&[u8], UserDataError> {
        self.public_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(UserDataError::EmptyPublicKey)
    }

    /// `combinedMpinId = mpinId ++ publicKey` when a public key is
    /// present, else just `mpinId` (§9).
    pub fn combined_mpin_id(&self) -> Vec<u8> {
        crate::util::combined_mpin_id(&self.mpin_id, self.public_key.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usable_record() -> UserRecord {
        UserRecord {
            user_id: "alice@example.com".into(),
            project_id: "proj-1".into(),
            revoked: false,
            pin_length: 4,
            mpin_id: vec![0x01],
            token: SecretBytes::new(vec![0x02]),
            dtas: "D".into(),
            public_key: Some(vec![0xAA]),
        }
    }

    #[test]
    fn debug_never_prints_token() {
        let record = usable_record();
        let rendered = format!("{record:?}");
        assert!(!rendered.contains("0x02"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn usability_requires_all_three_fields() {
        let mut record = usable_record();
        assert!(record.is_usable());
        record.dtas.clear();
        assert!(!record.is_usable());
    }

    #[test]
    fn revoked_record_is_rejected_before_usability() {
        let mut record = usable_record();
        record.revoked = true;
        assert!(matches!(
            record.require_not_revoked_and_usable(),
            Err(UserDataError::Revoked)
        ));
    }
}

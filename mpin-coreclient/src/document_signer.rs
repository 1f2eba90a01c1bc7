// SPDX-FileCopyrightText: 2026 MIRACL UK LTD
//
// SPDX-License-Identifier: Apache-2.0

//! Designated-verifier signing (§4.6): reuses the `dvs-auth`-scoped
//! authentication proof, then produces a signature over a caller-supplied
//! digest and optionally completes a remote signing session.

use mpin_apiclient::{session::CompleteSigningSessionRequest, ApiClient, TransportError};
use mpin_common::CryptoProvider;
use thiserror::Error;

use crate::{
    authenticator::{AuthenticationError, Authenticator, Scope},
    pin::PinProvider,
    store::{StoreError, UserStore},
    util,
};

#[derive(Debug, Error)]
pub enum SigningError {
    #[error("user record is missing required fields")]
    InvalidUserData,
    #[error("message digest must not be empty")]
    EmptyMessageHash,
    #[error("user record has no public key; it does not support signing")]
    EmptyPublicKey,
    #[error("PIN must be {expected} digits")]
    InvalidPin { expected: u32 },
    #[error("PIN entry was cancelled")]
    PinCancelled,
    #[error("authentication was rejected by the server")]
    UnsuccessfulAuthentication,
    #[error("this identity has been revoked and must be re-registered")]
    Revoked,
    #[error("the signing session is no longer valid")]
    InvalidSigningSession,
    #[error("signing session details were malformed")]
    InvalidSigningSessionDetails,
    #[error("signing failed: {cause}")]
    SigningFail { cause: SigningCause },
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum SigningCause {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Crypto(#[from] mpin_common::CryptoError),
}

impl From<AuthenticationError> for SigningError {
    fn from(error: AuthenticationError) -> Self {
        match error {
            AuthenticationError::UnsuccessfulAuthentication => {
                SigningError::UnsuccessfulAuthentication
            }
            AuthenticationError::Revoked => SigningError::Revoked,
            AuthenticationError::PinCancelled => SigningError::PinCancelled,
            AuthenticationError::InvalidPin { expected } => SigningError::InvalidPin { expected },
            AuthenticationError::InvalidUserData => SigningError::InvalidUserData,
            AuthenticationError::Store(error) => SigningError::Store(error),
            other => SigningError::SigningFail {
                cause: SigningCause::Transport(TransportError::Client {
                    code: other.to_string(),
                    context: None,
                }),
            },
        }
    }
}

/// Identifies the remote signing session a completed signature should be
/// bound to (§4.6 step 6).
#[derive(Debug, Clone)]
pub struct SigningSessionDetails {
    pub session_id: String,
}

/// Wire-ready signature, all fields hex-encoded (§3).
#[derive(Debug, Clone, serde::Serialize)]
pub struct Signature {
    pub mpin_id: String,
    pub u: String,
    pub v: String,
    pub public_key: String,
    pub dtas: String,
    pub hash: String,
    pub timestamp: i64,
}

pub struct DocumentSigner<'a> {
    api_client: &'a ApiClient,
    crypto: &'a dyn CryptoProvider,
    user_store: &'a dyn UserStore,
}

impl<'a> DocumentSigner<'a> {
    pub fn new(
        api_client: &'a ApiClient,
        crypto: &'a dyn CryptoProvider,
        user_store: &'a dyn UserStore,
    ) -> Self {
        Self {
            api_client,
            crypto,
            user_store,
        }
    }

    pub async fn sign(
        &self,
        user_id: &str,
        project_id: &str,
        message: &[u8],
        device_name: &str,
        session: Option<&SigningSessionDetails>,
        pin_provider: &dyn PinProvider,
    ) -> Result<Signature, SigningError> {
        if message.is_empty() {
            return Err(SigningError::EmptyMessageHash);
        }
        if let Some(session) = session {
            if session.session_id.trim().is_empty() {
                return Err(SigningError::InvalidSigningSessionDetails);
            }
        }

        let user = self
            .user_store
            .get(user_id, project_id)
            .await?
            .ok_or(SigningError::InvalidUserData)?;
        if user.revoked {
            return Err(SigningError::Revoked);
        }
        if !user.is_usable() {
            return Err(SigningError::InvalidUserData);
        }
        user.require_signing_key()
            .map_err(|_| SigningError::EmptyPublicKey)?;

        let authenticator = Authenticator::new(self.api_client, self.crypto, self.user_store);
        authenticator
            .authenticate_and_revoke_on_signal(
                &user,
                device_name,
                None,
                Scope::DvsAuth,
                pin_provider,
            )
            .await?;

        // Renewal inside authenticate may have replaced the record.
        let user = self
            .user_store
            .get(user_id, project_id)
            .await?
            .ok_or(SigningError::InvalidUserData)?;
        let public_key = user
            .require_signing_key()
            .map_err(|_| SigningError::EmptyPublicKey)?
            .to_vec();

        let pin = pin_provider
            .get_pin()
            .await
            .ok_or(SigningError::PinCancelled)?;
        let parsed_pin = {
            use secrecy::ExposeSecret;
            let pin_str = pin.expose_secret();
            if pin_str.is_empty() {
                return Err(SigningError::PinCancelled);
            }
            if pin_str.len() as u32 != user.pin_length {
                return Err(SigningError::InvalidPin {
                    expected: user.pin_length,
                });
            }
            util::parse_pin(pin_str).ok_or(SigningError::InvalidPin {
                expected: user.pin_length,
            })?
        };

        let timestamp = util::now_seconds();
        let signing_mpin_id = util::combined_mpin_id(&user.mpin_id, Some(&public_key));
        let signature = self
            .crypto
            .sign(
                message,
                &signing_mpin_id,
                user.token.expose(),
                parsed_pin,
                timestamp,
            )
            .map_err(|error| SigningError::SigningFail {
                cause: SigningCause::Crypto(error),
            })?;

        if signature.u.is_empty() || signature.v.is_empty() {
            return Err(SigningError::SigningFail {
                cause: SigningCause::Crypto(mpin_common::CryptoError::SignError),
            });
        }

        let wire_signature = Signature {
            mpin_id: util::to_hex(&user.mpin_id),
            u: util::to_hex(&signature.u),
            v: util::to_hex(&signature.v),
            public_key: util::to_hex(&public_key),
            dtas: user.dtas.clone(),
            hash: util::to_hex(message),
            timestamp,
        };

        if let Some(session) = session {
            self.complete_session(session, &wire_signature, timestamp)
                .await?;
        }

        Ok(wire_signature)
    }

    async fn complete_session(
        &self,
        session: &SigningSessionDetails,
        signature: &Signature,
        timestamp: i64,
    ) -> Result<(), SigningError> {
        let signature_json = serde_json::to_value(signature).map_err(|error| {
            SigningError::SigningFail {
                cause: SigningCause::Transport(TransportError::Client {
                    code: format!("serialize_signature:{error}"),
                    context: None,
                }),
            }
        })?;
        let response = self
            .api_client
            .complete_signing_session(&CompleteSigningSessionRequest {
                session_id: &session.session_id,
                signature: signature_json,
                timestamp,
            })
            .await
            .map_err(|error| {
                if error.code() == Some("INVALID_REQUEST_PARAMETERS")
                    && error
                        .context()
                        .and_then(|context| context.params.as_deref())
                        == Some("id")
                {
                    SigningError::InvalidSigningSession
                } else {
                    SigningError::SigningFail {
                        cause: SigningCause::Transport(error),
                    }
                }
            })?;

        if response.status == "signed" {
            Ok(())
        } else {
            Err(SigningError::InvalidSigningSession)
        }
    }
}

// SPDX-FileCopyrightText: 2026 MIRACL UK LTD
//
// SPDX-License-Identifier: Apache-2.0

//! The two-stage registration pipeline (§4.4): assembling a client token
//! from two server-issued shares and a user PIN, then persisting the
//! resulting [`UserRecord`].

use mpin_apiclient::{
    registration::{ClientSecretShareResponse, DvsRegisterRequest, RegisterRequest},
    ApiClient, TransportError,
};
use mpin_common::CryptoProvider;
use thiserror::Error;
use tracing::info;

use crate::{
    pin::PinProvider,
    store::{StoreError, UserStore},
    user_record::UserRecord,
    util,
};

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("userId must not be empty")]
    EmptyUserId,
    #[error("invalid or expired activation token")]
    InvalidActivationToken,
    #[error("activation token belongs to a different project")]
    ProjectMismatch,
    #[error("server does not support the configured elliptic curve")]
    UnsupportedEllipticCurve,
    #[error("PIN must be {expected} digits")]
    InvalidPin { expected: u32 },
    #[error("PIN entry was cancelled")]
    PinCancelled,
    #[error("registration failed: {cause}")]
    RegistrationFail { cause: RegistrationCause },
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum RegistrationCause {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Crypto(#[from] mpin_common::CryptoError),
}

fn map_server_error(error: TransportError) -> RegistrationError {
    match error.code() {
        Some("INVALID_ACTIVATION_TOKEN") => RegistrationError::InvalidActivationToken,
        Some("PROJECT_MISMATCH") => RegistrationError::ProjectMismatch,
        Some("UNSUPPORTED_ELLIPTIC_CURVE") => RegistrationError::UnsupportedEllipticCurve,
        _ => RegistrationError::RegistrationFail {
            cause: error.into(),
        },
    }
}

pub struct Registrator<'a> {
    api_client: &'a ApiClient,
    crypto: &'a dyn CryptoProvider,
    user_store: &'a dyn UserStore,
}

impl<'a> Registrator<'a> {
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

    pub async fn register(
        &self,
        user_id: &str,
        project_id: &str,
        activation_token: &str,
        device_name: &str,
        pin_provider: &dyn PinProvider,
    ) -> Result<UserRecord, RegistrationError> {
        if user_id.is_empty() {
            return Err(RegistrationError::EmptyUserId);
        }

        info!(user_id, project_id, "starting registration");

        // 1. register
        let register_response = self
            .api_client
            .register(&RegisterRequest {
                user_id,
                device_name,
                activation_token,
            })
            .await
            .map_err(map_server_error)?;

        // 2. signature URLs
        let signature_urls = self
            .api_client
            .signature_urls(&register_response.signature_url())
            .await
            .map_err(|error| RegistrationError::RegistrationFail {
                cause: error.into(),
            })?;

        // 3. share1
        let share1 = self
            .api_client
            .client_secret_share(&signature_urls.client_secret_share_url)
            .await
            .map_err(|error| RegistrationError::RegistrationFail {
                cause: error.into(),
            })?;
        let share1 = decode_share(share1)?;

        // 4. PIN
        let pin = pin_provider
            .get_pin()
            .await
            .ok_or(RegistrationError::PinCancelled)?;
        let parsed_pin = validate_pin(&pin, register_response.pin_length)?;

        // 5. signing key pair + DVS register
        let signing_key_pair = self
            .crypto
            .generate_signing_key_pair()
            .map_err(|error| RegistrationError::RegistrationFail {
                cause: error.into(),
            })?;
        let public_key_hex = util::to_hex(&signing_key_pair.public_key);
        let dvs_register_response = self
            .api_client
            .dvs_register(&DvsRegisterRequest {
                public_key: &public_key_hex,
                reg_ott: &register_response.reg_ott,
            })
            .await
            .map_err(map_server_error)?;

        // 6. share2, combine, derive token
        let share2 = self
            .api_client
            .client_secret_share(&dvs_register_response.dvs_client_secret_share_url)
            .await
            .map_err(|error| RegistrationError::RegistrationFail {
                cause: error.into(),
            })?;
        let share2 = decode_share(share2)?;

        let client_secret = self
            .crypto
            .combine_client_secret(&share1, &share2)
            .map_err(|error| RegistrationError::RegistrationFail {
                cause: error.into(),
            })?;

        let signing_mpin_id =
            util::from_hex(&dvs_register_response.signing_mpin_id).map_err(|_| {
                RegistrationError::RegistrationFail {
                    cause: RegistrationCause::Crypto(mpin_common::CryptoError::TokenError),
                }
            })?;

        let token = self
            .crypto
            .dvs_client_token(
                &client_secret,
                signing_key_pair.private_key.expose(),
                &signing_mpin_id,
                parsed_pin,
            )
            .map_err(|error| RegistrationError::RegistrationFail {
                cause: error.into(),
            })?;

        // 7. persist - the base mpinId/dtas from `register`, not the
        // DVS-register response's signing values (those are combined into
        // `token` above but are not what `combined_mpin_id` appends the
        // public key to).
        let base_mpin_id = util::from_hex(&register_response.mpin_id).map_err(|_| {
            RegistrationError::RegistrationFail {
                cause: RegistrationCause::Crypto(mpin_common::CryptoError::TokenError),
            }
        })?;
        let record = UserRecord {
            user_id: user_id.to_string(),
            project_id: project_id.to_string(),
            revoked: false,
            pin_length: register_response.pin_length,
            mpin_id: base_mpin_id,
            token: mpin_common::SecretBytes::new(token),
            dtas: register_response.dtas,
            public_key: Some(signing_key_pair.public_key),
        };

        match self.user_store.get(user_id, project_id).await? {
            Some(_) => self.user_store.update(&record).await?,
            None => self.user_store.add(&record).await?,
        }

        Ok(record)
    }

    /// `overrideRegistration`: the DVS-register step only, invoked by the
    /// Authenticator when the server signals a secret rotation. Atomic
    /// replacement of the existing record.
    pub async fn override_registration(
        &self,
        existing: &UserRecord,
        dvs_registration_token: &str,
        device_name: &str,
        pin_provider: &dyn PinProvider,
    ) -> Result<UserRecord, RegistrationError> {
        let _ = device_name;

        let pin = pin_provider
            .get_pin()
            .await
            .ok_or(RegistrationError::PinCancelled)?;
        let parsed_pin = validate_pin(&pin, existing.pin_length)?;

        let signing_key_pair = self
            .crypto
            .generate_signing_key_pair()
            .map_err(|error| RegistrationError::RegistrationFail {
                cause: error.into(),
            })?;
        let public_key_hex = util::to_hex(&signing_key_pair.public_key);

        let dvs_register_response = self
            .api_client
            .dvs_register(&DvsRegisterRequest {
                public_key: &public_key_hex,
                reg_ott: dvs_registration_token,
            })
            .await
            .map_err(map_server_error)?;

        let share2 = self
            .api_client
            .client_secret_share(&dvs_register_response.dvs_client_secret_share_url)
            .await
            .map_err(|error| RegistrationError::RegistrationFail {
                cause: error.into(),
            })?;
        // Renewal rotates only the DVS signing half; the base M-Pin
        // identity material is unchanged, so the fresh share stands in
        // directly as the client secret (no combine step; see DESIGN.md).
        let client_secret = decode_share(share2)?;

        let signing_mpin_id =
            util::from_hex(&dvs_register_response.signing_mpin_id).map_err(|_| {
                RegistrationError::RegistrationFail {
                    cause: RegistrationCause::Crypto(mpin_common::CryptoError::TokenError),
                }
            })?;

        let token = self
            .crypto
            .dvs_client_token(
                &client_secret,
                signing_key_pair.private_key.expose(),
                &signing_mpin_id,
                parsed_pin,
            )
            .map_err(|error| RegistrationError::RegistrationFail {
                cause: error.into(),
            })?;

        // Renewal rotates only the DVS signing half - the base mpinId/dtas
        // from the original `register` call are carried over unchanged.
        let record = UserRecord {
            user_id: existing.user_id.clone(),
            project_id: existing.project_id.clone(),
            revoked: false,
            pin_length: existing.pin_length,
            mpin_id: existing.mpin_id.clone(),
            token: mpin_common::SecretBytes::new(token),
            dtas: existing.dtas.clone(),
            public_key: Some(signing_key_pair.public_key),
        };

        self.user_store.update(&record).await?;
        Ok(record)
    }
}

fn decode_share(response: ClientSecretShareResponse) -> Result<Vec<u8>, RegistrationError> {
    util::from_hex(&response.client_secret_share).map_err(|_| RegistrationError::RegistrationFail {
        cause: RegistrationCause::Crypto(mpin_common::CryptoError::CombineError),
    })
}

fn validate_pin(
    pin: &mpin_common::secret::SecretPin,
    expected_length: u32,
) -> Result<i32, RegistrationError> {
    use secrecy::ExposeSecret;
    let pin_str = pin.expose_secret();
    if pin_str.is_empty() {
        return Err(RegistrationError::PinCancelled);
    }
    if pin_str.len() as u32 != expected_length {
        return Err(RegistrationError::InvalidPin {
            expected: expected_length,
        });
    }
    util::parse_pin(pin_str).ok_or(RegistrationError::InvalidPin {
        expected: expected_length,
    })
}

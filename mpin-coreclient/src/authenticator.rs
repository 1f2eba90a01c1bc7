// SPDX-FileCopyrightText: 2026 MIRACL UK LTD
//
// SPDX-License-Identifier: Apache-2.0

//! The two-pass M-Pin authentication state machine (§4.5): the
//! cryptographic core of this library.

use mpin_apiclient::{
    auth::{AuthenticateRequest, AuthenticateResponse, Pass1Request, Pass2Request},
    ApiClient, TransportError,
};
use mpin_common::CryptoProvider;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::{
    pin::PinProvider,
    registrator::Registrator,
    store::{StoreError, UserStore},
    user_record::UserRecord,
    util,
};

/// Opaque scope tag understood by the server (§4.5, §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Jwt,
    Oidc,
    DvsAuth,
    RegCode,
}

impl Scope {
    fn as_str(self) -> &'static str {
        match self {
            Scope::Jwt => "jwt",
            Scope::Oidc => "oidc",
            Scope::DvsAuth => "dvs-auth",
            Scope::RegCode => "reg-code",
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthenticationError {
    #[error("user record is missing required fields")]
    InvalidUserData,
    #[error("app link did not contain a session fragment")]
    InvalidAppLink,
    #[error("QR payload did not contain a session fragment")]
    InvalidQRCode,
    #[error("push notification payload is missing projectID, userID or qrURL")]
    InvalidPushNotificationPayload,
    #[error("no registered user for this identity")]
    UserNotFound,
    #[error("PIN must be {expected} digits")]
    InvalidPin { expected: u32 },
    #[error("PIN entry was cancelled")]
    PinCancelled,
    #[error("the authentication session is no longer valid")]
    InvalidAuthenticationSession,
    #[error("authentication was rejected by the server")]
    UnsuccessfulAuthentication,
    #[error("this identity has been revoked and must be re-registered")]
    Revoked,
    #[error("authentication failed: {cause}")]
    AuthenticationFail { cause: TransportError },
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn map_pass1_error(error: TransportError) -> AuthenticationError {
    match error.code() {
        Some("MPINID_EXPIRED") | Some("EXPIRED_MPINID") => AuthenticationError::Revoked,
        Some("MPINID_REVOKED") | Some("REVOKED_MPINID") => AuthenticationError::Revoked,
        _ => AuthenticationError::AuthenticationFail { cause: error },
    }
}

fn map_authenticate_error(error: TransportError) -> AuthenticationError {
    match error.code() {
        Some("INVALID_AUTH_SESSION") | Some("INVALID_AUTHENTICATION_SESSION") => {
            AuthenticationError::InvalidAuthenticationSession
        }
        Some("INVALID_AUTH") | Some("UNSUCCESSFUL_AUTHENTICATION") => {
            AuthenticationError::UnsuccessfulAuthentication
        }
        Some("MPINID_REVOKED") | Some("REVOKED_MPINID") => AuthenticationError::Revoked,
        _ => AuthenticationError::AuthenticationFail { cause: error },
    }
}

/// A successful authentication, shaped by `scope`: `jwt`/`oidc` carry a
/// `jwt`; `reg-code` carries `code`/`expire_time` on the raw response.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    pub jwt: Option<String>,
    pub raw: AuthenticateResponse,
}

pub struct Authenticator<'a> {
    api_client: &'a ApiClient,
    crypto: &'a dyn CryptoProvider,
    user_store: &'a dyn UserStore,
}

impl<'a> Authenticator<'a> {
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

    /// Runs one authentication attempt, including at most one renewal
    /// recursion (§9: bounded to depth 1).
    pub async fn authenticate(
        &self,
        user: &UserRecord,
        device_name: &str,
        access_id: Option<&str>,
        scope: Scope,
        pin_provider: &dyn PinProvider,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        self.authenticate_inner(user.clone(), device_name, access_id, scope, pin_provider, true)
            .await
    }

    /// One pass-1/pass-2/authenticate round for `user`. Renewal (§9) is
    /// bounded to depth 1 by looping at most twice rather than recursing:
    /// the first iteration may trigger one `overrideRegistration`, the
    /// second never does.
    async fn authenticate_inner(
        &self,
        user: UserRecord,
        device_name: &str,
        access_id: Option<&str>,
        scope: Scope,
        pin_provider: &dyn PinProvider,
        allow_renewal: bool,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let mut user = user;
        let mut allow_renewal = allow_renewal;

        loop {
            if user.revoked {
                return Err(AuthenticationError::Revoked);
            }
            if user.user_id.is_empty()
                || user.project_id.is_empty()
                || user.mpin_id.is_empty()
                || user.token.is_empty()
                || user.dtas.is_empty()
            {
                return Err(AuthenticationError::InvalidUserData);
            }

            if let Some(access_id) = access_id {
                if let Err(error) = self
                    .api_client
                    .update_session_user_entered(access_id, &user.user_id)
                    .await
                {
                    warn!(error = %error, "update-session-status failed, continuing");
                }
            }

            let pin = pin_provider
                .get_pin()
                .await
                .ok_or(AuthenticationError::PinCancelled)?;
            let parsed_pin = validate_pin(&pin, user.pin_length)?;

            let combined_mpin_id = user.combined_mpin_id();
            let public_key_hex = user.public_key.as_deref().map(util::to_hex);

            let pass1 = self
                .crypto
                .client_pass_1(&combined_mpin_id, user.token.expose(), parsed_pin)
                .map_err(|error| AuthenticationError::AuthenticationFail {
                    cause: TransportError::Client {
                        code: format!("crypto:{error}"),
                        context: None,
                    },
                })?;

            let mpin_id_hex = util::to_hex(&user.mpin_id);
            let pass1_response = self
                .api_client
                .pass1(&Pass1Request {
                    mpin_id: &mpin_id_hex,
                    dtas: &user.dtas,
                    u: &util::to_hex(&pass1.u),
                    scope: &[scope.as_str()],
                    public_key: public_key_hex.as_deref(),
                })
                .await
                .map_err(map_pass1_error)?;

            let y = util::from_hex(&pass1_response.y).map_err(|_| {
                AuthenticationError::AuthenticationFail {
                    cause: TransportError::Client {
                        code: "invalid_hex:Y".into(),
                        context: None,
                    },
                }
            })?;

            let pass2 = self
                .crypto
                .client_pass_2(&pass1.x, &y, pass1.sec.expose())
                .map_err(|error| AuthenticationError::AuthenticationFail {
                    cause: TransportError::Client {
                        code: format!("crypto:{error}"),
                        context: None,
                    },
                })?;

            let pass2_response = self
                .api_client
                .pass2(&Pass2Request {
                    mpin_id: &mpin_id_hex,
                    access_id,
                    v: &util::to_hex(&pass2.v),
                })
                .await
                .map_err(|error| AuthenticationError::AuthenticationFail { cause: error })?;

            let authenticate_response = self
                .api_client
                .authenticate(&AuthenticateRequest {
                    auth_ott: &pass2_response.auth_ott,
                    wam: "dvs",
                })
                .await
                .map_err(map_authenticate_error)?;

            let renewal_token = authenticate_response
                .dvs_register
                .as_ref()
                .and_then(|hint| hint.token.clone());

            if let Some(renewal_token) = renewal_token {
                if allow_renewal {
                    info!(user_id = %user.user_id, "server requested secret renewal");
                    let registrator =
                        Registrator::new(self.api_client, self.crypto, self.user_store);
                    match registrator
                        .override_registration(&user, &renewal_token, device_name, pin_provider)
                        .await
                    {
                        Ok(renewed) => {
                            user = renewed;
                            allow_renewal = false;
                            continue;
                        }
                        Err(error) => {
                            warn!(error = %error, "secret renewal failed, returning original response");
                        }
                    }
                }
            }

            return Ok(AuthenticationResult {
                jwt: authenticate_response.jwt.clone(),
                raw: authenticate_response,
            });
        }
    }

    async fn revoke_locally(&self, user: &UserRecord) -> Result<(), StoreError> {
        let mut revoked = user.clone();
        revoked.revoked = true;
        self.user_store.update(&revoked).await
    }

    /// Runs [`Self::authenticate`], additionally persisting `revoked=true`
    /// locally whenever the server signals revocation (pass-1 or
    /// authenticate), per §7's propagation rule.
    pub async fn authenticate_and_revoke_on_signal(
        &self,
        user: &UserRecord,
        device_name: &str,
        access_id: Option<&str>,
        scope: Scope,
        pin_provider: &dyn PinProvider,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let result = self
            .authenticate(user, device_name, access_id, scope, pin_provider)
            .await;
        if let Err(AuthenticationError::Revoked) = &result {
            if let Err(store_error) = self.revoke_locally(user).await {
                warn!(error = %store_error, "failed to persist local revocation");
            }
        }
        result
    }

    pub fn extract_access_id_from_app_link(link: &str) -> Result<String, AuthenticationError> {
        let parsed = Url::parse(link).map_err(|_| AuthenticationError::InvalidAppLink)?;
        parsed
            .fragment()
            .filter(|fragment| !fragment.is_empty())
            .map(str::to_string)
            .ok_or(AuthenticationError::InvalidAppLink)
    }

    pub fn extract_access_id_from_qr_code(payload: &str) -> Result<String, AuthenticationError> {
        let parsed = Url::parse(payload).map_err(|_| AuthenticationError::InvalidQRCode)?;
        parsed
            .fragment()
            .filter(|fragment| !fragment.is_empty())
            .map(str::to_string)
            .ok_or(AuthenticationError::InvalidQRCode)
    }

    pub async fn authenticate_with_notification_payload(
        &self,
        payload: &std::collections::HashMap<String, String>,
        device_name: &str,
        scope: Scope,
        pin_provider: &dyn PinProvider,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let project_id = payload
            .get("projectID")
            .ok_or(AuthenticationError::InvalidPushNotificationPayload)?;
        let user_id = payload
            .get("userID")
            .ok_or(AuthenticationError::InvalidPushNotificationPayload)?;
        let qr_url = payload
            .get("qrURL")
            .ok_or(AuthenticationError::InvalidPushNotificationPayload)?;
        let access_id = Self::extract_access_id_from_qr_code(qr_url)
            .map_err(|_| AuthenticationError::InvalidPushNotificationPayload)?;

        let user = self
            .user_store
            .get(user_id, project_id)
            .await?
            .ok_or(AuthenticationError::UserNotFound)?;

        self.authenticate_and_revoke_on_signal(
            &user,
            device_name,
            Some(&access_id),
            scope,
            pin_provider,
        )
        .await
    }
}

fn validate_pin(
    pin: &mpin_common::secret::SecretPin,
    expected_length: u32,
) -> Result<i32, AuthenticationError> {
    use secrecy::ExposeSecret;
    let pin_str = pin.expose_secret();
    if pin_str.is_empty() {
        return Err(AuthenticationError::PinCancelled);
    }
    if pin_str.len() as u32 != expected_length {
        return Err(AuthenticationError::InvalidPin {
            expected: expected_length,
        });
    }
    util::parse_pin(pin_str).ok_or(AuthenticationError::InvalidPin {
        expected: expected_length,
    })
}

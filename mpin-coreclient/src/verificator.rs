// SPDX-FileCopyrightText: 2026 MIRACL UK LTD
//
// SPDX-License-Identifier: Apache-2.0

//! User-ID verification: exchanging an out-of-band proof of ownership
//! (an emailed code/link) for the activation token the Registrator needs
//! (§4.3).

use mpin_apiclient::{
    auth::AuthenticateResponse,
    verification::{
        ConfirmationByCodeRequest, ConfirmationByUriRequest, ConfirmationResponse,
        SendVerificationEmailRequest,
    },
    ApiClient, TransportError,
};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("verification URI is missing or has a malformed code/user_id query")]
    InvalidVerificationUri,
    #[error("invalid email address")]
    InvalidEmail,
    #[error("verification is not supported for this project")]
    VerificationNotSupported,
    #[error("too many verification requests; retry after {backoff} seconds")]
    RequestBackoff { backoff: u64 },
    #[error("verification for user {user_id:?} in project {project_id:?} was unsuccessful")]
    UnsuccessfulVerification {
        project_id: String,
        user_id: String,
        access_id: Option<String>,
    },
    #[error("verification request failed: {cause}")]
    VerificationFail { cause: TransportError },
}

/// Successful result of `sendVerificationEmail`.
#[derive(Debug, Clone)]
pub struct VerificationStarted {
    pub backoff: Option<u64>,
    pub verification_method: String,
}

/// Successful result of either `getActivationToken` overload.
#[derive(Debug, Clone)]
pub struct ActivationToken {
    pub project_id: String,
    pub user_id: String,
    pub activation_token: String,
    pub access_id: Option<String>,
}

fn map_server_error(error: TransportError) -> VerificationError {
    match error.code() {
        Some("REQUEST_BACKOFF") => {
            let backoff = error
                .context()
                .and_then(|context| context.params.as_deref())
                .and_then(|params| params.parse().ok())
                .unwrap_or(0);
            VerificationError::RequestBackoff { backoff }
        }
        Some("INVALID_EMAIL_ADDRESS") => VerificationError::InvalidEmail,
        Some("VERIFICATION_NOT_SUPPORTED") => VerificationError::VerificationNotSupported,
        _ => VerificationError::VerificationFail { cause: error },
    }
}

fn map_confirmation_error(error: TransportError, user_id: &str) -> VerificationError {
    match error.code() {
        Some("UNSUCCESSFUL_VERIFICATION") => {
            let context = error.context();
            VerificationError::UnsuccessfulVerification {
                project_id: context
                    .and_then(|context| context.extra.get("projectId"))
                    .and_then(|value| value.as_str())
                    .unwrap_or_default()
                    .to_string(),
                user_id: user_id.to_string(),
                access_id: context
                    .and_then(|context| context.extra.get("accessId"))
                    .and_then(|value| value.as_str())
                    .map(str::to_string),
            }
        }
        _ => VerificationError::VerificationFail { cause: error },
    }
}

pub struct Verificator<'a> {
    api_client: &'a ApiClient,
}

impl<'a> Verificator<'a> {
    pub fn new(api_client: &'a ApiClient) -> Self {
        Self { api_client }
    }

    pub async fn send_verification_email(
        &self,
        user_id: &str,
        project_id: &str,
        device_name: &str,
        access_id: Option<&str>,
    ) -> Result<VerificationStarted, VerificationError> {
        info!(user_id, project_id, "starting email verification");
        let response = self
            .api_client
            .send_verification_email(&SendVerificationEmailRequest {
                user_id,
                project_id,
                device_name,
                access_id,
            })
            .await
            .map_err(map_server_error)?;
        Ok(VerificationStarted {
            backoff: response.backoff,
            verification_method: response.verification_method,
        })
    }

    /// Extracts `code` and `user_id` from the verification link's query
    /// string and exchanges them for an activation token.
    pub async fn get_activation_token_from_uri(
        &self,
        verification_uri: &str,
    ) -> Result<ActivationToken, VerificationError> {
        let parsed =
            Url::parse(verification_uri).map_err(|_| VerificationError::InvalidVerificationUri)?;
        let mut code = None;
        let mut user_id = None;
        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                "code" => code = Some(value.into_owned()),
                "user_id" => user_id = Some(value.into_owned()),
                _ => {}
            }
        }
        let (code, user_id) = match (code, user_id) {
            (Some(code), Some(user_id)) => (code, user_id),
            _ => return Err(VerificationError::InvalidVerificationUri),
        };

        let response = self
            .api_client
            .confirm_by_uri(&ConfirmationByUriRequest {
                code: &code,
                user_id: &user_id,
            })
            .await
            .map_err(|error| map_confirmation_error(error, &user_id))?;
        Ok(into_activation_token(response))
    }

    pub async fn get_activation_token_from_code(
        &self,
        user_id: &str,
        verification_code: &str,
    ) -> Result<ActivationToken, VerificationError> {
        let response = self
            .api_client
            .confirm_by_code(&ConfirmationByCodeRequest {
                user_id,
                verification_code,
            })
            .await
            .map_err(|error| map_confirmation_error(error, user_id))?;
        Ok(into_activation_token(response))
    }

    /// `generateQuickCode` authenticates in the `reg-code` scope and
    /// surfaces the server-issued code and its expiry, carried back on
    /// [`AuthenticateResponse`] rather than a dedicated endpoint.
    pub fn quickcode_from_authenticate(
        &self,
        response: &AuthenticateResponse,
    ) -> Option<(String, i64)> {
        match (response.code.as_deref(), response.expire_time) {
            (Some(code), Some(expire_time)) => Some((code.to_string(), expire_time)),
            _ => {
                warn!("authenticate response in reg-code scope carried no code/expireTime");
                None
            }
        }
    }
}

fn into_activation_token(response: ConfirmationResponse) -> ActivationToken {
    ActivationToken {
        project_id: response.project_id,
        user_id: response.user_id,
        activation_token: response.activation_token,
        access_id: response.access_id,
    }
}

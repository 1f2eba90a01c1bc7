// SPDX-FileCopyrightText: 2026 MIRACL UK LTD
//
// SPDX-License-Identifier: Apache-2.0

//! Cross-device session coordination (§4.7): retrieving and aborting
//! authentication/signing sessions that originated on another device,
//! and extracting session identifiers from app-links, QR payloads, and
//! push-notification payloads.

use std::collections::HashMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use mpin_apiclient::{session::SessionDetailsResponse, ApiClient, TransportError};
use thiserror::Error;
use url::Url;

use crate::document_signer::Signature;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("app link did not contain a session fragment")]
    InvalidAppLink,
    #[error("QR payload did not contain a session fragment")]
    InvalidQRCode,
    #[error("push notification payload did not contain a session fragment")]
    InvalidNotificationPayload,
    #[error("session id is blank")]
    InvalidSessionDetails,
    #[error("the signing session is no longer valid")]
    InvalidSigningSession,
    #[error("failed to retrieve session: {cause}")]
    GetSessionFail { cause: TransportError },
    #[error("failed to abort session: {cause}")]
    AbortSessionFail { cause: TransportError },
}

fn extract_fragment(uri: &str) -> Option<String> {
    Url::parse(uri)
        .ok()?
        .fragment()
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_string)
}

pub struct SessionCoordinator<'a> {
    api_client: &'a ApiClient,
}

impl<'a> SessionCoordinator<'a> {
    pub fn new(api_client: &'a ApiClient) -> Self {
        Self { api_client }
    }

    pub fn session_id_from_app_link(link: &str) -> Result<String, SessionError> {
        extract_fragment(link).ok_or(SessionError::InvalidAppLink)
    }

    pub fn session_id_from_qr_code(payload: &str) -> Result<String, SessionError> {
        extract_fragment(payload).ok_or(SessionError::InvalidQRCode)
    }

    pub fn session_id_from_notification_payload(
        payload: &HashMap<String, String>,
    ) -> Result<String, SessionError> {
        payload
            .get("qrURL")
            .and_then(|qr_url| extract_fragment(qr_url))
            .ok_or(SessionError::InvalidNotificationPayload)
    }

    pub async fn get_authentication_session(
        &self,
        access_id: &str,
    ) -> Result<SessionDetailsResponse, SessionError> {
        self.api_client
            .session_details(access_id)
            .await
            .map_err(|cause| SessionError::GetSessionFail { cause })
    }

    pub async fn abort_authentication_session(&self, access_id: &str) -> Result<(), SessionError> {
        if access_id.trim().is_empty() {
            return Err(SessionError::InvalidSessionDetails);
        }
        self.api_client
            .abort_session(access_id)
            .await
            .map(|_| ())
            .map_err(|cause| SessionError::AbortSessionFail { cause })
    }

    pub async fn get_signing_session(
        &self,
        session_id: &str,
    ) -> Result<SessionDetailsResponse, SessionError> {
        self.api_client
            .signing_session_details(session_id)
            .await
            .map_err(|error| map_signing_error(error, |cause| SessionError::GetSessionFail { cause }))
    }

    pub async fn abort_signing_session(&self, session_id: &str) -> Result<(), SessionError> {
        if session_id.trim().is_empty() {
            return Err(SessionError::InvalidSessionDetails);
        }
        self.api_client
            .abort_signing_session(session_id)
            .await
            .map(|_| ())
            .map_err(|error| map_signing_error(error, |cause| SessionError::AbortSessionFail { cause }))
    }

    /// Completes a cross-device signing session by POSTing a
    /// base64-encoded JSON `Signature` with `status=signed` (§4.7).
    pub async fn complete_cross_device_signing(
        &self,
        session_id: &str,
        signature: &Signature,
        timestamp: i64,
    ) -> Result<(), SessionError> {
        let signature_json = serde_json::to_string(signature).unwrap_or_default();
        let encoded = STANDARD.encode(signature_json);
        let request = mpin_apiclient::session::CompleteSigningSessionRequest {
            session_id,
            signature: serde_json::Value::String(encoded),
            timestamp,
        };
        let response = self
            .api_client
            .complete_signing_session(&request)
            .await
            .map_err(|error| map_signing_error(error, |cause| SessionError::GetSessionFail { cause }))?;
        if response.status == "signed" {
            Ok(())
        } else {
            Err(SessionError::InvalidSigningSession)
        }
    }
}

fn map_signing_error(
    error: TransportError,
    generic: impl FnOnce(TransportError) -> SessionError,
) -> SessionError {
    let is_invalid_session_id = error.code() == Some("INVALID_REQUEST_PARAMETERS")
        && error
            .context()
            .and_then(|context| context.params.as_deref())
            == Some("id");
    if is_invalid_session_id {
        SessionError::InvalidSigningSession
    } else {
        generic(error)
    }
}

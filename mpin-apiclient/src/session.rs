// SPDX-FileCopyrightText: 2026 MIRACL UK LTD
//
// SPDX-License-Identifier: Apache-2.0

//! `codeStatus` (read / abort an authentication session) and
//! `dvs/session` / `dvs/session/details` (signing sessions), per §4.7.

use serde::{Deserialize, Serialize};

use crate::{ApiClient, TransportError};

#[derive(Debug, Serialize)]
pub struct CodeStatusRequest<'a> {
    #[serde(rename = "WID")]
    pub wid: &'a str,
    pub status: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionDetailsResponse {
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
    #[serde(rename = "projectId", default)]
    pub project_id: Option<String>,
    #[serde(rename = "projectName", default)]
    pub project_name: Option<String>,
    #[serde(rename = "projectLogoURL", default)]
    pub project_logo_url: Option<String>,
    #[serde(rename = "pinLength", default)]
    pub pin_length: Option<u32>,
    #[serde(rename = "verificationMethod", default)]
    pub verification_method: Option<String>,
    #[serde(rename = "verificationURL", default)]
    pub verification_url: Option<String>,
    #[serde(rename = "verificationCustomText", default)]
    pub verification_custom_text: Option<String>,
    #[serde(rename = "identityType", default)]
    pub identity_type: Option<String>,
    #[serde(rename = "identityTypeLabel", default)]
    pub identity_type_label: Option<String>,
    #[serde(rename = "quickCodeEnabled", default)]
    pub quick_code_enabled: Option<bool>,
    #[serde(rename = "limitQuickCodeRegistration", default)]
    pub limit_quickcode_registration: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "expireTime", default)]
    pub expire_time: Option<i64>,
    #[serde(rename = "signingHash", default)]
    pub signing_hash: Option<String>,
    #[serde(rename = "signingDescription", default)]
    pub signing_description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SigningSessionDetailsRequest<'a> {
    #[serde(rename = "sessionId")]
    pub session_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CompleteSigningSessionRequest<'a> {
    #[serde(rename = "sessionId")]
    pub session_id: &'a str,
    pub signature: serde_json::Value,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompleteSigningSessionResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct AbortSigningSessionRequest<'a> {
    #[serde(rename = "sessionId")]
    pub session_id: &'a str,
}

const PATH_CODE_STATUS: &str = "/rps/v2/codeStatus";
const PATH_DVS_SESSION: &str = "/dvs/session";
const PATH_DVS_SESSION_DETAILS: &str = "/dvs/session/details";

impl ApiClient {
    pub async fn session_details(
        &self,
        access_id: &str,
    ) -> Result<SessionDetailsResponse, TransportError> {
        let request = CodeStatusRequest {
            wid: access_id,
            status: "wid",
        };
        self.post_json(PATH_CODE_STATUS, &request).await
    }

    pub async fn abort_session(&self, access_id: &str) -> Result<serde_json::Value, TransportError> {
        let request = CodeStatusRequest {
            wid: access_id,
            status: "abort",
        };
        self.post_json(PATH_CODE_STATUS, &request).await
    }

    pub async fn signing_session_details(
        &self,
        session_id: &str,
    ) -> Result<SessionDetailsResponse, TransportError> {
        let request = SigningSessionDetailsRequest { session_id };
        self.post_json(PATH_DVS_SESSION_DETAILS, &request).await
    }

    pub async fn complete_signing_session(
        &self,
        request: &CompleteSigningSessionRequest<'_>,
    ) -> Result<CompleteSigningSessionResponse, TransportError> {
        self.put_json(PATH_DVS_SESSION, request).await
    }

    pub async fn abort_signing_session(
        &self,
        session_id: &str,
    ) -> Result<serde_json::Value, TransportError> {
        let request = AbortSigningSessionRequest { session_id };
        self.delete_json(PATH_DVS_SESSION, &request).await
    }
}

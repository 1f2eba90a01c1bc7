// SPDX-FileCopyrightText: 2026 MIRACL UK LTD
//
// SPDX-License-Identifier: Apache-2.0

//! `/verification/*` — User-ID verification and activation-token exchange.

use serde::{Deserialize, Serialize};

use crate::{ApiClient, TransportError};

#[derive(Debug, Serialize)]
pub struct SendVerificationEmailRequest<'a> {
    #[serde(rename = "userId")]
    pub user_id: &'a str,
    #[serde(rename = "projectId")]
    pub project_id: &'a str,
    #[serde(rename = "deviceName")]
    pub device_name: &'a str,
    #[serde(rename = "accessId", skip_serializing_if = "Option::is_none")]
    pub access_id: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendVerificationEmailResponse {
    #[serde(default)]
    pub backoff: Option<u64>,
    #[serde(rename = "verificationMethod")]
    pub verification_method: String,
}

#[derive(Debug, Serialize)]
pub struct QuickCodeVerificationRequest<'a> {
    #[serde(rename = "userId")]
    pub user_id: &'a str,
    #[serde(rename = "projectId")]
    pub project_id: &'a str,
    #[serde(rename = "deviceName")]
    pub device_name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ConfirmationByUriRequest<'a> {
    pub code: &'a str,
    #[serde(rename = "userId")]
    pub user_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ConfirmationByCodeRequest<'a> {
    #[serde(rename = "userId")]
    pub user_id: &'a str,
    #[serde(rename = "code")]
    pub verification_code: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmationResponse {
    #[serde(rename = "projectId")]
    pub project_id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "actToken")]
    pub activation_token: String,
    #[serde(rename = "accessId", default)]
    pub access_id: Option<String>,
}

const PATH_EMAIL: &str = "/verification/email";
const PATH_QUICKCODE: &str = "/verification/quickcode";
const PATH_CONFIRMATION: &str = "/verification/confirmation";

impl ApiClient {
    pub async fn send_verification_email(
        &self,
        request: &SendVerificationEmailRequest<'_>,
    ) -> Result<SendVerificationEmailResponse, TransportError> {
        self.post_json(PATH_EMAIL, request).await
    }

    pub async fn start_quickcode_verification(
        &self,
        request: &QuickCodeVerificationRequest<'_>,
    ) -> Result<SendVerificationEmailResponse, TransportError> {
        self.post_json(PATH_QUICKCODE, request).await
    }

    pub async fn confirm_by_uri(
        &self,
        request: &ConfirmationByUriRequest<'_>,
    ) -> Result<ConfirmationResponse, TransportError> {
        self.post_json(PATH_CONFIRMATION, request).await
    }

    pub async fn confirm_by_code(
        &self,
        request: &ConfirmationByCodeRequest<'_>,
    ) -> Result<ConfirmationResponse, TransportError> {
        self.post_json(PATH_CONFIRMATION, request).await
    }
}

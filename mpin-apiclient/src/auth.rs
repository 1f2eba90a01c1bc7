// SPDX-FileCopyrightText: 2026 MIRACL UK LTD
//
// SPDX-License-Identifier: Apache-2.0

//! `/rps/v2/pass1`, `/rps/v2/pass2`, `/rps/v2/authenticate`, and the
//! `codeStatus` "userid-entered" update used by the cross-device flow
//! (§4.5).

use serde::{Deserialize, Serialize};

use crate::{ApiClient, TransportError};

#[derive(Debug, Serialize)]
pub struct Pass1Request<'a> {
    #[serde(rename = "mpinId")]
    pub mpin_id: &'a str,
    pub dtas: &'a str,
    #[serde(rename = "U")]
    pub u: &'a str,
    pub scope: &'a [&'a str],
    #[serde(rename = "publicKey", skip_serializing_if = "Option::is_none")]
    pub public_key: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pass1Response {
    #[serde(rename = "Y")]
    pub y: String,
}

#[derive(Debug, Serialize)]
pub struct Pass2Request<'a> {
    #[serde(rename = "mpinId")]
    pub mpin_id: &'a str,
    #[serde(rename = "accessId", skip_serializing_if = "Option::is_none")]
    pub access_id: Option<&'a str>,
    #[serde(rename = "V")]
    pub v: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pass2Response {
    #[serde(rename = "authOTT")]
    pub auth_ott: String,
}

#[derive(Debug, Serialize)]
pub struct AuthenticateRequest<'a> {
    #[serde(rename = "authOTT")]
    pub auth_ott: &'a str,
    pub wam: &'a str,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DvsRegisterHint {
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticateResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "dvsRegister", default)]
    pub dvs_register: Option<DvsRegisterHint>,
    #[serde(default)]
    pub jwt: Option<String>,
    /// Present only when the originating request used scope `reg-code`.
    #[serde(default)]
    pub code: Option<String>,
    #[serde(rename = "expireTime", default)]
    pub expire_time: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct UpdateSessionStatusRequest<'a> {
    #[serde(rename = "accessId")]
    pub access_id: &'a str,
    #[serde(rename = "userId")]
    pub user_id: &'a str,
    pub status: &'a str,
}

const PATH_PASS1: &str = "/rps/v2/pass1";
const PATH_PASS2: &str = "/rps/v2/pass2";
const PATH_AUTHENTICATE: &str = "/rps/v2/authenticate";
const PATH_CODE_STATUS: &str = "/rps/v2/codeStatus";

impl ApiClient {
    pub async fn pass1(&self, request: &Pass1Request<'_>) -> Result<Pass1Response, TransportError> {
        self.post_json(PATH_PASS1, request).await
    }

    pub async fn pass2(&self, request: &Pass2Request<'_>) -> Result<Pass2Response, TransportError> {
        self.post_json(PATH_PASS2, request).await
    }

    pub async fn authenticate(
        &self,
        request: &AuthenticateRequest<'_>,
    ) -> Result<AuthenticateResponse, TransportError> {
        self.post_json(PATH_AUTHENTICATE, request).await
    }

    /// Marks the remote session as "userid-entered", before PIN
    /// acquisition. Callers treat failure here as non-fatal (§5).
    pub async fn update_session_user_entered(
        &self,
        access_id: &str,
        user_id: &str,
    ) -> Result<serde_json::Value, TransportError> {
        let request = UpdateSessionStatusRequest {
            access_id,
            user_id,
            status: "user",
        };
        self.post_json(PATH_CODE_STATUS, &request).await
    }
}

// SPDX-FileCopyrightText: 2026 MIRACL UK LTD
//
// SPDX-License-Identifier: Apache-2.0

//! `/rps/v2/user`, `/rps/v2/signature`, `/rps/v2/dvsregister` — the two
//! stages of the registration pipeline (§4.4).

use serde::{Deserialize, Serialize};

use crate::{ApiClient, TransportError};

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    #[serde(rename = "userId")]
    pub user_id: &'a str,
    #[serde(rename = "deviceName")]
    pub device_name: &'a str,
    #[serde(rename = "activationToken")]
    pub activation_token: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    #[serde(rename = "mpinId")]
    pub mpin_id: String,
    #[serde(rename = "regOTT")]
    pub reg_ott: String,
    pub dtas: String,
    #[serde(rename = "pinLength")]
    pub pin_length: u32,
    /// Path appended to the platform URL to fetch the signature-share
    /// URLs; see `signature_urls`.
    #[serde(rename = "prerollId", default)]
    pub preroll_id: Option<String>,
}

impl RegisterResponse {
    /// The path under `/rps/v2/signature` used to fetch the client-secret
    /// share URLs for this registration attempt.
    pub fn signature_url(&self) -> String {
        format!("/rps/v2/signature/{}", self.mpin_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignatureUrlsResponse {
    #[serde(rename = "clientSecretShareURL")]
    pub client_secret_share_url: String,
    #[serde(rename = "dvsClientSecretShareURL", default)]
    pub dvs_client_secret_share_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecretShareResponse {
    #[serde(rename = "clientSecretShare")]
    pub client_secret_share: String,
}

#[derive(Debug, Serialize)]
pub struct DvsRegisterRequest<'a> {
    #[serde(rename = "publicKey")]
    pub public_key: &'a str,
    #[serde(rename = "regOTT")]
    pub reg_ott: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DvsRegisterResponse {
    #[serde(rename = "mpinId")]
    pub signing_mpin_id: String,
    pub dtas: String,
    #[serde(rename = "dvsClientSecretShareURL")]
    pub dvs_client_secret_share_url: String,
}

const PATH_REGISTER: &str = "/rps/v2/user";
const PATH_DVS_REGISTER: &str = "/rps/v2/dvsregister";

impl ApiClient {
    pub async fn register(
        &self,
        request: &RegisterRequest<'_>,
    ) -> Result<RegisterResponse, TransportError> {
        self.post_json(PATH_REGISTER, request).await
    }

    pub async fn signature_urls(
        &self,
        signature_url: &str,
    ) -> Result<SignatureUrlsResponse, TransportError> {
        self.get_json(signature_url).await
    }

    pub async fn client_secret_share(
        &self,
        share_url: &str,
    ) -> Result<ClientSecretShareResponse, TransportError> {
        self.get_json(share_url).await
    }

    pub async fn dvs_register(
        &self,
        request: &DvsRegisterRequest<'_>,
    ) -> Result<DvsRegisterResponse, TransportError> {
        self.post_json(PATH_DVS_REGISTER, request).await
    }
}

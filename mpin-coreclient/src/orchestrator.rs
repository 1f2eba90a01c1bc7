// SPDX-FileCopyrightText: 2026 MIRACL UK LTD
//
// SPDX-License-Identifier: Apache-2.0

//! The facade host applications hold a long-lived reference to (§4.8):
//! wires [`Config`], [`UserStore`], [`ApiClient`] and [`CryptoProvider`]
//! together and exposes one async method per operation.

use std::collections::HashMap;
use std::sync::Arc;

use mpin_apiclient::{ApiClient, ApiClientInitError};
use mpin_common::CryptoProvider;

use crate::{
    authenticator::{AuthenticationError, AuthenticationResult, Authenticator, Scope},
    config::{Config, ConfigurationError},
    document_signer::{DocumentSigner, Signature, SigningError, SigningSessionDetails},
    pin::PinProvider,
    registrator::{RegistrationError, Registrator},
    session_coordinator::{SessionCoordinator, SessionError},
    store::{StoreError, UserStore},
    user_record::UserRecord,
    verificator::{ActivationToken, VerificationError, VerificationStarted, Verificator},
};

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorInitError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    ApiClient(#[from] ApiClientInitError),
}

/// Top-level entry point. Owns the three leaf collaborators behind
/// `Arc`; components borrow them for the duration of a single call so
/// the facade remains the sole long-lived owner (§2 dependency
/// direction).
pub struct MpinClient {
    config: Config,
    api_client: Arc<ApiClient>,
    crypto: Arc<dyn CryptoProvider>,
    user_store: Arc<dyn UserStore>,
}

impl MpinClient {
    pub fn new(
        config: Config,
        crypto: Arc<dyn CryptoProvider>,
        user_store: Arc<dyn UserStore>,
    ) -> Result<Self, OrchestratorInitError> {
        let api_client = Arc::new(ApiClient::new(config.platform_url.as_str())?);
        Ok(Self {
            config,
            api_client,
            crypto,
            user_store,
        })
    }

    pub fn project_id(&self) -> &str {
        &self.config.project_id
    }

    pub async fn send_verification_email(
        &self,
        user_id: &str,
        access_id: Option<&str>,
    ) -> Result<VerificationStarted, VerificationError> {
        Verificator::new(&self.api_client)
            .send_verification_email(
                user_id,
                &self.config.project_id,
                &self.config.device_name,
                access_id,
            )
            .await
    }

    pub async fn get_activation_token_from_uri(
        &self,
        verification_uri: &str,
    ) -> Result<ActivationToken, VerificationError> {
        Verificator::new(&self.api_client)
            .get_activation_token_from_uri(verification_uri)
            .await
    }

    pub async fn get_activation_token_from_code(
        &self,
        user_id: &str,
        verification_code: &str,
    ) -> Result<ActivationToken, VerificationError> {
        Verificator::new(&self.api_client)
            .get_activation_token_from_code(user_id, verification_code)
            .await
    }

    pub async fn register(
        &self,
        user_id: &str,
        activation_token: &str,
        pin_provider: &dyn PinProvider,
    ) -> Result<UserRecord, RegistrationError> {
        Registrator::new(&self.api_client, self.crypto.as_ref(), self.user_store.as_ref())
            .register(
                user_id,
                &self.config.project_id,
                activation_token,
                &self.config.device_name,
                pin_provider,
            )
            .await
    }

    pub async fn authenticate(
        &self,
        user: &UserRecord,
        access_id: Option<&str>,
        scope: Scope,
        pin_provider: &dyn PinProvider,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        Authenticator::new(&self.api_client, self.crypto.as_ref(), self.user_store.as_ref())
            .authenticate_and_revoke_on_signal(
                user,
                &self.config.device_name,
                access_id,
                scope,
                pin_provider,
            )
            .await
    }

    pub async fn authenticate_with_app_link(
        &self,
        user: &UserRecord,
        app_link: &str,
        scope: Scope,
        pin_provider: &dyn PinProvider,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let access_id = Authenticator::extract_access_id_from_app_link(app_link)?;
        self.authenticate(user, Some(&access_id), scope, pin_provider)
            .await
    }

    pub async fn authenticate_with_qr_code(
        &self,
        user: &UserRecord,
        qr_payload: &str,
        scope: Scope,
        pin_provider: &dyn PinProvider,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let access_id = Authenticator::extract_access_id_from_qr_code(qr_payload)?;
        self.authenticate(user, Some(&access_id), scope, pin_provider)
            .await
    }

    pub async fn authenticate_with_notification_payload(
        &self,
        payload: &HashMap<String, String>,
        scope: Scope,
        pin_provider: &dyn PinProvider,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        Authenticator::new(&self.api_client, self.crypto.as_ref(), self.user_store.as_ref())
            .authenticate_with_notification_payload(
                payload,
                &self.config.device_name,
                scope,
                pin_provider,
            )
            .await
    }

    /// `generateQuickCode`: authenticates in the `reg-code` scope and
    /// surfaces the server-issued code and its TTL.
    pub async fn generate_quickcode(
        &self,
        user: &UserRecord,
        pin_provider: &dyn PinProvider,
    ) -> Result<(String, i64), AuthenticationError> {
        let result = self
            .authenticate(user, None, Scope::RegCode, pin_provider)
            .await?;
        let verificator = Verificator::new(&self.api_client);
        verificator
            .quickcode_from_authenticate(&result.raw)
            .ok_or(AuthenticationError::AuthenticationFail {
                cause: mpin_apiclient::TransportError::Client {
                    code: "missing_quickcode".into(),
                    context: None,
                },
            })
    }

    pub async fn sign(
        &self,
        user_id: &str,
        message: &[u8],
        session: Option<&SigningSessionDetails>,
        pin_provider: &dyn PinProvider,
    ) -> Result<Signature, SigningError> {
        DocumentSigner::new(&self.api_client, self.crypto.as_ref(), self.user_store.as_ref())
            .sign(
                user_id,
                &self.config.project_id,
                message,
                &self.config.device_name,
                session,
                pin_provider,
            )
            .await
    }

    pub async fn get_authentication_session(
        &self,
        access_id: &str,
    ) -> Result<mpin_apiclient::session::SessionDetailsResponse, SessionError> {
        SessionCoordinator::new(&self.api_client)
            .get_authentication_session(access_id)
            .await
    }

    pub async fn abort_authentication_session(&self, access_id: &str) -> Result<(), SessionError> {
        SessionCoordinator::new(&self.api_client)
            .abort_authentication_session(access_id)
            .await
    }

    pub async fn get_signing_session(
        &self,
        session_id: &str,
    ) -> Result<mpin_apiclient::session::SessionDetailsResponse, SessionError> {
        SessionCoordinator::new(&self.api_client)
            .get_signing_session(session_id)
            .await
    }

    pub async fn abort_signing_session(&self, session_id: &str) -> Result<(), SessionError> {
        SessionCoordinator::new(&self.api_client)
            .abort_signing_session(session_id)
            .await
    }

    pub async fn users(&self) -> Result<Vec<UserRecord>, StoreError> {
        self.user_store.all(&self.config.project_id).await
    }

    pub async fn user(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        self.user_store.get(user_id, &self.config.project_id).await
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<(), StoreError> {
        self.user_store.delete(user_id, &self.config.project_id).await
    }
}

// SPDX-FileCopyrightText: 2026 MIRACL UK LTD
//
// SPDX-License-Identifier: Apache-2.0

//! Protocol orchestration for the M-Pin client: registration, two-pass
//! authentication, designated-verifier signing, and cross-device session
//! coordination, built on top of [`mpin_common`] (the crypto contract)
//! and [`mpin_apiclient`] (the HTTP transport).

pub mod authenticator;
pub mod config;
pub mod document_signer;
pub mod orchestrator;
pub mod pin;
pub mod registrator;
pub mod session_coordinator;
pub mod store;
pub mod user_record;
pub mod util;
pub mod verificator;

pub use authenticator::{AuthenticationError, AuthenticationResult, Authenticator, Scope};
pub use config::{Config, ConfigurationError, LoggingLevel};
pub use document_signer::{DocumentSigner, Signature, SigningError, SigningSessionDetails};
pub use orchestrator::{MpinClient, OrchestratorInitError};
pub use pin::PinProvider;
pub use registrator::{RegistrationError, Registrator};
pub use session_coordinator::{SessionCoordinator, SessionError};
pub use store::{AtRestCipher, NoOpCipher, StoreError, UserStore};
pub use user_record::{UserDataError, UserRecord};
pub use verificator::{ActivationToken, VerificationError, VerificationStarted, Verificator};

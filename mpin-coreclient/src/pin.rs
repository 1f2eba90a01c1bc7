// SPDX-FileCopyrightText: 2026 MIRACL UK LTD
//
// SPDX-License-Identifier: Apache-2.0

//! The PIN callback (§4.2, §9). Every operation that needs a PIN -
//! register, authenticate, sign, QuickCode generation - suspends and
//! asks the host application for one through this trait, exactly once
//! per attempt. Boxed via `async-trait` (see [`crate::store`]) since
//! every component takes this as `&dyn PinProvider`.

use mpin_common::secret::SecretPin;
#[cfg(any(test, feature = "test-utils"))]
use secrecy::ExposeSecret;

/// Supplies a PIN on demand. Implementations typically prompt the user
/// through UI and resolve once they submit; `None` means the user
/// cancelled and the in-flight operation should fail with its
/// `*Cancelled` variant.
#[async_trait::async_trait]
pub trait PinProvider: Send + Sync {
    async fn get_pin(&self) -> Option<SecretPin>;
}

/// A [`PinProvider`] that always returns a fixed PIN - for tests only.
#[cfg(any(test, feature = "test-utils"))]
pub struct FixedPinProvider(pub SecretPin);

#[cfg(any(test, feature = "test-utils"))]
#[async_trait::async_trait]
impl PinProvider for FixedPinProvider {
    async fn get_pin(&self) -> Option<SecretPin> {
        Some(SecretPin::from(self.0.expose_secret().to_string()))
    }
}

/// A [`PinProvider`] that always returns `None`, simulating user
/// cancellation - for tests only.
#[cfg(any(test, feature = "test-utils"))]
pub struct CancellingPinProvider;

#[cfg(any(test, feature = "test-utils"))]
#[async_trait::async_trait]
impl PinProvider for CancellingPinProvider {
    async fn get_pin(&self) -> Option<SecretPin> {
        None
    }
}

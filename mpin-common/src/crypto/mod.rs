// SPDX-FileCopyrightText: 2026 MIRACL UK LTD
//
// SPDX-License-Identifier: Apache-2.0

//! The black-box M-Pin / DVS capability provider.
//!
//! This module deliberately does not implement BN254CX pairing arithmetic
//! (that is an explicit non-goal of this SDK). It defines the contract a
//! real pairing-curve backend must satisfy and, under `cfg(test)` or the
//! `test-utils` feature, a deterministic double used by the rest of the
//! workspace's test suites.

mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use error::CryptoError;

/// Output of `CryptoProvider::client_pass_1`.
#[derive(Clone)]
pub struct Pass1Proof {
    pub x: Vec<u8>,
    pub sec: crate::SecretBytes,
    pub u: Vec<u8>,
}

/// Output of `CryptoProvider::client_pass_2`.
#[derive(Clone)]
pub struct Pass2Proof {
    pub v: Vec<u8>,
}

/// Output of `CryptoProvider::generate_signing_key_pair`.
pub struct SigningKeyPair {
    pub public_key: Vec<u8>,
    pub private_key: crate::SecretBytes,
}

/// Output of `CryptoProvider::sign`.
pub struct Signature {
    pub u: Vec<u8>,
    pub v: Vec<u8>,
}

/// Six deterministic, side-effect-free operations over opaque byte strings.
///
/// Implementations MUST be safe to call from a worker thread: callers treat
/// invocations as blocking-but-fast and may offload them via
/// `tokio::task::spawn_blocking`.
pub trait CryptoProvider: Send + Sync {
    fn combine_client_secret(
        &self,
        share1: &[u8],
        share2: &[u8],
    ) -> Result<Vec<u8>, CryptoError>;

    fn client_pass_1(
        &self,
        mpin_id: &[u8],
        token: &[u8],
        pin: i32,
    ) -> Result<Pass1Proof, CryptoError>;

    fn client_pass_2(
        &self,
        x: &[u8],
        y: &[u8],
        sec: &[u8],
    ) -> Result<Pass2Proof, CryptoError>;

    fn generate_signing_key_pair(&self) -> Result<SigningKeyPair, CryptoError>;

    fn dvs_client_token(
        &self,
        client_secret: &[u8],
        private_key: &[u8],
        mpin_id: &[u8],
        pin: i32,
    ) -> Result<Vec<u8>, CryptoError>;

    fn sign(
        &self,
        message: &[u8],
        signing_mpin_id: &[u8],
        signing_token: &[u8],
        pin: i32,
        timestamp_seconds: i64,
    ) -> Result<Signature, CryptoError>;
}

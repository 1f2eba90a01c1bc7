// SPDX-FileCopyrightText: 2026 MIRACL UK LTD
//
// SPDX-License-Identifier: Apache-2.0

//! A deterministic `CryptoProvider` double. It implements no real pairing
//! math; it exists so the rest of the workspace can exercise the protocol
//! orchestration (this SDK's actual scope) without linking a BN254CX
//! library.

use std::sync::Mutex;

use crate::SecretBytes;

use super::{CryptoError, CryptoProvider, Pass1Proof, Pass2Proof, Signature, SigningKeyPair};

/// Builder-configured fake. Defaults mirror the seed scenarios in the
/// specification's testable-properties section: a fixed signing key pair
/// of `{pub: 0xAA, priv: 0xBB}`.
pub struct MockCryptoProvider {
    signing_key_pair: (Vec<u8>, Vec<u8>),
    sign_output: Option<(Vec<u8>, Vec<u8>)>,
    fail_sign: bool,
    calls: Mutex<Vec<&'static str>>,
}

impl Default for MockCryptoProvider {
    fn default() -> Self {
        Self {
            signing_key_pair: (vec![0xAA], vec![0xBB]),
            sign_output: None,
            fail_sign: false,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl MockCryptoProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_signing_key_pair(mut self, public_key: Vec<u8>, private_key: Vec<u8>) -> Self {
        self.signing_key_pair = (public_key, private_key);
        self
    }

    pub fn with_sign_output(mut self, u: Vec<u8>, v: Vec<u8>) -> Self {
        self.sign_output = Some((u, v));
        self
    }

    pub fn failing_sign(mut self) -> Self {
        self.fail_sign = true;
        self
    }

    /// Operation names invoked so far, in order - lets tests assert call
    /// counts without a full mocking framework.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }
}

impl CryptoProvider for MockCryptoProvider {
    fn combine_client_secret(&self, share1: &[u8], share2: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.record("combine_client_secret");
        if share1.is_empty() || share2.is_empty() {
            return Err(CryptoError::CombineError);
        }
        Ok([share1, share2].concat())
    }

    fn client_pass_1(
        &self,
        mpin_id: &[u8],
        token: &[u8],
        pin: i32,
    ) -> Result<Pass1Proof, CryptoError> {
        self.record("client_pass_1");
        if mpin_id.is_empty() || token.is_empty() {
            return Err(CryptoError::Pass1Error);
        }
        let pin_bytes = pin.to_be_bytes();
        Ok(Pass1Proof {
            x: [mpin_id, token].concat(),
            sec: SecretBytes::new([token, &pin_bytes].concat()),
            u: [mpin_id, &pin_bytes].concat(),
        })
    }

    fn client_pass_2(&self, x: &[u8], y: &[u8], sec: &[u8]) -> Result<Pass2Proof, CryptoError> {
        self.record("client_pass_2");
        if x.is_empty() || y.is_empty() {
            return Err(CryptoError::Pass2Error);
        }
        Ok(Pass2Proof {
            v: [x, y, sec].concat(),
        })
    }

    fn generate_signing_key_pair(&self) -> Result<SigningKeyPair, CryptoError> {
        self.record("generate_signing_key_pair");
        let (public_key, private_key) = self.signing_key_pair.clone();
        Ok(SigningKeyPair {
            public_key,
            private_key: SecretBytes::new(private_key),
        })
    }

    fn dvs_client_token(
        &self,
        client_secret: &[u8],
        private_key: &[u8],
        mpin_id: &[u8],
        pin: i32,
    ) -> Result<Vec<u8>, CryptoError> {
        self.record("dvs_client_token");
        if client_secret.is_empty() || mpin_id.is_empty() {
            return Err(CryptoError::TokenError);
        }
        let pin_bytes = pin.to_be_bytes();
        Ok([client_secret, private_key, &pin_bytes].concat())
    }

    fn sign(
        &self,
        message: &[u8],
        signing_mpin_id: &[u8],
        signing_token: &[u8],
        pin: i32,
        timestamp_seconds: i64,
    ) -> Result<Signature, CryptoError> {
        self.record("sign");
        if self.fail_sign {
            return Err(CryptoError::SignError);
        }
        if let Some((u, v)) = self.sign_output.clone() {
            return Ok(Signature { u, v });
        }
        if message.is_empty() || signing_token.is_empty() {
            return Err(CryptoError::SignError);
        }
        let ts = timestamp_seconds.to_be_bytes();
        Ok(Signature {
            u: [signing_mpin_id, message].concat(),
            v: [signing_token, &ts].concat(),
        })
    }
}

// SPDX-FileCopyrightText: 2026 MIRACL UK LTD
//
// SPDX-License-Identifier: Apache-2.0

//! Types and contracts shared between the API client and the core client.

pub mod crypto;
pub mod secret;

pub use crypto::{CryptoError, CryptoProvider, Pass1Proof, Pass2Proof, Signature as CryptoSignature, SigningKeyPair};
pub use secret::SecretBytes;

// SPDX-FileCopyrightText: 2026 MIRACL UK LTD
//
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// The six `CryptoProvider` operations collapse their failures into one
/// sum type rather than six distinct exception hierarchies; callers match
/// on the variant they care about and otherwise propagate it as a `cause`.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("failed to combine client secret shares")]
    CombineError,
    #[error("client pass-1 failed")]
    Pass1Error,
    #[error("client pass-2 failed")]
    Pass2Error,
    #[error("signing key pair generation failed")]
    KeyGenError,
    #[error("DVS client token derivation failed")]
    TokenError,
    #[error("designated-verifier signing failed")]
    SignError,
}

// SPDX-FileCopyrightText: 2026 MIRACL UK LTD
//
// SPDX-License-Identifier: Apache-2.0

//! A zeroize-on-drop byte buffer for values that must not outlive a single
//! attempt: the client token, the DVS private key, the ephemeral `SEC`
//! value and the PIN.

use secrecy::{ExposeSecret, SecretBox, SecretString};

/// Opaque secret byte string. `Debug` and `Display` are intentionally not
/// implemented so that a stray `{:?}` never leaks the contents into a log
/// line.
pub struct SecretBytes(SecretBox<Vec<u8>>);

impl SecretBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(SecretBox::new(Box::new(bytes)))
    }

    pub fn expose(&self) -> &[u8] {
        self.0.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.expose().is_empty()
    }

    pub fn clone_secret(&self) -> Self {
        Self::new(self.expose().to_vec())
    }
}

impl From<Vec<u8>> for SecretBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl std::fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretBytes(<redacted>)")
    }
}

/// The PIN, held only for the duration of one authentication attempt
/// (including a renewal recursion) and zeroized on drop.
pub type SecretPin = SecretString;

// SPDX-FileCopyrightText: 2026 MIRACL UK LTD
//
// SPDX-License-Identifier: Apache-2.0

//! Small wire-level helpers shared by every component: hex encoding,
//! timestamps and the `mpinId ++ publicKey` convention (§9).

use std::time::{SystemTime, UNIX_EPOCH};

/// Lowercase, no-separator hex encoding - the wire convention used
/// throughout this API.
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

pub fn from_hex(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(s)
}

/// Integer seconds since the Unix epoch, truncated (never rounded).
pub fn now_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the Unix epoch")
        .as_secs() as i64
}

/// `combinedMpinId = mpinId ++ publicKey` when a public key is present,
/// else just `mpinId`. This is a wire-level convention with the server
/// and MUST be preserved bit-exact.
pub fn combined_mpin_id(mpin_id: &[u8], public_key: Option<&[u8]>) -> Vec<u8> {
    match public_key {
        Some(public_key) if !public_key.is_empty() => [mpin_id, public_key].concat(),
        _ => mpin_id.to_vec(),
    }
}

/// Parses a PIN string into the non-negative base-10 integer the crypto
/// layer expects, rejecting anything that is not all-digits.
pub fn parse_pin(pin: &str) -> Option<i32> {
    if pin.is_empty() || !pin.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    pin.parse::<i32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combines_mpin_id_and_public_key() {
        assert_eq!(combined_mpin_id(&[1, 2], Some(&[3, 4])), vec![1, 2, 3, 4]);
        assert_eq!(combined_mpin_id(&[1, 2], None), vec![1, 2]);
        assert_eq!(combined_mpin_id(&[1, 2], Some(&[])), vec![1, 2]);
    }

    #[test]
    fn parses_valid_pins_only() {
        assert_eq!(parse_pin("1234"), Some(1234));
        assert_eq!(parse_pin("0001"), Some(1));
        assert_eq!(parse_pin(""), None);
        assert_eq!(parse_pin("12a4"), None);
        assert_eq!(parse_pin("-1"), None);
    }

    #[test]
    fn hex_round_trips() {
        assert_eq!(to_hex(&[0xAB, 0x01]), "ab01");
        assert_eq!(from_hex("ab01").unwrap(), vec![0xAB, 0x01]);
    }
}

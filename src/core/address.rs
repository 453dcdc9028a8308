//! Validator operator addresses.
//!
//! A validator address is bech32 text under the chain's operator prefix
//! (`kujiravaloper` by default). Arguments are decoded, checked, and
//! re-encoded so the outgoing request always carries the canonical
//! lowercase form.

use std::fmt;

use bech32::primitives::decode::CheckedHrpstring;
use bech32::{Bech32, Hrp};
use serde::Serialize;

/// Operator prefix used by the Kujira chain.
pub const DEFAULT_VALOPER_PREFIX: &str = "kujiravaloper";

/// Longest address payload the chain accepts, in bytes.
pub const MAX_ADDR_LEN: usize = 255;

/// Why a string is not a usable validator address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("empty address string is not allowed")]
    Empty,

    #[error("decoding bech32 failed: {0}")]
    Bech32(String),

    #[error("invalid Bech32 prefix; expected {expected}, got {actual}")]
    WrongPrefix { expected: String, actual: String },

    #[error("addresses cannot be empty")]
    EmptyPayload,

    #[error("address max length is {MAX_ADDR_LEN}, got {0}")]
    TooLong(usize),

    #[error("invalid address prefix {0:?}")]
    InvalidPrefix(String),
}

/// A decoded validator operator address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct ValAddress {
    bytes: Vec<u8>,
    canonical: String,
}

impl ValAddress {
    /// Decode `input` as a validator address under `prefix`.
    ///
    /// Upper-case input is accepted; the canonical form is always
    /// lower-case. Whitespace anywhere in the input fails to decode.
    pub fn from_bech32(input: &str, prefix: &str) -> Result<Self, AddressError> {
        if input.trim().is_empty() {
            return Err(AddressError::Empty);
        }

        let checked = CheckedHrpstring::new::<Bech32>(input)
            .map_err(|e| AddressError::Bech32(error_chain(&e)))?;

        let actual = checked.hrp().as_str().to_ascii_lowercase();
        if actual != prefix.to_ascii_lowercase() {
            return Err(AddressError::WrongPrefix {
                expected: prefix.to_string(),
                actual,
            });
        }

        let bytes: Vec<u8> = checked.byte_iter().collect();
        Self::from_bytes(bytes, prefix)
    }

    /// Build an address from raw bytes, encoding it under `prefix`.
    pub fn from_bytes(bytes: Vec<u8>, prefix: &str) -> Result<Self, AddressError> {
        if bytes.is_empty() {
            return Err(AddressError::EmptyPayload);
        }
        if bytes.len() > MAX_ADDR_LEN {
            return Err(AddressError::TooLong(bytes.len()));
        }

        let hrp = parse_prefix(prefix)?;
        let canonical = bech32::encode::<Bech32>(hrp, &bytes)
            .map_err(|e| AddressError::Bech32(error_chain(&e)))?;

        Ok(Self { bytes, canonical })
    }

    /// Raw address bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Canonical bech32 text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.canonical
    }
}

impl fmt::Display for ValAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl From<ValAddress> for String {
    fn from(addr: ValAddress) -> Self {
        addr.canonical
    }
}

/// Parse, validate and canonicalize a validator address.
pub fn canonicalize_valoper(input: &str, prefix: &str) -> Result<String, AddressError> {
    ValAddress::from_bech32(input, prefix).map(String::from)
}

/// Check that `prefix` can serve as a bech32 human-readable part.
pub fn validate_prefix(prefix: &str) -> Result<(), AddressError> {
    parse_prefix(prefix).map(|_| ())
}

fn parse_prefix(prefix: &str) -> Result<Hrp, AddressError> {
    if prefix.is_empty() || prefix != prefix.to_ascii_lowercase() {
        return Err(AddressError::InvalidPrefix(prefix.to_string()));
    }
    Hrp::parse(prefix).map_err(|_| AddressError::InvalidPrefix(prefix.to_string()))
}

/// Flatten an error and its sources into one line.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = inner.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    // 20 bytes 0x01..=0x14 under each prefix.
    const VALOPER: &str = "kujiravaloper1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5fla4he";
    const ACCOUNT: &str = "kujira1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5w2wxtk";
    const COSMOS_VALOPER: &str = "cosmosvaloper1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc56kct20";

    fn sample_bytes() -> Vec<u8> {
        (1..=20).collect()
    }

    #[test]
    fn decodes_valid_address() {
        let addr = ValAddress::from_bech32(VALOPER, DEFAULT_VALOPER_PREFIX).unwrap();
        assert_eq!(addr.as_bytes(), sample_bytes().as_slice());
        assert_eq!(addr.as_str(), VALOPER);
    }

    #[test]
    fn canonical_form_survives_round_trip() {
        let canonical = canonicalize_valoper(VALOPER, DEFAULT_VALOPER_PREFIX).unwrap();
        assert_eq!(canonical, VALOPER);
        let again = canonicalize_valoper(&canonical, DEFAULT_VALOPER_PREFIX).unwrap();
        assert_eq!(again, canonical);
    }

    #[test]
    fn upper_case_input_is_lowered() {
        let upper = VALOPER.to_ascii_uppercase();
        let canonical = canonicalize_valoper(&upper, DEFAULT_VALOPER_PREFIX).unwrap();
        assert_eq!(canonical, VALOPER);
    }

    #[test]
    fn surrounding_whitespace_is_rejected() {
        for padded in [format!(" {VALOPER}"), format!("{VALOPER}\n"), format!("\t{VALOPER} ")] {
            let err = canonicalize_valoper(&padded, DEFAULT_VALOPER_PREFIX).unwrap_err();
            assert!(matches!(err, AddressError::Bech32(_)), "{padded:?}: {err:?}");
        }
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(
            canonicalize_valoper("   ", DEFAULT_VALOPER_PREFIX),
            Err(AddressError::Empty)
        );
    }

    #[test]
    fn rejects_garbage() {
        let err = canonicalize_valoper("notavalidaddress", DEFAULT_VALOPER_PREFIX).unwrap_err();
        assert!(matches!(err, AddressError::Bech32(_)));
        assert!(err.to_string().starts_with("decoding bech32 failed"));
    }

    #[test]
    fn rejects_bad_checksum() {
        let mut corrupted = VALOPER.to_string();
        corrupted.pop();
        corrupted.push('q');
        let err = canonicalize_valoper(&corrupted, DEFAULT_VALOPER_PREFIX).unwrap_err();
        assert!(matches!(err, AddressError::Bech32(_)));
    }

    #[test]
    fn rejects_account_address() {
        let err = canonicalize_valoper(ACCOUNT, DEFAULT_VALOPER_PREFIX).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid Bech32 prefix; expected kujiravaloper, got kujira"
        );
    }

    #[test]
    fn custom_prefix_is_honoured() {
        let canonical = canonicalize_valoper(COSMOS_VALOPER, "cosmosvaloper").unwrap();
        assert_eq!(canonical, COSMOS_VALOPER);
        assert!(canonicalize_valoper(COSMOS_VALOPER, DEFAULT_VALOPER_PREFIX).is_err());
    }

    #[test]
    fn rejects_empty_payload() {
        let err =
            canonicalize_valoper("kujiravaloper1wyqhzy", DEFAULT_VALOPER_PREFIX).unwrap_err();
        assert_eq!(err, AddressError::EmptyPayload);
    }

    #[test]
    fn rejects_oversized_payload() {
        let err = ValAddress::from_bytes(vec![0; 256], DEFAULT_VALOPER_PREFIX).unwrap_err();
        assert_eq!(err.to_string(), "address max length is 255, got 256");
    }

    #[test]
    fn encodes_from_bytes() {
        let addr = ValAddress::from_bytes(sample_bytes(), DEFAULT_VALOPER_PREFIX).unwrap();
        assert_eq!(addr.to_string(), VALOPER);
    }

    #[test]
    fn serializes_as_string() {
        let addr = ValAddress::from_bech32(VALOPER, DEFAULT_VALOPER_PREFIX).unwrap();
        assert_eq!(
            serde_json::to_value(&addr).unwrap(),
            serde_json::json!(VALOPER)
        );
    }

    #[test]
    fn prefix_validation() {
        assert!(validate_prefix("kujiravaloper").is_ok());
        assert!(validate_prefix("").is_err());
        assert!(validate_prefix("Kujiravaloper").is_err());
        assert!(validate_prefix("kujira valoper").is_err());
    }
}

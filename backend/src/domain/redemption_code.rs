//! Single-use redemption codes held in the code ledger.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use super::InvalidIdError;

/// Maximum accepted length, in characters, of a normalised code value.
pub const CODE_VALUE_MAX: usize = 64;

const MINTED_PREFIX: &str = "STEAM";
const MINTED_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const MINTED_SEGMENTS: usize = 4;
const MINTED_SEGMENT_LEN: usize = 4;

/// Validation errors raised by [`CodeValue::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeValueError {
    #[error("code must not be empty")]
    Empty,
    #[error("code must be at most {max} characters")]
    TooLong { max: usize },
}

/// Normalised redemption code value.
///
/// Values are trimmed and upper-cased on construction, so two inputs that
/// differ only in case or surrounding whitespace compare equal.
///
/// # Examples
/// ```
/// use keyvend::domain::CodeValue;
///
/// let value = CodeValue::parse(" steam-aaaa ").expect("valid code");
/// assert_eq!(value.as_str(), "STEAM-AAAA");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "STEAM-AB12-CD34-EF56-GH78")]
pub struct CodeValue(String);

impl CodeValue {
    /// Normalise and validate a caller-supplied code.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, CodeValueError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CodeValueError::Empty);
        }
        let normalised = trimmed.to_uppercase();
        if normalised.chars().count() > CODE_VALUE_MAX {
            return Err(CodeValueError::TooLong {
                max: CODE_VALUE_MAX,
            });
        }
        Ok(Self(normalised))
    }

    /// Mint a random code shaped like `STEAM-XXXX-XXXX-XXXX-XXXX`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut value = String::from(MINTED_PREFIX);
        for _ in 0..MINTED_SEGMENTS {
            value.push('-');
            for _ in 0..MINTED_SEGMENT_LEN {
                let index = rng.gen_range(0..MINTED_ALPHABET.len());
                let byte = MINTED_ALPHABET.get(index).copied().unwrap_or(b'X');
                value.push(char::from(byte));
            }
        }
        Self(value)
    }

    /// Borrow the normalised value.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for CodeValue {
    type Error = CodeValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<CodeValue> for String {
    fn from(value: CodeValue) -> Self {
        value.0
    }
}

/// Stable code identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct CodeId(Uuid);

impl CodeId {
    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID, e.g. one loaded from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse a caller-supplied identifier.
    pub fn parse(raw: &str) -> Result<Self, InvalidIdError> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| InvalidIdError)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for CodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An outstanding redemption code.
///
/// A record exists in the ledger until it is redeemed or deleted; there is no
/// "redeemed but present" state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionCode {
    pub id: CodeId,
    pub value: CodeValue,
    pub created_at: DateTime<Utc>,
}

impl RedemptionCode {
    /// Build a record for a freshly minted value.
    pub fn new(value: CodeValue, created_at: DateTime<Utc>) -> Self {
        Self {
            id: CodeId::random(),
            value,
            created_at,
        }
    }
}

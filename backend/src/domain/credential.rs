//! Deliverable account credentials.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Maximum accepted length, in characters, for usernames and passwords.
pub const CREDENTIAL_FIELD_MAX: usize = 255;

/// Validation errors raised while building a [`NewCredential`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialValidationError {
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("username must be at most {max} characters")]
    UsernameTooLong { max: usize },
    #[error("password must be at most {max} characters")]
    PasswordTooLong { max: usize },
}

/// Errors raised when parsing an identifier supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("identifier must be a valid UUID")]
pub struct InvalidIdError;

/// Stable credential identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct CredentialId(Uuid);

impl CredentialId {
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

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validated input for adding a credential to the pool.
///
/// Both fields are trimmed and must be non-empty.
///
/// # Examples
/// ```
/// use keyvend::domain::NewCredential;
///
/// let credential = NewCredential::try_new("  alice ", "p1").expect("valid credential");
/// assert_eq!(credential.username(), "alice");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct NewCredential {
    username: String,
    password: String,
}

impl NewCredential {
    /// Validate and construct a new credential.
    pub fn try_new(
        username: impl AsRef<str>,
        password: impl AsRef<str>,
    ) -> Result<Self, CredentialValidationError> {
        let username = username.as_ref().trim();
        let password = password.as_ref().trim();
        if username.is_empty() {
            return Err(CredentialValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        if username.chars().count() > CREDENTIAL_FIELD_MAX {
            return Err(CredentialValidationError::UsernameTooLong {
                max: CREDENTIAL_FIELD_MAX,
            });
        }
        if password.chars().count() > CREDENTIAL_FIELD_MAX {
            return Err(CredentialValidationError::PasswordTooLong {
                max: CREDENTIAL_FIELD_MAX,
            });
        }
        Ok(Self {
            username: username.to_owned(),
            password: password.to_owned(),
        })
    }

    /// Account username.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Account password.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Stamp the input with an identifier and creation time.
    pub fn into_credential(self, id: CredentialId, created_at: DateTime<Utc>) -> Credential {
        Credential {
            id,
            username: self.username,
            password: self.password,
            created_at,
        }
    }
}

impl fmt::Debug for NewCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewCredential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A deliverable username/password pair owned by the credential pool.
///
/// Records are immutable once created; the only lifecycle event after
/// creation is deletion by an operator (or removal on delivery in exclusive
/// mode).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub id: CredentialId,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "p1")]
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "secret", CredentialValidationError::EmptyUsername)]
    #[case("   ", "secret", CredentialValidationError::EmptyUsername)]
    #[case("alice", "", CredentialValidationError::EmptyPassword)]
    #[case("alice", " \t ", CredentialValidationError::EmptyPassword)]
    fn rejects_blank_fields(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: CredentialValidationError,
    ) {
        let err = NewCredential::try_new(username, password).expect_err("blank field");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn rejects_overlong_username() {
        let username = "u".repeat(CREDENTIAL_FIELD_MAX + 1);
        let err = NewCredential::try_new(username, "p").expect_err("too long");
        assert_eq!(
            err,
            CredentialValidationError::UsernameTooLong {
                max: CREDENTIAL_FIELD_MAX
            }
        );
    }

    #[rstest]
    fn trims_surrounding_whitespace() {
        let credential = NewCredential::try_new(" alice ", " p1\n").expect("valid");
        assert_eq!(credential.username(), "alice");
        assert_eq!(credential.password(), "p1");
    }

    #[rstest]
    fn debug_output_redacts_password() {
        let credential = NewCredential::try_new("alice", "hunter2")
            .expect("valid")
            .into_credential(CredentialId::random(), Utc::now());
        let rendered = format!("{credential:?}");
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
    }

    #[rstest]
    #[case("not-a-uuid")]
    #[case("")]
    fn parse_rejects_invalid_ids(#[case] raw: &str) {
        assert_eq!(CredentialId::parse(raw), Err(InvalidIdError));
    }

    #[rstest]
    fn serialises_with_camel_case_keys() {
        let credential = NewCredential::try_new("alice", "p1")
            .expect("valid")
            .into_credential(CredentialId::random(), Utc::now());
        let value = serde_json::to_value(&credential).expect("serialise");
        assert_eq!(value["username"], "alice");
        assert!(value.get("createdAt").is_some());
    }
}

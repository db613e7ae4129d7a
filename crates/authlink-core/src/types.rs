use crate::{
    Result,
    constants::{MAX_ACCOUNT_ID_LENGTH, MIN_ACCOUNT_ID_LENGTH},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// Account identifier used when registering an NFC card.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create a new account id with validation.
    ///
    /// The id is trimmed before validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidAccountId` if:
    /// - The id is empty or longer than 64 characters
    /// - The id contains non-ASCII characters
    pub fn new(id: &str) -> Result<Self> {
        let id = id.trim();

        let len = id.len();
        if !(MIN_ACCOUNT_ID_LENGTH..=MAX_ACCOUNT_ID_LENGTH).contains(&len) {
            return Err(Error::InvalidAccountId(format!(
                "Account id must be {MIN_ACCOUNT_ID_LENGTH}-{MAX_ACCOUNT_ID_LENGTH} chars, got {len}"
            )));
        }

        if !id.is_ascii() {
            return Err(Error::InvalidAccountId(
                "Account id must be ASCII".to_string(),
            ));
        }

        Ok(AccountId(id.to_string()))
    }

    /// Get the account id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AccountId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AccountId::new(s)
    }
}

/// Access token issued by the peripheral service.
///
/// # Security
/// This type implements constant-time comparison to prevent timing attacks
/// when comparing tokens during authentication.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct AccessToken(String);

impl AccessToken {
    /// Create a new access token.
    ///
    /// # Errors
    /// Returns `Error::InvalidAccessToken` if the token is empty.
    pub fn new(token: &str) -> Result<Self> {
        if token.is_empty() {
            return Err(Error::InvalidAccessToken(
                "Access token must not be empty".to_string(),
            ));
        }
        Ok(AccessToken(token.to_string()))
    }

    /// Get the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Constant-time comparison implementation for AccessToken
///
/// This prevents timing attacks by ensuring comparison takes the same time
/// regardless of where the strings differ.
impl PartialEq for AccessToken {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

/// Hash implementation for AccessToken
///
/// Implements standard hashing for use in hash-based collections.
impl std::hash::Hash for AccessToken {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

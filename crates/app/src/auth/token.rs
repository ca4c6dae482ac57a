//! Bearer token layout, parsing and verifier hashing.
//!
//! A token looks like `sf_v1_<token uuid, simple>.<64 hex chars of secret>`.
//! Only a SHA-256 digest of the secret bound to its token and owner is
//! stored, so a leaked table cannot be replayed as credentials.

use std::{fmt, str::FromStr};

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::{auth::ApiTokenUuid, domain::users::records::UserUuid};

pub const API_TOKEN_PREFIX: &str = "sf";

/// Number of random bytes behind every token.
pub const API_TOKEN_SECRET_BYTES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiTokenVersion {
    V1,
}

impl ApiTokenVersion {
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        match self {
            Self::V1 => 1,
        }
    }

    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::V1 => "v1",
        }
    }
}

impl TryFrom<i16> for ApiTokenVersion {
    type Error = ApiTokenError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::V1),
            _ => Err(ApiTokenError::UnsupportedVersion),
        }
    }
}

impl FromStr for ApiTokenVersion {
    type Err = ApiTokenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "v1" => Ok(Self::V1),
            _ => Err(ApiTokenError::UnsupportedVersion),
        }
    }
}

/// Raw secret bytes, wiped on drop and never printed.
#[derive(Clone)]
pub struct ApiTokenSecret([u8; API_TOKEN_SECRET_BYTES]);

impl ApiTokenSecret {
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0_u8; API_TOKEN_SECRET_BYTES];

        OsRng.fill_bytes(&mut bytes);

        Self(bytes)
    }

    #[must_use]
    pub const fn from_bytes(bytes: [u8; API_TOKEN_SECRET_BYTES]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; API_TOKEN_SECRET_BYTES] {
        &self.0
    }
}

impl fmt::Debug for ApiTokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiTokenSecret(**redacted**)")
    }
}

impl Drop for ApiTokenSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

#[derive(Debug, Clone)]
pub struct ParsedApiToken {
    pub token_uuid: ApiTokenUuid,
    pub version: ApiTokenVersion,
    pub secret: ApiTokenSecret,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiTokenError {
    #[error("api token format is invalid")]
    InvalidFormat,

    #[error("api token uses an unsupported version")]
    UnsupportedVersion,

    #[error("api token secret encoding is invalid")]
    InvalidSecretEncoding,
}

#[must_use]
pub fn format_api_token(
    token_uuid: ApiTokenUuid,
    version: ApiTokenVersion,
    secret: &ApiTokenSecret,
) -> String {
    format!(
        "{API_TOKEN_PREFIX}_{}_{}.{}",
        version.segment(),
        token_uuid.into_uuid().simple(),
        encode_hex(secret.as_bytes())
    )
}

pub fn parse_api_token(token: &str) -> Result<ParsedApiToken, ApiTokenError> {
    let (head, secret_hex) = token.split_once('.').ok_or(ApiTokenError::InvalidFormat)?;

    let mut segments = head.splitn(3, '_');

    let (Some(API_TOKEN_PREFIX), Some(version), Some(uuid)) =
        (segments.next(), segments.next(), segments.next())
    else {
        return Err(ApiTokenError::InvalidFormat);
    };

    let version = version.parse::<ApiTokenVersion>()?;

    let token_uuid = Uuid::try_parse(uuid).map_err(|_ignored| ApiTokenError::InvalidFormat)?;

    let secret = decode_secret(secret_hex).ok_or(ApiTokenError::InvalidSecretEncoding)?;

    Ok(ParsedApiToken {
        token_uuid: ApiTokenUuid::from_uuid(token_uuid),
        version,
        secret,
    })
}

/// Hex SHA-256 over `{token}:{version}:{user}:{secret}`.
///
/// Binding the owner into the digest stops a stored hash from being moved to
/// another user's row.
#[must_use]
pub fn hash_api_token(
    token_uuid: ApiTokenUuid,
    version: ApiTokenVersion,
    user_uuid: UserUuid,
    secret: &ApiTokenSecret,
) -> String {
    let mut hasher = Sha256::new();

    hasher.update(token_uuid.into_uuid().simple().to_string());
    hasher.update(b":");
    hasher.update(version.as_i16().to_string());
    hasher.update(b":");
    hasher.update(user_uuid.into_uuid().simple().to_string());
    hasher.update(b":");
    hasher.update(secret.as_bytes());

    encode_hex(&hasher.finalize())
}

/// Compare two hex digests without exiting early on the first mismatch.
#[must_use]
pub fn verifiers_match(expected: &str, actual: &str) -> bool {
    if expected.len() != actual.len() {
        return false;
    }

    expected
        .bytes()
        .zip(actual.bytes())
        .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

fn encode_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}

fn decode_secret(hex: &str) -> Option<ApiTokenSecret> {
    if hex.len() != API_TOKEN_SECRET_BYTES * 2 {
        return None;
    }

    let mut bytes = [0_u8; API_TOKEN_SECRET_BYTES];

    for (byte, pair) in bytes.iter_mut().zip(hex.as_bytes().chunks_exact(2)) {
        let [high, low] = pair else {
            return None;
        };

        *byte = (nibble(*high)? << 4) | nibble(*low)?;
    }

    Some(ApiTokenSecret::from_bytes(bytes))
}

fn nibble(value: u8) -> Option<u8> {
    match value {
        b'0'..=b'9' => Some(value - b'0'),
        b'a'..=b'f' => Some(value - b'a' + 10),
        b'A'..=b'F' => Some(value - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatted_token_parses_back() -> Result<(), ApiTokenError> {
        let token_uuid = ApiTokenUuid::new();
        let secret = ApiTokenSecret::from_bytes([0xAB; API_TOKEN_SECRET_BYTES]);

        let token = format_api_token(token_uuid, ApiTokenVersion::V1, &secret);

        assert!(token.starts_with("sf_v1_"));

        let parsed = parse_api_token(&token)?;

        assert_eq!(parsed.token_uuid, token_uuid);
        assert_eq!(parsed.version, ApiTokenVersion::V1);
        assert_eq!(parsed.secret.as_bytes(), secret.as_bytes());

        Ok(())
    }

    #[test]
    fn parse_rejects_malformed_tokens() {
        let secret = "ab".repeat(API_TOKEN_SECRET_BYTES);
        let uuid = Uuid::nil().simple();

        assert_eq!(
            parse_api_token(&format!("xx_v1_{uuid}.{secret}")).map(|_| ()),
            Err(ApiTokenError::InvalidFormat)
        );
        assert_eq!(
            parse_api_token(&format!("sf_v9_{uuid}.{secret}")).map(|_| ()),
            Err(ApiTokenError::UnsupportedVersion)
        );
        assert_eq!(
            parse_api_token(&format!("sf_v1_{uuid}.abc")).map(|_| ()),
            Err(ApiTokenError::InvalidSecretEncoding)
        );
        assert_eq!(
            parse_api_token(&format!("sf_v1_{uuid}")).map(|_| ()),
            Err(ApiTokenError::InvalidFormat)
        );
    }

    #[test]
    fn hash_depends_on_owner() {
        let token_uuid = ApiTokenUuid::new();
        let secret = ApiTokenSecret::from_bytes([0xCD; API_TOKEN_SECRET_BYTES]);

        let first = hash_api_token(token_uuid, ApiTokenVersion::V1, UserUuid::new(), &secret);
        let second = hash_api_token(token_uuid, ApiTokenVersion::V1, UserUuid::new(), &secret);

        assert_eq!(first.len(), 64);
        assert_ne!(first, second);
    }

    #[test]
    fn verifiers_match_requires_identical_digests() {
        assert!(verifiers_match("abcd", "abcd"));
        assert!(!verifiers_match("abcd", "abce"));
        assert!(!verifiers_match("abcd", "abc"));
    }

    #[test]
    fn secret_debug_is_redacted() {
        let secret = ApiTokenSecret::generate();

        assert_eq!(format!("{secret:?}"), "ApiTokenSecret(**redacted**)");
    }
}

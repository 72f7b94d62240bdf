//! # Access-token verification
//!
//! Mutating routes act on behalf of the user named by a Bearer access token.
//! Tokens are issued elsewhere; this side only checks the HS256 signature and
//! expiry and reads the `id` claim.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tracing::debug;

/// Claims this service reads from an access token.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessClaims {
    /// User id of the token holder
    pub id: String,
    /// Expiry (Unix timestamp)
    pub exp: u64,
}

/// Why a presented token was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    /// No `Authorization: Bearer …` header
    Missing,
    /// Bad signature, expired, malformed or without a usable `id`
    Invalid,
}

pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        Self { key: DecodingKey::from_secret(secret), validation }
    }

    /// Extracts and verifies the token carried by an `Authorization` header value.
    pub fn authenticate(&self, header: Option<&str>) -> Result<AccessClaims, TokenRejection> {
        let token = header
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(TokenRejection::Missing)?;

        let claims = decode::<AccessClaims>(token, &self.key, &self.validation)
            .map_err(|err| {
                debug!(error = %err, "access token rejected");
                TokenRejection::Invalid
            })?
            .claims;

        if claims.id.trim().is_empty() {
            return Err(TokenRejection::Invalid);
        }
        Ok(claims)
    }
}

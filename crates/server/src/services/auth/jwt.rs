//! Signed bearer tokens carrying the identity claim.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shopping_planner_core::IdentityClaim;

use super::AuthError;

/// Issuer written to and required from every token.
pub const ISSUER: &str = "shopping-planner";

/// Registered claims plus the flattened identity claim.
#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    #[serde(flatten)]
    identity: IdentityClaim,
    sub: String,
    exp: i64,
    iat: i64,
    iss: String,
    jti: String,
}

/// Creates and verifies HS256 tokens.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// Create a service signing with `secret`; tokens live for `ttl`.
    #[must_use]
    pub fn new(secret: &SecretString, ttl: Duration) -> Self {
        let secret = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    /// Sign a token for `identity`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenSigning` if encoding fails.
    pub fn issue(&self, identity: &IdentityClaim) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = TokenClaims {
            identity: identity.clone(),
            sub: identity.user_id.to_string(),
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
            iss: ISSUER.to_owned(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(AuthError::TokenSigning)
    }

    /// Verify a token and return the identity it carries.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token is malformed, expired,
    /// from another issuer or signed with another key.
    pub fn verify(&self, token: &str) -> Result<IdentityClaim, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[ISSUER]);

        decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims.identity)
            .map_err(AuthError::InvalidToken)
    }
}

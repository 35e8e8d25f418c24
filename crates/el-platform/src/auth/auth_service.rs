//! Bearer Token Validation
//!
//! Minimal HS256 token service: the platform validates bearer tokens to
//! resolve the current caller. Session/cookie flows live outside this
//! system; `issue_token` exists for development seeding and tests.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::shared::error::{PlatformError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Principal id
    pub sub: String,
    pub iss: String,
    pub exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

pub struct AuthService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: String,
    expiry_secs: u64,
}

impl AuthService {
    pub fn new(secret: &str, issuer: impl Into<String>, expiry_secs: u64) -> Self {
        let issuer = issuer.into();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer.clone()]);
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            issuer,
            expiry_secs,
        }
    }

    pub fn issue_token(&self, user_id: i64, email: Option<&str>) -> Result<String> {
        let exp = Utc::now() + chrono::Duration::seconds(self.expiry_secs as i64);
        let claims = AccessTokenClaims {
            sub: user_id.to_string(),
            iss: self.issuer.clone(),
            exp: exp.timestamp(),
            email: email.map(String::from),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| PlatformError::internal(format!("token encoding failed: {}", e)))
    }

    pub fn validate_token(&self, token: &str) -> Result<AccessTokenClaims> {
        decode::<AccessTokenClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| PlatformError::unauthorized(format!("Invalid token: {}", e)))
    }
}

/// Extract the token from an `Authorization: Bearer ...` header value.
pub fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

//! Access tokens for the certification API.
//!
//! Tokens are HS256-signed by the marketplace's identity service with the
//! shared `JWT_SECRET` and carry the platform role used for reviewer and
//! creator checks. [`generate_access_token`] exists for tooling and tests.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use clawforge_core::roles::{can_review, is_known_role};
use clawforge_core::types::DbId;

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// `"admin"`, `"agent"` or `"creator"`.
    pub role: String,
    /// Issuer; must equal [`JwtConfig::issuer`].
    pub iss: String,
    pub exp: i64,
    pub iat: i64,
    /// Unique token identifier, logged on certification decisions.
    pub jti: String,
}

impl Claims {
    /// Whether the bearer may take certification decisions.
    pub fn is_reviewer(&self) -> bool {
        can_review(&self.role)
    }
}

/// Why a bearer token was refused.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    #[error("Token carries unknown role '{0}'")]
    UnknownRole(String),
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret shared with the identity service.
    pub secret: String,
    pub issuer: String,
    /// Lifetime of tokens minted by [`generate_access_token`].
    pub access_token_expiry_mins: i64,
}

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;

const DEFAULT_ISSUER: &str = "clawforge";

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                  | Required | Default     |
    /// |--------------------------|----------|-------------|
    /// | `JWT_SECRET`             | **yes**  | --          |
    /// | `JWT_ISSUER`             | no       | `clawforge` |
    /// | `JWT_ACCESS_EXPIRY_MINS` | no       | `15`        |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let issuer = std::env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string());

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        Self {
            secret,
            issuer,
            access_token_expiry_mins,
        }
    }
}

/// Mint a token for `user_id` acting as `role`.
pub fn generate_access_token(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        iss: config.issuer.clone(),
        exp: now + config.access_token_expiry_mins * 60,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Decode a bearer token: signature, expiry and issuer, then the role.
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, TokenError> {
    let mut validation = Validation::default();
    validation.set_issuer(&[config.issuer.as_str()]);

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?
    .claims;

    if !is_known_role(&claims.role) {
        return Err(TokenError::UnknownRole(claims.role));
    }
    Ok(claims)
}

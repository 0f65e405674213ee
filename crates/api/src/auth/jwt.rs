//! JWT access-token validation.
//!
//! Access tokens are HS256-signed JWTs issued by the identity service and
//! verified here with a shared base64-encoded secret. The edge allows zero
//! clock skew on expiry. This service never issues tokens; the encode
//! helper exists for integration tests.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the opaque principal id issued by the identity service.
    pub sub: String,
    /// The principal's email address.
    pub email: String,
    /// Role names (e.g. `"admin"`, `"organizer"`).
    #[serde(default)]
    pub roles: Vec<String>,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
}

/// Configuration for JWT validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Base64-encoded HMAC-SHA256 secret shared with the identity service.
    pub secret: String,
}

impl JwtConfig {
    /// Load JWT configuration from the environment.
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty. Misconfiguration
    /// should fail at startup, not on the first request.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");
        Self { secret }
    }
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Validates the signature and expiry with zero leeway.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_base64_secret(&config.secret)?;
    let mut validation = Validation::default(); // HS256
    validation.leeway = 0;
    let token_data = decode::<Claims>(token, &key, &validation)?;
    Ok(token_data.claims)
}

/// Sign a token for the given claims. Test-only convenience; production
/// tokens come from the identity service.
pub fn sign_token(claims: &Claims, config: &JwtConfig) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(), // HS256
        claims,
        &EncodingKey::from_base64_secret(&config.secret)?,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // base64 of "hive-test-signing-secret".
    const TEST_SECRET: &str = "aGl2ZS10ZXN0LXNpZ25pbmctc2VjcmV0";

    fn config() -> JwtConfig {
        JwtConfig {
            secret: TEST_SECRET.to_string(),
        }
    }

    fn claims(exp_offset: i64) -> Claims {
        let now = chrono::Utc::now().timestamp();
        Claims {
            sub: "user-1".to_string(),
            email: "user-1@example.com".to_string(),
            roles: vec!["organizer".to_string()],
            exp: now + exp_offset,
            iat: now,
        }
    }

    #[test]
    fn token_round_trips() {
        let token = sign_token(&claims(3600), &config()).unwrap();
        let decoded = validate_token(&token, &config()).unwrap();
        assert_eq!(decoded.sub, "user-1");
        assert_eq!(decoded.email, "user-1@example.com");
        assert_eq!(decoded.roles, vec!["organizer".to_string()]);
    }

    #[test]
    fn expired_token_rejected() {
        let token = sign_token(&claims(-120), &config()).unwrap();
        assert!(validate_token(&token, &config()).is_err());
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = sign_token(&claims(3600), &config()).unwrap();
        let other = JwtConfig {
            // base64 of "another-secret-entirely-here".
            secret: "YW5vdGhlci1zZWNyZXQtZW50aXJlbHktaGVyZQ==".to_string(),
        };
        assert!(validate_token(&token, &other).is_err());
    }
}

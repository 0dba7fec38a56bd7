//! JWT token service
//!
//! Token generation, validation and the per-request user context.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::models::user::ROLE_ADMIN;

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Signing secret, at least 32 bytes
    pub secret: String,
    /// Token lifetime in minutes
    pub expiration_minutes: i64,
    pub issuer: String,
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if secret.len() >= 32 => secret,
            Ok(_) => {
                tracing::warn!("JWT_SECRET shorter than 32 characters, generating a session key");
                generate_printable_secret()
            }
            Err(_) => {
                tracing::warn!("JWT_SECRET not set, generating a session key");
                generate_printable_secret()
            }
        };

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "breezebuy-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "breezebuy-clients".to_string()),
        }
    }
}

/// Claims carried inside the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User record id (subject)
    pub sub: String,
    pub username: String,
    /// Role names, comma separated
    pub roles: String,
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

/// Random printable secret for sessions without a configured JWT_SECRET.
/// Tokens do not survive a restart in that mode.
fn generate_printable_secret() -> String {
    let allowed =
        "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+";
    let rng = SystemRandom::new();
    let mut key = String::with_capacity(64);
    for _ in 0..64 {
        let mut byte = [0u8; 1];
        if rng.fill(&mut byte).is_err() {
            return "breezebuy-development-fallback-key-0000".to_string();
        }
        let idx = (byte[0] as usize) % allowed.len();
        key.push(allowed.as_bytes()[idx] as char);
    }
    key
}

/// JWT token service
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Generate an access token for a user
    pub fn generate_token(
        &self,
        user_id: &str,
        username: &str,
        roles: &[String],
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            roles: roles.join(","),
            token_type: "access".to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Validate and decode a token
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Extract the bearer token from an Authorization header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// Authenticated user context, parsed from JWT claims.
///
/// Injected by the auth middleware and available to handlers via extractor.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// User record id, "user:xxx"
    pub id: String,
    pub username: String,
    pub roles: Vec<String>,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        let roles = if claims.roles.is_empty() {
            vec![]
        } else {
            claims.roles.split(',').map(|s| s.to_string()).collect()
        };

        Self {
            id: claims.sub,
            username: claims.username,
            roles,
        }
    }
}

impl CurrentUser {
    /// Admins pass every role check
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == ROLE_ADMIN)
    }

    pub fn has_role(&self, role: &str) -> bool {
        if self.is_admin() {
            return true;
        }
        self.roles.iter().any(|r| r == role)
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::user::{ROLE_CSR, ROLE_CUSTOMER, ROLE_VENDOR};

    fn test_service() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "a-test-secret-that-is-long-enough-0123".to_string(),
            expiration_minutes: 60,
            issuer: "breezebuy-server".to_string(),
            audience: "breezebuy-clients".to_string(),
        })
    }

    #[test]
    fn token_round_trip() {
        let service = test_service();
        let roles = vec![ROLE_CUSTOMER.to_string(), ROLE_VENDOR.to_string()];

        let token = service
            .generate_token("user:u1", "alice", &roles)
            .expect("Failed to generate test token");
        let claims = service
            .validate_token(&token)
            .expect("Failed to validate test token");

        assert_eq!(claims.sub, "user:u1");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.roles, "customer,vendor");
    }

    #[test]
    fn tampered_token_is_rejected() {
        let service = test_service();
        let token = service
            .generate_token("user:u1", "alice", &[ROLE_CUSTOMER.to_string()])
            .expect("Failed to generate test token");

        let other = JwtService::with_config(JwtConfig {
            secret: "a-different-secret-that-is-long-enough".to_string(),
            ..service.config.clone()
        });
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn admin_passes_any_role_check() {
        let admin = CurrentUser {
            id: "user:a".to_string(),
            username: "admin".to_string(),
            roles: vec![ROLE_ADMIN.to_string()],
        };
        assert!(admin.has_role(ROLE_CSR));
        assert!(admin.has_role(ROLE_VENDOR));

        let customer = CurrentUser {
            id: "user:c".to_string(),
            username: "carol".to_string(),
            roles: vec![ROLE_CUSTOMER.to_string()],
        };
        assert!(customer.has_role(ROLE_CUSTOMER));
        assert!(!customer.has_role(ROLE_CSR));
    }
}

//! JWT token generation and validation
//! Implements access token + refresh token pattern

use crate::{
    auth::clock::{Clock, SystemClock},
    config::AppConfig,
    error::{AppError, AuthRejection},
};
use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::Arc};
use uuid::Uuid;

/// Token class carried in the `type` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived, authorizes API calls
    Access,
    /// Long-lived, only meant to mint new access tokens
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user ID, hyphenated UUID)
    pub sub: String,

    /// Expiration (unix seconds)
    pub exp: i64,

    /// Issued at (unix seconds)
    pub iat: i64,

    /// Token class
    #[serde(rename = "type")]
    pub token_type: TokenKind,
}

/// Token pair response
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: u64, // seconds until access token expires
}

/// JWT service
///
/// Holds the process-wide signing key. Rotating the secret invalidates every
/// token issued under the previous one; there is no key versioning.
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    access_token_exp_secs: u64,
    refresh_token_exp_secs: u64,
    clock: Arc<dyn Clock>,
}

impl JwtService {
    /// Create JWT service from config
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let security = &config.security;
        let secret = security.jwt_secret.expose_secret();

        // Ensure secret is at least 32 bytes for HMAC signing
        if secret.len() < 32 {
            return Err(AppError::Config("JWT secret too short (min 32 chars)".to_string()));
        }

        let algorithm = Algorithm::from_str(&security.jwt_algorithm).map_err(|_| {
            AppError::Config(format!("Unknown JWT algorithm: {}", security.jwt_algorithm))
        })?;

        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(AppError::Config(format!(
                "JWT algorithm must be an HMAC variant, got {}",
                security.jwt_algorithm
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            access_token_exp_secs: security.access_token_exp_secs,
            refresh_token_exp_secs: security.refresh_token_exp_secs,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the clock used for `iat`/`exp` and expiry checks
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Generate access token
    pub fn issue_access(&self, subject: &Uuid) -> Result<String, AppError> {
        self.issue(subject, TokenKind::Access, self.access_token_exp_secs)
    }

    /// Generate refresh token
    pub fn issue_refresh(&self, subject: &Uuid) -> Result<String, AppError> {
        self.issue(subject, TokenKind::Refresh, self.refresh_token_exp_secs)
    }

    /// Generate token pair
    pub fn issue_pair(&self, subject: &Uuid) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access_token: self.issue_access(subject)?,
            refresh_token: self.issue_refresh(subject)?,
            token_type: "bearer",
            expires_in: self.access_token_exp_secs,
        })
    }

    fn issue(&self, subject: &Uuid, kind: TokenKind, ttl_secs: u64) -> Result<String, AppError> {
        let ttl = i64::try_from(ttl_secs)
            .map_err(|_| AppError::Config(format!("Token lifetime out of range: {}", ttl_secs)))?;

        let now = self.clock.now();
        let expiration = now + Duration::seconds(ttl);

        let claims = Claims {
            sub: subject.to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            token_type: kind,
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode {} token: {:?}", kind, e);
            AppError::Internal(format!("Failed to encode {} token: {}", kind, e))
        })
    }

    /// Validate and decode token
    ///
    /// Checks structure, algorithm and signature, then expiry against the
    /// service clock. A token is valid only while `now < exp`. Every failure
    /// collapses into [`AuthRejection::Unauthenticated`].
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(self.algorithm);
        // expiry is checked below against the injected clock, with no leeway
        validation.validate_exp = false;
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                tracing::debug!("Token validation failed: {:?}", e);
                AuthRejection::Unauthenticated
            })?
            .claims;

        if self.clock.now().timestamp() >= claims.exp {
            tracing::debug!(exp = claims.exp, "Token expired");
            return Err(AuthRejection::Unauthenticated.into());
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        CorsConfig, DatabaseConfig, LoggingConfig, PaginationConfig, SecurityConfig, ServerConfig,
    };
    use chrono::{DateTime, TimeZone, Utc};
    use secrecy::Secret;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    // Mock config for testing
    fn test_config(secret: &str, algorithm: &str) -> AppConfig {
        AppConfig {
            server: ServerConfig {
                addr: "127.0.0.1:8000".to_string(),
                graceful_shutdown_timeout_secs: 30,
            },
            database: DatabaseConfig {
                url: Secret::new("postgresql://localhost/test".to_string()),
                max_connections: 10,
                min_connections: 1,
                acquire_timeout_secs: 30,
                idle_timeout_secs: 600,
                max_lifetime_secs: 1800,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "json".to_string(),
            },
            security: SecurityConfig {
                jwt_secret: Secret::new(secret.to_string()),
                jwt_algorithm: algorithm.to_string(),
                access_token_exp_secs: 1800,
                refresh_token_exp_secs: 604800,
                password_min_length: 8,
                password_max_length: 100,
                argon2_memory_kib: 19456,
                argon2_iterations: 2,
                argon2_parallelism: 1,
            },
            cors: CorsConfig {
                allowed_origins: "http://localhost:3000".to_string(),
            },
            pagination: PaginationConfig {
                default_page_size: 20,
                max_page_size: 100,
            },
        }
    }

    fn service_at(now: DateTime<Utc>) -> JwtService {
        JwtService::from_config(&test_config("test_secret_key_32_characters_long!", "HS256"))
            .unwrap()
            .with_clock(Arc::new(FixedClock(now)))
    }

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_issue_and_decode_access_token() {
        let service = service_at(epoch());
        let user_id = Uuid::new_v4();

        let token = service.issue_access(&user_id).unwrap();
        let claims = service.decode(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.token_type, TokenKind::Access);
        assert_eq!(claims.iat, epoch().timestamp());
        assert_eq!(claims.exp, epoch().timestamp() + 1800);
    }

    #[test]
    fn test_issue_and_decode_refresh_token() {
        let service = service_at(epoch());
        let user_id = Uuid::new_v4();

        let token = service.issue_refresh(&user_id).unwrap();
        let claims = service.decode(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.token_type, TokenKind::Refresh);
        assert_eq!(claims.exp, epoch().timestamp() + 604800);
    }

    #[test]
    fn test_token_pair() {
        let service = service_at(epoch());
        let pair = service.issue_pair(&Uuid::new_v4()).unwrap();

        assert_eq!(pair.token_type, "bearer");
        assert_eq!(pair.expires_in, 1800);
        assert_ne!(pair.access_token, pair.refresh_token);
        assert_eq!(pair.access_token.split('.').count(), 3);
    }

    #[test]
    fn test_expiry_boundary() {
        let user_id = Uuid::new_v4();
        let token = service_at(epoch()).issue_access(&user_id).unwrap();

        let one_second_before = epoch() + Duration::seconds(1799);
        assert!(service_at(one_second_before).decode(&token).is_ok());

        let exactly_at_expiry = epoch() + Duration::seconds(1800);
        assert!(matches!(
            service_at(exactly_at_expiry).decode(&token),
            Err(AppError::Auth(AuthRejection::Unauthenticated))
        ));
    }

    #[test]
    fn test_tampered_signature_fails() {
        let service = service_at(epoch());
        let token = service.issue_access(&Uuid::new_v4()).unwrap();

        let (unsigned, signature) = token.rsplit_once('.').unwrap();
        let flipped = if signature.starts_with('A') { "B" } else { "A" };
        let tampered = format!("{}.{}{}", unsigned, flipped, &signature[1..]);

        assert!(service.decode(&tampered).is_err());
    }

    #[test]
    fn test_other_secret_fails() {
        let token = service_at(epoch()).issue_access(&Uuid::new_v4()).unwrap();

        let other = JwtService::from_config(&test_config(
            "another_secret_key_that_is_32_chars!!",
            "HS256",
        ))
        .unwrap()
        .with_clock(Arc::new(FixedClock(epoch())));

        assert!(other.decode(&token).is_err());
    }

    #[test]
    fn test_other_algorithm_fails() {
        let secret = "test_secret_key_32_characters_long!";
        let hs512 = JwtService::from_config(&test_config(secret, "HS512"))
            .unwrap()
            .with_clock(Arc::new(FixedClock(epoch())));
        let token = hs512.issue_access(&Uuid::new_v4()).unwrap();

        assert!(hs512.decode(&token).is_ok());
        assert!(service_at(epoch()).decode(&token).is_err());
    }

    #[test]
    fn test_rejects_non_hmac_algorithm() {
        let config = test_config("test_secret_key_32_characters_long!", "RS256");
        assert!(matches!(JwtService::from_config(&config), Err(AppError::Config(_))));
    }

    #[test]
    fn test_invalid_token_fails() {
        let service = service_at(epoch());
        assert!(service.decode("invalid_token").is_err());
        assert!(service.decode("").is_err());
        assert!(service.decode("a.b.c").is_err());
    }
}

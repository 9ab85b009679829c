//! Request-time identity resolution and the elevated-privilege gate
//!
//! Every protected endpoint goes through [`IdentityResolver::resolve`]:
//!
//! ```text
//! no/empty token            -> Unauthenticated
//! decode fails              -> Unauthenticated
//! type != access            -> Unauthenticated
//! empty subject             -> Unauthenticated
//! subject not a UUID        -> BadIdentity
//! no credential record      -> NotFound
//! record inactive           -> Inactive
//! otherwise                 -> AuthenticatedIdentity
//! ```
//!
//! [`require_elevated`] only ever sees the success case, so an
//! unauthenticated caller can never be told "insufficient privilege".

use crate::{
    auth::jwt::{JwtService, TokenKind},
    error::{AppError, AuthRejection},
};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Stored credential shape needed by resolution
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CredentialRecord {
    pub id: Uuid,
    pub hashed_password: String,
    pub is_active: bool,
    pub is_superuser: bool,
}

/// Lookup of credential records by identity key
///
/// Implementations report infrastructure failures as errors; an absent
/// record is `Ok(None)`.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_identity(&self, id: &Uuid) -> Result<Option<CredentialRecord>, AppError>;
}

/// Verified identity for the lifetime of one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub user_id: Uuid,
    pub is_active: bool,
    pub is_superuser: bool,
}

impl From<&CredentialRecord> for AuthenticatedIdentity {
    fn from(record: &CredentialRecord) -> Self {
        Self {
            user_id: record.id,
            is_active: record.is_active,
            is_superuser: record.is_superuser,
        }
    }
}

/// Resolves bearer tokens into authenticated identities
#[derive(Clone)]
pub struct IdentityResolver {
    jwt_service: Arc<JwtService>,
}

impl IdentityResolver {
    pub fn new(jwt_service: Arc<JwtService>) -> Self {
        Self { jwt_service }
    }

    /// Resolve a bearer token against the credential store
    ///
    /// Performs at most one store read. Store failures propagate unchanged
    /// and are never reported as an [`AuthRejection`].
    pub async fn resolve<S>(
        &self,
        store: &S,
        bearer_token: Option<&str>,
    ) -> Result<AuthenticatedIdentity, AppError>
    where
        S: CredentialStore + ?Sized,
    {
        let token = match bearer_token.map(str::trim) {
            Some(token) if !token.is_empty() => token,
            _ => {
                tracing::debug!("Missing bearer token");
                return Err(AuthRejection::Unauthenticated.into());
            }
        };

        let claims = self.jwt_service.decode(token)?;

        if claims.token_type != TokenKind::Access {
            tracing::debug!(
                "Token type mismatch: expected 'access', got '{}'",
                claims.token_type
            );
            return Err(AuthRejection::Unauthenticated.into());
        }

        if claims.sub.is_empty() {
            return Err(AuthRejection::Unauthenticated.into());
        }

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
            tracing::debug!(sub = %claims.sub, "Token subject is not a valid user id");
            AuthRejection::BadIdentity
        })?;

        let record = store
            .find_by_identity(&user_id)
            .await?
            .ok_or_else(|| {
                tracing::debug!(user_id = %user_id, "Token subject no longer exists");
                AuthRejection::NotFound
            })?;

        if !record.is_active {
            tracing::warn!(user_id = %user_id, "Inactive user presented a valid token");
            return Err(AuthRejection::Inactive.into());
        }

        Ok(AuthenticatedIdentity::from(&record))
    }
}

/// Require the elevated-privilege flag on an already resolved identity
pub fn require_elevated(
    identity: AuthenticatedIdentity,
) -> Result<AuthenticatedIdentity, AuthRejection> {
    if !identity.is_superuser {
        tracing::warn!(user_id = %identity.user_id, "Elevated privilege required");
        return Err(AuthRejection::InsufficientPrivilege);
    }

    Ok(identity)
}

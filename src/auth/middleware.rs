//! JWT 认证提取器
//! 从 Authorization 头读取 Bearer 令牌，经 IdentityResolver 解析为已认证身份

use crate::{
    auth::resolver::{require_elevated, AuthenticatedIdentity},
    error::AppError,
    middleware::AppState,
    repository::UserRepository,
};
use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use std::{ops::Deref, sync::Arc};

/// 当前已认证用户（必须认证）
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub AuthenticatedIdentity);

/// 当前已认证且具备管理员权限的用户
#[derive(Debug, Clone, Copy)]
pub struct AdminUser(pub AuthenticatedIdentity);

impl Deref for CurrentUser {
    type Target = AuthenticatedIdentity;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Deref for AdminUser {
    type Target = AuthenticatedIdentity;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// 从 Authorization 头提取令牌
///
/// 认证方案名不区分大小写；缺失或格式不符时返回 None
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let repo = UserRepository::new(state.db.clone());
        let identity = state
            .resolver
            .resolve(&repo, extract_token(&parts.headers))
            .await?;

        Ok(CurrentUser(identity))
    }
}

// 可选认证：没有 Authorization 头时视为访客；带了头则必须有效
impl OptionalFromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Option<Self>, Self::Rejection> {
        if !parts.headers.contains_key(header::AUTHORIZATION) {
            return Ok(None);
        }

        let user = <CurrentUser as FromRequestParts<Arc<AppState>>>::from_request_parts(
            parts, state,
        )
        .await?;

        Ok(Some(user))
    }
}

impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        // 先完成身份解析，再检查权限
        let CurrentUser(identity) =
            <CurrentUser as FromRequestParts<Arc<AppState>>>::from_request_parts(parts, state)
                .await?;

        Ok(AdminUser(require_elevated(identity)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_extract_token_valid() {
        let headers = headers_with("Bearer test_token_123");
        assert_eq!(extract_token(&headers), Some("test_token_123"));
    }

    #[test]
    fn test_extract_token_scheme_case_insensitive() {
        let headers = headers_with("bearer test_token_123");
        assert_eq!(extract_token(&headers), Some("test_token_123"));
    }

    #[test]
    fn test_extract_token_missing() {
        let headers = HeaderMap::new();
        assert!(extract_token(&headers).is_none());
    }

    #[test]
    fn test_extract_token_invalid_format() {
        assert!(extract_token(&headers_with("InvalidFormat")).is_none());
        assert!(extract_token(&headers_with("Basic dXNlcjpwYXNz")).is_none());
        assert!(extract_token(&headers_with("Bearer    ")).is_none());
    }
}

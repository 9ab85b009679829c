//! 认证服务：注册、登录、个人资料

use crate::{
    auth::{
        jwt::{JwtService, TokenPair},
        password::PasswordHasher,
        resolver::AuthenticatedIdentity,
    },
    config::AppConfig,
    error::{AppError, AuthRejection},
    models::{auth::*, user::*},
    repository::UserRepository,
};
use sqlx::PgPool;
use std::sync::Arc;
use validator::Validate;

pub struct AuthService {
    db: PgPool,
    jwt_service: Arc<JwtService>,
    hasher: PasswordHasher,
    config: Arc<AppConfig>,
}

impl AuthService {
    pub fn new(
        db: PgPool,
        jwt_service: Arc<JwtService>,
        hasher: PasswordHasher,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            db,
            jwt_service,
            hasher,
            config,
        }
    }

    /// 用户注册
    pub async fn register(&self, req: RegisterRequest) -> Result<UserResponse, AppError> {
        req.validate()?;
        PasswordHasher::validate_password_policy(&req.password, &self.config)?;

        let user_repo = UserRepository::new(self.db.clone());

        if user_repo.find_by_email(&req.email).await?.is_some() {
            return Err(AppError::bad_request("Email already registered"));
        }

        let hashed_password = self.hasher.hash(&req.password)?;
        let user = user_repo.create(&req, &hashed_password).await?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(UserResponse::from(user))
    }

    /// 用户登录，签发访问令牌与刷新令牌
    pub async fn login(&self, req: LoginRequest) -> Result<TokenPair, AppError> {
        let user_repo = UserRepository::new(self.db.clone());

        let user = user_repo.find_by_email(&req.email).await?;

        // 用户不存在与密码错误返回相同的错误
        let user = match user {
            Some(user) if self.hasher.verify(&req.password, &user.hashed_password) => user,
            _ => {
                tracing::debug!("Login failed: bad credentials");
                return Err(AppError::Authentication(
                    "Incorrect email or password".to_string(),
                ));
            }
        };

        if !user.is_active {
            tracing::warn!(user_id = %user.id, "Login attempt on inactive account");
            return Err(AppError::Forbidden("User account is inactive".to_string()));
        }

        let token_pair = self.jwt_service.issue_pair(&user.id)?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(token_pair)
    }

    /// 获取当前用户资料
    pub async fn profile(&self, identity: &AuthenticatedIdentity) -> Result<UserResponse, AppError> {
        let user_repo = UserRepository::new(self.db.clone());

        // 解析后被删除的用户按解析阶段的语义处理
        let user = user_repo
            .find_by_id(&identity.user_id)
            .await?
            .ok_or(AuthRejection::NotFound)?;

        Ok(UserResponse::from(user))
    }

    /// 更新当前用户资料
    pub async fn update_profile(
        &self,
        identity: &AuthenticatedIdentity,
        query: UpdateProfileQuery,
    ) -> Result<UserResponse, AppError> {
        query.validate()?;

        let full_name = query.full_name.as_deref().filter(|s| !s.is_empty());
        let phone = query.phone.as_deref().filter(|s| !s.is_empty());

        let user_repo = UserRepository::new(self.db.clone());
        let user = user_repo
            .update_profile(identity.user_id, full_name, phone)
            .await?
            .ok_or(AuthRejection::NotFound)?;

        Ok(UserResponse::from(user))
    }
}

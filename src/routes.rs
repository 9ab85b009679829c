//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::{config::CorsConfig, handlers, middleware::AppState};

/// 请求体上限（2 MiB）
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开端点（欢迎页与健康检查）
    let public_routes = Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check));

    // 认证
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route(
            "/me",
            get(handlers::auth::get_current_user).put(handlers::auth::update_current_user),
        );

    // 分类：读取公开，写入需要管理员
    let category_routes = Router::new()
        .route(
            "/",
            get(handlers::category::list_categories).post(handlers::category::create_category),
        )
        .route(
            "/{id}",
            get(handlers::category::get_category).put(handlers::category::update_category),
        );

    // 商品
    let product_routes = Router::new()
        .route(
            "/",
            get(handlers::product::list_products).post(handlers::product::create_product),
        )
        .route(
            "/{id}",
            get(handlers::product::get_product)
                .put(handlers::product::update_product)
                .delete(handlers::product::delete_product),
        );

    // 报价单
    let quote_routes = Router::new()
        .route("/", post(handlers::quote::create_quote))
        .route("/my-quotes", get(handlers::quote::list_my_quotes))
        .route("/admin/quotes", get(handlers::quote::list_quotes))
        .route(
            "/admin/{id}/status",
            patch(handlers::quote::update_quote_status),
        )
        .route("/{id}", get(handlers::quote::get_quote));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/categories", category_routes)
        .nest("/products", product_routes)
        .nest("/quotes", quote_routes);

    let cors = cors_layer(&state.config.cors);

    // 组合所有路由
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(
            crate::middleware::request_tracking_middleware,
        ))
        .with_state(state)
}

/// 根据配置构建 CORS 层
///
/// `*` 表示允许任意来源（此时不携带凭证）；无法解析的来源会被忽略
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = config.origins();
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];

    if origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(methods)
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

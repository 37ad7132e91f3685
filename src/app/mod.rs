//! 应用层：路由装配与共享状态

pub mod products;

use axum::{extract::State, middleware, response::Json, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::core::middleware::request_logging_middleware;
use crate::infrastructure::config::{Config, PaginationConfig};
use products::service::ProductService;

#[derive(Clone)]
pub struct AppState {
    pub product_service: ProductService,
    pub pagination: PaginationConfig,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            product_service: ProductService::new(),
            pagination: config.pagination,
        }
    }
}

/// 组装完整的 HTTP 应用
pub fn build_router(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/products", products::routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(TimeoutLayer::new(config.http.timeout()))
                .layer(middleware::from_fn(request_logging_middleware)),
        )
        .with_state(state)
}

/// 健康检查
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "products": state.product_service.count(),
    }))
}

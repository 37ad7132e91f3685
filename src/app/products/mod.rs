//! 产品资源：`/products` 下的全部路由

pub mod handler;
pub mod model;
pub mod service;
pub mod store;

use axum::{routing::get, Router};

use super::AppState;

/// 静态路径 `/search`、`/stats/category` 优先于 `/:id` 匹配
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_products).post(handler::create_product))
        .route("/search", get(handler::search_products))
        .route("/stats/category", get(handler::category_stats))
        .route(
            "/:id",
            get(handler::get_product)
                .put(handler::update_product)
                .delete(handler::delete_product),
        )
}

//! 核心中间件模块

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn};

/// 未命中任何路由的请求（回退到 404）使用的路由标签
pub const UNMATCHED_ROUTE: &str = "<unmatched>";

/// 路由模板，例如 `/products/:id`，日志按模板聚合而不是按具体 id
pub fn route_label(req: &Request) -> String {
    req.extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}

/// 请求日志中间件
///
/// 通过 `Router::layer` 挂载时逐路由包裹，此时 `MatchedPath` 已写入请求扩展。
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let route = route_label(&req);

    let response = next.run(req).await;
    let status = response.status();
    let duration_ms = start.elapsed().as_millis() as u64;

    if status.is_server_error() {
        warn!(%method, %route, %uri, status = status.as_u16(), duration_ms, "request failed");
    } else if status.is_client_error() {
        info!(%method, %route, %uri, status = status.as_u16(), duration_ms, "request rejected");
    } else {
        info!(%method, %route, %uri, status = status.as_u16(), duration_ms, "request handled");
    }

    response
}

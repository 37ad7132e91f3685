//! # 产品目录服务
//!
//! 基于 Axum 的单资源 REST 服务，产品保存在进程内存中：
//! - `app`: 路由、处理器、业务服务与内存存储
//! - `core`: 统一错误响应、请求体校验、请求日志中间件
//! - `infrastructure`: 配置加载与日志初始化

pub mod app;
pub mod core;
pub mod infrastructure;

pub use app::{build_router, AppState};
pub use crate::core::error::CoreError;
pub use infrastructure::config::Config;

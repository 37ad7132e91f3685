//! 核心层：错误处理、请求校验、中间件

pub mod error;
pub mod middleware;
pub mod validation;

//! 通知受理网关
//!
//! 通知管道的 HTTP 入口：校验请求字段后交给受理闸门，立即返回回执。
//!
//! ## 端点
//!
//! - `POST /api/events`：提交通知
//! - `POST /callback`：演示用回调接收端点
//! - `GET /health` / `GET /ready`：存活与就绪探针
//!
//! ## 模块结构
//!
//! - `dto`: 请求和响应的数据传输对象
//! - `error`: 错误类型定义
//! - `handlers`: HTTP 请求处理器
//! - `routes`: 路由配置
//! - `state`: 应用状态

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use dto::{ErrorResponse, SubmitEventRequest};
pub use error::{GatewayError, Result};
pub use state::AppState;

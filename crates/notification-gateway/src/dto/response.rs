//! 响应 DTO 定义
//!
//! 受理成功的响应体直接复用 `SubmissionAck`（`{eventId, message}`）。

use serde::{Deserialize, Serialize};

/// 演示回调端点的固定响应
pub const CALLBACK_RECEIVED_MESSAGE: &str = "Callback received successfully";

/// 错误响应
///
/// 与受理回执同形，`eventId` 恒为 null，便于客户端统一解析。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub event_id: Option<String>,
    pub code: String,
    pub message: String,
}

/// 存活探针响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

/// 就绪探针响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessResponse {
    pub status: String,
    pub lifecycle: String,
    pub accepting: bool,
}

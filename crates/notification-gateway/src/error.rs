//! 入口层错误类型定义
//!
//! 所有错误响应体形如 `{"eventId": null, "code": "...", "message": "..."}`。

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use notify_shared::error::NotifyError;

use crate::dto::ErrorResponse;

pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields";

/// 入口层错误类型
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("{0}")]
    Validation(String),

    #[error("Missing required fields")]
    MissingFields,

    #[error("Invalid event type: {0}")]
    InvalidEventType(String),

    #[error("Payload type {payload_type} does not match event type {event_type}")]
    PayloadMismatch {
        event_type: String,
        payload_type: String,
    },

    #[error("System is shutting down, not accepting new events.")]
    Rejected,

    #[error("内部错误: {0}")]
    Internal(String),
}

impl GatewayError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::MissingFields
            | Self::InvalidEventType(_)
            | Self::PayloadMismatch { .. } => StatusCode::BAD_REQUEST,
            Self::Rejected => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::MissingFields => "MISSING_FIELDS",
            Self::InvalidEventType(_) => "INVALID_EVENT_TYPE",
            Self::PayloadMismatch { .. } => "PAYLOAD_MISMATCH",
            Self::Rejected => "REJECTED_SUBMISSION",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 内部错误细节只记录日志
        let message = match &self {
            Self::Internal(e) => {
                tracing::error!(error = %e, "内部错误");
                "服务内部错误，请稍后重试".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            event_id: None,
            code: self.error_code().to_string(),
            message,
        };

        (status, axum::Json(body)).into_response()
    }
}

/// 从 validator 错误转换
impl From<validator::ValidationErrors> for GatewayError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// 请求体无法解析为 JSON 或结构不符
impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

/// 从管道错误转换
impl From<NotifyError> for GatewayError {
    fn from(err: NotifyError) -> Self {
        match err {
            NotifyError::RejectedSubmission => Self::Rejected,
            NotifyError::InvalidCategory(value) => Self::InvalidEventType(value),
            NotifyError::EmptyCallbackAddress => Self::MissingFields,
            other => Self::Internal(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

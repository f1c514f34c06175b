//! 统一错误处理模块
//!
//! 定义通知管道对外暴露的错误类型，使用 thiserror 提供良好的错误信息。
//! 只有 `RejectedSubmission` 与 `InvalidCategory` 这类错误会同步返回给提交方，
//! 入队之后的任何故障都只记录日志，不再向上传播。

use thiserror::Error;

use crate::events::Category;

/// 系统错误类型
#[derive(Debug, Error)]
pub enum NotifyError {
    // ==================== 提交错误 ====================
    #[error("System is shutting down, not accepting new events.")]
    RejectedSubmission,

    #[error("Invalid event type: {0}")]
    InvalidCategory(String),

    #[error("回调地址不能为空")]
    EmptyCallbackAddress,

    #[error("回调报文格式无效: {0}")]
    MalformedPayload(String),

    // ==================== 队列错误 ====================
    #[error("队列已关闭: category={category}")]
    QueueClosed { category: Category },

    // ==================== 配置错误 ====================
    #[error("配置无效: {0}")]
    InvalidConfig(String),

    #[error("配置加载失败: {0}")]
    Config(#[from] config::ConfigError),

    // ==================== 通用错误 ====================
    #[error("内部错误: {0}")]
    Internal(String),
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, NotifyError>;

impl NotifyError {
    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::RejectedSubmission => "REJECTED_SUBMISSION",
            Self::InvalidCategory(_) => "INVALID_CATEGORY",
            Self::EmptyCallbackAddress => "EMPTY_CALLBACK_ADDRESS",
            Self::MalformedPayload(_) => "MALFORMED_PAYLOAD",
            Self::QueueClosed { .. } => "QUEUE_CLOSED",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// 是否由调用方输入导致（调用方可自行修正后重新提交）
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::RejectedSubmission | Self::InvalidCategory(_) | Self::EmptyCallbackAddress
        )
    }
}

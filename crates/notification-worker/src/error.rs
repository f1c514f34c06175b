//! 回调投递错误类型
//!
//! 定义回调发送、报文序列化等场景的错误分类。
//! 这些错误只在 Worker 内部流转：由回调分发器记录日志后吞掉，
//! 既不重试，也不会传播给 Worker 或原始提交方。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("回调发送失败: url={url}, 原因={reason}")]
    CallbackTransport { url: String, reason: String },

    #[error("回调被拒收: url={url}, 状态码={status}")]
    CallbackRejected { url: String, status: u16 },

    #[error("回调超时: url={url}")]
    CallbackTimeout { url: String },

    #[error("回调报文序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DispatchError {
    /// 用于日志与指标的错误分类
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CallbackTransport { .. } => "transport",
            Self::CallbackRejected { .. } => "rejected",
            Self::CallbackTimeout { .. } => "timeout",
            Self::Serialization(_) => "serialization",
        }
    }
}

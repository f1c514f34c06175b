//! 回调投递
//!
//! Worker 处理完一条记录后，把结果以 JSON 报文 POST 到提交时给出的回调地址。
//! 投递是尽力而为的：只尝试一次，任何失败都记录 WARN 日志后吞掉，
//! 不影响 Worker 继续处理后续记录。
//!
//! 发送行为通过 `CallbackTransport` trait 抽象，生产环境使用基于 reqwest 的实现，
//! 测试中可替换为记录型或 mock 实现。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use notify_shared::config::CallbackConfig;
use notify_shared::events::DeliveryOutcome;
use notify_shared::observability::metrics;
use tracing::{debug, warn};

use crate::error::DispatchError;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// 回调端点的响应
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackResponse {
    pub status: u16,
}

impl CallbackResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 回调发送 trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CallbackTransport: Send + Sync {
    /// 向 `url` 发送一次 POST 请求
    async fn post(
        &self,
        url: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<CallbackResponse, DispatchError>;
}

/// 基于 reqwest 的 HTTP 回调发送器
pub struct HttpCallbackTransport {
    client: reqwest::Client,
}

impl HttpCallbackTransport {
    pub fn new(config: &CallbackConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CallbackTransport for HttpCallbackTransport {
    async fn post(
        &self,
        url: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<CallbackResponse, DispatchError> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DispatchError::CallbackTimeout {
                        url: url.to_string(),
                    }
                } else {
                    DispatchError::CallbackTransport {
                        url: url.to_string(),
                        reason: e.to_string(),
                    }
                }
            })?;

        Ok(CallbackResponse {
            status: response.status().as_u16(),
        })
    }
}

/// 回调分发器
///
/// 负责序列化结果报文、施加超时并调用底层发送器。
pub struct CallbackDispatcher {
    transport: Arc<dyn CallbackTransport>,
    timeout: Duration,
}

impl CallbackDispatcher {
    pub fn new(transport: Arc<dyn CallbackTransport>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// 投递一次结果，失败只记录日志
    ///
    /// 返回值表示是否成功送达，调用方无需处理。
    pub async fn deliver(&self, address: &str, outcome: &DeliveryOutcome) -> bool {
        let category = outcome.category();
        match self.try_deliver(address, outcome).await {
            Ok(response) => {
                metrics::record_callback(category, "delivered");
                debug!(
                    event_id = %outcome.record_id(),
                    status = %outcome.status(),
                    http_status = response.status,
                    "回调已送达"
                );
                true
            }
            Err(e) => {
                metrics::record_callback(category, e.kind());
                warn!(
                    event_id = %outcome.record_id(),
                    callback_url = %address,
                    error = %e,
                    "回调投递失败，已放弃"
                );
                false
            }
        }
    }

    /// 投递一次结果并返回详细错误，非 2xx 响应视为失败
    pub async fn try_deliver(
        &self,
        address: &str,
        outcome: &DeliveryOutcome,
    ) -> Result<CallbackResponse, DispatchError> {
        let body = serde_json::to_vec(&outcome.to_callback_payload())?;

        let response = tokio::time::timeout(
            self.timeout,
            self.transport.post(address, body, JSON_CONTENT_TYPE),
        )
        .await
        .map_err(|_| DispatchError::CallbackTimeout {
            url: address.to_string(),
        })??;

        if !response.is_success() {
            return Err(DispatchError::CallbackRejected {
                url: address.to_string(),
                status: response.status,
            });
        }
        Ok(response)
    }
}

//! REST API 客户端
//!
//! 封装对 notification-gateway 的 HTTP 调用。

use anyhow::Result;
use notify_shared::events::SubmissionAck;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// 原始响应：状态码与 JSON 体
#[derive(Debug)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// API 客户端
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ========== 通知 API ==========

    /// 提交通知，要求 200
    pub async fn submit_event(&self, body: &Value) -> Result<SubmissionAck> {
        let response = self
            .client
            .post(format!("{}/api/events", self.base_url))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("提交失败: {} - {}", status, text);
        }
        Ok(response.json().await?)
    }

    /// 提交通知，返回原始状态码与响应体
    pub async fn submit_raw<T: Serialize + ?Sized>(&self, body: &T) -> Result<RawResponse> {
        self.post_raw("/api/events", body).await
    }

    // ========== 探针 ==========

    pub async fn health(&self) -> Result<RawResponse> {
        self.get_raw("/health").await
    }

    pub async fn ready(&self) -> Result<RawResponse> {
        self.get_raw("/ready").await
    }

    // ========== 通用方法 ==========

    async fn post_raw<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<RawResponse> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        Self::into_raw(response).await
    }

    async fn get_raw(&self, path: &str) -> Result<RawResponse> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        Self::into_raw(response).await
    }

    async fn into_raw(response: reqwest::Response) -> Result<RawResponse> {
        let status = response.status();
        let text = response.text().await?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        Ok(RawResponse { status, body })
    }

    /// 直接 POST 文本到任意路径
    pub async fn post_text(&self, path: &str, body: &Value) -> Result<(StatusCode, String)> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        let status = response.status();
        Ok((status, response.text().await?))
    }
}

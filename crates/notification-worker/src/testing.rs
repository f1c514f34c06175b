//! 测试用回调发送器
//!
//! 不走网络，按到达顺序记录每次投递的报文；可配置为返回指定状态码以模拟拒收。

use std::sync::atomic::{AtomicU16, Ordering};

use async_trait::async_trait;
use notify_shared::events::CallbackPayload;
use parking_lot::Mutex;

use crate::callback::{CallbackResponse, CallbackTransport};
use crate::error::DispatchError;

/// 一次记录下来的投递
#[derive(Debug, Clone)]
pub struct RecordedCallback {
    pub url: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// 记录型回调发送器
#[derive(Debug)]
pub struct RecordingTransport {
    calls: Mutex<Vec<RecordedCallback>>,
    status: AtomicU16,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            status: AtomicU16::new(200),
        }
    }

    /// 之后的投递都返回该状态码
    pub fn fail_with_status(&self, status: u16) {
        self.status.store(status, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<RecordedCallback> {
        self.calls.lock().clone()
    }

    /// 已解析的回调报文，按投递顺序排列；无法解析的请求体会被跳过
    pub fn payloads(&self) -> Vec<CallbackPayload> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| serde_json::from_slice(&c.body).ok())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CallbackTransport for RecordingTransport {
    async fn post(
        &self,
        url: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<CallbackResponse, DispatchError> {
        self.calls.lock().push(RecordedCallback {
            url: url.to_string(),
            content_type: content_type.to_string(),
            body,
        });
        Ok(CallbackResponse {
            status: self.status.load(Ordering::SeqCst),
        })
    }
}

//! 测试工具模块
//!
//! 提供集成测试所需的辅助设施，核心是一个本地回调接收器：
//! 在随机端口上启动 axum 服务，记录收到的每一次回调请求，供断言使用。

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::events::{CallbackPayload, NotificationRequest};

// ==================== 测试数据辅助 ====================

/// 构造一条合法的邮件请求
pub fn email_request(callback_address: &str) -> NotificationRequest {
    NotificationRequest::email("a@example.com", "hi", callback_address)
}

/// 构造一条合法的短信请求
pub fn sms_request(callback_address: &str) -> NotificationRequest {
    NotificationRequest::sms("+8613800000000", "hi", callback_address)
}

/// 构造一条合法的推送请求
pub fn push_request(callback_address: &str) -> NotificationRequest {
    NotificationRequest::push("device-12345", "hi", callback_address)
}

// ==================== 回调接收器 ====================

/// 一次收到的回调
#[derive(Debug, Clone)]
pub struct ReceivedCallback {
    pub path: String,
    pub content_type: Option<String>,
    pub body: String,
    pub received_at: DateTime<Utc>,
}

impl ReceivedCallback {
    /// 按回调报文格式解析请求体
    pub fn payload(&self) -> serde_json::Result<CallbackPayload> {
        serde_json::from_str(&self.body)
    }
}

struct ReceiverState {
    received: Mutex<Vec<ReceivedCallback>>,
    notify: Notify,
    response_status: StatusCode,
}

/// 本地回调接收器
///
/// Drop 时终止后台服务。
pub struct CallbackReceiver {
    addr: SocketAddr,
    state: Arc<ReceiverState>,
    server: JoinHandle<()>,
}

impl CallbackReceiver {
    /// 启动接收器，所有请求返回 200
    pub async fn start() -> std::io::Result<Self> {
        Self::start_with_status(StatusCode::OK).await
    }

    /// 启动接收器，所有请求返回指定状态码（用于模拟回调方拒收）
    pub async fn start_with_status(response_status: StatusCode) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        Self::serve(listener, response_status)
    }

    /// 在指定地址启动接收器
    pub async fn bind(addr: &str) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Self::serve(listener, StatusCode::OK)
    }

    fn serve(listener: TcpListener, response_status: StatusCode) -> std::io::Result<Self> {
        let addr = listener.local_addr()?;
        let state = Arc::new(ReceiverState {
            received: Mutex::new(Vec::new()),
            notify: Notify::new(),
            response_status,
        });

        let app = Router::new().fallback(receive).with_state(state.clone());
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            addr,
            state,
            server,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// 回调地址，形如 `http://127.0.0.1:PORT/cb`
    pub fn url(&self) -> String {
        format!("http://{}/cb", self.addr)
    }

    /// 目前为止收到的全部回调
    pub fn received(&self) -> Vec<ReceivedCallback> {
        self.state.received.lock().clone()
    }

    /// 等待至少收到 `count` 次回调，超时则返回已收到的部分
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> Vec<ReceivedCallback> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            // 先登记等待再检查，避免检查与通知之间的竞态
            let notified = self.state.notify.notified();
            {
                let received = self.state.received.lock();
                if received.len() >= count {
                    return received.clone();
                }
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return self.received();
            }
        }
    }
}

impl Drop for CallbackReceiver {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn receive(
    State(state): State<Arc<ReceiverState>>,
    uri: axum::http::Uri,
    headers: HeaderMap,
    body: String,
) -> StatusCode {
    let callback = ReceivedCallback {
        path: uri.path().to_string(),
        content_type: headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body,
        received_at: Utc::now(),
    };
    state.received.lock().push(callback);
    state.notify.notify_waiters();
    state.response_status
}

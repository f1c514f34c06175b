//! 测试环境管理
//!
//! 每个测试独占一个网关实例（随机端口）与一个回调接收器，互不干扰。

use anyhow::Result;
use notification_gateway::{AppState, routes};
use notification_worker::{NotificationPipeline, ShutdownReport};
use notify_shared::config::{CallbackConfig, DispatchConfig};
use notify_shared::test_utils::{CallbackReceiver, ReceivedCallback};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use super::super::helpers::ApiClient;

/// 测试环境配置
#[derive(Debug, Clone)]
pub struct TestEnvConfig {
    pub dispatch: DispatchConfig,
    pub callback: CallbackConfig,
}

impl Default for TestEnvConfig {
    fn default() -> Self {
        Self::fast(0.0)
    }
}

impl TestEnvConfig {
    /// 所有类别 50ms 延迟，便于快速验证
    pub fn fast(failure_probability: f64) -> Self {
        Self {
            dispatch: DispatchConfig {
                shutdown_timeout_secs: 10,
                ..DispatchConfig::uniform(Duration::from_millis(50), failure_probability)
            },
            callback: CallbackConfig {
                timeout_ms: 2000,
                ..Default::default()
            },
        }
    }

    pub fn with_delays(mut self, email_ms: u64, sms_ms: u64, push_ms: u64) -> Self {
        self.dispatch.email_delay_ms = email_ms;
        self.dispatch.sms_delay_ms = sms_ms;
        self.dispatch.push_delay_ms = push_ms;
        self
    }

    pub fn with_shutdown_timeout(mut self, secs: u64) -> Self {
        self.dispatch.shutdown_timeout_secs = secs;
        self
    }
}

/// 测试环境
pub struct TestEnvironment {
    pub config: TestEnvConfig,
    pub api: ApiClient,
    pub receiver: CallbackReceiver,
    pipeline: NotificationPipeline,
    server: JoinHandle<()>,
}

impl TestEnvironment {
    pub async fn setup() -> Result<Self> {
        Self::setup_with_config(TestEnvConfig::default()).await
    }

    pub async fn setup_with_config(config: TestEnvConfig) -> Result<Self> {
        notify_shared::observability::tracing::init_for_tests();

        let receiver = CallbackReceiver::start().await?;
        let pipeline = NotificationPipeline::start_http(&config.dispatch, &config.callback)?;

        let app = routes::app(AppState::new(&pipeline, "notification-gateway-e2e"));
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let api = ApiClient::new(&format!("http://{addr}"))?;
        tracing::debug!(base_url = %api.base_url(), "测试网关已启动");

        Ok(Self {
            config,
            api,
            receiver,
            pipeline,
            server,
        })
    }

    /// 回调接收器地址
    pub fn callback_url(&self) -> String {
        self.receiver.url()
    }

    /// 等待收到指定数量的回调
    pub async fn wait_for_callbacks(&self, count: usize, timeout: Duration) -> Vec<ReceivedCallback> {
        self.receiver.wait_for(count, timeout).await
    }

    /// 触发管道关闭（HTTP 服务保持运行，用于观察排空期间的行为）
    pub async fn shutdown_pipeline(&self) -> ShutdownReport {
        self.pipeline.shutdown().await
    }

    pub fn pipeline(&self) -> &NotificationPipeline {
        &self.pipeline
    }

    /// 关闭管道并停止 HTTP 服务
    pub async fn cleanup(self) -> Result<ShutdownReport> {
        let report = self.pipeline.shutdown().await;
        self.server.abort();
        Ok(report)
    }
}

//! Prometheus 指标模块
//!
//! 基于 metrics crate 和 metrics-exporter-prometheus 实现指标收集与导出。
//! 指标通过独立的 HTTP 端口暴露，供 Prometheus 抓取。

use anyhow::Result;
use axum::{Router, routing::get};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::sync::OnceLock;
use tokio::net::TcpListener;
use tracing::{error, info};

use super::ObservabilityConfig;
use crate::events::{Category, DeliveryStatus};

/// 全局 Prometheus handle，用于渲染指标
static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics 资源守卫
pub struct MetricsHandle {
    _server_handle: tokio::task::JoinHandle<()>,
}

/// 初始化 Prometheus 指标导出
///
/// 启动一个独立的 HTTP 服务器在指定端口暴露 `/metrics` 端点。
pub async fn init(config: &ObservabilityConfig) -> Result<MetricsHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    // 保存到全局，供其他地方获取指标快照
    let _ = PROMETHEUS_HANDLE.set(handle.clone());

    register_common_metrics(&config.service_name);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
    let server_handle = start_metrics_server(addr, handle).await?;

    Ok(MetricsHandle {
        _server_handle: server_handle,
    })
}

/// 注册通用指标
///
/// 这些描述会出现在 /metrics 端点的 HELP 注释中
fn register_common_metrics(service_name: &str) {
    metrics::describe_counter!("http_requests_total", "Total number of HTTP requests");
    metrics::describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );

    metrics::describe_counter!(
        "notifications_submitted_total",
        "Total number of notification submissions, by category and result"
    );
    metrics::describe_counter!(
        "notifications_processed_total",
        "Total number of processed notifications, by category and outcome status"
    );
    metrics::describe_histogram!(
        "notification_processing_seconds",
        "Time from dequeue to callback attempt in seconds"
    );
    metrics::describe_counter!(
        "callbacks_total",
        "Total number of callback delivery attempts, by category and result"
    );
    metrics::describe_gauge!(
        "notification_queue_depth",
        "Number of records waiting in each category queue"
    );

    metrics::counter!("service_starts_total", "service" => service_name.to_string()).increment(1);
}

/// 启动指标 HTTP 服务器
async fn start_metrics_server(
    addr: SocketAddr,
    handle: PrometheusHandle,
) -> Result<tokio::task::JoinHandle<()>> {
    let app = Router::new()
        .route("/metrics", get(move || std::future::ready(handle.render())))
        .route("/health", get(|| async { "OK" }));

    let listener = TcpListener::bind(addr).await?;
    info!("Metrics server listening on {}", addr);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Metrics server error: {}", e);
        }
    });

    Ok(server_handle)
}

/// 获取全局 Prometheus handle（用于自定义渲染）
pub fn get_handle() -> Option<&'static PrometheusHandle> {
    PROMETHEUS_HANDLE.get()
}

// ============================================================================
// 便捷的指标记录函数
// ============================================================================

/// 记录 HTTP 请求
#[inline]
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let status_str = status.to_string();
    metrics::counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status_str.clone()
    )
    .increment(1);

    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status_str
    )
    .record(duration_secs);
}

/// 记录一次提交（accepted / rejected）
#[inline]
pub fn record_submission(category: Category, result: &'static str) {
    metrics::counter!(
        "notifications_submitted_total",
        "category" => category.as_str(),
        "result" => result
    )
    .increment(1);
}

/// 记录一条记录的处理结果与耗时
#[inline]
pub fn record_processed(category: Category, status: DeliveryStatus, duration_secs: f64) {
    metrics::counter!(
        "notifications_processed_total",
        "category" => category.as_str(),
        "status" => status.as_str()
    )
    .increment(1);

    metrics::histogram!(
        "notification_processing_seconds",
        "category" => category.as_str()
    )
    .record(duration_secs);
}

/// 记录回调投递结果（delivered / failed）
#[inline]
pub fn record_callback(category: Category, result: &'static str) {
    metrics::counter!(
        "callbacks_total",
        "category" => category.as_str(),
        "result" => result
    )
    .increment(1);
}

/// 更新队列深度
#[inline]
pub fn set_queue_depth(category: Category, depth: f64) {
    metrics::gauge!(
        "notification_queue_depth",
        "category" => category.as_str()
    )
    .set(depth);
}

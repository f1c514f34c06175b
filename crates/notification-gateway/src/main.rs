//! 通知受理网关服务
//!
//! 启动顺序：配置 -> 可观测性 -> 通知管道 -> HTTP 服务。
//! 关闭顺序相反：HTTP 服务停止接收新连接后，再排空通知管道。

use anyhow::Context;
use axum::http::HeaderValue;
use notification_gateway::{routes, state::AppState};
use notification_worker::{NotificationPipeline, ShutdownReport};
use notify_shared::{config::AppConfig, observability};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

const SERVICE_NAME: &str = "notification-gateway";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load(SERVICE_NAME).unwrap_or_default();

    let obs_config = config
        .observability
        .clone()
        .with_service_name(&config.service_name);
    let _guard = observability::init(&obs_config).await?;

    info!(
        environment = %config.environment,
        "Starting {} on {}",
        SERVICE_NAME,
        config.server_addr()
    );

    let pipeline = NotificationPipeline::start_http(&config.dispatch, &config.callback)
        .context("通知管道启动失败")?;

    let state = AppState::new(&pipeline, SERVICE_NAME);
    let app = routes::app(state).layer(cors_layer(config.is_production()));

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", config.server_addr());

    // 收到 SIGTERM 或 Ctrl+C 后停止接收新连接，等待已有请求处理完毕
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped, draining notification pipeline...");
    match pipeline.shutdown().await {
        ShutdownReport::Graceful => info!("Notification pipeline drained"),
        ShutdownReport::TimedOut { aborted } => {
            warn!(aborted, "Notification pipeline shutdown timed out")
        }
        ShutdownReport::AlreadyRequested => {}
    }

    info!("Server shutdown complete");
    Ok(())
}

/// CORS 配置：通过 NOTIFY_CORS_ORIGINS 环境变量控制允许的来源
fn cors_layer(is_production: bool) -> CorsLayer {
    let allowed_origins = std::env::var("NOTIFY_CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());

    if allowed_origins == "*" {
        if is_production {
            warn!("NOTIFY_CORS_ORIGINS=\"*\" 在生产环境中不安全，请设置为具体域名");
        }
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    info!("CORS allowed_origins: {}", allowed_origins);
    let origins: Vec<_> = allowed_origins
        .split(',')
        .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// 监听关闭信号
///
/// 容器通过 SIGTERM 通知停止；本地开发通过 Ctrl+C。
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "注册 Ctrl+C 处理器失败");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "注册 SIGTERM 处理器失败");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}

//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射

use axum::{
    Router, middleware,
    routing::{get, post},
};
use notify_shared::observability::middleware as obs_middleware;

use crate::{handlers, state::AppState};

/// 业务路由
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/events", post(handlers::events::submit_event))
        .route("/callback", post(handlers::callback::receive_callback))
}

/// 完整应用路由：业务路由 + 探针 + 可观测性中间件
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(api_routes())
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .layer(middleware::from_fn(obs_middleware::http_tracing))
        .layer(middleware::from_fn(obs_middleware::request_id))
        .with_state(state)
}

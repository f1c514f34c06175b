//! 健康检查处理器

use axum::{Json, extract::State, http::StatusCode};
use notification_worker::LifecycleState;

use crate::{
    dto::{HealthResponse, ReadinessResponse},
    state::AppState,
};

/// 存活探针：服务进程正常即返回 ok
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: state.service_name.clone(),
    })
}

/// 就绪探针：进入排空后返回 503，负载均衡器据此摘除流量
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let lifecycle = state.coordinator.state();
    let accepting = state.gate.is_accepting();
    let ready = accepting && lifecycle == LifecycleState::Running;

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadinessResponse {
            status: if ready { "ok" } else { "draining" }.to_string(),
            lifecycle: lifecycle.to_string(),
            accepting,
        }),
    )
}

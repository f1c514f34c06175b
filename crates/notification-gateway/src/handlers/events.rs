//! 通知提交 API 处理器

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use notify_shared::events::SubmissionAck;
use tracing::{info, warn};

use crate::{dto::SubmitEventRequest, error::Result, state::AppState};

/// 提交通知
///
/// POST /api/events
///
/// 校验通过后交给受理闸门，立即返回回执；处理结果稍后回调到 `callbackUrl`。
pub async fn submit_event(
    State(state): State<AppState>,
    body: std::result::Result<Json<SubmitEventRequest>, JsonRejection>,
) -> Result<Json<SubmissionAck>> {
    let Json(request) = body?;
    let request = request.into_notification().inspect_err(|e| {
        warn!(error = %e, "通知请求校验失败");
    })?;

    let category = request.category();
    let ack = state.gate.submit(request)?;

    info!(event_id = %ack.event_id, category = %category, "通知已受理");
    Ok(Json(ack))
}

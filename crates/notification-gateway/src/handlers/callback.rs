//! 演示用回调接收端点
//!
//! 本服务自身也可作为回调地址，收到结果后只记录日志。

use axum::Json;
use notify_shared::events::CallbackPayload;
use tracing::info;

use crate::dto::CALLBACK_RECEIVED_MESSAGE;

/// 接收处理结果回调
///
/// POST /callback
pub async fn receive_callback(Json(payload): Json<CallbackPayload>) -> &'static str {
    info!(
        event_id = %payload.event_id,
        status = %payload.status,
        event_type = %payload.event_type,
        processed_at = %payload.processed_at,
        error_message = payload.error_message.as_deref().unwrap_or(""),
        "收到处理结果回调"
    );
    CALLBACK_RECEIVED_MESSAGE
}

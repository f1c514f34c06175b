//! 自定义断言宏和辅助函数
//!
//! 提供针对回调报文的专用断言。

use notify_shared::events::{CallbackPayload, DeliveryStatus};
use notify_shared::test_utils::ReceivedCallback;

/// 断言回调状态
#[macro_export]
macro_rules! assert_callback_status {
    ($payload:expr, $status:expr) => {
        assert_eq!(
            $payload.status, $status,
            "事件 {} 的回调状态应为 {}，实际为 {}",
            $payload.event_id, $status, $payload.status
        );
    };
}

/// 解析收到的全部回调，任何一条解析失败即 panic
pub fn parse_callbacks(received: &[ReceivedCallback]) -> Vec<CallbackPayload> {
    received
        .iter()
        .map(|r| {
            r.payload()
                .unwrap_or_else(|e| panic!("回调报文无法解析: {e}, body={}", r.body))
        })
        .collect()
}

/// 断言报文满足状态与错误信息的一致性
pub fn assert_consistent(payload: &CallbackPayload) {
    match payload.status {
        DeliveryStatus::Completed => assert!(
            payload.error_message.is_none(),
            "COMPLETED 回调不应携带 errorMessage: {}",
            payload.event_id
        ),
        DeliveryStatus::Failed => assert!(
            payload.error_message.is_some(),
            "FAILED 回调必须携带 errorMessage: {}",
            payload.event_id
        ),
    }
    assert!(
        chrono::DateTime::parse_from_rfc3339(&payload.processed_at).is_ok(),
        "processedAt 应为 ISO-8601 时间: {}",
        payload.processed_at
    );
}

//! 处理结果回调测试套件

use crate::assert_callback_status;
use crate::data::*;
use crate::helpers::*;
use crate::setup::{TestEnvConfig, TestEnvironment};
use notify_shared::events::{Category, DeliveryStatus};
use reqwest::StatusCode;
use std::collections::HashMap;
use std::time::Duration;

#[cfg(test)]
mod delivery_tests {
    use super::*;

    /// 单条邮件：失败概率为 0 时回调 COMPLETED
    #[tokio::test]
    async fn test_email_completed_callback() {
        let env = TestEnvironment::setup().await.unwrap();

        let ack = env
            .api
            .submit_event(&EventRequests::email("a@example.com", "hi", &env.callback_url()))
            .await
            .unwrap();

        let received = env.wait_for_callbacks(1, Duration::from_secs(5)).await;
        assert_eq!(received.len(), 1, "应恰好收到一次回调");
        assert_eq!(received[0].content_type.as_deref(), Some("application/json"));
        assert!(received[0].body.contains("\"status\":\"COMPLETED\""));
        assert!(received[0].body.contains("\"eventType\":\"EMAIL\""));

        let payloads = parse_callbacks(&received);
        assert_eq!(payloads[0].event_id, ack.event_id);
        assert_callback_status!(payloads[0], DeliveryStatus::Completed);
        assert_consistent(&payloads[0]);

        env.cleanup().await.unwrap();
    }

    /// 失败概率为 1 时所有回调为 FAILED 并附带诊断信息
    #[tokio::test]
    async fn test_all_failed_with_full_probability() {
        let env = TestEnvironment::setup_with_config(TestEnvConfig::fast(1.0))
            .await
            .unwrap();

        for i in 0..6 {
            env.api
                .submit_event(&EventRequests::mixed(i, &env.callback_url()))
                .await
                .unwrap();
        }

        let received = env.wait_for_callbacks(6, Duration::from_secs(5)).await;
        let payloads = parse_callbacks(&received);
        assert_eq!(payloads.len(), 6);
        for payload in &payloads {
            assert_callback_status!(payload, DeliveryStatus::Failed);
            assert_eq!(
                payload.error_message.as_deref(),
                Some("Simulated processing failure")
            );
            assert_consistent(payload);
        }

        env.cleanup().await.unwrap();
    }

    /// 同类别按提交顺序产生结果
    #[tokio::test]
    async fn test_per_category_fifo() {
        let env = TestEnvironment::setup_with_config(
            TestEnvConfig::fast(0.0).with_delays(30, 20, 10),
        )
        .await
        .unwrap();

        let mut submitted: HashMap<Category, Vec<String>> = HashMap::new();
        for i in 0..9 {
            let body = EventRequests::mixed(i, &env.callback_url());
            let ack = env.api.submit_event(&body).await.unwrap();
            let category: Category = body["eventType"].as_str().unwrap().parse().unwrap();
            submitted.entry(category).or_default().push(ack.event_id);
        }

        let received = env.wait_for_callbacks(9, Duration::from_secs(5)).await;
        let mut delivered: HashMap<Category, Vec<String>> = HashMap::new();
        for payload in parse_callbacks(&received) {
            delivered
                .entry(payload.event_type)
                .or_default()
                .push(payload.event_id);
        }
        assert_eq!(delivered, submitted);

        env.cleanup().await.unwrap();
    }

    /// 回调方拒收不影响后续记录
    #[tokio::test]
    async fn test_unreachable_callback_is_swallowed() {
        let env = TestEnvironment::setup().await.unwrap();

        env.api
            .submit_event(&EventRequests::sms("+8613800000000", "http://127.0.0.1:1/cb"))
            .await
            .unwrap();
        let ack = env
            .api
            .submit_event(&EventRequests::sms("+8613800000000", &env.callback_url()))
            .await
            .unwrap();

        let received = env.wait_for_callbacks(1, Duration::from_secs(5)).await;
        let payloads = parse_callbacks(&received);
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].event_id, ack.event_id);

        env.cleanup().await.unwrap();
    }

    /// 网关自带的演示回调端点
    #[tokio::test]
    async fn test_gateway_callback_endpoint() {
        let env = TestEnvironment::setup().await.unwrap();
        let gateway_callback = format!("{}/callback", env.api.base_url());

        env.api
            .submit_event(&EventRequests::push("device-12345", &gateway_callback))
            .await
            .unwrap();

        // 直接调用同一端点，确认响应文本
        let (status, text) = env
            .api
            .post_text(
                "/callback",
                &serde_json::json!({
                    "eventId": "evt-demo",
                    "status": "COMPLETED",
                    "eventType": "PUSH",
                    "processedAt": "2026-01-01T00:00:00.000Z"
                }),
            )
            .await
            .unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(text, "Callback received successfully");

        env.cleanup().await.unwrap();
    }
}

//! 提交与校验测试套件

use crate::data::*;
use crate::setup::TestEnvironment;
use reqwest::StatusCode;
use std::collections::HashSet;

#[cfg(test)]
mod submission_tests {
    use super::*;

    /// 合法请求立即返回回执
    #[tokio::test]
    async fn test_valid_submission_returns_ack() {
        let env = TestEnvironment::setup().await.unwrap();

        let ack = env
            .api
            .submit_event(&EventRequests::email(
                "test@example.com",
                "Test message",
                &env.callback_url(),
            ))
            .await
            .unwrap();

        assert!(!ack.event_id.is_empty());
        assert_eq!(ack.message, "Event accepted for processing.");

        env.cleanup().await.unwrap();
    }

    /// 回执 ID 在整个进程内唯一
    #[tokio::test]
    async fn test_event_ids_are_unique() {
        let env = TestEnvironment::setup().await.unwrap();

        let mut ids = HashSet::new();
        for i in 0..30 {
            let ack = env
                .api
                .submit_event(&EventRequests::mixed(i, &env.callback_url()))
                .await
                .unwrap();
            assert!(ids.insert(ack.event_id), "eventId 重复");
        }

        env.cleanup().await.unwrap();
    }

    /// 缺少必填字段返回 400
    #[tokio::test]
    async fn test_missing_fields_rejected() {
        let env = TestEnvironment::setup().await.unwrap();

        let response = env
            .api
            .submit_raw(&EventRequests::missing_payload(&env.callback_url()))
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert!(response.body["eventId"].is_null());
        assert_eq!(response.body["message"], "Missing required fields");

        env.cleanup().await.unwrap();
    }

    /// 未知类别返回 400
    #[tokio::test]
    async fn test_unknown_event_type_rejected() {
        let env = TestEnvironment::setup().await.unwrap();

        let response = env
            .api
            .submit_raw(&EventRequests::unknown_type(&env.callback_url()))
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["code"], "INVALID_EVENT_TYPE");

        env.cleanup().await.unwrap();
    }

    /// 字段格式不合法返回 400
    #[tokio::test]
    async fn test_invalid_field_formats_rejected() {
        let env = TestEnvironment::setup().await.unwrap();
        let callback = env.callback_url();

        for body in [
            EventRequests::email("not-an-email", "hi", &callback),
            EventRequests::sms("12", &callback),
            EventRequests::push("bad id!", &callback),
        ] {
            let response = env.api.submit_raw(&body).await.unwrap();
            assert_eq!(response.status, StatusCode::BAD_REQUEST, "body={body}");
            assert_eq!(response.body["code"], "VALIDATION_ERROR");
        }

        assert!(env.receiver.received().is_empty());
        env.cleanup().await.unwrap();
    }

    /// 存活探针
    #[tokio::test]
    async fn test_health_endpoint() {
        let env = TestEnvironment::setup().await.unwrap();

        let response = env.api.health().await.unwrap();
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["status"], "ok");

        env.cleanup().await.unwrap();
    }
}

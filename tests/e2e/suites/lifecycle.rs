//! 关闭与排空测试套件

use crate::data::*;
use crate::helpers::*;
use crate::setup::{TestEnvConfig, TestEnvironment};
use notification_worker::{LifecycleState, ShutdownReport};
use reqwest::StatusCode;
use std::collections::HashSet;
use std::time::Duration;

#[cfg(test)]
mod lifecycle_tests {
    use super::*;

    /// 提交 10 条邮件后立即关闭：每条恰好一个结果，无重复无丢失
    #[tokio::test]
    async fn test_shutdown_drains_all_queued_records() {
        let env = TestEnvironment::setup_with_config(
            TestEnvConfig::fast(0.0).with_delays(50, 50, 50),
        )
        .await
        .unwrap();

        let mut ids = Vec::new();
        for i in 0..10 {
            let ack = env
                .api
                .submit_event(&EventRequests::email(
                    "a@example.com",
                    &format!("m{i}"),
                    &env.callback_url(),
                ))
                .await
                .unwrap();
            ids.push(ack.event_id);
        }

        let report = env.shutdown_pipeline().await;
        assert_eq!(report, ShutdownReport::Graceful);
        assert_eq!(env.pipeline().state(), LifecycleState::Stopped);

        // 关闭返回时所有回调均已尝试
        let payloads = parse_callbacks(&env.receiver.received());
        assert_eq!(payloads.len(), 10);
        let delivered: Vec<String> = payloads.into_iter().map(|p| p.event_id).collect();
        assert_eq!(delivered, ids);
        assert_eq!(delivered.iter().collect::<HashSet<_>>().len(), 10);

        env.cleanup().await.unwrap();
    }

    /// 排空后提交返回 503，就绪探针同步变为不可用
    #[tokio::test]
    async fn test_rejects_after_shutdown() {
        let env = TestEnvironment::setup().await.unwrap();

        let ready = env.api.ready().await.unwrap();
        assert_eq!(ready.status, StatusCode::OK);

        env.shutdown_pipeline().await;

        let response = env
            .api
            .submit_raw(&EventRequests::push("device-12345", &env.callback_url()))
            .await
            .unwrap();
        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(response.body["eventId"].is_null());
        assert_eq!(
            response.body["message"],
            "System is shutting down, not accepting new events."
        );

        let ready = env.api.ready().await.unwrap();
        assert_eq!(ready.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(ready.body["accepting"], false);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(env.receiver.received().is_empty());

        env.cleanup().await.unwrap();
    }

    /// 重复关闭是空操作
    #[tokio::test]
    async fn test_double_shutdown() {
        let env = TestEnvironment::setup().await.unwrap();

        assert_eq!(env.shutdown_pipeline().await, ShutdownReport::Graceful);
        assert_eq!(
            env.shutdown_pipeline().await,
            ShutdownReport::AlreadyRequested
        );
        assert_eq!(
            env.cleanup().await.unwrap(),
            ShutdownReport::AlreadyRequested
        );
    }

    /// 等待超时后强制终止，在途记录的回调丢失
    #[tokio::test]
    async fn test_forced_termination_after_timeout() {
        let env = TestEnvironment::setup_with_config(
            TestEnvConfig::fast(0.0)
                .with_delays(60_000, 10, 10)
                .with_shutdown_timeout(1),
        )
        .await
        .unwrap();

        env.api
            .submit_event(&EventRequests::email("a@example.com", "slow", &env.callback_url()))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let report = env.shutdown_pipeline().await;
        assert_eq!(report, ShutdownReport::TimedOut { aborted: 1 });
        assert!(env.receiver.received().is_empty());

        env.cleanup().await.unwrap();
    }
}

//! 通知管道装配
//!
//! 把队列、受理闸门、回调分发器、Worker 与生命周期协调器组装成一个整体，
//! 供 HTTP 入口或测试直接使用。

use std::sync::Arc;

use notify_shared::config::{CallbackConfig, DispatchConfig};
use notify_shared::error::{NotifyError, Result};
use notify_shared::events::{Category, NotificationRequest, SubmissionAck};
use tracing::info;

use crate::callback::{CallbackDispatcher, CallbackTransport, HttpCallbackTransport};
use crate::intake::{AdmissionSwitch, IntakeGate};
use crate::lifecycle::{LifecycleCoordinator, LifecycleState, ShutdownReport};
use crate::queue::CategoryQueueSet;
use crate::worker::DispatchWorker;

/// 运行中的通知管道
///
/// 必须在 tokio 运行时内创建。
pub struct NotificationPipeline {
    gate: IntakeGate,
    coordinator: Arc<LifecycleCoordinator>,
}

impl NotificationPipeline {
    /// 使用给定的回调发送器启动管道
    pub fn start(
        dispatch: &DispatchConfig,
        callback: &CallbackConfig,
        transport: Arc<dyn CallbackTransport>,
    ) -> Result<Self> {
        dispatch.validate()?;

        let (queues, consumers) = CategoryQueueSet::new();
        let admission = AdmissionSwitch::new();
        let dispatcher = Arc::new(CallbackDispatcher::new(transport, callback.timeout()));
        let coordinator = Arc::new(LifecycleCoordinator::new(
            admission.clone(),
            dispatch.shutdown_timeout(),
        ));

        for category in Category::ALL {
            for index in 0..dispatch.workers_per_category {
                let mut worker = DispatchWorker::new(
                    consumers.consumer(category),
                    dispatcher.clone(),
                    dispatch.delay_for(category),
                    dispatch.failure_probability,
                )
                .with_index(index);
                if let Some(seed) = dispatch.rng_seed {
                    // 同一种子下各 Worker 的序列仍互不相同
                    worker = worker.with_seed(worker_seed(seed, category, index));
                }
                coordinator.spawn(worker);
            }
        }

        info!(
            workers_per_category = dispatch.workers_per_category,
            failure_probability = dispatch.failure_probability,
            email_delay_ms = dispatch.email_delay_ms,
            sms_delay_ms = dispatch.sms_delay_ms,
            push_delay_ms = dispatch.push_delay_ms,
            "通知管道已启动"
        );

        Ok(Self {
            gate: IntakeGate::new(queues, admission),
            coordinator,
        })
    }

    /// 使用 HTTP 回调发送器启动管道
    pub fn start_http(dispatch: &DispatchConfig, callback: &CallbackConfig) -> Result<Self> {
        let transport = HttpCallbackTransport::new(callback)
            .map_err(|e| NotifyError::Internal(format!("创建 HTTP 客户端失败: {e}")))?;
        Self::start(dispatch, callback, Arc::new(transport))
    }

    pub fn submit(&self, request: NotificationRequest) -> Result<SubmissionAck> {
        self.gate.submit(request)
    }

    pub fn gate(&self) -> IntakeGate {
        self.gate.clone()
    }

    pub fn coordinator(&self) -> Arc<LifecycleCoordinator> {
        self.coordinator.clone()
    }

    pub fn state(&self) -> LifecycleState {
        self.coordinator.state()
    }

    pub async fn shutdown(&self) -> ShutdownReport {
        self.coordinator.shutdown().await
    }
}

fn worker_seed(seed: u64, category: Category, index: usize) -> u64 {
    let category_offset = match category {
        Category::Email => 0u64,
        Category::Sms => 1,
        Category::Push => 2,
    };
    seed.wrapping_add(category_offset << 32)
        .wrapping_add(index as u64)
}

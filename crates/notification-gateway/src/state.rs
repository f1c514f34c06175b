//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use std::sync::Arc;

use notification_worker::{IntakeGate, LifecycleCoordinator, NotificationPipeline};

/// Axum 应用共享状态
///
/// 受理闸门本身可廉价克隆；协调器通过 Arc 共享，仅用于就绪探针读取状态。
#[derive(Clone)]
pub struct AppState {
    pub gate: IntakeGate,
    pub coordinator: Arc<LifecycleCoordinator>,
    pub service_name: String,
}

impl AppState {
    pub fn new(pipeline: &NotificationPipeline, service_name: impl Into<String>) -> Self {
        Self {
            gate: pipeline.gate(),
            coordinator: pipeline.coordinator(),
            service_name: service_name.into(),
        }
    }
}

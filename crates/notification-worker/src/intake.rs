//! 受理闸门
//!
//! 接收已由入口层校验过的通知请求，分配全局唯一 ID 后放入对应类别的队列，
//! 并立即返回受理回执。提交路径从不等待下游处理。
//!
//! 闸门是否受理由生命周期协调器持有的原子标志决定；标志翻转后，
//! 所有提交线程立即可见，后续提交一律拒绝且不会入队。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use notify_shared::error::{NotifyError, Result};
use notify_shared::events::{NotificationRecord, NotificationRequest, SubmissionAck};
use notify_shared::observability::metrics;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::queue::CategoryQueueSet;

/// 受理开关
///
/// 单写多读：只有生命周期协调器会关闭它，闸门在每次提交时读取。
#[derive(Debug, Clone)]
pub struct AdmissionSwitch {
    accepting: Arc<AtomicBool>,
}

impl AdmissionSwitch {
    pub fn new() -> Self {
        Self {
            accepting: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_open(&self) -> bool {
        self.accepting.load(Ordering::SeqCst)
    }

    /// 关闭受理，返回关闭前是否处于打开状态
    pub(crate) fn close(&self) -> bool {
        self.accepting.swap(false, Ordering::SeqCst)
    }
}

impl Default for AdmissionSwitch {
    fn default() -> Self {
        Self::new()
    }
}

/// 受理闸门
#[derive(Clone)]
pub struct IntakeGate {
    queues: CategoryQueueSet,
    admission: AdmissionSwitch,
}

impl IntakeGate {
    pub fn new(queues: CategoryQueueSet, admission: AdmissionSwitch) -> Self {
        Self { queues, admission }
    }

    /// 是否仍在受理新提交
    pub fn is_accepting(&self) -> bool {
        self.admission.is_open()
    }

    pub fn queues(&self) -> &CategoryQueueSet {
        &self.queues
    }

    /// 受理一条通知请求
    ///
    /// 成功时恰好入队一次并返回回执；排空阶段返回 `RejectedSubmission`，不会入队。
    pub fn submit(&self, request: NotificationRequest) -> Result<SubmissionAck> {
        let category = request.category();

        if !self.admission.is_open() {
            metrics::record_submission(category, "rejected");
            return Err(NotifyError::RejectedSubmission);
        }

        if request.callback_address.trim().is_empty() {
            metrics::record_submission(category, "invalid");
            return Err(NotifyError::EmptyCallbackAddress);
        }

        let record = NotificationRecord::accept(Uuid::new_v4().to_string(), request);
        let event_id = record.id().to_string();

        match self.queues.enqueue(record) {
            Ok(()) => {}
            // 标志检查之后、入队之前 Worker 已关闭队列：按排空拒绝处理
            Err(NotifyError::QueueClosed { category }) => {
                warn!(category = %category, "队列已关闭，拒绝提交");
                metrics::record_submission(category, "rejected");
                return Err(NotifyError::RejectedSubmission);
            }
            Err(e) => return Err(e),
        }

        metrics::record_submission(category, "accepted");
        debug!(event_id = %event_id, category = %category, "通知已受理");

        Ok(SubmissionAck::accepted(event_id))
    }
}

//! 生命周期协调器
//!
//! 状态单向流转：Running -> Draining -> Stopped。
//!
//! 进入 Draining 时依次：关闭受理开关、向所有 Worker 广播停止信号、
//! 在限定时间内等待 Worker 排空队列后退出。超时仍未退出的 Worker 会被强制中止，
//! 其正在处理的记录结果与回调可能丢失。
//!
//! 重复调用 `shutdown` 是空操作。

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::intake::AdmissionSwitch;
use crate::worker::DispatchWorker;

/// 管道生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LifecycleState {
    Running = 0,
    Draining = 1,
    Stopped = 2,
}

impl LifecycleState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Running,
            1 => Self::Draining,
            _ => Self::Stopped,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "RUNNING",
            Self::Draining => "DRAINING",
            Self::Stopped => "STOPPED",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 一次关闭请求的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReport {
    /// 所有 Worker 在超时前自然退出
    Graceful,
    /// 等待超时，`aborted` 个 Worker 被强制中止
    TimedOut { aborted: usize },
    /// 之前已有关闭请求，本次调用未做任何事
    AlreadyRequested,
}

/// 生命周期协调器
pub struct LifecycleCoordinator {
    admission: AdmissionSwitch,
    state: AtomicU8,
    stop_tx: watch::Sender<bool>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    shutdown_timeout: Duration,
}

impl LifecycleCoordinator {
    pub fn new(admission: AdmissionSwitch, shutdown_timeout: Duration) -> Self {
        let (stop_tx, _) = watch::channel(false);
        Self {
            admission,
            state: AtomicU8::new(LifecycleState::Running as u8),
            stop_tx,
            workers: Mutex::new(Vec::new()),
            shutdown_timeout,
        }
    }

    pub fn state(&self) -> LifecycleState {
        LifecycleState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// 在运行时上启动一个 Worker 并纳入管理
    pub fn spawn(&self, worker: DispatchWorker) {
        let handle = tokio::spawn(worker.run(self.stop_tx.subscribe()));
        self.workers.lock().push(handle);
    }

    /// 受管 Worker 数量（含已退出但尚未回收的）
    pub fn worker_count(&self) -> usize {
        self.workers.lock().len()
    }

    /// 进入排空并等待 Worker 退出
    pub async fn shutdown(&self) -> ShutdownReport {
        if self
            .state
            .compare_exchange(
                LifecycleState::Running as u8,
                LifecycleState::Draining as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_err()
        {
            info!(state = %self.state(), "关闭已在进行中，忽略重复请求");
            return ShutdownReport::AlreadyRequested;
        }

        // 顺序不可调换：先停止受理，再通知 Worker
        self.admission.close();
        self.stop_tx.send_replace(true);

        let mut handles = std::mem::take(&mut *self.workers.lock());
        info!(
            workers = handles.len(),
            timeout_secs = self.shutdown_timeout.as_secs_f64(),
            "停止受理新通知，等待 Worker 排空队列"
        );

        let joined = tokio::time::timeout(
            self.shutdown_timeout,
            futures::future::join_all(handles.iter_mut()),
        )
        .await;

        let report = match joined {
            Ok(results) => {
                for result in results {
                    if let Err(e) = result {
                        warn!(error = %e, "Worker 异常退出");
                    }
                }
                info!("所有 Worker 已退出，关闭完成");
                ShutdownReport::Graceful
            }
            Err(_) => {
                let mut aborted = 0;
                for handle in handles.iter().filter(|h| !h.is_finished()) {
                    handle.abort();
                    aborted += 1;
                }
                warn!(
                    aborted,
                    timeout_secs = self.shutdown_timeout.as_secs_f64(),
                    "等待 Worker 超时，已强制终止，在途记录的结果可能丢失"
                );
                ShutdownReport::TimedOut { aborted }
            }
        };

        self.state
            .store(LifecycleState::Stopped as u8, Ordering::SeqCst);
        report
    }
}

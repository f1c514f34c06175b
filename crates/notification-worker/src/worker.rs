//! 分发 Worker
//!
//! 每个 Worker 绑定一个类别队列，循环执行：取出记录 -> 模拟外部服务耗时 ->
//! 按失败概率判定结果 -> 投递回调。
//!
//! 收到停止信号后 Worker 关闭自己的队列，继续把已排队的记录处理完再退出；
//! 正在处理的记录总会完成（包括回调尝试），除非协调器在超时后强制中止。

use std::sync::Arc;
use std::time::{Duration, Instant};

use notify_shared::events::{
    Category, DeliveryOutcome, NotificationRecord, SIMULATED_FAILURE_MESSAGE,
};
use notify_shared::observability::metrics;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::callback::CallbackDispatcher;
use crate::queue::QueueConsumer;

/// 分发 Worker
pub struct DispatchWorker {
    category: Category,
    index: usize,
    delay: Duration,
    failure_probability: f64,
    queue: QueueConsumer,
    dispatcher: Arc<CallbackDispatcher>,
    rng: StdRng,
}

impl DispatchWorker {
    pub fn new(
        queue: QueueConsumer,
        dispatcher: Arc<CallbackDispatcher>,
        delay: Duration,
        failure_probability: f64,
    ) -> Self {
        Self {
            category: queue.category(),
            index: 0,
            delay,
            failure_probability: failure_probability.clamp(0.0, 1.0),
            queue,
            dispatcher,
            rng: StdRng::from_os_rng(),
        }
    }

    /// 同类别有多个 Worker 时用于区分日志
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// 使用固定种子，使失败序列可复现
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// 运行处理循环，直到停止信号到达且队列排空
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!(
            category = %self.category,
            worker = self.index,
            delay_ms = self.delay.as_millis() as u64,
            "分发 Worker 已启动"
        );

        let mut draining = *shutdown.borrow();
        if draining {
            self.queue.close().await;
        }

        loop {
            let next = tokio::select! {
                biased;

                changed = shutdown.changed(), if !draining => {
                    // 发送端被丢弃同样视为停止
                    if changed.is_err() || *shutdown.borrow() {
                        draining = true;
                        self.queue.close().await;
                        info!(
                            category = %self.category,
                            worker = self.index,
                            "收到停止信号，排空剩余记录"
                        );
                    }
                    continue;
                }

                record = self.queue.dequeue() => record,
            };

            match next {
                Some(record) => self.process(record).await,
                None => break,
            }
        }

        info!(category = %self.category, worker = self.index, "分发 Worker 已退出");
    }

    /// 处理单条记录
    async fn process(&mut self, record: NotificationRecord) {
        let started = Instant::now();
        debug!(
            event_id = %record.id(),
            category = %self.category,
            destination = %record.payload().destination(),
            "开始处理通知"
        );

        tokio::time::sleep(self.delay).await;

        let outcome = if self.rng.random_bool(self.failure_probability) {
            DeliveryOutcome::failed(&record, SIMULATED_FAILURE_MESSAGE)
        } else {
            DeliveryOutcome::completed(&record)
        };

        metrics::record_processed(
            self.category,
            outcome.status(),
            started.elapsed().as_secs_f64(),
        );
        info!(
            event_id = %record.id(),
            category = %self.category,
            status = %outcome.status(),
            "通知处理完成"
        );

        self.dispatcher
            .deliver(record.callback_address(), &outcome)
            .await;
    }
}

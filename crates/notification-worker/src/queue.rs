//! 按类别划分的通知队列
//!
//! 每个类别一条独立的无界 FIFO 队列。生产端（受理闸门）只持有发送端，
//! 消费端（分发 Worker）持有接收端；队列本身是两者之间唯一的共享可变结构。
//!
//! 队列无界，不做背压：持续过载时内存随积压增长。

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use notify_shared::error::{NotifyError, Result};
use notify_shared::events::{Category, NotificationRecord};
use notify_shared::observability::metrics;
use tokio::sync::{Mutex, mpsc};

/// 单个类别队列的生产端
#[derive(Clone)]
struct QueueSender {
    tx: mpsc::UnboundedSender<NotificationRecord>,
    depth: Arc<AtomicUsize>,
}

/// 三个类别队列的生产端集合
///
/// 可廉价克隆，克隆体共享同一组底层队列。
#[derive(Clone)]
pub struct CategoryQueueSet {
    email: QueueSender,
    sms: QueueSender,
    push: QueueSender,
}

impl CategoryQueueSet {
    /// 创建队列集合，返回生产端与三个类别的消费端
    pub fn new() -> (Self, QueueConsumers) {
        let (email, email_consumer) = channel(Category::Email);
        let (sms, sms_consumer) = channel(Category::Sms);
        let (push, push_consumer) = channel(Category::Push);

        (
            Self { email, sms, push },
            QueueConsumers {
                email: email_consumer,
                sms: sms_consumer,
                push: push_consumer,
            },
        )
    }

    fn sender(&self, category: Category) -> &QueueSender {
        match category {
            Category::Email => &self.email,
            Category::Sms => &self.sms,
            Category::Push => &self.push,
        }
    }

    /// 将记录放入其类别对应的队列，不阻塞
    ///
    /// 只有在消费端已关闭队列（进入排空阶段）后才会失败。
    pub fn enqueue(&self, record: NotificationRecord) -> Result<()> {
        let category = record.category();
        let sender = self.sender(category);

        // 先计数再发送，保证消费端看到记录时计数已包含它
        let depth = sender.depth.fetch_add(1, Ordering::SeqCst) + 1;
        if sender.tx.send(record).is_err() {
            sender.depth.fetch_sub(1, Ordering::SeqCst);
            return Err(NotifyError::QueueClosed { category });
        }
        metrics::set_queue_depth(category, depth as f64);
        Ok(())
    }

    /// 指定类别当前排队中的记录数
    pub fn depth(&self, category: Category) -> usize {
        self.sender(category).depth.load(Ordering::SeqCst)
    }

    /// 指定类别的队列是否已被消费端关闭
    pub fn is_closed(&self, category: Category) -> bool {
        self.sender(category).tx.is_closed()
    }
}

fn channel(category: Category) -> (QueueSender, QueueConsumer) {
    let (tx, rx) = mpsc::unbounded_channel();
    let depth = Arc::new(AtomicUsize::new(0));
    (
        QueueSender {
            tx,
            depth: depth.clone(),
        },
        QueueConsumer {
            category,
            rx: Arc::new(Mutex::new(rx)),
            depth,
        },
    )
}

/// 三个类别的消费端
pub struct QueueConsumers {
    pub email: QueueConsumer,
    pub sms: QueueConsumer,
    pub push: QueueConsumer,
}

impl QueueConsumers {
    /// 指定类别的消费端（克隆体共享同一接收端）
    pub fn consumer(&self, category: Category) -> QueueConsumer {
        match category {
            Category::Email => self.email.clone(),
            Category::Sms => self.sms.clone(),
            Category::Push => self.push.clone(),
        }
    }
}

/// 单个类别队列的消费端
///
/// 同一类别的多个 Worker 共享同一个接收端，由互斥锁保证每条记录只被取走一次。
#[derive(Clone)]
pub struct QueueConsumer {
    category: Category,
    rx: Arc<Mutex<mpsc::UnboundedReceiver<NotificationRecord>>>,
    depth: Arc<AtomicUsize>,
}

impl QueueConsumer {
    pub fn category(&self) -> Category {
        self.category
    }

    /// 取出下一条记录
    ///
    /// 队列为空时挂起等待；队列已关闭且排空后返回 `None`。
    pub async fn dequeue(&self) -> Option<NotificationRecord> {
        let record = self.rx.lock().await.recv().await?;
        let depth = self.depth.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
        metrics::set_queue_depth(self.category, depth as f64);
        Some(record)
    }

    /// 关闭队列：此后入队失败，已排队的记录仍可继续取出
    pub async fn close(&self) {
        self.rx.lock().await.close();
    }
}

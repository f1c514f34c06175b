//! 通知分发管道
//!
//! 按类别（EMAIL / SMS / PUSH）划分的内存队列，每个类别由独立的 Worker 消费：
//! 模拟外部服务延迟、按概率生成处理结果，并把结果尽力回调到提交方给出的地址。
//! 生命周期协调器负责停止受理、排空在途记录以及有界等待后的强制终止。

pub mod callback;
pub mod error;
pub mod intake;
pub mod lifecycle;
pub mod pipeline;
pub mod queue;
pub mod testing;
pub mod worker;

pub use callback::{CallbackDispatcher, CallbackResponse, CallbackTransport, HttpCallbackTransport};
pub use error::DispatchError;
pub use intake::{AdmissionSwitch, IntakeGate};
pub use lifecycle::{LifecycleCoordinator, LifecycleState, ShutdownReport};
pub use pipeline::NotificationPipeline;
pub use queue::CategoryQueueSet;
pub use worker::DispatchWorker;

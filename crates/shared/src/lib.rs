//! 共享库
//!
//! 包含通知管道各组件共用的数据模型、配置、错误处理与可观测性基础设施代码。

pub mod config;
pub mod error;
pub mod events;
pub mod observability;
pub mod test_utils;

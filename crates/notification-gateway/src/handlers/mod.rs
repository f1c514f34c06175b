//! HTTP 请求处理器模块

pub mod callback;
pub mod events;
pub mod health;

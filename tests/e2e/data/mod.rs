//! 测试数据模块
//!
//! 提供各类别合法与非法的提交请求。

mod fixtures;

pub use fixtures::*;

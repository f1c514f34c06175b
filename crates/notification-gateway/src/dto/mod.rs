//! 入口层 DTO 模块
//!
//! 包含请求和响应的数据传输对象

pub mod request;
pub mod response;

pub use request::{
    EmailPayloadDto, EventPayloadDto, PushPayloadDto, SmsPayloadDto, SubmitEventRequest,
};
pub use response::{CALLBACK_RECEIVED_MESSAGE, ErrorResponse, HealthResponse, ReadinessResponse};

//! 请求 DTO 定义
//!
//! 字段均为 `Option`，缺失或空白统一报告 "Missing required fields"，
//! 格式错误（邮箱、手机号、设备 ID、回调地址）报告具体字段。

use std::sync::LazyLock;

use notify_shared::events::{
    Category, EmailPayload, NotificationRequest, Payload, PushPayload, SmsPayload,
};
use regex::Regex;
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use crate::error::{GatewayError, Result};

static PHONE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("手机号正则无效"));

static DEVICE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\-]{5,50}$").expect("设备 ID 正则无效"));

/// 提交通知请求
///
/// ```json
/// {"eventType": "EMAIL", "payload": {"type": "EMAIL", "recipient": "...", "message": "..."}, "callbackUrl": "..."}
/// ```
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitEventRequest {
    pub event_type: Option<String>,
    pub payload: Option<EventPayloadDto>,
    #[validate(url(message = "Invalid callback URL"))]
    pub callback_url: Option<String>,
}

impl SubmitEventRequest {
    /// 校验并转换为管道请求
    pub fn into_notification(self) -> Result<NotificationRequest> {
        self.validate()?;

        let (Some(event_type), Some(payload), Some(callback_url)) =
            (self.event_type, self.payload, self.callback_url)
        else {
            return Err(GatewayError::MissingFields);
        };

        let category: Category = event_type.parse()?;
        let payload = payload.into_payload()?;
        if payload.category() != category {
            return Err(GatewayError::PayloadMismatch {
                event_type: category.to_string(),
                payload_type: payload.category().to_string(),
            });
        }

        Ok(NotificationRequest::new(payload, callback_url))
    }
}

/// 按 `type` 字段区分的载荷
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum EventPayloadDto {
    Email(EmailPayloadDto),
    Sms(SmsPayloadDto),
    Push(PushPayloadDto),
}

impl EventPayloadDto {
    /// 检查必填字段与格式，转换为领域载荷
    pub fn into_payload(self) -> Result<Payload> {
        self.validate()?;

        let payload = match self {
            Self::Email(p) => Payload::Email(EmailPayload {
                recipient: required(p.recipient)?,
                message: required(p.message)?,
            }),
            Self::Sms(p) => Payload::Sms(SmsPayload {
                phone_number: required(p.phone_number)?,
                message: required(p.message)?,
            }),
            Self::Push(p) => Payload::Push(PushPayload {
                device_id: required(p.device_id)?,
                message: required(p.message)?,
            }),
        };
        Ok(payload)
    }
}

impl Validate for EventPayloadDto {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        match self {
            Self::Email(p) => p.validate(),
            Self::Sms(p) => p.validate(),
            Self::Push(p) => p.validate(),
        }
    }
}

/// 邮件载荷
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmailPayloadDto {
    #[validate(email(message = "Invalid email format"))]
    pub recipient: Option<String>,
    pub message: Option<String>,
}

/// 短信载荷
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SmsPayloadDto {
    #[validate(regex(
        path = *PHONE_NUMBER_RE,
        message = "Phone number must be valid and contain 10 to 15 digits (with optional +)"
    ))]
    pub phone_number: Option<String>,
    pub message: Option<String>,
}

/// 推送载荷
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PushPayloadDto {
    #[validate(regex(
        path = *DEVICE_ID_RE,
        message = "Device ID must be alphanumeric (with hyphens allowed), 5 to 50 characters long"
    ))]
    pub device_id: Option<String>,
    pub message: Option<String>,
}

fn required(value: Option<String>) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(GatewayError::MissingFields)
}

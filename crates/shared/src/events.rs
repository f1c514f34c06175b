//! 通知数据模型
//!
//! 定义通知管道中流转的全部值类型：通知类别、按类别区分的载荷、
//! 已受理的通知记录、投递结果，以及回调与受理回执的线上报文格式。
//!
//! 载荷采用标签枚举表达，类别由载荷推导而来，因此一条记录不可能
//! 同时携带多个类别的字段，也不可能被路由到错误的队列。

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::NotifyError;

/// 模拟投递失败时写入回调报文的固定诊断信息
pub const SIMULATED_FAILURE_MESSAGE: &str = "Simulated processing failure";

/// 受理成功时返回给提交方的固定提示
pub const ACCEPTED_MESSAGE: &str = "Event accepted for processing.";

// ---------------------------------------------------------------------------
// Category: 通知类别
// ---------------------------------------------------------------------------

/// 通知类别
///
/// 决定记录进入哪个队列、由哪组 Worker 消费，以及使用哪一个模拟延迟。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Email,
    Sms,
    Push,
}

impl Category {
    /// 全部类别，顺序固定，用于按类别批量创建队列与 Worker
    pub const ALL: [Category; 3] = [Category::Email, Category::Sms, Category::Push];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "EMAIL",
            Self::Sms => "SMS",
            Self::Push => "PUSH",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = NotifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EMAIL" => Ok(Self::Email),
            "SMS" => Ok(Self::Sms),
            "PUSH" => Ok(Self::Push),
            _ => Err(NotifyError::InvalidCategory(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Payload: 按类别区分的载荷
// ---------------------------------------------------------------------------

/// 邮件载荷
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailPayload {
    pub recipient: String,
    pub message: String,
}

/// 短信载荷
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsPayload {
    pub phone_number: String,
    pub message: String,
}

/// 推送载荷
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushPayload {
    pub device_id: String,
    pub message: String,
}

/// 通知载荷
///
/// 线上格式通过 `type` 字段区分类别，例如
/// `{"type":"SMS","phoneNumber":"+8613800000000","message":"hi"}`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum Payload {
    Email(EmailPayload),
    Sms(SmsPayload),
    Push(PushPayload),
}

impl Payload {
    pub fn category(&self) -> Category {
        match self {
            Self::Email(_) => Category::Email,
            Self::Sms(_) => Category::Sms,
            Self::Push(_) => Category::Push,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Email(p) => &p.message,
            Self::Sms(p) => &p.message,
            Self::Push(p) => &p.message,
        }
    }

    /// 载荷的投递目标（邮箱、手机号或设备 ID），仅用于日志
    pub fn destination(&self) -> &str {
        match self {
            Self::Email(p) => &p.recipient,
            Self::Sms(p) => &p.phone_number,
            Self::Push(p) => &p.device_id,
        }
    }
}

// ---------------------------------------------------------------------------
// NotificationRequest / NotificationRecord
// ---------------------------------------------------------------------------

/// 待受理的通知请求
///
/// 由入口层完成字段校验后构造。请求本身不携带 ID，ID 只能由受理闸门分配。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub payload: Payload,
    pub callback_address: String,
}

impl NotificationRequest {
    pub fn new(payload: Payload, callback_address: impl Into<String>) -> Self {
        Self {
            payload,
            callback_address: callback_address.into(),
        }
    }

    pub fn email(
        recipient: impl Into<String>,
        message: impl Into<String>,
        callback_address: impl Into<String>,
    ) -> Self {
        Self::new(
            Payload::Email(EmailPayload {
                recipient: recipient.into(),
                message: message.into(),
            }),
            callback_address,
        )
    }

    pub fn sms(
        phone_number: impl Into<String>,
        message: impl Into<String>,
        callback_address: impl Into<String>,
    ) -> Self {
        Self::new(
            Payload::Sms(SmsPayload {
                phone_number: phone_number.into(),
                message: message.into(),
            }),
            callback_address,
        )
    }

    pub fn push(
        device_id: impl Into<String>,
        message: impl Into<String>,
        callback_address: impl Into<String>,
    ) -> Self {
        Self::new(
            Payload::Push(PushPayload {
                device_id: device_id.into(),
                message: message.into(),
            }),
            callback_address,
        )
    }

    pub fn category(&self) -> Category {
        self.payload.category()
    }
}

/// 已受理的通知记录
///
/// 入队后不可变：字段私有，只暴露只读访问器。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRecord {
    id: String,
    payload: Payload,
    callback_address: String,
}

impl NotificationRecord {
    /// 以受理时分配的 ID 构造记录
    pub fn accept(id: impl Into<String>, request: NotificationRequest) -> Self {
        Self {
            id: id.into(),
            payload: request.payload,
            callback_address: request.callback_address,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn category(&self) -> Category {
        self.payload.category()
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn callback_address(&self) -> &str {
        &self.callback_address
    }
}

// ---------------------------------------------------------------------------
// DeliveryOutcome: 投递结果
// ---------------------------------------------------------------------------

/// 投递状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeliveryStatus {
    Completed,
    Failed,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单条记录处理完成后的投递结果
///
/// `error_detail` 当且仅当状态为 FAILED 时存在，由构造函数保证。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    record_id: String,
    status: DeliveryStatus,
    category: Category,
    error_detail: Option<String>,
    processed_at: DateTime<Utc>,
}

impl DeliveryOutcome {
    pub fn completed(record: &NotificationRecord) -> Self {
        Self {
            record_id: record.id().to_string(),
            status: DeliveryStatus::Completed,
            category: record.category(),
            error_detail: None,
            processed_at: Utc::now(),
        }
    }

    pub fn failed(record: &NotificationRecord, error_detail: impl Into<String>) -> Self {
        Self {
            record_id: record.id().to_string(),
            status: DeliveryStatus::Failed,
            category: record.category(),
            error_detail: Some(error_detail.into()),
            processed_at: Utc::now(),
        }
    }

    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    pub fn status(&self) -> DeliveryStatus {
        self.status
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn error_detail(&self) -> Option<&str> {
        self.error_detail.as_deref()
    }

    pub fn processed_at(&self) -> DateTime<Utc> {
        self.processed_at
    }

    /// 转换为回调报文
    pub fn to_callback_payload(&self) -> CallbackPayload {
        CallbackPayload {
            event_id: self.record_id.clone(),
            status: self.status,
            event_type: self.category,
            error_message: self.error_detail.clone(),
            processed_at: self
                .processed_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

// ---------------------------------------------------------------------------
// 线上报文
// ---------------------------------------------------------------------------

/// 回调报文
///
/// 以 `Content-Type: application/json` POST 到记录的回调地址，字段名需保持兼容：
/// `eventId`、`status`、`eventType`、`errorMessage`（可缺省）、`processedAt`（ISO-8601）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackPayload {
    pub event_id: String,
    pub status: DeliveryStatus,
    pub event_type: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub processed_at: String,
}

impl TryFrom<CallbackPayload> for DeliveryOutcome {
    type Error = NotifyError;

    fn try_from(payload: CallbackPayload) -> Result<Self, Self::Error> {
        let processed_at = DateTime::parse_from_rfc3339(&payload.processed_at)
            .map_err(|e| NotifyError::MalformedPayload(format!("processedAt: {e}")))?
            .with_timezone(&Utc);

        match (payload.status, &payload.error_message) {
            (DeliveryStatus::Failed, None) => {
                return Err(NotifyError::MalformedPayload(
                    "FAILED 状态缺少 errorMessage".to_string(),
                ));
            }
            (DeliveryStatus::Completed, Some(_)) => {
                return Err(NotifyError::MalformedPayload(
                    "COMPLETED 状态不应携带 errorMessage".to_string(),
                ));
            }
            _ => {}
        }

        Ok(Self {
            record_id: payload.event_id,
            status: payload.status,
            category: payload.event_type,
            error_detail: payload.error_message,
            processed_at,
        })
    }
}

/// 受理回执
///
/// 同步返回给提交方，只表示已入队，与最终投递结果无关。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionAck {
    pub event_id: String,
    pub message: String,
}

impl SubmissionAck {
    pub fn accepted(event_id: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            message: ACCEPTED_MESSAGE.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// 测试
// ---------------------------------------------------------------------------

//! 测试数据 Fixtures
//!
//! 以 JSON 形式构造提交请求，与外部客户端看到的线上格式一致。

use serde_json::{Value, json};

/// 提交请求构造器
pub struct EventRequests;

impl EventRequests {
    pub fn email(recipient: &str, message: &str, callback_url: &str) -> Value {
        json!({
            "eventType": "EMAIL",
            "payload": {"type": "EMAIL", "recipient": recipient, "message": message},
            "callbackUrl": callback_url
        })
    }

    pub fn sms(phone_number: &str, callback_url: &str) -> Value {
        json!({
            "eventType": "SMS",
            "payload": {"type": "SMS", "phoneNumber": phone_number, "message": "验证码 123456"},
            "callbackUrl": callback_url
        })
    }

    pub fn push(device_id: &str, callback_url: &str) -> Value {
        json!({
            "eventType": "PUSH",
            "payload": {"type": "PUSH", "deviceId": device_id, "message": "你有一条新消息"},
            "callbackUrl": callback_url
        })
    }

    /// 三个类别轮流生成
    pub fn mixed(index: usize, callback_url: &str) -> Value {
        match index % 3 {
            0 => Self::email("a@example.com", &format!("m{index}"), callback_url),
            1 => Self::sms("+8613800000000", callback_url),
            _ => Self::push("device-12345", callback_url),
        }
    }

    pub fn missing_payload(callback_url: &str) -> Value {
        json!({"eventType": "EMAIL", "callbackUrl": callback_url})
    }

    pub fn unknown_type(callback_url: &str) -> Value {
        json!({
            "eventType": "FAX",
            "payload": {"type": "EMAIL", "recipient": "a@example.com", "message": "hi"},
            "callbackUrl": callback_url
        })
    }
}

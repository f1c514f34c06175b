//! 配置管理模块
//!
//! 支持多格式配置文件加载，环境变量覆盖，以及类型安全的配置访问。

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::{NotifyError, Result};
use crate::events::Category;
use crate::observability::ObservabilityConfig;

/// 服务配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// 分发管道配置
///
/// 各类别的模拟延迟代表外部服务商的响应耗时，失败概率对所有类别共享。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub email_delay_ms: u64,
    pub sms_delay_ms: u64,
    pub push_delay_ms: u64,
    /// 模拟投递失败的概率，取值 [0, 1]
    pub failure_probability: f64,
    /// 每个类别的消费者数量；为 1 时保证同类别严格 FIFO
    pub workers_per_category: usize,
    /// 关闭时等待 Worker 自然退出的上限
    pub shutdown_timeout_secs: u64,
    /// 固定随机种子，仅用于可复现的测试；为空时每个 Worker 独立从系统熵源取种
    pub rng_seed: Option<u64>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            email_delay_ms: 5000,
            sms_delay_ms: 3000,
            push_delay_ms: 2000,
            failure_probability: 0.1,
            workers_per_category: 1,
            shutdown_timeout_secs: 10,
            rng_seed: None,
        }
    }
}

impl DispatchConfig {
    /// 所有类别使用同一延迟，便于测试
    pub fn uniform(delay: Duration, failure_probability: f64) -> Self {
        let delay_ms = delay.as_millis() as u64;
        Self {
            email_delay_ms: delay_ms,
            sms_delay_ms: delay_ms,
            push_delay_ms: delay_ms,
            failure_probability,
            ..Default::default()
        }
    }

    /// 指定类别的模拟处理延迟
    pub fn delay_for(&self, category: Category) -> Duration {
        let ms = match category {
            Category::Email => self.email_delay_ms,
            Category::Sms => self.sms_delay_ms,
            Category::Push => self.push_delay_ms,
        };
        Duration::from_millis(ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.failure_probability) {
            return Err(NotifyError::InvalidConfig(format!(
                "failure_probability 必须在 [0, 1] 之间，实际为 {}",
                self.failure_probability
            )));
        }
        if self.workers_per_category == 0 {
            return Err(NotifyError::InvalidConfig(
                "workers_per_category 至少为 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// 回调投递配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CallbackConfig {
    /// 单次回调请求的超时，超时即放弃，不重试
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for CallbackConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            user_agent: format!("notification-worker/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl CallbackConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub service_name: String,
    pub environment: String,
    pub server: ServerConfig,
    pub dispatch: DispatchConfig,
    pub callback: CallbackConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. config/default.toml（默认配置）
    /// 2. config/{environment}.toml（环境特定配置）
    /// 3. config/{service_name}.toml（服务特定配置）
    /// 4. 环境变量（NOTIFY__ 前缀，如 NOTIFY__DISPATCH__EMAIL_DELAY_MS -> dispatch.email_delay_ms）
    /// 5. 服务特定端口环境变量（如 NOTIFICATION_GATEWAY_PORT）
    pub fn load(service_name: &str) -> std::result::Result<Self, ConfigError> {
        let env = std::env::var("NOTIFY_ENV").unwrap_or_else(|_| "development".to_string());

        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        let builder = Config::builder()
            // 默认配置
            .set_default("service_name", service_name)?
            .set_default("environment", env.clone())?
            // 加载默认配置文件
            .add_source(File::from(Path::new(&config_dir).join("default.toml")).required(false))
            // 加载环境特定配置
            .add_source(
                File::from(Path::new(&config_dir).join(format!("{}.toml", env))).required(false),
            )
            // 加载服务特定配置（如 notification-gateway.toml）
            .add_source(
                File::from(Path::new(&config_dir).join(format!("{}.toml", service_name)))
                    .required(false),
            )
            // 字段名本身含下划线，嵌套层级用双下划线分隔
            .add_source(
                Environment::with_prefix("NOTIFY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        if config.observability.service_name.is_empty() {
            config.observability.service_name = config.service_name.clone();
        }

        // 服务特定端口环境变量覆盖：notification-gateway -> NOTIFICATION_GATEWAY_PORT
        if let Some(port) = Self::get_service_port_from_env(service_name) {
            config.server.port = port;
        }

        Ok(config)
    }

    /// 将 "my-service-name" 转换为 "MY_SERVICE_NAME_PORT" 后读取
    fn get_service_port_from_env(service_name: &str) -> Option<u16> {
        std::env::var(Self::service_port_env_var(service_name))
            .ok()
            .and_then(|v| v.parse().ok())
    }

    fn service_port_env_var(service_name: &str) -> String {
        format!("{}_PORT", service_name.to_uppercase().replace('-', "_"))
    }

    /// 获取服务地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

use std::path::PathBuf;
use std::time::Duration;

use crate::dispatch::DeliveryPolicy;

/// 引擎配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录（数据库、日志） |
/// | DB_FILE | duty.redb | 数据库文件名 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_TO_FILE | false | 是否写入滚动日志文件 |
/// | DELIVERY_TIMEOUT_MS | 5000 | 单次投递超时(毫秒) |
/// | DELIVERY_MAX_ATTEMPTS | 2 | 每个收件人/渠道的尝试次数 |
/// | BOOTSTRAP_ADMIN_EMAIL | - | 管理员列表为空时创建的超级管理员 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/srv/duty LOG_TO_FILE=true duty-engine remind
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库和日志
    pub work_dir: String,
    /// 数据库文件名（位于 work_dir 内）
    pub db_file: String,
    /// 运行环境: development | production
    pub environment: String,
    /// 默认日志级别（RUST_LOG 优先）
    pub log_level: String,
    /// 是否输出到 work_dir/logs
    pub log_to_file: bool,
    /// 单次投递超时 (毫秒)
    pub delivery_timeout_ms: u64,
    /// 每个收件人/渠道最多尝试次数
    pub delivery_max_attempts: u32,
    /// 初始超级管理员邮箱
    pub bootstrap_admin_email: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            db_file: std::env::var("DB_FILE").unwrap_or_else(|_| "duty.redb".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_to_file: std::env::var("LOG_TO_FILE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            delivery_timeout_ms: std::env::var("DELIVERY_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            delivery_max_attempts: std::env::var("DELIVERY_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
            bootstrap_admin_email: std::env::var("BOOTSTRAP_ADMIN_EMAIL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        }
    }

    /// 使用自定义工作目录覆盖配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 数据库完整路径
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join(&self.db_file)
    }

    /// 日志目录
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 投递策略（超时 + 重试）
    pub fn delivery_policy(&self) -> DeliveryPolicy {
        DeliveryPolicy {
            timeout: Duration::from_millis(self.delivery_timeout_ms),
            max_attempts: self.delivery_max_attempts.max(1),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_live_under_work_dir() {
        let config = Config::with_overrides("/tmp/duty-test");
        assert_eq!(
            config.db_path(),
            PathBuf::from("/tmp/duty-test").join(&config.db_file)
        );
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/duty-test/logs"));
    }

    #[test]
    fn test_delivery_policy_has_at_least_one_attempt() {
        let mut config = Config::with_overrides("/tmp/duty-test");
        config.delivery_max_attempts = 0;
        config.delivery_timeout_ms = 250;
        let policy = config.delivery_policy();
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.timeout, Duration::from_millis(250));
    }
}

//! Duty Engine - 住户值班轮换与通知日志引擎
//!
//! # 架构概述
//!
//! - **住户** (`residents`): 有序住户列表，顺序即轮换顺序
//! - **轮值** (`rotation`): 当前值班指针（跳过 / 指定 / 删除后校验）
//! - **日志** (`ledger`): 追加式操作日志，每个变更动作一条
//! - **模板** (`template`): `{first_name}` 等占位符替换
//! - **通知** (`dispatch`): 提醒 / 公告的并发投递与投递报告
//! - **报修** (`issues`): 三态前进式工作流
//! - **授权** (`auth`): 角色 → 动作类别
//!
//! 所有变更经由 [`DutyManager`] 在同一把锁下完成，并整体持久化到 redb。
//!
//! # 模块结构
//!
//! ```text
//! duty-engine/src/
//! ├── core/          # 配置
//! ├── auth/          # 角色、权限、操作人
//! ├── manager/       # DutyManager、错误类型
//! ├── dispatch/      # 投递渠道、扇出
//! ├── utils/         # 日志、校验
//! ├── storage.rs     # redb 文档存储
//! └── state.rs       # 持久化文档
//! ```

pub mod admins;
pub mod auth;
pub mod core;
pub mod dispatch;
pub mod issues;
pub mod ledger;
pub mod manager;
pub mod residents;
pub mod rotation;
pub mod settings;
pub mod state;
pub mod storage;
pub mod template;
pub mod utils;

// Re-export 公共类型
pub use auth::{ActionClass, Actor, Role};
pub use core::Config;
pub use dispatch::{DeliveryChannel, DeliveryPolicy, Dispatcher};
pub use manager::{DutyManager, EngineError, EngineResult, EntityKind};
pub use state::DutyDocument;
pub use storage::{DocumentStore, RedbStore, StorageError};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger_with_file};

/// 设置运行环境：加载 .env、创建工作目录、初始化日志
pub fn setup_environment() -> anyhow::Result<Config> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;

    let log_dir = config.log_dir();
    init_logger_with_file(
        &config.log_level,
        config.is_production(),
        config.log_to_file.then_some(log_dir.as_path()),
    )?;

    Ok(config)
}

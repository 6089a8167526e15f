// ==========================================
// 专机制造排产系统 - 配置层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置库访问失败: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("配置库锁获取失败: {0}")]
    Lock(String),

    #[error("配置序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("排产配置不存在: {0}")]
    ProfileNotFound(String),

    #[error("配置值非法 (key={key}): {message}")]
    InvalidValue { key: String, message: String },
}

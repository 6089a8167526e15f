// ==========================================
// 专机制造排产系统 - API层错误类型
// ==========================================
// 职责: 汇总各层错误,转换为用户可读的错误消息
// 约定: 每个错误都带显式原因
// ==========================================

use crate::config::error::ConfigError;
use crate::engine::error::PlanningError;
use crate::importer::error::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 排产运行错误
    // ==========================================
    #[error("排产运行超时: 已用{elapsed_ms}ms, 上限{budget_ms}ms")]
    PlanningTimeout { elapsed_ms: u64, budget_ms: u64 },

    #[error("排产配置无效: {0}")]
    InvalidConfiguration(String),

    #[error("资源目录无效: {0}")]
    InvalidCatalog(String),

    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    // ==========================================
    // 配置存取错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 PlanningError 转换
// ==========================================
impl From<PlanningError> for ApiError {
    fn from(err: PlanningError) -> Self {
        match err {
            PlanningError::PlanningTimeout {
                elapsed_ms,
                budget_ms,
            } => ApiError::PlanningTimeout {
                elapsed_ms,
                budget_ms,
            },
            PlanningError::InvalidConfiguration(msg) => ApiError::InvalidConfiguration(msg),
            PlanningError::InvalidCatalog(msg) => ApiError::InvalidCatalog(msg),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(path) => ApiError::NotFound(format!("文件{}不存在", path)),
            ImportError::ValidationFailed { .. } => ApiError::ValidationError(err.to_string()),
            ImportError::MissingColumn(_) | ImportError::TypeConversionError { .. } => {
                ApiError::InvalidInput(err.to_string())
            }
            ImportError::InternalError(msg) => ApiError::InternalError(msg),
            ImportError::Other(e) => ApiError::Other(e),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

// ==========================================
// 从 ConfigError 转换
// ==========================================
impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ProfileNotFound(name) => {
                ApiError::NotFound(format!("排产配置{}不存在", name))
            }
            ConfigError::InvalidValue { .. } => ApiError::InvalidConfiguration(err.to_string()),
            ConfigError::Database(e) => ApiError::DatabaseError(e.to_string()),
            ConfigError::Lock(msg) => ApiError::DatabaseError(format!("数据库锁获取失败: {}", msg)),
            ConfigError::Serialization(e) => ApiError::InternalError(e.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planning_error_conversion() {
        let err: ApiError = PlanningError::PlanningTimeout {
            elapsed_ms: 12,
            budget_ms: 10,
        }
        .into();
        assert!(matches!(
            err,
            ApiError::PlanningTimeout {
                elapsed_ms: 12,
                budget_ms: 10
            }
        ));
    }

    #[test]
    fn test_import_error_conversion() {
        let err: ApiError = ImportError::ValidationFailed {
            errors: 2,
            first: "资源编号重复".to_string(),
        }
        .into();
        match err {
            ApiError::ValidationError(msg) => assert!(msg.contains("资源编号重复")),
            other => panic!("unexpected: {:?}", other),
        }

        let err: ApiError = ImportError::JsonParseError("eof".to_string()).into();
        assert!(matches!(err, ApiError::ImportError(_)));
    }

    #[test]
    fn test_config_error_conversion() {
        let err: ApiError = ConfigError::ProfileNotFound("night_shift".to_string()).into();
        match err {
            ApiError::NotFound(msg) => assert!(msg.contains("night_shift")),
            other => panic!("unexpected: {:?}", other),
        }
    }
}

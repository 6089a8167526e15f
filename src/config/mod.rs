// ==========================================
// 专机制造排产系统 - 配置层
// ==========================================
// 职责: 排产配置定义、预设方案、配置存取
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod config_reader_trait;
pub mod error;
pub mod planning_config;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager};
pub use config_reader_trait::PlanningConfigReader;
pub use error::ConfigError;
pub use planning_config::{
    PlanningConfiguration, PlanningPreset, PriorityWeightFormula, ProcurementStrategy,
    MAX_HORIZON_DAYS, MAX_LEAD_TIME_DAYS, MAX_SETUP_BUFFER_MINUTES,
};

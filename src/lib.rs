// ==========================================
// 专机制造排产系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite（配置存储）
// 系统定位: 产能与物料计划引擎（贪心启发式,可解释,非全局最优）
// 输入: 外部系统导出的只读快照
// 输出: 工序排程、超载记录、不可路由清单、采购建议、场景对比
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 排产规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 排产配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ManufacturingProcess, OrderStatus, OverloadBucket};

// 领域实体
pub use domain::{
    MachineResource, ManufacturingOrder, MaterialItem, Operation, PlanningSnapshot,
    ProcurementSuggestion, ScheduleAssignment, ShiftCalendar, UnroutableOperation,
};

// 引擎
pub use engine::{
    CalendarEngine, MaterialPlanner, PlanningError, PlanningOrchestrator, PlanningResult,
    ScenarioSimulator, Scheduler,
};

// 配置
pub use config::{ConfigManager, PlanningConfiguration, PlanningPreset};

// API
pub use api::{ApiError, ApiResult, PlanningApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "专机制造排产系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}

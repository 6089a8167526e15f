// ==========================================
// 专机制造排产系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令行及外部系统调用
// ==========================================

pub mod error;
pub mod planning_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use planning_api::PlanningApi;

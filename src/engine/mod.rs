// ==========================================
// 专机制造排产系统 - 引擎层
// ==========================================
// 职责: 日历换算、排产、超载识别、物料计划、多场景模拟
// 红线:
// - 引擎无状态,运行内状态归单次调用所有
// - 引擎不做持久化,不访问外部系统
// - 不可路由/采购延误作为结果上报,不作为错误
// ==========================================

pub mod calendar;
pub mod deadline;
pub mod error;
pub mod material_planner;
pub mod orchestrator;
pub mod overload;
pub mod priority;
pub mod report;
pub mod resource_catalog;
pub mod scheduler;
pub mod simulator;
pub mod supplier_ranking;
pub mod tracking;

// 重导出核心引擎
pub use calendar::{CalendarEngine, WorkSpan};
pub use deadline::Deadline;
pub use error::{CalendarError, PlanningError};
pub use material_planner::{MaterialPlan, MaterialPlanner};
pub use orchestrator::{PlanMetrics, PlanningOrchestrator, PlanningResult};
pub use overload::OverloadDetector;
pub use priority::{BacklogSorter, RankedOrder};
pub use resource_catalog::ResourceCatalog;
pub use scheduler::{ScheduleOutcome, Scheduler};
pub use simulator::{
    compare_to_baseline, ScenarioDelta, ScenarioOutcome, ScenarioReport, ScenarioSimulator,
};
pub use supplier_ranking::{RankedSupplier, SupplierRanker};
pub use tracking::{OrderTracking, TrackingEngine, TrackingReport};

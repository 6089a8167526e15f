// ==========================================
// 专机制造排产系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、结构性校验
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod calendar;
pub mod material;
pub mod order;
pub mod plan;
pub mod resource;
pub mod snapshot;
pub mod types;

// 重导出核心类型
pub use calendar::{CalendarException, ExceptionKind, ShiftCalendar, ShiftPattern, TimeWindow};
pub use material::{MaterialItem, SupplierEvaluation, SupplierScore};
pub use order::{
    ManufacturingOrder, MaterialRequirement, Operation, OperationProgress, TimeTrackingEntry,
};
pub use plan::{
    OverloadRecord, ProcurementSuggestion, ScheduleAssignment, UnroutableOperation,
    UnroutableReason,
};
pub use resource::MachineResource;
pub use snapshot::PlanningSnapshot;
pub use types::{ManufacturingProcess, OrderStatus, OverloadBucket};

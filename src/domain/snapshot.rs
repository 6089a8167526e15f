// ==========================================
// 专机制造排产系统 - 排产输入快照
// ==========================================
// 职责: 一次排产运行的只读输入（资源、日历、订单、物料）
// 红线: 运行期间不可修改; 持久化/外部查询必须在运行前完成
// ==========================================

use crate::domain::calendar::ShiftCalendar;
use crate::domain::material::{MaterialItem, SupplierEvaluation};
use crate::domain::order::ManufacturingOrder;
use crate::domain::resource::MachineResource;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningSnapshot {
    pub planning_start: NaiveDateTime, // 排产起点（同时作为“当前时刻”）
    pub calendars: Vec<ShiftCalendar>,
    pub resources: Vec<MachineResource>,
    pub orders: Vec<ManufacturingOrder>,
    #[serde(default)]
    pub materials: Vec<MaterialItem>,
    #[serde(default)]
    pub supplier_evaluations: Vec<SupplierEvaluation>,
}

impl PlanningSnapshot {
    pub fn new(planning_start: NaiveDateTime) -> Self {
        Self {
            planning_start,
            calendars: Vec::new(),
            resources: Vec::new(),
            orders: Vec::new(),
            materials: Vec::new(),
            supplier_evaluations: Vec::new(),
        }
    }

    pub fn material(&self, item_id: &str) -> Option<&MaterialItem> {
        self.materials.iter().find(|m| m.id == item_id)
    }

    pub fn order(&self, order_id: &str) -> Option<&ManufacturingOrder> {
        self.orders.iter().find(|o| o.id == order_id)
    }

    /// 工序总数
    pub fn operation_count(&self) -> usize {
        self.orders.iter().map(|o| o.operations.len()).sum()
    }
}

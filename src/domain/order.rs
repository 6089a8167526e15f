// ==========================================
// 专机制造排产系统 - 制造订单领域模型
// ==========================================
// 职责: 制造订单、工序链、物料需求、报工记录
// 红线: 工序链为严格线性序列,前驱 = 同订单内上一道工序（完工-开工）
// ==========================================

use crate::domain::types::{ManufacturingProcess, OrderStatus};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// MaterialRequirement - 工序物料需求
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRequirement {
    pub item_id: String,
    pub quantity: f64,
}

// ==========================================
// OperationProgress - 工序输入进度
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum OperationProgress {
    #[default]
    Open,
    Completed {
        #[serde(default)]
        finished_at: Option<NaiveDateTime>,
    },
}

// ==========================================
// Operation - 工序
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub id: String,
    pub name: String,
    pub process: ManufacturingProcess,
    #[serde(default)]
    pub setup_hours: f64,  // 准备时间（小时）
    pub run_hours: f64,    // 加工时间（小时）
    #[serde(default)]
    pub materials: Vec<MaterialRequirement>,
    #[serde(default)]
    pub progress: OperationProgress,
}

impl Operation {
    pub fn new(id: &str, process: ManufacturingProcess, setup_hours: f64, run_hours: f64) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            process,
            setup_hours,
            run_hours,
            materials: Vec::new(),
            progress: OperationProgress::Open,
        }
    }

    pub fn with_material(mut self, item_id: &str, quantity: f64) -> Self {
        self.materials.push(MaterialRequirement {
            item_id: item_id.to_string(),
            quantity,
        });
        self
    }

    pub fn completed(mut self, finished_at: Option<NaiveDateTime>) -> Self {
        self.progress = OperationProgress::Completed { finished_at };
        self
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.progress, OperationProgress::Completed { .. })
    }

    /// 名义工时（准备 + 加工）
    pub fn nominal_hours(&self) -> f64 {
        self.setup_hours + self.run_hours
    }
}

// ==========================================
// ManufacturingOrder - 制造订单
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManufacturingOrder {
    pub id: String,
    pub customer_ref: String,
    pub priority: f64,         // 优先权重（越大越紧急）
    pub due_date: NaiveDate,   // 要求交期
    #[serde(default)]
    pub status: OrderStatus,
    pub operations: Vec<Operation>,
}

impl ManufacturingOrder {
    pub fn new(id: &str, customer_ref: &str, priority: f64, due_date: NaiveDate) -> Self {
        Self {
            id: id.to_string(),
            customer_ref: customer_ref.to_string(),
            priority,
            due_date,
            status: OrderStatus::Planned,
            operations: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    /// 前驱工序下标（首道工序无前驱）
    pub fn predecessor_of(&self, index: usize) -> Option<usize> {
        index.checked_sub(1)
    }
}

// ==========================================
// TimeTrackingEntry - 车间报工
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeTrackingEntry {
    pub order_id: String,
    pub operation_id: String,
    pub employee: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

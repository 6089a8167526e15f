// ==========================================
// 专机制造排产系统 - 排产结果领域模型
// ==========================================
// 职责: 排产分配、超载记录、不可路由工序、采购建议
// 红线: 同一资源上的任意两条分配时间区间不得重叠
// ==========================================

use crate::domain::types::ManufacturingProcess;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// ScheduleAssignment - 工序分配
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleAssignment {
    pub order_id: String,
    pub operation_id: String,
    pub operation_index: usize,   // 工序在订单内的序号
    pub resource_id: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub working_hours: f64,       // 实际占用的日历工作时长
}

impl ScheduleAssignment {
    /// 与另一分配在时间上是否重叠（半开区间）
    pub fn overlaps(&self, other: &ScheduleAssignment) -> bool {
        self.start < other.end && other.start < self.end
    }
}

// ==========================================
// OverloadRecord - 超载记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverloadRecord {
    pub resource_id: String,
    pub window_start: NaiveDateTime,
    pub window_end: NaiveDateTime,
    pub required_hours: f64,
    pub available_hours: f64,
    pub surplus_hours: f64,
}

// ==========================================
// UnroutableOperation - 不可路由工序
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnroutableReason {
    /// 没有任何资源支持该工艺
    NoEligibleResource,
    /// 所有候选资源的日历在前瞻窗口内无产能
    CalendarExhausted { resource_ids: Vec<String> },
    /// 前驱工序不可路由，后续工序无法开工
    PredecessorUnroutable { predecessor_id: String },
}

impl fmt::Display for UnroutableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnroutableReason::NoEligibleResource => write!(f, "NO_ELIGIBLE_RESOURCE"),
            UnroutableReason::CalendarExhausted { resource_ids } => {
                write!(f, "CALENDAR_EXHAUSTED({})", resource_ids.join(","))
            }
            UnroutableReason::PredecessorUnroutable { predecessor_id } => {
                write!(f, "PREDECESSOR_UNROUTABLE({})", predecessor_id)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnroutableOperation {
    pub order_id: String,
    pub operation_id: String,
    pub process: ManufacturingProcess,
    pub reason: UnroutableReason,
}

// ==========================================
// ProcurementSuggestion - 采购建议
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcurementSuggestion {
    pub item_id: String,
    pub gross_requirement: f64,
    pub net_requirement: f64,
    pub suggested_quantity: f64,          // 净需求 × 补货系数
    pub supplier_id: Option<String>,      // 无可选供应商时为空
    pub supplier_score: Option<f64>,
    pub lead_time_days: u32,
    pub need_date: NaiveDate,
    pub suggested_order_date: NaiveDate,
    pub late_procurement: bool,           // 下单日已过（提前期无法满足）
    pub expedited: bool,                  // 高优先级订单加急
}

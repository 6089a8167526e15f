// ==========================================
// 专机制造排产系统 - 机器资源领域模型
// ==========================================
// 职责: 机器资源主数据（支持工艺、日历、效率）
// 红线: 一次排产运行内资源为冻结快照,不可修改
// ==========================================

use crate::domain::types::ManufacturingProcess;
use serde::{Deserialize, Serialize};

// ==========================================
// MachineResource - 机器资源
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineResource {
    pub id: String,                           // 资源编号（确定性并列裁决键）
    pub name: String,                         // 名称
    pub processes: Vec<ManufacturingProcess>, // 支持的工艺（有序）
    pub calendar_id: String,                  // 班次日历
    #[serde(default = "default_efficiency")]
    pub efficiency: f64,                      // 基础效率系数（1.0 = 额定）
    #[serde(default)]
    pub weekly_capacity_hours: Option<f64>,   // 每周可持续负荷上限（小时）
}

fn default_efficiency() -> f64 {
    1.0
}

impl MachineResource {
    pub fn new(
        id: &str,
        name: &str,
        processes: Vec<ManufacturingProcess>,
        calendar_id: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            processes,
            calendar_id: calendar_id.to_string(),
            efficiency: default_efficiency(),
            weekly_capacity_hours: None,
        }
    }

    pub fn with_efficiency(mut self, efficiency: f64) -> Self {
        self.efficiency = efficiency;
        self
    }

    pub fn with_weekly_capacity(mut self, hours: f64) -> Self {
        self.weekly_capacity_hours = Some(hours);
        self
    }

    /// 工艺能力判定（集合成员判定）
    pub fn supports(&self, process: ManufacturingProcess) -> bool {
        self.processes.contains(&process)
    }
}

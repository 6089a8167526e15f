// ==========================================
// 专机制造排产系统 - 快照数据质量校验
// ==========================================
// 职责: 排产前对快照做结构/取值校验,生成 DQ 报告
// 级别:
// - Error: 阻断排产（结果不可信）
// - Warning: 可排产,需人工关注
// ==========================================

use crate::config::planning_config::MAX_LEAD_TIME_DAYS;
use crate::domain::snapshot::PlanningSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DqLevel {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqViolation {
    pub level: DqLevel,
    pub entity: String,     // calendar / resource / order / operation / material / supplier
    pub entity_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DqReport {
    pub violations: Vec<DqViolation>,
}

impl DqReport {
    pub fn error_count(&self) -> usize {
        self.violations
            .iter()
            .filter(|v| v.level == DqLevel::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.violations
            .iter()
            .filter(|v| v.level == DqLevel::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn first_error(&self) -> Option<&DqViolation> {
        self.violations.iter().find(|v| v.level == DqLevel::Error)
    }

    fn push(&mut self, level: DqLevel, entity: &str, entity_id: &str, message: String) {
        self.violations.push(DqViolation {
            level,
            entity: entity.to_string(),
            entity_id: entity_id.to_string(),
            message,
        });
    }
}

fn in_unit_range(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

// ==========================================
// SnapshotValidator - 快照校验器
// ==========================================
pub struct SnapshotValidator;

impl SnapshotValidator {
    pub fn validate(&self, snapshot: &PlanningSnapshot) -> DqReport {
        let mut report = DqReport::default();
        self.validate_calendars(snapshot, &mut report);
        self.validate_resources(snapshot, &mut report);
        self.validate_orders(snapshot, &mut report);
        self.validate_materials(snapshot, &mut report);
        report
    }

    fn validate_calendars(&self, snapshot: &PlanningSnapshot, report: &mut DqReport) {
        let mut seen = HashSet::new();
        for calendar in &snapshot.calendars {
            if !seen.insert(calendar.id.as_str()) {
                report.push(DqLevel::Error, "calendar", &calendar.id, "日历编号重复".to_string());
            }
            for issue in calendar.validate() {
                report.push(DqLevel::Error, "calendar", &calendar.id, issue);
            }
        }
    }

    fn validate_resources(&self, snapshot: &PlanningSnapshot, report: &mut DqReport) {
        let calendars: HashSet<&str> = snapshot.calendars.iter().map(|c| c.id.as_str()).collect();
        let mut seen = HashSet::new();

        for resource in &snapshot.resources {
            let id = resource.id.as_str();
            if !seen.insert(id) {
                report.push(DqLevel::Error, "resource", id, "资源编号重复".to_string());
            }
            if !calendars.contains(resource.calendar_id.as_str()) {
                report.push(
                    DqLevel::Error,
                    "resource",
                    id,
                    format!("引用了未知日历: {}", resource.calendar_id),
                );
            }
            if !resource.efficiency.is_finite() || resource.efficiency <= 0.0 {
                report.push(
                    DqLevel::Error,
                    "resource",
                    id,
                    format!("效率系数必须为正数: {}", resource.efficiency),
                );
            }
            if let Some(cap) = resource.weekly_capacity_hours {
                if !cap.is_finite() || cap < 0.0 {
                    report.push(
                        DqLevel::Error,
                        "resource",
                        id,
                        format!("周负荷上限非法: {}", cap),
                    );
                }
            }
            if resource.processes.is_empty() {
                report.push(DqLevel::Warning, "resource", id, "未声明任何工艺能力".to_string());
            }
        }
    }

    fn validate_orders(&self, snapshot: &PlanningSnapshot, report: &mut DqReport) {
        let materials: HashSet<&str> = snapshot.materials.iter().map(|m| m.id.as_str()).collect();
        let mut seen = HashSet::new();

        for order in &snapshot.orders {
            let id = order.id.as_str();
            if !seen.insert(id) {
                report.push(DqLevel::Error, "order", id, "订单编号重复".to_string());
            }
            if !order.priority.is_finite() {
                report.push(DqLevel::Error, "order", id, "优先级必须为有限数".to_string());
            }
            if order.operations.is_empty() && order.status.is_open() {
                report.push(DqLevel::Warning, "order", id, "订单没有工序".to_string());
            }

            let mut op_seen = HashSet::new();
            for operation in &order.operations {
                let op_key = format!("{}/{}", order.id, operation.id);
                if !op_seen.insert(operation.id.as_str()) {
                    report.push(DqLevel::Error, "operation", &op_key, "工序编号重复".to_string());
                }
                if !operation.run_hours.is_finite() || operation.run_hours <= 0.0 {
                    report.push(
                        DqLevel::Error,
                        "operation",
                        &op_key,
                        format!("加工时间必须为正数: {}", operation.run_hours),
                    );
                }
                if !operation.setup_hours.is_finite() || operation.setup_hours < 0.0 {
                    report.push(
                        DqLevel::Error,
                        "operation",
                        &op_key,
                        format!("准备时间不能为负: {}", operation.setup_hours),
                    );
                }
                for requirement in &operation.materials {
                    if !materials.contains(requirement.item_id.as_str()) {
                        report.push(
                            DqLevel::Warning,
                            "operation",
                            &op_key,
                            format!("引用了未知物料: {}", requirement.item_id),
                        );
                    }
                    if !requirement.quantity.is_finite() || requirement.quantity <= 0.0 {
                        report.push(
                            DqLevel::Warning,
                            "operation",
                            &op_key,
                            format!(
                                "物料{}需求量非正: {}",
                                requirement.item_id, requirement.quantity
                            ),
                        );
                    }
                }
            }
        }
    }

    fn validate_materials(&self, snapshot: &PlanningSnapshot, report: &mut DqReport) {
        let mut seen = HashSet::new();
        for item in &snapshot.materials {
            let id = item.id.as_str();
            if !seen.insert(id) {
                report.push(DqLevel::Error, "material", id, "物料编号重复".to_string());
            }
            if !item.on_hand.is_finite() || item.on_hand < 0.0 {
                report.push(
                    DqLevel::Warning,
                    "material",
                    id,
                    format!("库存为负: {}", item.on_hand),
                );
            }
            if !item.safety_stock.is_finite() || item.safety_stock < 0.0 {
                report.push(
                    DqLevel::Error,
                    "material",
                    id,
                    format!("安全库存非法: {}", item.safety_stock),
                );
            }
            if let Some(point) = item.reorder_point {
                if !point.is_finite() || point < 0.0 {
                    report.push(
                        DqLevel::Error,
                        "material",
                        id,
                        format!("再订货点非法: {}", point),
                    );
                }
            }
            if item.lead_time_days > MAX_LEAD_TIME_DAYS {
                report.push(
                    DqLevel::Error,
                    "material",
                    id,
                    format!("提前期超出上限 {}: {}", MAX_LEAD_TIME_DAYS, item.lead_time_days),
                );
            }
            for supplier in &item.suppliers {
                if let Some(days) = supplier.lead_time_days {
                    if days > MAX_LEAD_TIME_DAYS {
                        report.push(
                            DqLevel::Error,
                            "supplier",
                            &supplier.supplier_id,
                            format!("物料{}的供应商提前期超出上限: {}", item.id, days),
                        );
                    }
                }
                if !in_unit_range(supplier.reliability) || !in_unit_range(supplier.price) {
                    report.push(
                        DqLevel::Error,
                        "supplier",
                        &supplier.supplier_id,
                        format!("物料{}的供应商评分超出 0..=1", item.id),
                    );
                }
            }
        }

        for evaluation in &snapshot.supplier_evaluations {
            if !in_unit_range(evaluation.quality)
                || !in_unit_range(evaluation.delivery_reliability)
                || !in_unit_range(evaluation.communication)
            {
                report.push(
                    DqLevel::Error,
                    "supplier",
                    &evaluation.supplier_id,
                    "供应商评价分超出 0..=1".to_string(),
                );
            }
        }
    }
}

// ==========================================
// 专机制造排产系统 - 引擎编排器
// ==========================================
// 用途: 协调一次排产运行的引擎执行顺序
// 流程: 配置校验 → 资源目录 → 订单排序 → 排产 → 超载扫描 → 物料计划
// 红线: 运行期限到期 → PlanningTimeout,不返回部分结果
// ==========================================

use crate::config::planning_config::PlanningConfiguration;
use crate::domain::plan::{
    OverloadRecord, ProcurementSuggestion, ScheduleAssignment, UnroutableOperation,
};
use crate::domain::snapshot::PlanningSnapshot;
use crate::engine::calendar::duration_hours;
use crate::engine::deadline::Deadline;
use crate::engine::error::PlanningError;
use crate::engine::{
    BacklogSorter, MaterialPlanner, OverloadDetector, ResourceCatalog, Scheduler, SupplierRanker,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;

// ==========================================
// PlanMetrics - 运行指标
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanMetrics {
    pub makespan_hours: f64,        // 排产起点 → 最晚完工
    pub total_overload_hours: f64,
    pub late_procurement_count: usize,
    pub unroutable_count: usize,
    pub assigned_count: usize,
    pub procurement_count: usize,
}

// ==========================================
// PlanningResult - 排产结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningResult {
    pub run_id: String,
    pub configuration_name: String,
    pub planning_start: NaiveDateTime,

    // Scheduler 输出
    pub assignments: Vec<ScheduleAssignment>,
    pub unroutable: Vec<UnroutableOperation>,

    // OverloadDetector 输出
    pub overloads: Vec<OverloadRecord>,

    // MaterialPlanner 输出
    pub procurement: Vec<ProcurementSuggestion>,
    pub unknown_items: Vec<String>,

    pub metrics: PlanMetrics,
}

impl PlanningResult {
    /// 某资源上的分配（按开工时间）
    pub fn assignments_on(&self, resource_id: &str) -> Vec<&ScheduleAssignment> {
        let mut on_resource: Vec<&ScheduleAssignment> = self
            .assignments
            .iter()
            .filter(|a| a.resource_id == resource_id)
            .collect();
        on_resource.sort_by_key(|a| a.start);
        on_resource
    }

    pub fn assignment_of(&self, order_id: &str, operation_id: &str) -> Option<&ScheduleAssignment> {
        self.assignments
            .iter()
            .find(|a| a.order_id == order_id && a.operation_id == operation_id)
    }
}

// ==========================================
// PlanningOrchestrator - 引擎编排器
// ==========================================
pub struct PlanningOrchestrator {
    sorter: BacklogSorter,
    scheduler: Scheduler,
    overload: OverloadDetector,
    supplier_ranker: SupplierRanker,
    material_planner: MaterialPlanner,
}

impl PlanningOrchestrator {
    pub fn new() -> Self {
        Self {
            sorter: BacklogSorter::new(),
            scheduler: Scheduler::new(),
            overload: OverloadDetector::new(),
            supplier_ranker: SupplierRanker::new(),
            material_planner: MaterialPlanner::new(),
        }
    }

    /// 执行一次完整排产运行
    ///
    /// # 参数
    /// - snapshot: 只读输入快照
    /// - config: 本次运行的配置
    ///
    /// # 返回
    /// 完整排产结果；运行级失败时返回 PlanningError
    #[instrument(skip_all, fields(config = %config.name, orders = snapshot.orders.len()))]
    pub fn run(
        &self,
        snapshot: &PlanningSnapshot,
        config: &PlanningConfiguration,
    ) -> Result<PlanningResult, PlanningError> {
        config
            .validate()
            .map_err(PlanningError::InvalidConfiguration)?;

        let deadline = Deadline::from_timeout(config.run_timeout_ms);
        let run_id = Uuid::new_v4().to_string();
        let planning_start = snapshot.planning_start;

        info!(
            run_id = %run_id,
            resources = snapshot.resources.len(),
            operations = snapshot.operation_count(),
            "开始排产运行"
        );

        // ==========================================
        // 步骤1: 资源目录
        // ==========================================
        let catalog = ResourceCatalog::new(&snapshot.resources, &snapshot.calendars)?;

        // ==========================================
        // 步骤2: 订单排序
        // ==========================================
        let ranked = self
            .sorter
            .rank(&snapshot.orders, config, planning_start.date());
        debug!(ranked = ranked.len(), "步骤2完成: 订单排序");

        // ==========================================
        // 步骤3: 贪心排产
        // ==========================================
        let outcome = self
            .scheduler
            .schedule(&ranked, &catalog, config, planning_start, &deadline)?;
        deadline.check()?;

        // ==========================================
        // 步骤4: 超载扫描
        // ==========================================
        let overloads = self.overload.detect(
            &outcome.assignments,
            &catalog,
            config.overload_bucket,
            planning_start,
        );
        deadline.check()?;

        // ==========================================
        // 步骤5: 物料计划（供应商评价先刷新可靠性）
        // ==========================================
        let mut materials = snapshot.materials.clone();
        self.supplier_ranker
            .apply_evaluations(&mut materials, &snapshot.supplier_evaluations);
        let material_plan = self.material_planner.plan(
            &materials,
            &snapshot.orders,
            &outcome.assignments,
            &config.procurement,
            planning_start,
        );
        deadline.check()?;

        let metrics = PlanMetrics {
            makespan_hours: outcome
                .last_end()
                .map_or(0.0, |end| duration_hours(end - planning_start).max(0.0)),
            total_overload_hours: overloads.iter().map(|o| o.surplus_hours).sum(),
            late_procurement_count: material_plan.late_count(),
            unroutable_count: outcome.unroutable.len(),
            assigned_count: outcome.assignments.len(),
            procurement_count: material_plan.suggestions.len(),
        };

        info!(
            run_id = %run_id,
            elapsed_ms = deadline.elapsed_ms(),
            assigned = metrics.assigned_count,
            unroutable = metrics.unroutable_count,
            overloads = overloads.len(),
            procurement = metrics.procurement_count,
            "排产运行完成"
        );

        Ok(PlanningResult {
            run_id,
            configuration_name: config.name.clone(),
            planning_start,
            assignments: outcome.assignments,
            unroutable: outcome.unroutable,
            overloads,
            procurement: material_plan.suggestions,
            unknown_items: material_plan.unknown_items,
            metrics,
        })
    }
}

impl Default for PlanningOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::calendar::{ShiftCalendar, ShiftPattern};
    use crate::domain::material::MaterialItem;
    use crate::domain::order::{ManufacturingOrder, Operation};
    use crate::domain::resource::MachineResource;
    use crate::domain::types::ManufacturingProcess;
    use chrono::{NaiveDate, NaiveTime, Weekday};

    fn snapshot() -> PlanningSnapshot {
        let start = NaiveDate::from_ymd_opt(2026, 1, 19)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut snapshot = PlanningSnapshot::new(start);
        snapshot.calendars.push(ShiftCalendar::new(
            "CAL",
            "单班",
            vec![ShiftPattern {
                name: "白班".to_string(),
                weekdays: vec![Weekday::Mon, Weekday::Tue, Weekday::Wed],
                start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                end: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
            }],
        ));
        snapshot.resources.push(MachineResource::new(
            "W-01",
            "焊接机器人",
            vec![ManufacturingProcess::Welding],
            "CAL",
        ));
        snapshot.orders.push(
            ManufacturingOrder::new("MO-1", "C", 5.0, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap())
                .with_operation(
                    Operation::new("OP-10", ManufacturingProcess::Welding, 1.0, 3.0)
                        .with_material("WIRE", 5.0),
                ),
        );
        snapshot
            .materials
            .push(MaterialItem::new("WIRE", "kg", 2.0, 0.0, 2));
        snapshot
    }

    #[test]
    fn test_run_produces_metrics() {
        let result = PlanningOrchestrator::new()
            .run(&snapshot(), &PlanningConfiguration::default())
            .unwrap();
        assert_eq!(result.metrics.assigned_count, 1);
        // 19日 08:00 开工, 12:00 完工
        assert_eq!(result.metrics.makespan_hours, 12.0);
        assert_eq!(result.metrics.procurement_count, 1);
        assert_eq!(result.procurement[0].net_requirement, 3.0);
        assert!(result.procurement[0].late_procurement);
        assert!(!result.run_id.is_empty());
    }

    #[test]
    fn test_invalid_configuration_rejected() {
        let config = PlanningConfiguration::default().with_horizon_days(0);
        let err = PlanningOrchestrator::new()
            .run(&snapshot(), &config)
            .unwrap_err();
        assert!(matches!(err, PlanningError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_timeout_returns_no_partial_result() {
        let config = PlanningConfiguration::default().with_run_timeout_ms(0);
        let err = PlanningOrchestrator::new()
            .run(&snapshot(), &config)
            .unwrap_err();
        assert!(matches!(err, PlanningError::PlanningTimeout { .. }));
    }
}

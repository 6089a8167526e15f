// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================
// 基准日: 2026-01-19（周一）
// 标准日历: 周一至周五 08:00-16:00 单班
// ==========================================

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use machining_aps::domain::calendar::{ShiftCalendar, ShiftPattern};
use machining_aps::domain::material::{MaterialItem, SupplierScore};
use machining_aps::domain::order::{ManufacturingOrder, Operation};
use machining_aps::domain::plan::ScheduleAssignment;
use machining_aps::domain::resource::MachineResource;
use machining_aps::domain::snapshot::PlanningSnapshot;
use machining_aps::domain::types::ManufacturingProcess;

pub const DAY_CALENDAR: &str = "CAL-DAY";

pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 19).unwrap()
}

/// 基准周一起第 day 天的 hour:minute
pub fn at(day: i64, hour: u32, minute: u32) -> NaiveDateTime {
    (monday() + Duration::days(day))
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn time(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
}

/// 周一至周五 08:00-16:00
pub fn day_shift_calendar(id: &str) -> ShiftCalendar {
    ShiftCalendar::new(
        id,
        "白班",
        vec![ShiftPattern {
            name: "白班".to_string(),
            weekdays: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            start: time(8),
            end: time(16),
        }],
    )
}

/// 单工序订单
pub fn single_op_order(
    id: &str,
    priority: f64,
    process: ManufacturingProcess,
    run_hours: f64,
) -> ManufacturingOrder {
    ManufacturingOrder::new(id, "C-TEST", priority, monday() + Duration::days(30))
        .with_operation(Operation::new("OP-10", process, 0.0, run_hours))
}

// ==========================================
// PlanningSnapshot 构建器
// ==========================================
pub struct SnapshotBuilder {
    snapshot: PlanningSnapshot,
}

impl SnapshotBuilder {
    /// 起点为基准周一 08:00,带标准日历
    pub fn new() -> Self {
        let mut snapshot = PlanningSnapshot::new(at(0, 8, 0));
        snapshot.calendars.push(day_shift_calendar(DAY_CALENDAR));
        Self { snapshot }
    }

    pub fn planning_start(mut self, start: NaiveDateTime) -> Self {
        self.snapshot.planning_start = start;
        self
    }

    pub fn calendar(mut self, calendar: ShiftCalendar) -> Self {
        self.snapshot.calendars.push(calendar);
        self
    }

    /// 使用标准日历的资源
    pub fn machine(mut self, id: &str, processes: Vec<ManufacturingProcess>) -> Self {
        self.snapshot
            .resources
            .push(MachineResource::new(id, id, processes, DAY_CALENDAR));
        self
    }

    pub fn resource(mut self, resource: MachineResource) -> Self {
        self.snapshot.resources.push(resource);
        self
    }

    pub fn order(mut self, order: ManufacturingOrder) -> Self {
        self.snapshot.orders.push(order);
        self
    }

    pub fn material(mut self, item: MaterialItem) -> Self {
        self.snapshot.materials.push(item);
        self
    }

    pub fn build(self) -> PlanningSnapshot {
        self.snapshot
    }
}

/// 典型车间: 两台铣床 + 一台磨床 + 一台车床,
/// 六个多工序订单,两种物料
pub fn workshop_snapshot() -> PlanningSnapshot {
    let mut builder = SnapshotBuilder::new()
        .machine("M-01", vec![ManufacturingProcess::Milling])
        .resource(
            MachineResource::new(
                "M-02",
                "高速铣",
                vec![ManufacturingProcess::Milling, ManufacturingProcess::Turning],
                DAY_CALENDAR,
            )
            .with_efficiency(1.25),
        )
        .machine("G-01", vec![ManufacturingProcess::Grinding])
        .machine("T-01", vec![ManufacturingProcess::Turning]);

    for (i, priority) in [3.0, 8.0, 5.0, 8.0, 1.0, 6.0].iter().enumerate() {
        let order = ManufacturingOrder::new(
            &format!("MO-{:02}", i + 1),
            "C-WORKSHOP",
            *priority,
            monday() + Duration::days(10 + i as i64),
        )
        .with_operation(
            Operation::new("OP-10", ManufacturingProcess::Milling, 0.5, 3.0)
                .with_material("AL-6061", 2.0),
        )
        .with_operation(Operation::new("OP-20", ManufacturingProcess::Turning, 0.25, 1.5))
        .with_operation(
            Operation::new("OP-30", ManufacturingProcess::Grinding, 0.0, 2.0)
                .with_material("BOLT-M8", 8.0),
        );
        builder = builder.order(order);
    }

    builder
        .material(
            MaterialItem::new("AL-6061", "pcs", 4.0, 2.0, 5)
                .with_supplier(SupplierScore::new("SUP-A", 0.9, 0.4, Some(6)))
                .with_supplier(SupplierScore::new("SUP-B", 0.6, 0.9, Some(3))),
        )
        .material(MaterialItem::new("BOLT-M8", "pcs", 100.0, 20.0, 2))
        .build()
}

/// 同一资源上的分配两两不重叠
pub fn assert_no_overlap(assignments: &[ScheduleAssignment]) {
    for (i, a) in assignments.iter().enumerate() {
        for b in &assignments[i + 1..] {
            if a.resource_id == b.resource_id {
                assert!(
                    !a.overlaps(b),
                    "资源 {} 上 {}/{} 与 {}/{} 重叠",
                    a.resource_id,
                    a.order_id,
                    a.operation_id,
                    b.order_id,
                    b.operation_id
                );
            }
        }
    }
}

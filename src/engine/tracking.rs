// ==========================================
// 专机制造排产系统 - 计划与实际对比
// ==========================================
// 职责: 订单维度对比计划工时（准备 + 加工）与车间报工实际工时
// ==========================================

use crate::domain::order::{ManufacturingOrder, TimeTrackingEntry};
use crate::engine::calendar::duration_hours;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderTracking {
    pub order_id: String,
    pub planned_hours: f64,
    pub actual_hours: f64,
    pub variance_hours: f64, // 实际 - 计划
    pub entries: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingReport {
    pub orders: Vec<OrderTracking>,
    /// 引用未知订单或时间倒置的报工条数
    pub rejected_entries: usize,
}

// ==========================================
// TrackingEngine - 报工对比引擎
// ==========================================
pub struct TrackingEngine {
    // 无状态引擎
}

impl TrackingEngine {
    pub fn new() -> Self {
        Self {}
    }

    /// 计划 vs 实际（按订单编号排序,只含有计划工时或报工的订单）
    pub fn plan_vs_actual(
        &self,
        orders: &[ManufacturingOrder],
        entries: &[TimeTrackingEntry],
    ) -> TrackingReport {
        let mut rows: BTreeMap<&str, OrderTracking> = BTreeMap::new();
        for order in orders {
            let planned: f64 = order.operations.iter().map(|op| op.nominal_hours()).sum();
            rows.insert(
                order.id.as_str(),
                OrderTracking {
                    order_id: order.id.clone(),
                    planned_hours: planned,
                    actual_hours: 0.0,
                    variance_hours: 0.0,
                    entries: 0,
                },
            );
        }

        let mut rejected = 0;
        for entry in entries {
            if entry.end <= entry.start {
                warn!(order_id = %entry.order_id, employee = %entry.employee, "报工时间倒置，忽略");
                rejected += 1;
                continue;
            }
            match rows.get_mut(entry.order_id.as_str()) {
                Some(row) => {
                    row.actual_hours += duration_hours(entry.end - entry.start);
                    row.entries += 1;
                }
                None => {
                    warn!(order_id = %entry.order_id, "报工引用了未知订单，忽略");
                    rejected += 1;
                }
            }
        }

        let orders = rows
            .into_values()
            .filter(|row| row.planned_hours > 0.0 || row.entries > 0)
            .map(|mut row| {
                row.variance_hours = row.actual_hours - row.planned_hours;
                row
            })
            .collect();

        TrackingReport {
            orders,
            rejected_entries: rejected,
        }
    }
}

impl Default for TrackingEngine {
    fn default() -> Self {
        Self::new()
    }
}

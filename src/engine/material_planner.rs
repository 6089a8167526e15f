// ==========================================
// 专机制造排产系统 - 物料计划引擎
// ==========================================
// 职责: 由排产结果推导毛需求,扣减库存得到净需求,生成采购建议
// 输入: 物料快照 + 订单 + 工序分配 + 采购策略
// 输出: 采购建议（每个净需求 > 0 的物料恰好一条）
// 规则:
// - 需求日 = 工序开工日 - 采购缓冲天数（取最早）
// - 净需求 = max(0, 毛需求 - (库存 - 安全库存 × 系数))
// - 预计库存 = 库存 - 毛需求; 低于再订货点同样生成建议
// - 建议量 = max(净需求, 再订货点 - 预计库存) × 再订货系数
// - 下单日 = 需求日 - 提前期; 早于排产起点 → late_procurement（只报告,不失败）
// ==========================================

use crate::config::planning_config::ProcurementStrategy;
use crate::domain::material::MaterialItem;
use crate::domain::order::ManufacturingOrder;
use crate::domain::plan::{ProcurementSuggestion, ScheduleAssignment};
use crate::engine::supplier_ranking::SupplierRanker;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{info, instrument, warn};

/// 物料计划输出
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialPlan {
    pub suggestions: Vec<ProcurementSuggestion>,
    /// 工序引用了物料快照中不存在的物料
    pub unknown_items: Vec<String>,
}

impl MaterialPlan {
    pub fn late_count(&self) -> usize {
        self.suggestions.iter().filter(|s| s.late_procurement).count()
    }
}

/// 单物料的毛需求汇总
#[derive(Debug, Clone)]
struct GrossDemand {
    quantity: f64,
    need_date: NaiveDate,
    expedite: bool,
}

// ==========================================
// MaterialPlanner - 物料计划引擎
// ==========================================
pub struct MaterialPlanner {
    supplier_ranker: SupplierRanker,
}

impl MaterialPlanner {
    pub fn new() -> Self {
        Self {
            supplier_ranker: SupplierRanker::new(),
        }
    }

    /// 生成采购建议
    ///
    /// 没有排产需求的物料,若库存低于安全库存或再订货点同样生成补货建议,需求日取排产起点
    #[instrument(skip_all, fields(materials = materials.len(), assignments = assignments.len()))]
    pub fn plan(
        &self,
        materials: &[MaterialItem],
        orders: &[ManufacturingOrder],
        assignments: &[ScheduleAssignment],
        strategy: &ProcurementStrategy,
        planning_start: NaiveDateTime,
    ) -> MaterialPlan {
        let planning_date = planning_start.date();
        let known: HashMap<&str, &MaterialItem> =
            materials.iter().map(|m| (m.id.as_str(), m)).collect();

        let (demand, unknown) = self.gross_demand(&known, orders, assignments, strategy);
        if !unknown.is_empty() {
            warn!(items = ?unknown, "工序引用了未知物料");
        }

        let mut sorted: Vec<&MaterialItem> = materials.iter().collect();
        sorted.sort_by(|a, b| a.id.cmp(&b.id));

        let mut suggestions = Vec::new();
        for item in sorted {
            let gross = demand.get(item.id.as_str());
            let gross_quantity = gross.map_or(0.0, |d| d.quantity);
            let net = self.net_requirement(item, gross_quantity, strategy);
            let reorder_gap = self.reorder_gap(item, gross_quantity);
            if net <= 0.0 && reorder_gap <= 0.0 {
                continue;
            }

            let need_date = gross.map_or(planning_date, |d| d.need_date);
            let best = self.supplier_ranker.best(item, strategy);

            let mut lead_time_days = best
                .as_ref()
                .map_or(item.lead_time_days, |s| s.lead_time_days);
            if lead_time_days == 0 {
                lead_time_days = strategy.default_lead_time_days;
            }

            let mut expedited = false;
            if gross.map_or(false, |d| d.expedite) && strategy.expedite_days > 0 {
                let shortened = lead_time_days.saturating_sub(strategy.expedite_days).max(1);
                if shortened < lead_time_days {
                    lead_time_days = shortened;
                    expedited = true;
                }
            }

            // 越界按最早日期处理,必然标记延误
            let suggested_order_date = need_date
                .checked_sub_signed(Duration::days(i64::from(lead_time_days)))
                .unwrap_or(NaiveDate::MIN);
            suggestions.push(ProcurementSuggestion {
                item_id: item.id.clone(),
                gross_requirement: gross_quantity,
                net_requirement: net,
                suggested_quantity: net.max(reorder_gap) * strategy.reorder_multiplier,
                supplier_id: best.as_ref().map(|s| s.supplier.supplier_id.clone()),
                supplier_score: best.as_ref().map(|s| s.score),
                lead_time_days,
                need_date,
                suggested_order_date,
                late_procurement: suggested_order_date < planning_date,
                expedited,
            });
        }

        let plan = MaterialPlan {
            suggestions,
            unknown_items: unknown.into_iter().collect(),
        };
        info!(
            suggestions = plan.suggestions.len(),
            late = plan.late_count(),
            "物料计划完成"
        );
        plan
    }

    /// 净需求 = max(0, 毛需求 - (库存 - 安全库存 × 系数))
    ///
    /// 关闭 include_safety_stock_gap 时不预留安全库存
    pub fn net_requirement(
        &self,
        item: &MaterialItem,
        gross: f64,
        strategy: &ProcurementStrategy,
    ) -> f64 {
        let reserved = if strategy.include_safety_stock_gap {
            item.safety_stock * strategy.safety_stock_multiplier
        } else {
            0.0
        };
        (gross - (item.on_hand - reserved)).max(0.0)
    }

    /// 再订货缺口 = max(0, 再订货点 - (库存 - 毛需求))
    pub fn reorder_gap(&self, item: &MaterialItem, gross: f64) -> f64 {
        item.reorder_point
            .map_or(0.0, |point| point - (item.on_hand - gross))
            .max(0.0)
    }

    /// 按物料汇总已排产工序的毛需求
    fn gross_demand(
        &self,
        known: &HashMap<&str, &MaterialItem>,
        orders: &[ManufacturingOrder],
        assignments: &[ScheduleAssignment],
        strategy: &ProcurementStrategy,
    ) -> (BTreeMap<String, GrossDemand>, BTreeSet<String>) {
        let orders_by_id: HashMap<&str, &ManufacturingOrder> =
            orders.iter().map(|o| (o.id.as_str(), o)).collect();
        let buffer = Duration::days(i64::from(strategy.procurement_buffer_days));

        let mut demand: BTreeMap<String, GrossDemand> = BTreeMap::new();
        let mut unknown: BTreeSet<String> = BTreeSet::new();

        for assignment in assignments {
            let Some(order) = orders_by_id.get(assignment.order_id.as_str()) else {
                continue;
            };
            let Some(operation) = order.operations.get(assignment.operation_index) else {
                continue;
            };
            let need_date = assignment
                .start
                .date()
                .checked_sub_signed(buffer)
                .unwrap_or(NaiveDate::MIN);
            let expedite = strategy
                .expedite_priority_threshold
                .map_or(false, |threshold| order.priority >= threshold);

            for requirement in &operation.materials {
                if !known.contains_key(requirement.item_id.as_str()) {
                    unknown.insert(requirement.item_id.clone());
                    continue;
                }
                let entry = demand
                    .entry(requirement.item_id.clone())
                    .or_insert(GrossDemand {
                        quantity: 0.0,
                        need_date,
                        expedite: false,
                    });
                entry.quantity += requirement.quantity.max(0.0);
                entry.need_date = entry.need_date.min(need_date);
                entry.expedite |= expedite;
            }
        }

        (demand, unknown)
    }
}

impl Default for MaterialPlanner {
    fn default() -> Self {
        Self::new()
    }
}

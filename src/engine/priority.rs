// ==========================================
// 专机制造排产系统 - 订单优先级排序
// ==========================================
// 职责: 计算订单有效权重,给待排订单一个确定的全序
// 排序键:
// 1) 有效权重降序
// 2) 交期升序
// 3) 订单编号升序
// ==========================================

use crate::config::planning_config::PlanningConfiguration;
use crate::domain::order::ManufacturingOrder;
use chrono::NaiveDate;
use std::cmp::Ordering;
use tracing::debug;

/// 排序后的订单
#[derive(Debug, Clone)]
pub struct RankedOrder<'a> {
    pub order: &'a ManufacturingOrder,
    pub weight: f64,
}

// ==========================================
// BacklogSorter - 待排订单排序引擎
// ==========================================
pub struct BacklogSorter {
    // 无状态引擎
}

impl BacklogSorter {
    pub fn new() -> Self {
        Self {}
    }

    /// 订单有效权重
    pub fn effective_weight(
        &self,
        order: &ManufacturingOrder,
        config: &PlanningConfiguration,
        planning_date: NaiveDate,
    ) -> f64 {
        let days_until_due = (order.due_date - planning_date).num_days();
        config
            .priority_formula
            .weight(order.priority, days_until_due)
    }

    /// 筛选并排序待排订单
    ///
    /// 筛选规则:
    /// 1) 已完工/已取消订单不参与
    /// 2) 设置 backlog_horizon_days 时只保留窗口内到期的订单,
    ///    优先级达到 horizon_bypass_priority 的订单不受限制
    /// 3) 设置 max_orders_per_cycle 时截断排序结果
    pub fn rank<'a>(
        &self,
        orders: &'a [ManufacturingOrder],
        config: &PlanningConfiguration,
        planning_date: NaiveDate,
    ) -> Vec<RankedOrder<'a>> {
        let horizon_end = config
            .backlog_horizon_days
            .and_then(|days| {
                // 越界视为无窗口
                planning_date.checked_add_signed(chrono::Duration::days(i64::from(days)))
            });

        let mut ranked: Vec<RankedOrder<'a>> = orders
            .iter()
            .filter(|order| order.status.is_open())
            .filter(|order| match horizon_end {
                None => true,
                Some(end) => {
                    order.due_date <= end
                        || config
                            .horizon_bypass_priority
                            .map_or(false, |bypass| order.priority >= bypass)
                }
            })
            .map(|order| RankedOrder {
                order,
                weight: self.effective_weight(order, config, planning_date),
            })
            .collect();

        ranked.sort_by(|a, b| self.compare(a, b));

        if let Some(limit) = config.max_orders_per_cycle {
            ranked.truncate(limit);
        }

        debug!(
            total = orders.len(),
            selected = ranked.len(),
            "待排订单排序完成"
        );
        ranked
    }

    fn compare(&self, a: &RankedOrder<'_>, b: &RankedOrder<'_>) -> Ordering {
        b.weight
            .total_cmp(&a.weight)
            .then_with(|| a.order.due_date.cmp(&b.order.due_date))
            .then_with(|| a.order.id.cmp(&b.order.id))
    }
}

impl Default for BacklogSorter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::planning_config::PriorityWeightFormula;
    use crate::domain::types::OrderStatus;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
    }

    fn ids(ranked: &[RankedOrder<'_>]) -> Vec<String> {
        ranked.iter().map(|r| r.order.id.clone()).collect()
    }

    #[test]
    fn test_rank_by_priority_then_due_date_then_id() {
        let orders = vec![
            ManufacturingOrder::new("MO-003", "C1", 5.0, date(30)),
            ManufacturingOrder::new("MO-001", "C1", 5.0, date(25)),
            ManufacturingOrder::new("MO-002", "C2", 9.0, date(31)),
            ManufacturingOrder::new("MO-000", "C3", 5.0, date(30)),
        ];
        let sorter = BacklogSorter::new();
        let ranked = sorter.rank(&orders, &PlanningConfiguration::default(), date(19));
        assert_eq!(ids(&ranked), vec!["MO-002", "MO-001", "MO-000", "MO-003"]);
    }

    #[test]
    fn test_weighted_formula_promotes_near_due_orders() {
        let orders = vec![
            ManufacturingOrder::new("MO-LATER", "C1", 6.0, date(31)),
            ManufacturingOrder::new("MO-SOON", "C1", 5.0, date(20)),
        ];
        let config = PlanningConfiguration::default().with_priority_formula(
            PriorityWeightFormula::Weighted {
                priority_weight: 1.0,
                urgency_weight: 0.5,
            },
        );
        let ranked = BacklogSorter::new().rank(&orders, &config, date(19));
        // MO-SOON: 5 - 0.5 = 4.5; MO-LATER: 6 - 6 = 0
        assert_eq!(ids(&ranked), vec!["MO-SOON", "MO-LATER"]);
    }

    #[test]
    fn test_closed_orders_and_horizon_filter() {
        let orders = vec![
            ManufacturingOrder::new("MO-DONE", "C1", 9.0, date(20))
                .with_status(OrderStatus::Completed),
            ManufacturingOrder::new("MO-FAR", "C1", 3.0, date(31)),
            ManufacturingOrder::new("MO-FAR-URGENT", "C1", 8.0, date(31)),
            ManufacturingOrder::new("MO-NEAR", "C1", 1.0, date(22)),
        ];
        let mut config = PlanningConfiguration::default();
        config.backlog_horizon_days = Some(7);
        config.horizon_bypass_priority = Some(8.0);

        let ranked = BacklogSorter::new().rank(&orders, &config, date(19));
        assert_eq!(ids(&ranked), vec!["MO-FAR-URGENT", "MO-NEAR"]);

        config.max_orders_per_cycle = Some(1);
        let ranked = BacklogSorter::new().rank(&orders, &config, date(19));
        assert_eq!(ids(&ranked), vec!["MO-FAR-URGENT"]);
    }
}

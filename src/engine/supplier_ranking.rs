// ==========================================
// 专机制造排产系统 - 供应商排名
// ==========================================
// 职责: 按采购策略权重给物料的可选供应商打分排序
// 评分 = (价格×wp + 可靠性×wr + 提前期得分×wl) / (wp + wr + wl)
// 提前期得分 = 1 / (1 + 提前期天数 / 7)
// 排序: 评分降序 → 可靠性降序 → 供应商编号升序
// ==========================================

use crate::config::planning_config::ProcurementStrategy;
use crate::domain::material::{MaterialItem, SupplierEvaluation, SupplierScore};
use std::cmp::Ordering;
use std::collections::HashMap;

/// 打分后的供应商
#[derive(Debug, Clone, PartialEq)]
pub struct RankedSupplier<'a> {
    pub supplier: &'a SupplierScore,
    pub lead_time_days: u32,
    pub score: f64,
}

// ==========================================
// SupplierRanker - 供应商排名引擎
// ==========================================
pub struct SupplierRanker {
    // 无状态引擎
}

impl SupplierRanker {
    pub fn new() -> Self {
        Self {}
    }

    /// 供应商实际使用的提前期（供应商 → 物料）
    pub fn lead_time_of(&self, supplier: &SupplierScore, item: &MaterialItem) -> u32 {
        supplier.lead_time_days.unwrap_or(item.lead_time_days)
    }

    /// 单个供应商的加权评分
    pub fn score(
        &self,
        supplier: &SupplierScore,
        lead_time_days: u32,
        strategy: &ProcurementStrategy,
    ) -> f64 {
        let total_weight =
            strategy.price_weight + strategy.reliability_weight + strategy.lead_time_weight;
        if total_weight <= 0.0 {
            return 0.0;
        }
        let lead_score = 1.0 / (1.0 + f64::from(lead_time_days) / 7.0);
        (strategy.price_weight * supplier.price
            + strategy.reliability_weight * supplier.reliability
            + strategy.lead_time_weight * lead_score)
            / total_weight
    }

    /// 物料的全部可选供应商排名
    pub fn rank<'a>(
        &self,
        item: &'a MaterialItem,
        strategy: &ProcurementStrategy,
    ) -> Vec<RankedSupplier<'a>> {
        let mut ranked: Vec<RankedSupplier<'a>> = item
            .suppliers
            .iter()
            .map(|supplier| {
                let lead_time_days = self.lead_time_of(supplier, item);
                RankedSupplier {
                    supplier,
                    lead_time_days,
                    score: self.score(supplier, lead_time_days, strategy),
                }
            })
            .collect();
        ranked.sort_by(compare);
        ranked
    }

    /// 排名第一的供应商（无可选供应商时为空）
    pub fn best<'a>(
        &self,
        item: &'a MaterialItem,
        strategy: &ProcurementStrategy,
    ) -> Option<RankedSupplier<'a>> {
        self.rank(item, strategy).into_iter().next()
    }

    /// 用评价记录刷新供应商可靠性
    ///
    /// 有评价记录的供应商: 可靠性 = 全部评价综合分的均值（截断到 0..=1）
    pub fn apply_evaluations(
        &self,
        materials: &mut [MaterialItem],
        evaluations: &[SupplierEvaluation],
    ) {
        if evaluations.is_empty() {
            return;
        }

        let mut totals: HashMap<&str, (f64, usize)> = HashMap::new();
        for evaluation in evaluations {
            let entry = totals
                .entry(evaluation.supplier_id.as_str())
                .or_insert((0.0, 0));
            entry.0 += evaluation.overall();
            entry.1 += 1;
        }

        for item in materials.iter_mut() {
            for supplier in item.suppliers.iter_mut() {
                if let Some((sum, count)) = totals.get(supplier.supplier_id.as_str()) {
                    supplier.reliability = (sum / *count as f64).clamp(0.0, 1.0);
                }
            }
        }
    }
}

impl Default for SupplierRanker {
    fn default() -> Self {
        Self::new()
    }
}

fn compare(a: &RankedSupplier<'_>, b: &RankedSupplier<'_>) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.supplier.reliability.total_cmp(&a.supplier.reliability))
        .then_with(|| a.supplier.supplier_id.cmp(&b.supplier.supplier_id))
}

// ==========================================
// 专机制造排产系统 - 排产配置
// ==========================================
// 职责: 一次排产/一个场景的不可变参数集合
// 红线: 配置即数据,显式传入每次运行,运行中不可修改
// ==========================================

use crate::domain::types::OverloadBucket;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 日历前瞻、积压窗口上限（天）
pub const MAX_HORIZON_DAYS: u32 = 3660;
/// 采购缓冲、提前期、加急天数上限
pub const MAX_LEAD_TIME_DAYS: u32 = 3660;
/// 工序间缓冲上限（分钟）: 30 天
pub const MAX_SETUP_BUFFER_MINUTES: u32 = 30 * 24 * 60;

// ==========================================
// PriorityWeightFormula - 优先权重公式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PriorityWeightFormula {
    /// 权重 = 订单优先级
    PriorityOnly,
    /// 权重 = 优先级 × priority_weight + 紧迫度 × urgency_weight
    /// 紧迫度 = -(交期距排产起点的天数)，逾期订单为正
    Weighted { priority_weight: f64, urgency_weight: f64 },
}

impl Default for PriorityWeightFormula {
    fn default() -> Self {
        PriorityWeightFormula::PriorityOnly
    }
}

impl PriorityWeightFormula {
    /// 计算订单有效权重
    ///
    /// # 参数
    /// - `priority`: 订单优先级
    /// - `days_until_due`: 交期距排产起点天数（逾期为负）
    pub fn weight(&self, priority: f64, days_until_due: i64) -> f64 {
        match *self {
            PriorityWeightFormula::PriorityOnly => priority,
            PriorityWeightFormula::Weighted {
                priority_weight,
                urgency_weight,
            } => priority * priority_weight - days_until_due as f64 * urgency_weight,
        }
    }
}

// ==========================================
// ProcurementStrategy - 采购策略
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcurementStrategy {
    pub price_weight: f64,
    pub reliability_weight: f64,
    pub lead_time_weight: f64,
    pub safety_stock_multiplier: f64,            // 安全库存系数
    pub procurement_buffer_days: u32,            // 需求日 = 工序开工 - 缓冲
    pub reorder_multiplier: f64,                 // 建议采购量 = 净需求 × 系数
    pub default_lead_time_days: u32,             // 物料/供应商均未给出提前期时使用
    pub expedite_days: u32,                      // 高优先级订单可压缩的提前期
    pub expedite_priority_threshold: Option<f64>,
    pub include_safety_stock_gap: bool,          // false: 净需求不预留安全库存
}

impl Default for ProcurementStrategy {
    fn default() -> Self {
        Self {
            price_weight: 1.0,
            reliability_weight: 1.0,
            lead_time_weight: 1.0,
            safety_stock_multiplier: 1.0,
            procurement_buffer_days: 0,
            reorder_multiplier: 1.0,
            default_lead_time_days: 0,
            expedite_days: 0,
            expedite_priority_threshold: None,
            include_safety_stock_gap: true,
        }
    }
}

// ==========================================
// PlanningConfiguration - 排产配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfiguration {
    pub name: String,
    pub priority_formula: PriorityWeightFormula,
    pub planning_horizon_days: u32,          // 日历最大前瞻
    pub setup_time_buffer_minutes: u32,      // 工序间缓冲
    pub setup_time_factor: f64,              // 准备时间系数
    pub overload_bucket: OverloadBucket,
    pub backlog_horizon_days: Option<u32>,   // 只排交期在窗口内的订单
    pub horizon_bypass_priority: Option<f64>, // 达到该优先级的订单不受窗口限制
    pub max_orders_per_cycle: Option<usize>,
    pub run_timeout_ms: Option<u64>,
    pub procurement: ProcurementStrategy,
}

impl Default for PlanningConfiguration {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            priority_formula: PriorityWeightFormula::PriorityOnly,
            planning_horizon_days: 14,
            setup_time_buffer_minutes: 0,
            setup_time_factor: 1.0,
            overload_bucket: OverloadBucket::Daily,
            backlog_horizon_days: None,
            horizon_bypass_priority: None,
            max_orders_per_cycle: None,
            run_timeout_ms: None,
            procurement: ProcurementStrategy::default(),
        }
    }
}

impl PlanningConfiguration {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_setup_buffer_minutes(mut self, minutes: u32) -> Self {
        self.setup_time_buffer_minutes = minutes;
        self
    }

    pub fn with_horizon_days(mut self, days: u32) -> Self {
        self.planning_horizon_days = days;
        self
    }

    pub fn with_overload_bucket(mut self, bucket: OverloadBucket) -> Self {
        self.overload_bucket = bucket;
        self
    }

    pub fn with_priority_formula(mut self, formula: PriorityWeightFormula) -> Self {
        self.priority_formula = formula;
        self
    }

    pub fn with_procurement(mut self, procurement: ProcurementStrategy) -> Self {
        self.procurement = procurement;
        self
    }

    pub fn with_run_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.run_timeout_ms = Some(timeout_ms);
        self
    }

    /// 工序间缓冲
    pub fn setup_time_buffer(&self) -> Duration {
        Duration::minutes(i64::from(self.setup_time_buffer_minutes))
    }

    /// 日历前瞻上限
    pub fn lookahead(&self) -> Duration {
        Duration::days(i64::from(self.planning_horizon_days))
    }

    /// 参数合法性校验
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("配置名称不能为空".to_string());
        }
        if self.planning_horizon_days == 0 {
            return Err("planning_horizon_days 必须大于0".to_string());
        }
        if self.planning_horizon_days > MAX_HORIZON_DAYS {
            return Err(format!(
                "planning_horizon_days 超出上限 {}: {}",
                MAX_HORIZON_DAYS, self.planning_horizon_days
            ));
        }
        if let Some(days) = self.backlog_horizon_days {
            if days > MAX_HORIZON_DAYS {
                return Err(format!(
                    "backlog_horizon_days 超出上限 {}: {}",
                    MAX_HORIZON_DAYS, days
                ));
            }
        }
        if self.setup_time_buffer_minutes > MAX_SETUP_BUFFER_MINUTES {
            return Err(format!(
                "setup_time_buffer_minutes 超出上限 {}: {}",
                MAX_SETUP_BUFFER_MINUTES, self.setup_time_buffer_minutes
            ));
        }
        if !self.setup_time_factor.is_finite() || self.setup_time_factor < 0.0 {
            return Err(format!("setup_time_factor 非法: {}", self.setup_time_factor));
        }
        if let PriorityWeightFormula::Weighted {
            priority_weight,
            urgency_weight,
        } = self.priority_formula
        {
            if !priority_weight.is_finite() || !urgency_weight.is_finite() {
                return Err("优先权重公式参数必须为有限数".to_string());
            }
        }
        if let Some(bypass) = self.horizon_bypass_priority {
            if !bypass.is_finite() {
                return Err("horizon_bypass_priority 必须为有限数".to_string());
            }
        }

        let p = &self.procurement;
        for (field, value) in [
            ("price_weight", p.price_weight),
            ("reliability_weight", p.reliability_weight),
            ("lead_time_weight", p.lead_time_weight),
            ("safety_stock_multiplier", p.safety_stock_multiplier),
            ("reorder_multiplier", p.reorder_multiplier),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} 非法: {}", field, value));
            }
        }
        for (field, days) in [
            ("procurement_buffer_days", p.procurement_buffer_days),
            ("default_lead_time_days", p.default_lead_time_days),
            ("expedite_days", p.expedite_days),
        ] {
            if days > MAX_LEAD_TIME_DAYS {
                return Err(format!("{} 超出上限 {}: {}", field, MAX_LEAD_TIME_DAYS, days));
            }
        }
        Ok(())
    }
}

// ==========================================
// PlanningPreset - 预设方案（多场景对比入口）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanningPreset {
    #[default]
    Balanced,
    DueDateFirst,
    CostFirst,
    ReliabilityFirst,
}

impl PlanningPreset {
    pub const ALL: [PlanningPreset; 4] = [
        PlanningPreset::Balanced,
        PlanningPreset::DueDateFirst,
        PlanningPreset::CostFirst,
        PlanningPreset::ReliabilityFirst,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanningPreset::Balanced => "balanced",
            PlanningPreset::DueDateFirst => "due_date_first",
            PlanningPreset::CostFirst => "cost_first",
            PlanningPreset::ReliabilityFirst => "reliability_first",
        }
    }

    pub fn title_cn(&self) -> &'static str {
        match self {
            PlanningPreset::Balanced => "均衡方案",
            PlanningPreset::DueDateFirst => "交期优先",
            PlanningPreset::CostFirst => "成本优先",
            PlanningPreset::ReliabilityFirst => "可靠性优先",
        }
    }

    /// 预设对应的完整配置
    pub fn configuration(&self) -> PlanningConfiguration {
        let base = PlanningConfiguration::named(self.as_str());
        match self {
            PlanningPreset::Balanced => base,
            PlanningPreset::DueDateFirst => base.with_priority_formula(
                PriorityWeightFormula::Weighted {
                    priority_weight: 1.0,
                    urgency_weight: 1.0,
                },
            ),
            PlanningPreset::CostFirst => base.with_procurement(ProcurementStrategy {
                price_weight: 3.0,
                reliability_weight: 1.0,
                lead_time_weight: 1.0,
                ..ProcurementStrategy::default()
            }),
            PlanningPreset::ReliabilityFirst => base.with_procurement(ProcurementStrategy {
                price_weight: 1.0,
                reliability_weight: 3.0,
                lead_time_weight: 1.0,
                safety_stock_multiplier: 1.2,
                ..ProcurementStrategy::default()
            }),
        }
    }
}

impl fmt::Display for PlanningPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PlanningPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "balanced" => Ok(PlanningPreset::Balanced),
            "due_date_first" | "due-date-first" => Ok(PlanningPreset::DueDateFirst),
            "cost_first" | "cost-first" => Ok(PlanningPreset::CostFirst),
            "reliability_first" | "reliability-first" => Ok(PlanningPreset::ReliabilityFirst),
            other => Err(format!("未知预设方案: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configuration_is_valid() {
        let config = PlanningConfiguration::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.lookahead(), Duration::days(14));
        assert_eq!(config.setup_time_buffer(), Duration::zero());
    }

    #[test]
    fn test_validate_rejects_negative_weights() {
        let mut config = PlanningConfiguration::named("bad");
        config.procurement.price_weight = -1.0;
        assert!(config.validate().unwrap_err().contains("price_weight"));

        let mut config = PlanningConfiguration::named("bad");
        config.setup_time_factor = f64::NAN;
        assert!(config.validate().is_err());

        let config = PlanningConfiguration::named("bad").with_horizon_days(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_days() {
        let config = PlanningConfiguration::named("far").with_horizon_days(u32::MAX);
        assert!(config.validate().unwrap_err().contains("planning_horizon_days"));

        let mut config = PlanningConfiguration::named("far");
        config.backlog_horizon_days = Some(MAX_HORIZON_DAYS + 1);
        assert!(config.validate().unwrap_err().contains("backlog_horizon_days"));

        let config = PlanningConfiguration::named("far")
            .with_setup_buffer_minutes(MAX_SETUP_BUFFER_MINUTES + 1);
        assert!(config.validate().unwrap_err().contains("setup_time_buffer_minutes"));

        let config = PlanningConfiguration::named("far").with_procurement(ProcurementStrategy {
            procurement_buffer_days: u32::MAX,
            ..ProcurementStrategy::default()
        });
        assert!(config.validate().unwrap_err().contains("procurement_buffer_days"));

        // 上限本身合法
        let config = PlanningConfiguration::named("edge").with_horizon_days(MAX_HORIZON_DAYS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_weighted_formula_rewards_overdue_orders() {
        let formula = PriorityWeightFormula::Weighted {
            priority_weight: 1.0,
            urgency_weight: 0.5,
        };
        // 逾期2天: 5 + 1
        assert_eq!(formula.weight(5.0, -2), 6.0);
        // 10天后到期: 5 - 5
        assert_eq!(formula.weight(5.0, 10), 0.0);
        assert_eq!(PriorityWeightFormula::PriorityOnly.weight(5.0, 10), 5.0);
    }

    #[test]
    fn test_presets_parse_and_validate() {
        for preset in PlanningPreset::ALL {
            let parsed: PlanningPreset = preset.as_str().parse().unwrap();
            assert_eq!(parsed, preset);
            let config = preset.configuration();
            assert_eq!(config.name, preset.as_str());
            assert!(config.validate().is_ok());
        }
        assert_eq!("Cost-First".parse::<PlanningPreset>(), Ok(PlanningPreset::CostFirst));
        assert!("fastest".parse::<PlanningPreset>().is_err());
    }

    #[test]
    fn test_configuration_serde_fills_defaults() {
        let config: PlanningConfiguration =
            serde_json::from_str(r#"{"name":"night","setup_time_buffer_minutes":30}"#).unwrap();
        assert_eq!(config.name, "night");
        assert_eq!(config.setup_time_buffer_minutes, 30);
        assert_eq!(config.planning_horizon_days, 14);
        assert_eq!(config.procurement, ProcurementStrategy::default());
    }
}

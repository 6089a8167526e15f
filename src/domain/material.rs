// ==========================================
// 专机制造排产系统 - 物料与供应商领域模型
// ==========================================
// 职责: 物料库存快照、可选供应商评分、供应商评价记录
// 说明: 供应商主数据维护不在本系统范围,只消费评分
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// SupplierScore - 供应商评分（物料维度）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierScore {
    pub supplier_id: String,
    pub name: String,
    pub reliability: f64,               // 交付可靠性 0..=1
    pub price: f64,                     // 价格得分 0..=1（越高越便宜）
    #[serde(default)]
    pub lead_time_days: Option<u32>,    // 供应商提前期（缺省取物料提前期）
}

impl SupplierScore {
    pub fn new(supplier_id: &str, reliability: f64, price: f64, lead_time_days: Option<u32>) -> Self {
        Self {
            supplier_id: supplier_id.to_string(),
            name: supplier_id.to_string(),
            reliability,
            price,
            lead_time_days,
        }
    }
}

// ==========================================
// SupplierEvaluation - 供应商评价记录
// ==========================================
// 评分 0..=1；综合分 = 三项均值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierEvaluation {
    pub supplier_id: String,
    pub quality: f64,
    pub delivery_reliability: f64,
    pub communication: f64,
}

impl SupplierEvaluation {
    pub fn overall(&self) -> f64 {
        (self.quality + self.delivery_reliability + self.communication) / 3.0
    }
}

// ==========================================
// MaterialItem - 物料
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialItem {
    pub id: String,
    pub name: String,
    pub unit: String,
    pub on_hand: f64,          // 当前库存
    #[serde(default)]
    pub safety_stock: f64,     // 安全库存
    #[serde(default)]
    pub lead_time_days: u32,   // 物料提前期（天）
    #[serde(default)]
    pub reorder_point: Option<f64>, // 再订货点（预计库存低于该值即补货）
    #[serde(default)]
    pub suppliers: Vec<SupplierScore>,
}

impl MaterialItem {
    pub fn new(id: &str, unit: &str, on_hand: f64, safety_stock: f64, lead_time_days: u32) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            unit: unit.to_string(),
            on_hand,
            safety_stock,
            lead_time_days,
            reorder_point: None,
            suppliers: Vec::new(),
        }
    }

    pub fn with_reorder_point(mut self, reorder_point: f64) -> Self {
        self.reorder_point = Some(reorder_point);
        self
    }

    pub fn with_supplier(mut self, supplier: SupplierScore) -> Self {
        self.suppliers.push(supplier);
        self
    }
}

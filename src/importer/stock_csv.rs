// ==========================================
// 专机制造排产系统 - 库存 CSV 导入
// ==========================================
// 职责: 读取库存盘点 CSV,覆盖快照中的库存/安全库存
// 列: item_id(物料编码), on_hand(库存), safety_stock(安全库存,可选),
//     reorder_point(再订货点,可选)
// ==========================================

use crate::domain::snapshot::PlanningSnapshot;
use crate::importer::error::{ImportError, ImportResult};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use tracing::{info, warn};

const ITEM_ID_COLUMNS: [&str; 2] = ["item_id", "物料编码"];
const ON_HAND_COLUMNS: [&str; 2] = ["on_hand", "库存"];
const SAFETY_STOCK_COLUMNS: [&str; 2] = ["safety_stock", "安全库存"];
const REORDER_POINT_COLUMNS: [&str; 2] = ["reorder_point", "再订货点"];

/// 单行库存记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    pub row_number: usize,
    pub item_id: String,
    pub on_hand: f64,
    pub safety_stock: Option<f64>,
    pub reorder_point: Option<f64>,
}

/// 库存覆盖汇总
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockApplySummary {
    pub updated: usize,
    /// 快照中不存在的物料编码
    pub unmatched: Vec<String>,
}

// ==========================================
// StockCsvImporter - 库存 CSV 导入器
// ==========================================
pub struct StockCsvImporter;

impl StockCsvImporter {
    /// 解析库存 CSV（跳过完全空白的行）
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<StockRecord>> {
        let path = file_path.as_ref();

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        if let Some(ext) = path.extension() {
            if ext != "csv" {
                return Err(ImportError::UnsupportedFormat(
                    ext.to_string_lossy().to_string(),
                ));
            }
        }

        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        // 表头 → 列号
        let headers: HashMap<String, usize> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(idx, h)| (h.trim().to_lowercase(), idx))
            .collect();
        let item_col = find_column(&headers, &ITEM_ID_COLUMNS)
            .ok_or_else(|| ImportError::MissingColumn("item_id".to_string()))?;
        let on_hand_col = find_column(&headers, &ON_HAND_COLUMNS)
            .ok_or_else(|| ImportError::MissingColumn("on_hand".to_string()))?;
        let safety_col = find_column(&headers, &SAFETY_STOCK_COLUMNS);
        let reorder_col = find_column(&headers, &REORDER_POINT_COLUMNS);

        let mut records = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            // 数据行从第2行开始（第1行为表头）
            let row_number = row_idx + 2;

            if record.iter().all(|v| v.trim().is_empty()) {
                continue;
            }

            let item_id = record.get(item_col).unwrap_or("").trim().to_string();
            if item_id.is_empty() {
                return Err(ImportError::TypeConversionError {
                    row: row_number,
                    field: "item_id".to_string(),
                    message: "物料编码为空".to_string(),
                });
            }

            let on_hand = parse_quantity(record.get(on_hand_col), row_number, "on_hand")?
                .ok_or_else(|| ImportError::TypeConversionError {
                    row: row_number,
                    field: "on_hand".to_string(),
                    message: "库存为空".to_string(),
                })?;
            let safety_stock = match safety_col {
                Some(col) => parse_quantity(record.get(col), row_number, "safety_stock")?,
                None => None,
            };
            let reorder_point = match reorder_col {
                Some(col) => parse_quantity(record.get(col), row_number, "reorder_point")?,
                None => None,
            };

            records.push(StockRecord {
                row_number,
                item_id,
                on_hand,
                safety_stock,
                reorder_point,
            });
        }

        info!(path = %path.display(), rows = records.len(), "库存 CSV 解析完成");
        Ok(records)
    }

    /// 覆盖快照中的库存（同一物料多行时以最后一行为准）
    pub fn apply(
        &self,
        snapshot: &mut PlanningSnapshot,
        records: &[StockRecord],
    ) -> StockApplySummary {
        let mut summary = StockApplySummary::default();
        for record in records {
            match snapshot.materials.iter_mut().find(|m| m.id == record.item_id) {
                Some(item) => {
                    item.on_hand = record.on_hand;
                    if let Some(safety) = record.safety_stock {
                        item.safety_stock = safety;
                    }
                    if record.reorder_point.is_some() {
                        item.reorder_point = record.reorder_point;
                    }
                    summary.updated += 1;
                }
                None => {
                    warn!(
                        item_id = %record.item_id,
                        row = record.row_number,
                        "库存行引用了未知物料"
                    );
                    summary.unmatched.push(record.item_id.clone());
                }
            }
        }
        summary
    }
}

fn find_column(headers: &HashMap<String, usize>, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|name| headers.get(*name).copied())
}

fn parse_quantity(value: Option<&str>, row: usize, field: &str) -> ImportResult<Option<f64>> {
    let raw = value.unwrap_or("").trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let parsed: f64 = raw.parse().map_err(|_| ImportError::TypeConversionError {
        row,
        field: field.to_string(),
        message: format!("无法解析为数字: {}", raw),
    })?;
    if !parsed.is_finite() || parsed < 0.0 {
        return Err(ImportError::TypeConversionError {
            row,
            field: field.to_string(),
            message: format!("数量必须为非负数: {}", raw),
        });
    }
    Ok(Some(parsed))
}

// ==========================================
// 专机制造排产系统 - 导入层
// ==========================================
// 职责: 外部数据导入,生成只读排产快照
// 支持: JSON 快照, CSV 库存盘点
// ==========================================

// 模块声明
pub mod error;
pub mod snapshot_importer;
pub mod snapshot_validator;
pub mod stock_csv;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use snapshot_importer::{JsonSnapshotImporter, SnapshotImporter};
pub use snapshot_validator::{DqLevel, DqReport, DqViolation, SnapshotValidator};
pub use stock_csv::{StockApplySummary, StockCsvImporter, StockRecord};

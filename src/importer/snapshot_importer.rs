// ==========================================
// 专机制造排产系统 - 排产快照导入
// ==========================================
// 职责: 从外部文件加载只读排产快照
// 说明: 主数据持久化属于外部系统,本模块只负责读取其导出
// ==========================================

use crate::domain::snapshot::PlanningSnapshot;
use crate::importer::error::{ImportError, ImportResult};
use async_trait::async_trait;
use std::path::Path;
use tracing::{info, instrument};

// ==========================================
// SnapshotImporter Trait
// ==========================================
// 实现者: JsonSnapshotImporter（测试中可替换为内存实现）
#[async_trait]
pub trait SnapshotImporter: Send + Sync {
    /// 加载排产快照
    ///
    /// # 返回
    /// - Ok(PlanningSnapshot): 未经数据质量校验的原始快照
    /// - Err: 文件不存在、格式不支持、解析失败
    async fn load(&self, path: &Path) -> ImportResult<PlanningSnapshot>;
}

// ==========================================
// JsonSnapshotImporter - JSON 快照导入
// ==========================================
pub struct JsonSnapshotImporter;

impl JsonSnapshotImporter {
    /// 从内存 JSON 文本解析
    pub fn parse_str(&self, json: &str) -> ImportResult<PlanningSnapshot> {
        Ok(serde_json::from_str(json)?)
    }
}

#[async_trait]
impl SnapshotImporter for JsonSnapshotImporter {
    #[instrument(skip(self), fields(path = %path.display()))]
    async fn load(&self, path: &Path) -> ImportResult<PlanningSnapshot> {
        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        if let Some(ext) = path.extension() {
            if ext != "json" {
                return Err(ImportError::UnsupportedFormat(
                    ext.to_string_lossy().to_string(),
                ));
            }
        }

        let text = tokio::fs::read_to_string(path).await?;
        let snapshot = self.parse_str(&text)?;

        info!(
            planning_start = %snapshot.planning_start,
            calendars = snapshot.calendars.len(),
            resources = snapshot.resources.len(),
            orders = snapshot.orders.len(),
            materials = snapshot.materials.len(),
            "排产快照加载完成"
        );
        Ok(snapshot)
    }
}

// ==========================================
// 专机制造排产系统 - 排产 API
// ==========================================
// 职责: 排产/多场景模拟/计划实际对比的统一入口
// 流程: 快照校验 → 配置解析 → 引擎运行（阻塞线程池）
// 红线: 校验存在 Error 级问题时拒绝排产
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_reader_trait::PlanningConfigReader;
use crate::domain::order::{ManufacturingOrder, TimeTrackingEntry};
use crate::domain::snapshot::PlanningSnapshot;
use crate::engine::orchestrator::{PlanningOrchestrator, PlanningResult};
use crate::engine::simulator::{ScenarioReport, ScenarioSimulator};
use crate::engine::tracking::{TrackingEngine, TrackingReport};
use crate::importer::error::ImportError;
use crate::importer::snapshot_validator::{DqReport, SnapshotValidator};
use std::sync::Arc;
use tracing::{info, instrument, warn};

// ==========================================
// PlanningApi - 排产 API
// ==========================================
pub struct PlanningApi<C: PlanningConfigReader> {
    config_reader: Arc<C>,
    simulator: ScenarioSimulator,
    tracking: TrackingEngine,
}

impl<C: PlanningConfigReader> PlanningApi<C> {
    /// 创建新的 PlanningApi 实例
    ///
    /// # 参数
    /// - config_reader: 配置读取器（生产为 ConfigManager,测试为内存实现）
    pub fn new(config_reader: Arc<C>) -> Self {
        Self {
            config_reader,
            simulator: ScenarioSimulator::new(),
            tracking: TrackingEngine::new(),
        }
    }

    /// 快照数据质量校验
    ///
    /// # 返回
    /// - Ok(DqReport): 无 Error 级问题（可能含 Warning）
    /// - Err(ApiError::ValidationError): 存在 Error 级问题
    pub fn validate_snapshot(&self, snapshot: &PlanningSnapshot) -> ApiResult<DqReport> {
        let report = SnapshotValidator.validate(snapshot);

        for violation in &report.violations {
            warn!(
                level = ?violation.level,
                entity = %violation.entity,
                entity_id = %violation.entity_id,
                message = %violation.message,
                "快照数据质量问题"
            );
        }

        if let Some(first) = report.first_error() {
            return Err(ImportError::ValidationFailed {
                errors: report.error_count(),
                first: format!("{}({}): {}", first.entity, first.entity_id, first.message),
            }
            .into());
        }
        Ok(report)
    }

    /// 执行一次排产
    ///
    /// # 参数
    /// - snapshot: 只读快照
    /// - profile: 配置名（None 使用默认配置）
    #[instrument(skip(self, snapshot))]
    pub async fn plan(
        &self,
        snapshot: Arc<PlanningSnapshot>,
        profile: Option<&str>,
    ) -> ApiResult<PlanningResult> {
        self.validate_snapshot(&snapshot)?;
        let config = self.config_reader.resolve_configuration(profile).await?;

        info!(config = %config.name, "排产配置已解析");

        let result = tokio::task::spawn_blocking(move || {
            PlanningOrchestrator::new().run(&snapshot, &config)
        })
        .await
        .map_err(|e| ApiError::InternalError(format!("排产任务执行失败: {}", e)))??;

        Ok(result)
    }

    /// 多场景模拟
    ///
    /// # 参数
    /// - profiles: 场景配置名（第一个为对比基准）
    ///
    /// # 返回
    /// 每个场景一份报告,顺序与 profiles 一致；单个场景失败不影响其它场景
    #[instrument(skip(self, snapshot), fields(profiles = profiles.len()))]
    pub async fn simulate(
        &self,
        snapshot: Arc<PlanningSnapshot>,
        profiles: &[String],
    ) -> ApiResult<Vec<ScenarioReport>> {
        if profiles.is_empty() {
            return Err(ApiError::InvalidInput("至少需要一个场景配置".to_string()));
        }
        self.validate_snapshot(&snapshot)?;

        let mut variants = Vec::with_capacity(profiles.len());
        for name in profiles {
            variants.push(self.config_reader.resolve_configuration(Some(name)).await?);
        }

        Ok(self.simulator.simulate(snapshot, variants).await)
    }

    /// 计划工时 vs 实际报工
    pub fn plan_vs_actual(
        &self,
        orders: &[ManufacturingOrder],
        entries: &[TimeTrackingEntry],
    ) -> TrackingReport {
        self.tracking.plan_vs_actual(orders, entries)
    }
}

// ==========================================
// 专机制造排产系统 - 多场景模拟
// ==========================================
// 职责: 同一快照 × 多套配置,并行运行并汇总对比指标
// 红线:
// - 各场景共享只读快照（Arc）,运行内状态互相隔离
// - 单个场景失败只影响自身报告
// - 报告顺序与输入配置顺序一致
// ==========================================

use crate::config::planning_config::PlanningConfiguration;
use crate::domain::snapshot::PlanningSnapshot;
use crate::engine::orchestrator::{PlanMetrics, PlanningOrchestrator, PlanningResult};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};

// ==========================================
// ScenarioOutcome / ScenarioReport - 场景结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScenarioOutcome {
    Completed { result: Box<PlanningResult> },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub configuration_name: String,
    pub outcome: ScenarioOutcome,
}

impl ScenarioReport {
    pub fn metrics(&self) -> Option<&PlanMetrics> {
        match &self.outcome {
            ScenarioOutcome::Completed { result } => Some(&result.metrics),
            ScenarioOutcome::Failed { .. } => None,
        }
    }

    pub fn result(&self) -> Option<&PlanningResult> {
        match &self.outcome {
            ScenarioOutcome::Completed { result } => Some(result.as_ref()),
            ScenarioOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, ScenarioOutcome::Failed { .. })
    }
}

/// 相对基准场景的指标差（场景 - 基准）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDelta {
    pub configuration_name: String,
    pub makespan_hours: f64,
    pub total_overload_hours: f64,
    pub late_procurement_count: i64,
    pub unroutable_count: i64,
    pub assigned_count: i64,
    pub procurement_count: i64,
}

// ==========================================
// ScenarioSimulator - 多场景模拟器
// ==========================================
pub struct ScenarioSimulator {
    // 无状态: 每个场景在阻塞线程池中独立构建编排器
}

impl ScenarioSimulator {
    pub fn new() -> Self {
        Self {}
    }

    /// 并行运行全部场景
    ///
    /// # 参数
    /// - snapshot: 共享只读快照
    /// - variants: 场景配置（报告按此顺序返回）
    #[instrument(skip_all, fields(variants = variants.len()))]
    pub async fn simulate(
        &self,
        snapshot: Arc<PlanningSnapshot>,
        variants: Vec<PlanningConfiguration>,
    ) -> Vec<ScenarioReport> {
        info!(count = variants.len(), "开始多场景模拟");

        let tasks = variants.into_iter().map(|config| {
            let snapshot = Arc::clone(&snapshot);
            async move {
                let name = config.name.clone();
                let joined = tokio::task::spawn_blocking(move || {
                    PlanningOrchestrator::new().run(&snapshot, &config)
                })
                .await;

                let outcome = match joined {
                    Ok(Ok(result)) => ScenarioOutcome::Completed {
                        result: Box::new(result),
                    },
                    Ok(Err(e)) => {
                        error!(scenario = %name, error = %e, "场景运行失败");
                        ScenarioOutcome::Failed {
                            reason: e.to_string(),
                        }
                    }
                    Err(e) => {
                        error!(scenario = %name, error = %e, "场景任务执行失败");
                        ScenarioOutcome::Failed {
                            reason: format!("任务执行失败: {}", e),
                        }
                    }
                };

                ScenarioReport {
                    configuration_name: name,
                    outcome,
                }
            }
        });

        let reports = join_all(tasks).await;

        info!(
            total = reports.len(),
            failed = reports.iter().filter(|r| r.is_failed()).count(),
            "多场景模拟完成"
        );
        reports
    }

    /// 同步版本（逐个运行,用于无异步运行时的调用方）
    pub fn simulate_blocking(
        &self,
        snapshot: &PlanningSnapshot,
        variants: &[PlanningConfiguration],
    ) -> Vec<ScenarioReport> {
        let orchestrator = PlanningOrchestrator::new();
        variants
            .iter()
            .map(|config| ScenarioReport {
                configuration_name: config.name.clone(),
                outcome: match orchestrator.run(snapshot, config) {
                    Ok(result) => ScenarioOutcome::Completed {
                        result: Box::new(result),
                    },
                    Err(e) => ScenarioOutcome::Failed {
                        reason: e.to_string(),
                    },
                },
            })
            .collect()
    }
}

impl Default for ScenarioSimulator {
    fn default() -> Self {
        Self::new()
    }
}

/// 以第一个场景为基准计算指标差
///
/// 基准失败时无法对比,返回空；失败的场景不出现在结果中
pub fn compare_to_baseline(reports: &[ScenarioReport]) -> Vec<ScenarioDelta> {
    let Some(baseline) = reports.first().and_then(|r| r.metrics()) else {
        return Vec::new();
    };

    reports
        .iter()
        .filter_map(|report| {
            let m = report.metrics()?;
            Some(ScenarioDelta {
                configuration_name: report.configuration_name.clone(),
                makespan_hours: m.makespan_hours - baseline.makespan_hours,
                total_overload_hours: m.total_overload_hours - baseline.total_overload_hours,
                late_procurement_count: m.late_procurement_count as i64
                    - baseline.late_procurement_count as i64,
                unroutable_count: m.unroutable_count as i64 - baseline.unroutable_count as i64,
                assigned_count: m.assigned_count as i64 - baseline.assigned_count as i64,
                procurement_count: m.procurement_count as i64
                    - baseline.procurement_count as i64,
            })
        })
        .collect()
}

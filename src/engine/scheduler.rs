// ==========================================
// 专机制造排产系统 - 排产引擎
// ==========================================
// 职责: 把已排序订单的工序贪心分配到机器资源
// 输入: 排产快照 + 资源目录 + 已排序订单 + 排产配置
// 输出: 工序分配 + 不可路由工序清单
// 红线:
// - 同一资源上的分配互不重叠
// - 工序开工 >= 前驱完工 + 工序间缓冲
// - 不回溯、不做全局优化
// - 资源空闲时刻表属于单次调用,不跨运行共享
// ==========================================

use crate::config::planning_config::PlanningConfiguration;
use crate::domain::order::{ManufacturingOrder, Operation, OperationProgress};
use crate::domain::plan::{ScheduleAssignment, UnroutableOperation, UnroutableReason};
use crate::engine::calendar::{duration_hours, hours_to_duration, CalendarEngine, WorkSpan};
use crate::engine::deadline::Deadline;
use crate::engine::error::PlanningError;
use crate::engine::priority::RankedOrder;
use crate::engine::resource_catalog::ResourceCatalog;
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, instrument, warn};

/// 排产引擎输出（部分排产 + 显式不可路由清单）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleOutcome {
    pub assignments: Vec<ScheduleAssignment>,
    pub unroutable: Vec<UnroutableOperation>,
}

impl ScheduleOutcome {
    /// 最晚完工时刻
    pub fn last_end(&self) -> Option<NaiveDateTime> {
        self.assignments.iter().map(|a| a.end).max()
    }
}

/// 单个候选资源的投影结果
struct Candidate<'a> {
    resource_id: &'a str,
    span: WorkSpan,
    duration: Duration,
}

// ==========================================
// Scheduler - 排产引擎
// ==========================================
pub struct Scheduler {
    calendar_engine: CalendarEngine,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            calendar_engine: CalendarEngine::new(),
        }
    }

    /// 贪心排产
    ///
    /// 规则:
    /// 1) 就绪队列按 (订单名次, 工序序号) 出队,前驱未结束的工序不入队
    /// 2) 已完工工序直接放行,其完工时刻（缺省取排产起点）作为前驱完工
    /// 3) 每个候选资源: 最早开工 = max(资源空闲, 前驱完工 + 缓冲, 排产起点),
    ///    加工时长 = (准备 × 系数 + 加工) ÷ 效率,经日历投影得到完工
    /// 4) 完工最早者胜出,并列取资源编号小者
    ///    （贪心裁决: 多资源工艺下增大缓冲可能改变并列结果,完工跨度不保证单调）
    /// 5) 失败工序及其全部后续工序记入不可路由清单
    ///
    /// # 错误
    /// 运行期限到期 → PlanningTimeout（不返回部分结果）
    #[instrument(skip_all, fields(orders = ranked.len(), config = %config.name))]
    pub fn schedule(
        &self,
        ranked: &[RankedOrder<'_>],
        catalog: &ResourceCatalog,
        config: &PlanningConfiguration,
        planning_start: NaiveDateTime,
        deadline: &Deadline,
    ) -> Result<ScheduleOutcome, PlanningError> {
        let buffer = config.setup_time_buffer();
        let lookahead = config.lookahead();

        let mut outcome = ScheduleOutcome::default();
        // 运行内状态: 资源空闲时刻 / 订单前驱完工时刻
        let mut free_time: HashMap<&str, NaiveDateTime> = HashMap::new();
        let mut predecessor_end: HashMap<usize, NaiveDateTime> = HashMap::new();

        let mut ready: BTreeSet<(usize, usize)> = ranked
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.order.operations.is_empty())
            .map(|(rank, _)| (rank, 0))
            .collect();

        while let Some((rank, index)) = ready.pop_first() {
            deadline.check()?;

            let order = ranked[rank].order;
            let operation = &order.operations[index];

            if let OperationProgress::Completed { finished_at } = operation.progress {
                predecessor_end.insert(rank, finished_at.unwrap_or(planning_start));
                if index + 1 < order.operations.len() {
                    ready.insert((rank, index + 1));
                }
                continue;
            }

            let mut earliest = planning_start;
            if order.predecessor_of(index).is_some() {
                if let Some(end) = predecessor_end.get(&rank) {
                    // 越界时取最大时刻,由日历投影报告前瞻耗尽
                    let released = end.checked_add_signed(buffer).unwrap_or(NaiveDateTime::MAX);
                    earliest = earliest.max(released);
                }
            }

            let eligible = catalog.eligible_resources(operation.process);
            if eligible.is_empty() {
                warn!(
                    order_id = %order.id,
                    operation_id = %operation.id,
                    process = %operation.process,
                    "无资源支持该工艺"
                );
                self.mark_unroutable(
                    &mut outcome,
                    order,
                    index,
                    UnroutableReason::NoEligibleResource,
                );
                continue;
            }

            let mut best: Option<Candidate<'_>> = None;
            let mut exhausted: Vec<String> = Vec::new();

            for resource in eligible {
                let Some(calendar) = catalog.calendar_of(resource) else {
                    exhausted.push(resource.id.clone());
                    continue;
                };
                let start_from = free_time
                    .get(resource.id.as_str())
                    .copied()
                    .unwrap_or(planning_start)
                    .max(earliest);
                let duration = hours_to_duration(self.processing_hours(
                    operation,
                    config,
                    resource.efficiency,
                ));

                match self.calendar_engine.allocate(
                    calendar,
                    start_from,
                    duration,
                    lookahead,
                    deadline,
                ) {
                    Ok(span) => {
                        let better = best
                            .as_ref()
                            .map_or(true, |current| span.end < current.span.end);
                        if better {
                            best = Some(Candidate {
                                resource_id: resource.id.as_str(),
                                span,
                                duration,
                            });
                        }
                    }
                    Err(err) => {
                        if let Some(run_failure) = err.clone().into_run_failure() {
                            return Err(run_failure);
                        }
                        debug!(resource_id = %resource.id, error = %err, "候选资源日历无产能");
                        exhausted.push(resource.id.clone());
                    }
                }
            }

            match best {
                Some(candidate) => {
                    debug!(
                        order_id = %order.id,
                        operation_id = %operation.id,
                        resource_id = candidate.resource_id,
                        start = %candidate.span.start,
                        end = %candidate.span.end,
                        "工序已分配"
                    );
                    free_time.insert(candidate.resource_id, candidate.span.end);
                    predecessor_end.insert(rank, candidate.span.end);
                    outcome.assignments.push(ScheduleAssignment {
                        order_id: order.id.clone(),
                        operation_id: operation.id.clone(),
                        operation_index: index,
                        resource_id: candidate.resource_id.to_string(),
                        start: candidate.span.start,
                        end: candidate.span.end,
                        working_hours: duration_hours(candidate.duration),
                    });
                    if index + 1 < order.operations.len() {
                        ready.insert((rank, index + 1));
                    }
                }
                None => {
                    warn!(
                        order_id = %order.id,
                        operation_id = %operation.id,
                        resources = %exhausted.join(","),
                        "候选资源日历在前瞻窗口内均无产能"
                    );
                    self.mark_unroutable(
                        &mut outcome,
                        order,
                        index,
                        UnroutableReason::CalendarExhausted {
                            resource_ids: exhausted,
                        },
                    );
                }
            }
        }

        info!(
            assigned = outcome.assignments.len(),
            unroutable = outcome.unroutable.len(),
            "排产完成"
        );
        Ok(outcome)
    }

    /// 工序在某资源上的加工工时（小时）
    pub fn processing_hours(
        &self,
        operation: &Operation,
        config: &PlanningConfiguration,
        efficiency: f64,
    ) -> f64 {
        let hours = operation.setup_hours.max(0.0) * config.setup_time_factor
            + operation.run_hours.max(0.0);
        hours / efficiency
    }

    /// 记录失败工序,并把其后续工序记为前驱不可路由
    fn mark_unroutable(
        &self,
        outcome: &mut ScheduleOutcome,
        order: &ManufacturingOrder,
        index: usize,
        reason: UnroutableReason,
    ) {
        let failed = &order.operations[index];
        outcome.unroutable.push(UnroutableOperation {
            order_id: order.id.clone(),
            operation_id: failed.id.clone(),
            process: failed.process,
            reason,
        });

        let mut predecessor_id = failed.id.clone();
        for successor in order.operations.iter().skip(index + 1) {
            outcome.unroutable.push(UnroutableOperation {
                order_id: order.id.clone(),
                operation_id: successor.id.clone(),
                process: successor.process,
                reason: UnroutableReason::PredecessorUnroutable {
                    predecessor_id: predecessor_id.clone(),
                },
            });
            predecessor_id = successor.id.clone();
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 专机制造排产系统 - 结果摘要
// ==========================================
// 职责: 把排产结果/场景报告渲染为本地化文本行（命令行输出）
// ==========================================

use crate::engine::orchestrator::PlanningResult;
use crate::engine::simulator::{ScenarioDelta, ScenarioOutcome, ScenarioReport};
use crate::engine::tracking::TrackingReport;
use crate::i18n::t_owned;

fn hours(value: f64) -> String {
    format!("{:.2}", value)
}

fn render(key: &str, args: &[(&str, String)]) -> String {
    t_owned(key, args)
}

/// 单次排产摘要
pub fn plan_summary(result: &PlanningResult) -> Vec<String> {
    let m = &result.metrics;
    let mut lines = vec![
        render(
            "report.plan_header",
            &[
                ("name", result.configuration_name.clone()),
                ("run_id", result.run_id.clone()),
            ],
        ),
        render("report.assigned", &[("count", m.assigned_count.to_string())]),
        render("report.makespan", &[("hours", hours(m.makespan_hours))]),
        render(
            "report.overloads",
            &[
                ("count", result.overloads.len().to_string()),
                ("hours", hours(m.total_overload_hours)),
            ],
        ),
        render("report.unroutable", &[("count", m.unroutable_count.to_string())]),
        render(
            "report.procurement",
            &[
                ("count", m.procurement_count.to_string()),
                ("late", m.late_procurement_count.to_string()),
            ],
        ),
    ];

    for op in &result.unroutable {
        lines.push(render(
            "report.unroutable_detail",
            &[
                ("order", op.order_id.clone()),
                ("operation", op.operation_id.clone()),
                ("reason", op.reason.to_string()),
            ],
        ));
    }

    if !result.unknown_items.is_empty() {
        lines.push(render(
            "report.unknown_items",
            &[("items", result.unknown_items.join(", "))],
        ));
    }
    lines
}

/// 多场景摘要（每个场景一行）
pub fn scenario_summary(reports: &[ScenarioReport]) -> Vec<String> {
    reports
        .iter()
        .map(|report| match &report.outcome {
            ScenarioOutcome::Completed { result } => {
                let m = &result.metrics;
                render(
                    "report.scenario_completed",
                    &[
                        ("name", report.configuration_name.clone()),
                        ("makespan", hours(m.makespan_hours)),
                        ("overload", hours(m.total_overload_hours)),
                        ("late", m.late_procurement_count.to_string()),
                        ("unroutable", m.unroutable_count.to_string()),
                    ],
                )
            }
            ScenarioOutcome::Failed { reason } => render(
                "report.scenario_failed",
                &[
                    ("name", report.configuration_name.clone()),
                    ("reason", reason.clone()),
                ],
            ),
        })
        .collect()
}

/// 相对基准的指标差
pub fn delta_summary(deltas: &[ScenarioDelta]) -> Vec<String> {
    deltas
        .iter()
        .skip(1)
        .map(|d| {
            render(
                "report.scenario_delta",
                &[
                    ("name", d.configuration_name.clone()),
                    ("makespan", format!("{:+.2}", d.makespan_hours)),
                    ("overload", format!("{:+.2}", d.total_overload_hours)),
                    ("late", format!("{:+}", d.late_procurement_count)),
                    ("unroutable", format!("{:+}", d.unroutable_count)),
                ],
            )
        })
        .collect()
}

/// 计划 vs 实际
pub fn tracking_summary(report: &TrackingReport) -> Vec<String> {
    report
        .orders
        .iter()
        .map(|row| {
            render(
                "report.tracking",
                &[
                    ("order", row.order_id.clone()),
                    ("planned", hours(row.planned_hours)),
                    ("actual", hours(row.actual_hours)),
                    ("variance", format!("{:+.2}", row.variance_hours)),
                ],
            )
        })
        .collect()
}

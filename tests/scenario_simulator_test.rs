// ==========================================
// 多场景模拟集成测试
// ==========================================
// 测试目标: 验证并行场景的隔离性、顺序与指标对比
// 覆盖范围: 缓冲单调性、失败场景隔离、并行与串行一致、基准对比
// ==========================================

mod helpers;

use chrono::Duration;
use helpers::test_data_builder::*;
use machining_aps::config::{PlanningConfiguration, PlanningPreset};
use machining_aps::domain::order::{ManufacturingOrder, Operation};
use machining_aps::domain::types::ManufacturingProcess;
use machining_aps::engine::{compare_to_baseline, ScenarioOutcome, ScenarioSimulator};
use machining_aps::PlanningSnapshot;
use std::sync::Arc;

/// 两个 铣 → 磨 订单,各工序 2h; 每种工艺只有一台资源
fn chain_snapshot() -> PlanningSnapshot {
    let mut builder = SnapshotBuilder::new()
        .machine("M-01", vec![ManufacturingProcess::Milling])
        .machine("G-01", vec![ManufacturingProcess::Grinding]);
    for (id, priority) in [("MO-1", 2.0), ("MO-2", 1.0)] {
        builder = builder.order(
            ManufacturingOrder::new(id, "C", priority, monday() + Duration::days(14))
                .with_operation(Operation::new("OP-10", ManufacturingProcess::Milling, 0.0, 2.0))
                .with_operation(Operation::new("OP-20", ManufacturingProcess::Grinding, 0.0, 2.0)),
        );
    }
    builder.build()
}

fn buffered(name: &str, minutes: u32) -> PlanningConfiguration {
    PlanningConfiguration::named(name).with_setup_buffer_minutes(minutes)
}

/// 每种工艺只有一台资源时不存在资源并列,缓冲越大完工跨度越长
/// （多资源并列的情况见 scheduler_engine_test）
#[tokio::test]
async fn test_larger_buffer_never_shortens_single_resource_chains() {
    let snapshot = Arc::new(chain_snapshot());
    let variants = vec![
        buffered("buffer_0", 0),
        buffered("buffer_30", 30),
        buffered("buffer_90", 90),
    ];

    let reports = ScenarioSimulator::new().simulate(snapshot, variants).await;
    let makespans: Vec<f64> = reports
        .iter()
        .map(|r| r.metrics().unwrap().makespan_hours)
        .collect();

    // 0: MO-2 磨完 08+2+2+2 = 14:00 → 6h
    assert_eq!(makespans[0], 6.0);
    assert!(makespans.windows(2).all(|w| w[0] <= w[1]), "{:?}", makespans);
    assert!(makespans[2] > makespans[0]);
}

#[tokio::test]
async fn test_reports_keep_variant_order_and_failures_are_isolated() {
    let snapshot = Arc::new(workshop_snapshot());
    let variants = vec![
        PlanningConfiguration::named("baseline"),
        PlanningConfiguration::named("too_slow").with_run_timeout_ms(0),
        PlanningConfiguration::named("no_horizon").with_horizon_days(0),
        PlanningPreset::DueDateFirst.configuration(),
    ];

    let reports = ScenarioSimulator::new().simulate(snapshot, variants).await;
    let names: Vec<&str> = reports
        .iter()
        .map(|r| r.configuration_name.as_str())
        .collect();
    assert_eq!(names, vec!["baseline", "too_slow", "no_horizon", "due_date_first"]);

    assert!(!reports[0].is_failed());
    match &reports[1].outcome {
        ScenarioOutcome::Failed { reason } => assert!(reason.contains("超时")),
        other => panic!("unexpected: {:?}", other),
    }
    assert!(reports[2].is_failed());
    assert!(!reports[3].is_failed());

    assert_eq!(reports[0].metrics().unwrap().assigned_count, 18);
    assert_eq!(reports[3].metrics().unwrap().assigned_count, 18);
}

#[tokio::test]
async fn test_parallel_results_match_sequential_runs() {
    let snapshot = workshop_snapshot();
    let variants: Vec<PlanningConfiguration> = PlanningPreset::ALL
        .iter()
        .map(|preset| preset.configuration())
        .collect();

    let simulator = ScenarioSimulator::new();
    let sequential = simulator.simulate_blocking(&snapshot, &variants);
    let parallel = simulator.simulate(Arc::new(snapshot), variants).await;

    assert_eq!(sequential.len(), parallel.len());
    for (s, p) in sequential.iter().zip(&parallel) {
        assert_eq!(s.configuration_name, p.configuration_name);
        assert_eq!(s.metrics(), p.metrics());
        assert_eq!(
            s.result().map(|r| &r.assignments),
            p.result().map(|r| &r.assignments)
        );
    }
}

#[tokio::test]
async fn test_compare_to_baseline_reports_deltas() {
    let snapshot = Arc::new(chain_snapshot());
    let variants = vec![
        buffered("baseline", 0),
        PlanningConfiguration::named("broken").with_horizon_days(0),
        buffered("buffer_60", 60),
    ];

    let reports = ScenarioSimulator::new().simulate(snapshot, variants).await;
    let deltas = compare_to_baseline(&reports);

    // 失败场景不出现
    assert_eq!(deltas.len(), 2);
    assert_eq!(deltas[0].configuration_name, "baseline");
    assert_eq!(deltas[0].makespan_hours, 0.0);
    assert_eq!(deltas[1].configuration_name, "buffer_60");
    assert!(deltas[1].makespan_hours > 0.0);
    assert_eq!(deltas[1].assigned_count, 0);
}

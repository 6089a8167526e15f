// ==========================================
// 专机制造排产系统 - 产能超载识别
// ==========================================
// 职责: 按统计粒度比较资源的需求工时与可用工时
// 输入: 工序分配 + 资源目录 + 统计粒度
// 输出: 超载记录（需求 > 可用）
// 说明:
// - 需求 = 统计窗口内分配占用的日历工作时长
// - 可用 = 窗口内日历产能,若资源声明了周负荷上限,
//   按该周日历工时比例折算后取较小值
// ==========================================

use crate::domain::calendar::ShiftCalendar;
use crate::domain::plan::{OverloadRecord, ScheduleAssignment};
use crate::domain::resource::MachineResource;
use crate::domain::types::OverloadBucket;
use crate::engine::calendar::{day_start, duration_hours, CalendarEngine};
use crate::engine::resource_catalog::ResourceCatalog;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, instrument, warn};

/// 需求超出可用的判定容差（小时）
const OVERLOAD_TOLERANCE_HOURS: f64 = 1e-6;

// ==========================================
// OverloadDetector - 超载识别引擎
// ==========================================
pub struct OverloadDetector {
    calendar_engine: CalendarEngine,
}

impl OverloadDetector {
    pub fn new() -> Self {
        Self {
            calendar_engine: CalendarEngine::new(),
        }
    }

    /// 扫描全部资源的统计窗口
    ///
    /// 输出按 (资源编号, 窗口起点) 排序
    #[instrument(skip(self, assignments, catalog), fields(assignments = assignments.len()))]
    pub fn detect(
        &self,
        assignments: &[ScheduleAssignment],
        catalog: &ResourceCatalog,
        bucket: OverloadBucket,
        planning_start: NaiveDateTime,
    ) -> Vec<OverloadRecord> {
        let mut by_resource: BTreeMap<&str, Vec<&ScheduleAssignment>> = BTreeMap::new();
        for assignment in assignments.iter().filter(|a| a.end > a.start) {
            by_resource
                .entry(assignment.resource_id.as_str())
                .or_default()
                .push(assignment);
        }

        let mut records = Vec::new();
        for (resource_id, resource_assignments) in by_resource {
            let Some(resource) = catalog.resource(resource_id) else {
                warn!(resource_id, "分配引用了目录外资源，跳过超载扫描");
                continue;
            };
            let Some(calendar) = catalog.calendar_of(resource) else {
                continue;
            };

            for (window_start, window_end) in
                self.windows(&resource_assignments, bucket, planning_start)
            {
                let required: f64 = resource_assignments
                    .iter()
                    .map(|a| {
                        let from = a.start.max(window_start);
                        let to = a.end.min(window_end);
                        duration_hours(self.calendar_engine.available_capacity(calendar, from, to))
                    })
                    .sum();
                let available = self.available_hours(calendar, resource, window_start, window_end);

                if required > available + OVERLOAD_TOLERANCE_HOURS {
                    records.push(OverloadRecord {
                        resource_id: resource_id.to_string(),
                        window_start,
                        window_end,
                        required_hours: required,
                        available_hours: available,
                        surplus_hours: required - available,
                    });
                }
            }
        }

        info!(overloads = records.len(), bucket = %bucket, "超载扫描完成");
        records
    }

    /// 窗口内可用工时（日历产能,受周负荷上限约束）
    pub fn available_hours(
        &self,
        calendar: &ShiftCalendar,
        resource: &MachineResource,
        window_start: NaiveDateTime,
        window_end: NaiveDateTime,
    ) -> f64 {
        let Some(weekly_cap) = resource.weekly_capacity_hours else {
            return duration_hours(
                self.calendar_engine
                    .available_capacity(calendar, window_start, window_end),
            );
        };

        let mut total = 0.0;
        let mut week = day_start(week_monday(window_start.date()));
        while week < window_end {
            let week_end = week + Duration::days(7);
            let part = duration_hours(self.calendar_engine.available_capacity(
                calendar,
                window_start.max(week),
                window_end.min(week_end),
            ));
            let week_hours =
                duration_hours(self.calendar_engine.available_capacity(calendar, week, week_end));
            if week_hours > 0.0 {
                total += part.min(weekly_cap.max(0.0) * part / week_hours);
            }
            week = week_end;
        }
        total
    }

    /// 资源的统计窗口（按起点升序,只含有分配的窗口）
    fn windows(
        &self,
        assignments: &[&ScheduleAssignment],
        bucket: OverloadBucket,
        planning_start: NaiveDateTime,
    ) -> Vec<(NaiveDateTime, NaiveDateTime)> {
        match bucket {
            OverloadBucket::Horizon => {
                let last_end = assignments.iter().map(|a| a.end).max();
                match last_end {
                    Some(end) if end > planning_start => vec![(planning_start, end)],
                    _ => Vec::new(),
                }
            }
            OverloadBucket::Daily | OverloadBucket::Weekly => {
                let step = match bucket {
                    OverloadBucket::Weekly => 7,
                    _ => 1,
                };
                let mut starts: BTreeSet<NaiveDate> = BTreeSet::new();
                for assignment in assignments {
                    let last = (assignment.end - Duration::seconds(1)).date();
                    let mut day = assignment.start.date();
                    while day <= last {
                        starts.insert(bucket_start(day, bucket));
                        day += Duration::days(1);
                    }
                }
                starts
                    .into_iter()
                    .map(|d| (day_start(d), day_start(d) + Duration::days(step)))
                    .collect()
            }
        }
    }
}

impl Default for OverloadDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn week_monday(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

fn bucket_start(date: NaiveDate, bucket: OverloadBucket) -> NaiveDate {
    match bucket {
        OverloadBucket::Weekly => week_monday(date),
        _ => date,
    }
}

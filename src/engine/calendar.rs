// ==========================================
// 专机制造排产系统 - 日历引擎
// ==========================================
// 职责: 日历时间 ↔ 可用产能时间的换算
// 输入: 班次日历 + 时间范围 / 起点 + 所需工时
// 输出: 工作子区间 / 可用产能 / 完工时刻
// 红线: 前瞻窗口内无产能必须失败（CalendarExhausted）,不得无限搜索
// ==========================================

use crate::domain::calendar::ShiftCalendar;
use crate::engine::deadline::Deadline;
use crate::engine::error::CalendarError;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// 工时（小时）→ Duration（秒精度）
pub fn hours_to_duration(hours: f64) -> Duration {
    if !hours.is_finite() || hours <= 0.0 {
        return Duration::zero();
    }
    Duration::try_seconds((hours * 3600.0).round() as i64).unwrap_or(Duration::MAX)
}

/// 当日零点
pub fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::default())
}

/// Duration → 小时
pub fn duration_hours(duration: Duration) -> f64 {
    duration.num_seconds() as f64 / 3600.0
}

// ==========================================
// WorkSpan - 日历投影结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkSpan {
    pub start: NaiveDateTime, // 第一个工作时刻
    pub end: NaiveDateTime,   // 累计工时达到要求的时刻
}

// ==========================================
// CalendarEngine - 日历引擎
// ==========================================
pub struct CalendarEngine {
    // 无状态引擎
}

impl CalendarEngine {
    pub fn new() -> Self {
        Self {}
    }

    /// 时间范围内的工作子区间（有序、合并、已按例外裁剪）
    pub fn working_intervals(
        &self,
        calendar: &ShiftCalendar,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Vec<(NaiveDateTime, NaiveDateTime)> {
        if to <= from {
            return Vec::new();
        }

        let mut intervals = Vec::new();
        // 从前一日开始，覆盖跨午夜班次
        let mut day = from.date().pred_opt().unwrap_or(from.date());
        while day <= to.date() {
            for (start, end) in calendar.day_windows(day) {
                let start = start.max(from);
                let end = end.min(to);
                if start < end {
                    intervals.push((start, end));
                }
            }
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }

        merge_intervals(intervals)
    }

    /// 时间范围内的可用产能
    pub fn available_capacity(
        &self,
        calendar: &ShiftCalendar,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Duration {
        self.working_intervals(calendar, from, to)
            .into_iter()
            .fold(Duration::zero(), |acc, (start, end)| acc + (end - start))
    }

    /// 从 `from` 起累计 `duration` 工时后的完工时刻
    pub fn advance(
        &self,
        calendar: &ShiftCalendar,
        from: NaiveDateTime,
        duration: Duration,
        lookahead: Duration,
        deadline: &Deadline,
    ) -> Result<NaiveDateTime, CalendarError> {
        self.allocate(calendar, from, duration, lookahead, deadline)
            .map(|span| span.end)
    }

    /// 把所需工时投影为墙钟区间，跳过非工作时间
    ///
    /// 规则:
    /// 1) 开始时刻 = `from` 之后的第一个工作时刻
    /// 2) 完工时刻 = 工作时长累计达到 `duration` 的时刻
    /// 3) 从当前游标起 `lookahead` 内没有任何工作时间 → CalendarExhausted
    /// 4) 每处理一天检查一次运行期限
    pub fn allocate(
        &self,
        calendar: &ShiftCalendar,
        from: NaiveDateTime,
        duration: Duration,
        lookahead: Duration,
        deadline: &Deadline,
    ) -> Result<WorkSpan, CalendarError> {
        if duration <= Duration::zero() {
            return Ok(WorkSpan {
                start: from,
                end: from,
            });
        }

        let exhausted = |cursor: NaiveDateTime| CalendarError::CalendarExhausted {
            calendar_id: calendar.id.clone(),
            cursor,
            lookahead_days: lookahead.num_days(),
        };

        let mut remaining = duration;
        let mut cursor = from;
        let mut first_start: Option<NaiveDateTime> = None;
        let mut day = from.date().pred_opt().unwrap_or(from.date());

        loop {
            deadline.check_calendar()?;

            // 当日零点已超出前瞻窗口：之后不可能再出现工作时间
            let Some(limit) = cursor.checked_add_signed(lookahead) else {
                return Err(exhausted(cursor));
            };
            if day_start(day) > limit {
                return Err(exhausted(cursor));
            }

            for (window_start, window_end) in calendar.day_windows(day) {
                let start = window_start.max(cursor);
                if window_end <= start {
                    continue;
                }
                if start - cursor > lookahead {
                    return Err(exhausted(cursor));
                }

                let start_at = *first_start.get_or_insert(start);
                let available = window_end - start;
                if available >= remaining {
                    return Ok(WorkSpan {
                        start: start_at,
                        end: start + remaining,
                    });
                }
                remaining -= available;
                cursor = window_end;
            }

            day = match day.succ_opt() {
                Some(next) => next,
                None => return Err(exhausted(cursor)),
            };
        }
    }
}

impl Default for CalendarEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// 合并重叠/相邻区间
fn merge_intervals(
    mut intervals: Vec<(NaiveDateTime, NaiveDateTime)>,
) -> Vec<(NaiveDateTime, NaiveDateTime)> {
    intervals.sort();
    let mut merged: Vec<(NaiveDateTime, NaiveDateTime)> = Vec::with_capacity(intervals.len());
    for (start, end) in intervals {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::calendar::{ShiftPattern, TimeWindow};
    use chrono::{NaiveDate, NaiveTime, Weekday};

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
    }

    fn dt(day: u32, h: u32, m: u32) -> NaiveDateTime {
        d(day).and_time(t(h, m))
    }

    /// 周一至周五 06:00-14:00
    fn day_shift_calendar() -> ShiftCalendar {
        ShiftCalendar::new(
            "CAL-1S",
            "单班",
            vec![ShiftPattern {
                name: "早班".to_string(),
                weekdays: vec![
                    Weekday::Mon,
                    Weekday::Tue,
                    Weekday::Wed,
                    Weekday::Thu,
                    Weekday::Fri,
                ],
                start: t(6, 0),
                end: t(14, 0),
            }],
        )
    }

    #[test]
    fn test_available_capacity_one_week() {
        let engine = CalendarEngine::new();
        let cal = day_shift_calendar();
        // 2026-01-19 周一 至 2026-01-26 周一
        let capacity = engine.available_capacity(&cal, dt(19, 0, 0), dt(26, 0, 0));
        assert_eq!(capacity, Duration::hours(40));
    }

    #[test]
    fn test_working_intervals_clipped_to_range() {
        let engine = CalendarEngine::new();
        let cal = day_shift_calendar();
        let intervals = engine.working_intervals(&cal, dt(19, 10, 0), dt(20, 8, 0));
        assert_eq!(
            intervals,
            vec![(dt(19, 10, 0), dt(19, 14, 0)), (dt(20, 6, 0), dt(20, 8, 0))]
        );
    }

    #[test]
    fn test_holiday_has_zero_capacity() {
        let engine = CalendarEngine::new();
        let cal = day_shift_calendar().with_holiday(d(20));
        let capacity = engine.available_capacity(&cal, dt(20, 0, 0), dt(21, 0, 0));
        assert_eq!(capacity, Duration::zero());
    }

    #[test]
    fn test_overnight_shift_spills_into_next_day() {
        let engine = CalendarEngine::new();
        let cal = ShiftCalendar::new(
            "CAL-N",
            "夜班",
            vec![ShiftPattern {
                name: "夜班".to_string(),
                weekdays: vec![Weekday::Mon],
                start: t(22, 0),
                end: t(6, 0),
            }],
        );
        // 只看周二，前一日的夜班溢出部分也算
        let capacity = engine.available_capacity(&cal, dt(20, 0, 0), dt(21, 0, 0));
        assert_eq!(capacity, Duration::hours(6));
    }

    #[test]
    fn test_allocate_skips_non_working_time() {
        let engine = CalendarEngine::new();
        let cal = day_shift_calendar();
        // 周五 12:00 起 6 小时：周五 2h + 周一 4h
        let span = engine
            .allocate(
                &cal,
                dt(23, 12, 0),
                Duration::hours(6),
                Duration::days(14),
                &Deadline::unbounded(),
            )
            .unwrap();
        assert_eq!(span.start, dt(23, 12, 0));
        assert_eq!(span.end, dt(26, 10, 0));
    }

    #[test]
    fn test_allocate_starts_at_first_working_instant() {
        let engine = CalendarEngine::new();
        let cal = day_shift_calendar();
        // 周六 09:00 请求 → 周一 06:00 开工
        let span = engine
            .allocate(
                &cal,
                dt(24, 9, 0),
                Duration::hours(2),
                Duration::days(14),
                &Deadline::unbounded(),
            )
            .unwrap();
        assert_eq!(span.start, dt(26, 6, 0));
        assert_eq!(span.end, dt(26, 8, 0));
    }

    #[test]
    fn test_advance_with_special_shift() {
        let engine = CalendarEngine::new();
        let cal = day_shift_calendar().with_special_shift(d(24), vec![TimeWindow::new(t(8, 0), t(12, 0))]);
        let end = engine
            .advance(
                &cal,
                dt(23, 13, 0),
                Duration::hours(3),
                Duration::days(14),
                &Deadline::unbounded(),
            )
            .unwrap();
        // 周五 1h + 周六特殊班次 2h
        assert_eq!(end, dt(24, 10, 0));
    }

    #[test]
    fn test_allocate_exhausted_within_lookahead() {
        let engine = CalendarEngine::new();
        let mut cal = day_shift_calendar();
        // 连续 30 天节假日
        let mut day = d(19);
        for _ in 0..30 {
            cal = cal.with_holiday(day);
            day = day.succ_opt().unwrap();
        }

        let result = engine.allocate(
            &cal,
            dt(19, 6, 0),
            Duration::hours(1),
            Duration::days(14),
            &Deadline::unbounded(),
        );
        assert!(matches!(
            result,
            Err(CalendarError::CalendarExhausted { lookahead_days: 14, .. })
        ));

        // 前瞻窗口足够长时可以排到节假日之后
        let span = engine
            .allocate(
                &cal,
                dt(19, 6, 0),
                Duration::hours(1),
                Duration::days(40),
                &Deadline::unbounded(),
            )
            .unwrap();
        assert_eq!(span.start.date(), NaiveDate::from_ymd_opt(2026, 2, 18).unwrap());
    }

    #[test]
    fn test_allocate_empty_calendar_fails_fast() {
        let engine = CalendarEngine::new();
        let cal = ShiftCalendar::new("CAL-EMPTY", "空", Vec::new());
        let result = engine.allocate(
            &cal,
            dt(19, 0, 0),
            Duration::hours(1),
            Duration::days(3),
            &Deadline::unbounded(),
        );
        assert!(matches!(result, Err(CalendarError::CalendarExhausted { .. })));
    }

    #[test]
    fn test_allocate_respects_deadline() {
        let engine = CalendarEngine::new();
        let result = engine.allocate(
            &day_shift_calendar(),
            dt(19, 6, 0),
            Duration::hours(1),
            Duration::days(14),
            &Deadline::after_ms(0),
        );
        assert!(matches!(result, Err(CalendarError::DeadlineExceeded { .. })));
    }

    #[test]
    fn test_allocate_lookahead_beyond_date_range_is_exhausted() {
        let engine = CalendarEngine::new();
        let cal = ShiftCalendar::new("CAL-EMPTY", "空", Vec::new());
        let result = engine.allocate(
            &cal,
            dt(19, 0, 0),
            Duration::hours(1),
            Duration::MAX,
            &Deadline::unbounded(),
        );
        assert!(matches!(result, Err(CalendarError::CalendarExhausted { .. })));
    }

    #[test]
    fn test_hours_duration_conversion() {
        assert_eq!(hours_to_duration(1.5), Duration::minutes(90));
        assert_eq!(hours_to_duration(-1.0), Duration::zero());
        assert_eq!(hours_to_duration(1e300), Duration::MAX);
        assert_eq!(duration_hours(Duration::minutes(45)), 0.75);
    }
}

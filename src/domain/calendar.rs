// ==========================================
// 专机制造排产系统 - 班次日历领域模型
// ==========================================
// 职责: 周班次模式 + 按日期的例外（节假日/特殊班次）
// 红线: 例外日期永远优先于周模式; 同一天内的班次区间不得重叠
// ==========================================

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const MINUTES_PER_DAY: i64 = 24 * 60;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

// ==========================================
// TimeWindow - 一天内的工作时间窗
// ==========================================
// end <= start 表示跨午夜（结束于次日）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// 落到具体日期上的绝对区间 [start, end)
    pub fn on(&self, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        let start = date.and_time(self.start);
        let mut end = date.and_time(self.end);
        if end <= start {
            end += Duration::days(1);
        }
        (start, end)
    }

    /// 以当日零点为基准的分钟区间（跨午夜时 end > 1440）
    fn minute_range(&self) -> (i64, i64) {
        let start = minutes_of(self.start);
        let mut end = minutes_of(self.end);
        if end <= start {
            end += MINUTES_PER_DAY;
        }
        (start, end)
    }
}

fn minutes_of(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight() / 60)
}

// ==========================================
// ShiftPattern - 周循环班次
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftPattern {
    pub name: String,
    pub weekdays: Vec<Weekday>,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl ShiftPattern {
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start, self.end)
    }

    pub fn applies_to(&self, weekday: Weekday) -> bool {
        self.weekdays.contains(&weekday)
    }
}

// ==========================================
// CalendarException - 日期例外
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExceptionKind {
    /// 节假日：当日零产能
    Holiday,
    /// 特殊班次：当日只按显式时间窗工作
    SpecialShift { windows: Vec<TimeWindow> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarException {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub kind: ExceptionKind,
}

// ==========================================
// ShiftCalendar - 班次日历
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftCalendar {
    pub id: String,
    pub name: String,
    pub shifts: Vec<ShiftPattern>,
    #[serde(default)]
    pub exceptions: Vec<CalendarException>,
}

impl ShiftCalendar {
    pub fn new(id: &str, name: &str, shifts: Vec<ShiftPattern>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            shifts,
            exceptions: Vec::new(),
        }
    }

    /// 添加节假日（同日已有例外时覆盖）
    pub fn with_holiday(mut self, date: NaiveDate) -> Self {
        self.set_exception(date, ExceptionKind::Holiday);
        self
    }

    /// 添加特殊班次（同日已有例外时覆盖）
    pub fn with_special_shift(mut self, date: NaiveDate, windows: Vec<TimeWindow>) -> Self {
        self.set_exception(date, ExceptionKind::SpecialShift { windows });
        self
    }

    fn set_exception(&mut self, date: NaiveDate, kind: ExceptionKind) {
        self.exceptions.retain(|e| e.date != date);
        self.exceptions.push(CalendarException { date, kind });
    }

    pub fn exception_on(&self, date: NaiveDate) -> Option<&CalendarException> {
        self.exceptions.iter().find(|e| e.date == date)
    }

    /// 某日开始的全部工作区间（按开始时间排序，可能延伸到次日）
    ///
    /// 例外优先：节假日返回空；特殊班次只返回其显式时间窗。
    /// 前一日的跨午夜班次归属前一日，不受当日例外影响。
    pub fn day_windows(&self, date: NaiveDate) -> Vec<(NaiveDateTime, NaiveDateTime)> {
        let mut windows: Vec<(NaiveDateTime, NaiveDateTime)> = match self.exception_on(date) {
            Some(exception) => match &exception.kind {
                ExceptionKind::Holiday => Vec::new(),
                ExceptionKind::SpecialShift { windows } => {
                    windows.iter().map(|w| w.on(date)).collect()
                }
            },
            None => self
                .shifts
                .iter()
                .filter(|shift| shift.applies_to(date.weekday()))
                .map(|shift| shift.window().on(date))
                .collect(),
        };
        windows.sort();
        windows
    }

    /// 周模式下一周的名义工作时长（小时）
    pub fn weekly_pattern_hours(&self) -> f64 {
        self.shifts
            .iter()
            .map(|shift| {
                let (start, end) = shift.window().minute_range();
                (end - start) as f64 / 60.0 * shift.weekdays.len() as f64
            })
            .sum()
    }

    // ==========================================
    // 校验
    // ==========================================

    /// 校验日历结构
    ///
    /// # 返回
    /// 违规描述列表（空表示合法）
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.shifts.is_empty() && self.exceptions.is_empty() {
            issues.push(format!("日历{}没有任何班次", self.id));
        }

        // 周模式: 同一天（含前一日跨午夜溢出部分）的区间不得重叠
        for weekday in WEEK {
            let mut ranges: Vec<(i64, i64, &str)> = Vec::new();
            for shift in &self.shifts {
                let (start, end) = shift.window().minute_range();
                if shift.applies_to(weekday) {
                    ranges.push((start, end.min(MINUTES_PER_DAY), shift.name.as_str()));
                }
                if shift.applies_to(weekday.pred()) && end > MINUTES_PER_DAY {
                    ranges.push((0, end - MINUTES_PER_DAY, shift.name.as_str()));
                }
            }
            if let Some((a, b)) = first_overlap(&mut ranges) {
                issues.push(format!(
                    "日历{}在{}存在重叠班次: {} / {}",
                    self.id, weekday, a, b
                ));
            }
        }

        // 例外: 日期唯一，特殊班次内部不重叠
        let mut seen: HashSet<NaiveDate> = HashSet::new();
        for exception in &self.exceptions {
            if !seen.insert(exception.date) {
                issues.push(format!("日历{}的例外日期重复: {}", self.id, exception.date));
            }
            if let ExceptionKind::SpecialShift { windows } = &exception.kind {
                let mut ranges: Vec<(i64, i64, &str)> = windows
                    .iter()
                    .map(|w| {
                        let (start, end) = w.minute_range();
                        (start, end, "special")
                    })
                    .collect();
                if first_overlap(&mut ranges).is_some() {
                    issues.push(format!(
                        "日历{}在{}的特殊班次时间窗重叠",
                        self.id, exception.date
                    ));
                }
            }
        }

        issues
    }
}

fn first_overlap<'a>(ranges: &mut [(i64, i64, &'a str)]) -> Option<(&'a str, &'a str)> {
    ranges.sort_by_key(|r| (r.0, r.1));
    ranges
        .windows(2)
        .find(|pair| pair[1].0 < pair[0].1)
        .map(|pair| (pair[0].2, pair[1].2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn weekdays() -> Vec<Weekday> {
        vec![Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri]
    }

    fn two_shift_calendar() -> ShiftCalendar {
        ShiftCalendar::new(
            "CAL-2S",
            "两班制",
            vec![
                ShiftPattern {
                    name: "早班".to_string(),
                    weekdays: weekdays(),
                    start: t(6, 0),
                    end: t(14, 0),
                },
                ShiftPattern {
                    name: "晚班".to_string(),
                    weekdays: weekdays(),
                    start: t(14, 0),
                    end: t(22, 0),
                },
            ],
        )
    }

    #[test]
    fn test_day_windows_weekday_and_weekend() {
        let cal = two_shift_calendar();
        // 2026-01-19 为周一
        let monday = NaiveDate::from_ymd_opt(2026, 1, 19).unwrap();
        let windows = cal.day_windows(monday);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].0, monday.and_time(t(6, 0)));
        assert_eq!(windows[1].1, monday.and_time(t(22, 0)));

        let saturday = NaiveDate::from_ymd_opt(2026, 1, 24).unwrap();
        assert!(cal.day_windows(saturday).is_empty());
    }

    #[test]
    fn test_exception_overrides_pattern() {
        let monday = NaiveDate::from_ymd_opt(2026, 1, 19).unwrap();
        let saturday = NaiveDate::from_ymd_opt(2026, 1, 24).unwrap();
        let cal = two_shift_calendar()
            .with_holiday(monday)
            .with_special_shift(saturday, vec![TimeWindow::new(t(8, 0), t(12, 0))]);

        assert!(cal.day_windows(monday).is_empty());
        let sat = cal.day_windows(saturday);
        assert_eq!(sat, vec![(saturday.and_time(t(8, 0)), saturday.and_time(t(12, 0)))]);
        assert!(cal.validate().is_empty());
    }

    #[test]
    fn test_overnight_window_ends_next_day() {
        let day = NaiveDate::from_ymd_opt(2026, 1, 19).unwrap();
        let (start, end) = TimeWindow::new(t(22, 0), t(6, 0)).on(day);
        assert_eq!(start, day.and_time(t(22, 0)));
        assert_eq!(end, day.succ_opt().unwrap().and_time(t(6, 0)));
    }

    #[test]
    fn test_validate_detects_overlap() {
        let mut cal = two_shift_calendar();
        cal.shifts.push(ShiftPattern {
            name: "加班".to_string(),
            weekdays: vec![Weekday::Wed],
            start: t(12, 0),
            end: t(16, 0),
        });
        let issues = cal.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("Wed"));
    }

    #[test]
    fn test_validate_detects_overnight_spill_overlap() {
        let cal = ShiftCalendar::new(
            "CAL-N",
            "夜班",
            vec![
                ShiftPattern {
                    name: "夜班".to_string(),
                    weekdays: vec![Weekday::Mon],
                    start: t(22, 0),
                    end: t(6, 0),
                },
                ShiftPattern {
                    name: "早班".to_string(),
                    weekdays: vec![Weekday::Tue],
                    start: t(5, 0),
                    end: t(13, 0),
                },
            ],
        );
        let issues = cal.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("Tue"));
    }

    #[test]
    fn test_weekly_pattern_hours() {
        assert_eq!(two_shift_calendar().weekly_pattern_hours(), 80.0);
    }
}

// ==========================================
// 专机制造排产系统 - 运行期限
// ==========================================
// 职责: 约束整次运行（含日历前瞻搜索）的墙钟时间
// ==========================================

use crate::engine::error::{CalendarError, PlanningError};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    budget: Option<Duration>,
}

impl Deadline {
    /// 不限时
    pub fn unbounded() -> Self {
        Self {
            started: Instant::now(),
            budget: None,
        }
    }

    /// 从现在起 `timeout_ms` 毫秒后到期
    pub fn after_ms(timeout_ms: u64) -> Self {
        Self {
            started: Instant::now(),
            budget: Some(Duration::from_millis(timeout_ms)),
        }
    }

    pub fn from_timeout(timeout_ms: Option<u64>) -> Self {
        match timeout_ms {
            Some(ms) => Self::after_ms(ms),
            None => Self::unbounded(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    pub fn is_expired(&self) -> bool {
        self.budget
            .map(|budget| self.started.elapsed() >= budget)
            .unwrap_or(false)
    }

    fn budget_ms(&self) -> u64 {
        self.budget.map(|b| b.as_millis() as u64).unwrap_or(0)
    }

    /// 运行级检查
    pub fn check(&self) -> Result<(), PlanningError> {
        if self.is_expired() {
            return Err(PlanningError::PlanningTimeout {
                elapsed_ms: self.elapsed_ms(),
                budget_ms: self.budget_ms(),
            });
        }
        Ok(())
    }

    /// 日历搜索内的检查
    pub fn check_calendar(&self) -> Result<(), CalendarError> {
        if self.is_expired() {
            return Err(CalendarError::DeadlineExceeded {
                elapsed_ms: self.elapsed_ms(),
                budget_ms: self.budget_ms(),
            });
        }
        Ok(())
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_never_expires() {
        let deadline = Deadline::unbounded();
        assert!(!deadline.is_expired());
        assert!(deadline.check().is_ok());
    }

    #[test]
    fn test_zero_budget_expires_immediately() {
        let deadline = Deadline::after_ms(0);
        assert!(deadline.is_expired());
        assert!(matches!(
            deadline.check(),
            Err(PlanningError::PlanningTimeout { budget_ms: 0, .. })
        ));
        assert!(matches!(
            deadline.check_calendar(),
            Err(CalendarError::DeadlineExceeded { .. })
        ));
    }
}

// ==========================================
// 专机制造排产系统 - 引擎层错误类型
// ==========================================
// 分类:
// - PlanningError: 运行级失败,整次运行中止,不返回部分结果
// - CalendarError: 单资源日历失败,由排产引擎按路由失败处理
// 说明: 不可路由工序/采购延误不是错误,作为结果的一部分上报
// ==========================================

use chrono::NaiveDateTime;
use thiserror::Error;

/// 运行级错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanningError {
    #[error("排产运行超时: elapsed_ms={elapsed_ms}, budget_ms={budget_ms}")]
    PlanningTimeout { elapsed_ms: u64, budget_ms: u64 },

    #[error("排产配置无效: {0}")]
    InvalidConfiguration(String),

    #[error("资源目录无效: {0}")]
    InvalidCatalog(String),
}

/// 日历计算错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalendarError {
    #[error("日历产能耗尽: calendar={calendar_id}, cursor={cursor}, lookahead_days={lookahead_days}")]
    CalendarExhausted {
        calendar_id: String,
        cursor: NaiveDateTime,
        lookahead_days: i64,
    },

    #[error("日历搜索超过运行期限: elapsed_ms={elapsed_ms}, budget_ms={budget_ms}")]
    DeadlineExceeded { elapsed_ms: u64, budget_ms: u64 },
}

impl CalendarError {
    /// 期限超时升级为运行级错误；产能耗尽返回 None（由调用方按路由失败处理）
    pub fn into_run_failure(self) -> Option<PlanningError> {
        match self {
            CalendarError::DeadlineExceeded {
                elapsed_ms,
                budget_ms,
            } => Some(PlanningError::PlanningTimeout {
                elapsed_ms,
                budget_ms,
            }),
            CalendarError::CalendarExhausted { .. } => None,
        }
    }
}

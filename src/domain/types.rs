// ==========================================
// 专机制造排产系统 - 领域类型定义
// ==========================================
// 职责: 工艺能力、订单状态、工序运行态等封闭枚举
// 红线: 工艺能力是封闭集合,资源准入只做集合成员判定
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 制造工艺 (Manufacturing Process)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManufacturingProcess {
    Turning,      // 车削
    Milling,      // 铣削
    LaserCutting, // 激光切割
    Edging,       // 折边
    Welding,      // 焊接
    Grinding,     // 磨削
    Sawing,       // 锯切
}

impl ManufacturingProcess {
    /// 全部工艺（固定顺序）
    pub const ALL: [ManufacturingProcess; 7] = [
        ManufacturingProcess::Turning,
        ManufacturingProcess::Milling,
        ManufacturingProcess::LaserCutting,
        ManufacturingProcess::Edging,
        ManufacturingProcess::Welding,
        ManufacturingProcess::Grinding,
        ManufacturingProcess::Sawing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ManufacturingProcess::Turning => "turning",
            ManufacturingProcess::Milling => "milling",
            ManufacturingProcess::LaserCutting => "laser_cutting",
            ManufacturingProcess::Edging => "edging",
            ManufacturingProcess::Welding => "welding",
            ManufacturingProcess::Grinding => "grinding",
            ManufacturingProcess::Sawing => "sawing",
        }
    }

    pub fn title_cn(&self) -> &'static str {
        match self {
            ManufacturingProcess::Turning => "车削",
            ManufacturingProcess::Milling => "铣削",
            ManufacturingProcess::LaserCutting => "激光切割",
            ManufacturingProcess::Edging => "折边",
            ManufacturingProcess::Welding => "焊接",
            ManufacturingProcess::Grinding => "磨削",
            ManufacturingProcess::Sawing => "锯切",
        }
    }
}

impl fmt::Display for ManufacturingProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ManufacturingProcess {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "turning" => Ok(ManufacturingProcess::Turning),
            "milling" => Ok(ManufacturingProcess::Milling),
            "laser_cutting" | "laser cutting" => Ok(ManufacturingProcess::LaserCutting),
            "edging" | "bending" => Ok(ManufacturingProcess::Edging),
            "welding" => Ok(ManufacturingProcess::Welding),
            "grinding" => Ok(ManufacturingProcess::Grinding),
            "sawing" => Ok(ManufacturingProcess::Sawing),
            other => Err(format!("未知工艺类型: {}", other)),
        }
    }
}

// ==========================================
// 订单状态 (Order Status)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Planned,    // 已计划
    Released,   // 已下达
    InProgress, // 生产中
    Completed,  // 已完工
    Cancelled,  // 已取消
}

impl OrderStatus {
    /// 是否仍参与排产
    pub fn is_open(&self) -> bool {
        !matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Planned => write!(f, "PLANNED"),
            OrderStatus::Released => write!(f, "RELEASED"),
            OrderStatus::InProgress => write!(f, "IN_PROGRESS"),
            OrderStatus::Completed => write!(f, "COMPLETED"),
            OrderStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

// ==========================================
// 产能超载统计粒度 (Overload Bucket)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OverloadBucket {
    #[default]
    Daily,   // 自然日
    Weekly,  // ISO 周（周一开始）
    Horizon, // 整个排产窗口
}

impl fmt::Display for OverloadBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverloadBucket::Daily => write!(f, "daily"),
            OverloadBucket::Weekly => write!(f, "weekly"),
            OverloadBucket::Horizon => write!(f, "horizon"),
        }
    }
}

impl FromStr for OverloadBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" => Ok(OverloadBucket::Daily),
            "weekly" | "week" => Ok(OverloadBucket::Weekly),
            "horizon" => Ok(OverloadBucket::Horizon),
            other => Err(format!("未知超载统计粒度: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_round_trip_from_str() {
        for process in ManufacturingProcess::ALL {
            assert_eq!(process.as_str().parse::<ManufacturingProcess>(), Ok(process));
        }
        assert_eq!(
            "Laser-Cutting".parse::<ManufacturingProcess>(),
            Ok(ManufacturingProcess::LaserCutting)
        );
        assert!("drilling".parse::<ManufacturingProcess>().is_err());
    }

    #[test]
    fn test_order_status_open() {
        assert!(OrderStatus::Planned.is_open());
        assert!(OrderStatus::InProgress.is_open());
        assert!(!OrderStatus::Completed.is_open());
        assert!(!OrderStatus::Cancelled.is_open());
    }

    #[test]
    fn test_process_serde_snake_case() {
        let json = serde_json::to_string(&ManufacturingProcess::LaserCutting).unwrap();
        assert_eq!(json, "\"laser_cutting\"");
    }
}

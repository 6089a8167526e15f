// ==========================================
// 专机制造排产系统 - 资源目录
// ==========================================
// 职责: 冻结一次运行内的资源与日历,回答"哪些资源能做该工艺"
// 红线: 候选资源按资源编号升序返回（确定性并列裁决）
// ==========================================

use crate::domain::calendar::ShiftCalendar;
use crate::domain::resource::MachineResource;
use crate::domain::types::ManufacturingProcess;
use crate::engine::error::PlanningError;
use std::collections::{BTreeMap, HashSet};

// ==========================================
// ResourceCatalog - 资源目录（只读快照）
// ==========================================
#[derive(Debug, Clone)]
pub struct ResourceCatalog {
    resources: Vec<MachineResource>,
    calendars: BTreeMap<String, ShiftCalendar>,
}

impl ResourceCatalog {
    /// 构建资源目录
    ///
    /// # 错误
    /// - 资源编号重复
    /// - 引用了不存在的日历
    /// - 效率系数非正或非有限数
    pub fn new(
        resources: &[MachineResource],
        calendars: &[ShiftCalendar],
    ) -> Result<Self, PlanningError> {
        let calendars: BTreeMap<String, ShiftCalendar> = calendars
            .iter()
            .map(|c| (c.id.clone(), c.clone()))
            .collect();

        let mut seen = HashSet::new();
        for resource in resources {
            if !seen.insert(resource.id.as_str()) {
                return Err(PlanningError::InvalidCatalog(format!(
                    "资源编号重复: {}",
                    resource.id
                )));
            }
            if !calendars.contains_key(&resource.calendar_id) {
                return Err(PlanningError::InvalidCatalog(format!(
                    "资源{}引用了未知日历: {}",
                    resource.id, resource.calendar_id
                )));
            }
            if !resource.efficiency.is_finite() || resource.efficiency <= 0.0 {
                return Err(PlanningError::InvalidCatalog(format!(
                    "资源{}效率系数非法: {}",
                    resource.id, resource.efficiency
                )));
            }
        }

        let mut resources = resources.to_vec();
        resources.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(Self {
            resources,
            calendars,
        })
    }

    /// 支持该工艺的资源（按资源编号升序）
    pub fn eligible_resources(&self, process: ManufacturingProcess) -> Vec<&MachineResource> {
        self.resources
            .iter()
            .filter(|r| r.supports(process))
            .collect()
    }

    pub fn resource(&self, resource_id: &str) -> Option<&MachineResource> {
        self.resources.iter().find(|r| r.id == resource_id)
    }

    /// 资源所属日历（构建时已校验存在）
    pub fn calendar_of(&self, resource: &MachineResource) -> Option<&ShiftCalendar> {
        self.calendars.get(&resource.calendar_id)
    }

    pub fn resources(&self) -> &[MachineResource] {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calendar(id: &str) -> ShiftCalendar {
        ShiftCalendar::new(id, id, Vec::new())
    }

    #[test]
    fn test_eligible_resources_sorted_by_id() {
        let resources = vec![
            MachineResource::new(
                "M-03",
                "数控铣床3",
                vec![ManufacturingProcess::Milling],
                "CAL",
            ),
            MachineResource::new(
                "M-01",
                "车铣复合",
                vec![ManufacturingProcess::Turning, ManufacturingProcess::Milling],
                "CAL",
            ),
            MachineResource::new("L-01", "激光切割机", vec![ManufacturingProcess::LaserCutting], "CAL"),
        ];
        let catalog = ResourceCatalog::new(&resources, &[calendar("CAL")]).unwrap();

        let ids: Vec<&str> = catalog
            .eligible_resources(ManufacturingProcess::Milling)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["M-01", "M-03"]);
        assert!(catalog
            .eligible_resources(ManufacturingProcess::Welding)
            .is_empty());
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_unknown_calendar_rejected() {
        let resources = vec![MachineResource::new(
            "W-01",
            "焊接工位",
            vec![ManufacturingProcess::Welding],
            "CAL-MISSING",
        )];
        let err = ResourceCatalog::new(&resources, &[calendar("CAL")]).unwrap_err();
        assert!(matches!(err, PlanningError::InvalidCatalog(msg) if msg.contains("CAL-MISSING")));
    }

    #[test]
    fn test_non_positive_efficiency_rejected() {
        let resources = vec![MachineResource::new(
            "G-01",
            "磨床",
            vec![ManufacturingProcess::Grinding],
            "CAL",
        )
        .with_efficiency(0.0)];
        assert!(ResourceCatalog::new(&resources, &[calendar("CAL")]).is_err());
    }

    #[test]
    fn test_duplicate_resource_rejected() {
        let resource =
            MachineResource::new("S-01", "锯床", vec![ManufacturingProcess::Sawing], "CAL");
        let resources = vec![resource.clone(), resource];
        assert!(ResourceCatalog::new(&resources, &[calendar("CAL")]).is_err());
    }
}

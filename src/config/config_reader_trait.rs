// ==========================================
// 专机制造排产系统 - 排产配置读取 Trait
// ==========================================
// 职责: 定义 API 层所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::error::ConfigError;
use crate::config::planning_config::{PlanningConfiguration, PlanningPreset};
use async_trait::async_trait;

// ==========================================
// PlanningConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）；测试中的内存实现
#[async_trait]
pub trait PlanningConfigReader: Send + Sync {
    /// 默认排产配置（由全局标量配置项组装）
    async fn get_default_configuration(&self) -> Result<PlanningConfiguration, ConfigError>;

    /// 按名称读取已保存的配置
    ///
    /// # 返回
    /// - Some: 已保存的配置
    /// - None: 不存在
    async fn get_planning_profile(
        &self,
        name: &str,
    ) -> Result<Option<PlanningConfiguration>, ConfigError>;

    /// 解析配置名
    ///
    /// # 逻辑
    /// 1. 未指定 → 默认配置
    /// 2. 已保存的配置优先
    /// 3. 其次匹配预设方案
    /// 4. 都不存在 → ProfileNotFound
    async fn resolve_configuration(
        &self,
        name: Option<&str>,
    ) -> Result<PlanningConfiguration, ConfigError> {
        let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(n) => n,
            None => return self.get_default_configuration().await,
        };

        if let Some(profile) = self.get_planning_profile(name).await? {
            return Ok(profile);
        }

        name.parse::<PlanningPreset>()
            .map(|preset| preset.configuration())
            .map_err(|_| ConfigError::ProfileNotFound(name.to_string()))
    }
}

// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use machining_aps::config::{ConfigError, PlanningConfigReader, PlanningConfiguration};
use std::collections::HashMap;

/// 内存配置读取器
#[derive(Debug, Clone)]
pub struct MockConfigReader {
    pub default_config: PlanningConfiguration,
    pub profiles: HashMap<String, PlanningConfiguration>,
}

impl MockConfigReader {
    /// 创建默认配置
    pub fn new() -> Self {
        Self {
            default_config: PlanningConfiguration::default(),
            profiles: HashMap::new(),
        }
    }

    /// 替换默认配置
    pub fn with_default(mut self, config: PlanningConfiguration) -> Self {
        self.default_config = config;
        self
    }

    /// 追加命名配置（以配置名为键）
    pub fn with_profile(mut self, config: PlanningConfiguration) -> Self {
        self.profiles.insert(config.name.clone(), config);
        self
    }
}

#[async_trait]
impl PlanningConfigReader for MockConfigReader {
    async fn get_default_configuration(&self) -> Result<PlanningConfiguration, ConfigError> {
        Ok(self.default_config.clone())
    }

    async fn get_planning_profile(
        &self,
        name: &str,
    ) -> Result<Option<PlanningConfiguration>, ConfigError> {
        Ok(self.profiles.get(name).cloned())
    }
}

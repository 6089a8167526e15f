// ==========================================
// 专机制造排产系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、保存
// 存储: config_kv 表 (key-value + scope)
// - 全局标量项: default_* 键
// - 命名排产配置: planning_profile/{name} (JSON)
// ==========================================

use crate::config::config_reader_trait::PlanningConfigReader;
use crate::config::error::ConfigError;
use crate::config::planning_config::PlanningConfiguration;
use crate::db::{configure_sqlite_connection, ensure_config_schema, open_sqlite_connection};
use crate::domain::types::OverloadBucket;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

const GLOBAL_SCOPE: &str = "global";
const PROFILE_PREFIX: &str = "planning_profile/";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例（自动建表）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, ConfigError> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_config_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA 并建表（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, ConfigError> {
        {
            let guard = lock(&conn)?;
            configure_sqlite_connection(&guard)?;
            ensure_config_schema(&guard)?;
        }

        Ok(Self { conn })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, ConfigError> {
        lock(&self.conn)
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, ConfigError> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;
        Ok(())
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, ConfigError> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 按类型解析配置值；格式错误时告警并回退默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr + Copy + std::fmt::Display,
    {
        let raw = match self.get_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };
        match raw.trim().parse::<T>() {
            Ok(v) => Ok(v),
            Err(_) => {
                tracing::warn!(
                    config_key = key,
                    raw_value = %raw,
                    default = %default,
                    "配置格式错误，使用默认值"
                );
                Ok(default)
            }
        }
    }

    /// 获取所有 global 配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 在场景对比报告中记录当时的配置
    pub fn get_config_snapshot(&self) -> Result<String, ConfigError> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;

        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    // ===== 命名排产配置 =====

    /// 保存排产配置（同名覆盖）
    pub fn save_planning_profile(&self, config: &PlanningConfiguration) -> Result<(), ConfigError> {
        config.validate().map_err(|message| ConfigError::InvalidValue {
            key: format!("{}{}", PROFILE_PREFIX, config.name),
            message,
        })?;
        let raw = serde_json::to_string(config)?;
        self.set_global_config_value(&format!("{}{}", PROFILE_PREFIX, config.name.trim()), &raw)
    }

    /// 列出已保存的排产配置名
    pub fn list_planning_profiles(&self) -> Result<Vec<String>, ConfigError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT key FROM config_kv WHERE scope_id = ?1 AND key LIKE ?2 ORDER BY key",
        )?;
        let rows = stmt.query_map(params![GLOBAL_SCOPE, format!("{}%", PROFILE_PREFIX)], |row| {
            row.get::<_, String>(0)
        })?;

        let mut names = Vec::new();
        for row in rows {
            let key = row?;
            if let Some(name) = key.strip_prefix(PROFILE_PREFIX) {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    fn read_planning_profile(
        &self,
        name: &str,
    ) -> Result<Option<PlanningConfiguration>, ConfigError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        let raw = match self.get_config_value(&format!("{}{}", PROFILE_PREFIX, name))? {
            Some(v) => v,
            None => return Ok(None),
        };
        let profile: PlanningConfiguration = serde_json::from_str(&raw)?;
        Ok(Some(profile))
    }

    /// 由全局标量项组装默认配置
    fn read_default_configuration(&self) -> Result<PlanningConfiguration, ConfigError> {
        let defaults = PlanningConfiguration::default();

        let bucket_raw = self.get_config_or_default(
            config_keys::DEFAULT_OVERLOAD_BUCKET,
            &defaults.overload_bucket.to_string(),
        )?;
        let overload_bucket = bucket_raw.parse::<OverloadBucket>().unwrap_or_else(|e| {
            tracing::warn!(config_key = config_keys::DEFAULT_OVERLOAD_BUCKET, error = %e, "使用默认超载粒度");
            defaults.overload_bucket
        });

        let run_timeout_ms = self.get_parsed_or_default(config_keys::DEFAULT_RUN_TIMEOUT_MS, 0u64)?;

        Ok(PlanningConfiguration {
            planning_horizon_days: self.get_parsed_or_default(
                config_keys::DEFAULT_HORIZON_DAYS,
                defaults.planning_horizon_days,
            )?,
            setup_time_buffer_minutes: self.get_parsed_or_default(
                config_keys::DEFAULT_SETUP_BUFFER_MINUTES,
                defaults.setup_time_buffer_minutes,
            )?,
            setup_time_factor: self.get_parsed_or_default(
                config_keys::DEFAULT_SETUP_TIME_FACTOR,
                defaults.setup_time_factor,
            )?,
            overload_bucket,
            run_timeout_ms: (run_timeout_ms > 0).then_some(run_timeout_ms),
            ..defaults
        })
    }
}

fn lock(conn: &Arc<Mutex<Connection>>) -> Result<MutexGuard<'_, Connection>, ConfigError> {
    conn.lock().map_err(|e| ConfigError::Lock(e.to_string()))
}

// ==========================================
// PlanningConfigReader Trait 实现
// ==========================================
#[async_trait]
impl PlanningConfigReader for ConfigManager {
    async fn get_default_configuration(&self) -> Result<PlanningConfiguration, ConfigError> {
        self.read_default_configuration()
    }

    async fn get_planning_profile(
        &self,
        name: &str,
    ) -> Result<Option<PlanningConfiguration>, ConfigError> {
        self.read_planning_profile(name)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 日历前瞻（天）
    pub const DEFAULT_HORIZON_DAYS: &str = "default_horizon_days";
    // 工序间缓冲（分钟）
    pub const DEFAULT_SETUP_BUFFER_MINUTES: &str = "default_setup_buffer_minutes";
    // 准备时间系数
    pub const DEFAULT_SETUP_TIME_FACTOR: &str = "default_setup_time_factor";
    // 超载统计粒度 daily/weekly/horizon
    pub const DEFAULT_OVERLOAD_BUCKET: &str = "default_overload_bucket";
    // 单次运行超时（毫秒，0 = 不限）
    pub const DEFAULT_RUN_TIMEOUT_MS: &str = "default_run_timeout_ms";
}

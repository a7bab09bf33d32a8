//! # 应用配置结构定义

use serde::{Deserialize, Serialize};

/// 应用主配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,
    /// 认证流程配置
    #[serde(default)]
    pub auth: AuthConfig,
}

/// 存储类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// 内存存储
    Memory,
    /// Redis存储
    Redis,
}

impl Default for StorageType {
    fn default() -> Self {
        Self::Memory
    }
}

/// 存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 存储类型
    #[serde(default)]
    pub storage_type: StorageType,
    /// 内存存储最大条目数
    pub memory_max_entries: usize,
    /// Redis 存储配置
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redis: Option<RedisConfig>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_type: StorageType::Memory,
            memory_max_entries: 1024,
            redis: None,
        }
    }
}

/// Redis配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Redis连接URL
    pub url: String,
    /// 连接超时时间（秒）
    pub connection_timeout: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379/0".to_string(),
            connection_timeout: 5,
        }
    }
}

/// 认证流程配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// 回调失败后跳转回登录页前的等待秒数
    pub failure_redirect_delay_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            failure_redirect_delay_secs: 3,
        }
    }
}

//! # 配置管理模块
//!
//! 处理应用配置加载、验证和管理

mod app_config;

pub use app_config::{AppConfig, AuthConfig, RedisConfig, StorageConfig, StorageType};

use std::env;
use std::path::Path;

use crate::ensure_config;

/// 加载配置文件
///
/// 按 `RUST_ENV` 查找 `config/config.{env}.toml`；文件不存在时使用默认配置。
pub fn load_config() -> crate::error::Result<AppConfig> {
    let env = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
    let config_file = format!("config/config.{env}.toml");

    if !Path::new(&config_file).exists() {
        tracing::debug!("配置文件不存在，使用默认配置: {config_file}");
        return Ok(AppConfig::default());
    }

    let config_content = std::fs::read_to_string(&config_file).map_err(|e| {
        crate::error::WhisprError::config_with_source(format!("读取配置文件失败: {config_file}"), e)
    })?;

    let config: AppConfig = toml::from_str(&config_content)?;

    // 验证配置的有效性
    validate_config(&config)?;

    Ok(config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> crate::error::Result<()> {
    // 验证存储配置
    ensure_config!(
        config.storage.memory_max_entries > 0,
        "内存存储最大条目数必须大于0"
    );

    if config.storage.storage_type == StorageType::Redis {
        let redis = config.storage.redis.as_ref().ok_or_else(|| {
            crate::error::WhisprError::config("选择Redis存储时必须提供Redis配置")
        })?;
        ensure_config!(!redis.url.is_empty(), "Redis URL不能为空");
        ensure_config!(redis.connection_timeout > 0, "Redis连接超时必须大于0");
    }

    // 验证认证流程配置
    ensure_config!(
        config.auth.failure_redirect_delay_secs > 0,
        "失败重定向等待秒数必须大于0"
    );

    Ok(())
}

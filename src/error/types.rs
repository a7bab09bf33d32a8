//! # 错误类型定义

use thiserror::Error;

use super::auth::AuthError;

/// 应用主要错误类型
#[derive(Debug, Error)]
pub enum WhisprError {
    /// 配置相关错误
    #[error("配置错误: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 存储相关错误
    #[error("存储错误: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 序列化/反序列化错误
    #[error("序列化错误: {message}")]
    Serialization {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    /// 认证和会话解析错误
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// IO相关错误
    #[error("IO错误: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// 系统内部错误
    #[error("内部错误: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 带上下文的错误包装
    #[error("{context}")]
    Context {
        context: String,
        #[source]
        source: Box<WhisprError>,
    },
}

impl WhisprError {
    /// 创建配置错误
    pub fn config<T: Into<String>>(message: T) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的配置错误
    pub fn config_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建存储错误
    pub fn storage<T: Into<String>>(message: T) -> Self {
        Self::Storage {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的存储错误
    pub fn storage_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Storage {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建序列化错误
    pub fn serialization<T: Into<String>, E: Into<anyhow::Error>>(message: T, source: E) -> Self {
        Self::Serialization {
            message: message.into(),
            source: source.into(),
        }
    }

    /// 创建内部错误
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的内部错误
    pub fn internal_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 错误分类（用于监控与告警）
    #[must_use]
    pub fn category(&self) -> super::ErrorCategory {
        match self {
            Self::Config { .. } | Self::Auth(_) => super::ErrorCategory::Client,
            Self::Storage { .. }
            | Self::Serialization { .. }
            | Self::Io { .. }
            | Self::Internal { .. } => super::ErrorCategory::Server,
            Self::Context { source, .. } => source.category(),
        }
    }
}

impl From<std::io::Error> for WhisprError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            message: source.to_string(),
            source,
        }
    }
}

impl From<serde_json::Error> for WhisprError {
    fn from(source: serde_json::Error) -> Self {
        Self::serialization("JSON处理失败", source)
    }
}

impl From<toml::de::Error> for WhisprError {
    fn from(source: toml::de::Error) -> Self {
        Self::config_with_source("TOML配置解析失败", source)
    }
}

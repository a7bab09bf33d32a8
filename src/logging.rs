//! # 日志配置模块
//!
//! 提供日志初始化和回调负载的脱敏格式化功能

use std::env;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// 回调负载日志格式化器（令牌脱敏）
pub struct PayloadFormatter;

impl PayloadFormatter {
    /// 脱敏令牌：日志中只保留前4个字符
    #[must_use]
    pub fn redact_token(token: &str) -> String {
        if token.chars().count() <= 4 {
            "****".to_string()
        } else {
            let prefix: String = token.chars().take(4).collect();
            format!("{prefix}****")
        }
    }

    /// 格式化回调负载的键列表（值不落日志）
    #[must_use]
    pub fn summarize_keys(keys: &[&str]) -> String {
        if keys.is_empty() {
            "(empty)".to_string()
        } else {
            keys.join(",")
        }
    }
}

/// 初始化日志系统
pub fn init_logging(log_level: Option<&String>) {
    let level = log_level.map_or("info", std::string::String::as_str);

    // 默认配置：应用自身debug级别，依赖库沿用全局级别
    let default_filter = format!("{level},whispr_session=debug");

    let log_filter = env::var("RUST_LOG").unwrap_or(default_filter);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| log_filter.into()))
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// 环境变量设置指南
pub fn print_logging_help() {
    println!("📋 日志配置指南:");
    println!("  RUST_LOG=info                      # 标准日志级别");
    println!("  RUST_LOG=debug                     # 调试级别");
    println!("  RUST_LOG=whispr_session=trace      # 会话解析详细追踪");
    println!("  RUST_LOG=info,redis=warn           # 仅Redis错误和警告");
}

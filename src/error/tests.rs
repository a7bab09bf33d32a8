//! # 错误处理测试

use crate::error::{Context, ErrorCategory, WhisprError};
use crate::error::auth::AuthError;
use std::error::Error;

#[test]
fn test_config_error_creation() {
    let err = WhisprError::config("测试配置错误");
    assert!(matches!(err, WhisprError::Config { .. }));
    assert_eq!(err.to_string(), "配置错误: 测试配置错误");
}

#[test]
fn test_config_error_with_source() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "文件不存在");
    let err = WhisprError::config_with_source("配置文件加载失败", io_err);

    assert!(matches!(err, WhisprError::Config { .. }));
    assert!(err.to_string().contains("配置错误: 配置文件加载失败"));
    assert!(err.source().is_some());
}

#[test]
fn test_storage_error_creation() {
    let err = WhisprError::storage("写入会话键失败");
    assert!(matches!(err, WhisprError::Storage { .. }));
    assert_eq!(err.to_string(), "存储错误: 写入会话键失败");
}

#[test]
fn test_error_context_trait() {
    let result: Result<(), std::io::Error> = Err(std::io::Error::new(
        std::io::ErrorKind::PermissionDenied,
        "权限不足",
    ));

    let err = result.context("读取配置文件失败").unwrap_err();
    assert!(matches!(err, WhisprError::Context { .. }));
    assert_eq!(err.to_string(), "读取配置文件失败");
    assert!(err.source().is_some());
}

#[test]
fn test_auto_conversion_from_io_error() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "文件不存在");
    let err: WhisprError = io_err.into();

    assert!(matches!(err, WhisprError::Io { .. }));
}

#[test]
fn test_auth_error_messages_are_verbatim() {
    // 回调失败消息必须原样透传给用户
    let denied = AuthError::CallbackDenied("access_denied".to_string());
    assert_eq!(denied.to_string(), "access_denied");

    let no_token = AuthError::NoTokenReceived;
    assert_eq!(no_token.to_string(), "No authentication token received");

    let malformed = AuthError::MalformedResponse;
    assert_eq!(
        malformed.to_string(),
        "Invalid OAuth response: missing user data"
    );
}

#[test]
fn test_auth_error_passthrough_display() {
    // 包装进统一错误类型后消息保持不变
    let err: WhisprError = AuthError::CallbackDenied("user cancelled".to_string()).into();
    assert_eq!(err.to_string(), "user cancelled");
}

#[test]
fn test_error_category() {
    assert_eq!(
        WhisprError::config("x").category(),
        ErrorCategory::Client
    );
    assert_eq!(
        WhisprError::from(AuthError::NoTokenReceived).category(),
        ErrorCategory::Client
    );
    assert_eq!(
        WhisprError::storage("x").category(),
        ErrorCategory::Server
    );

    // 上下文包装沿用内层错误的分类
    let wrapped: crate::error::Result<()> =
        Err(WhisprError::storage("y")).context("外层上下文");
    assert_eq!(wrapped.unwrap_err().category(), ErrorCategory::Server);
}

#[test]
fn test_recoverable_classification() {
    assert!(AuthError::CallbackDenied("denied".into()).is_recoverable());
    assert!(AuthError::NoTokenReceived.is_recoverable());
    assert!(!AuthError::MalformedResponse.is_recoverable());
    assert!(!AuthError::EmptyToken.is_recoverable());
}

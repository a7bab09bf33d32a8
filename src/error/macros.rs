//! # 错误处理宏

/// 快速创建配置错误的宏
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        crate::error::WhisprError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        crate::error::WhisprError::config(format!($fmt, $($arg)*))
    };
}

/// 快速创建存储错误的宏
#[macro_export]
macro_rules! storage_error {
    ($msg:expr) => {
        crate::error::WhisprError::storage($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        crate::error::WhisprError::storage(format!($fmt, $($arg)*))
    };
}

/// 快速创建内部错误的宏
#[macro_export]
macro_rules! internal_error {
    ($msg:expr) => {
        crate::error::WhisprError::internal($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        crate::error::WhisprError::internal(format!($fmt, $($arg)*))
    };
}

/// 确保条件成立，否则返回配置错误
#[macro_export]
macro_rules! ensure_config {
    ($cond:expr, $msg:expr) => {
        if !($cond) {
            return Err(crate::config_error!($msg));
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !($cond) {
            return Err(crate::config_error!($fmt, $($arg)*));
        }
    };
}

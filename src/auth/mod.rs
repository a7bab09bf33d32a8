//! # 认证模块
//!
//! 提供OAuth回调解析、会话持久化与重定向解析的统一入口。此模块暴露
//! 组件化服务（`CallbackResolver`、`SessionManager`、`RedirectResolver`）
//! 以及核心数据结构，其余实现需通过子模块路径访问，以保持边界清晰。

pub mod callback;
pub mod redirect;
pub mod session;
pub mod types;

pub use callback::CallbackResolver;
pub use redirect::{RedirectResolver, ScheduledRedirect, login_url};
pub use session::SessionManager;
pub use types::{AuthOutcome, CallbackPayload, OAuthResponse, Role, SessionRecord, UserProfile};

//! # 认证后重定向解析
//!
//! 决定认证完成后的下一跳地址，并管理登录前保存的深链接

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::auth::types::Role;
use crate::error::Result;
use crate::storage::{StorageKey, UnifiedStorageManager};

/// 主办方控制台地址
pub const ORGANIZER_DASHBOARD: &str = "/organizers/dashboard";
/// 参会者控制台地址
pub const ATTENDEE_DASHBOARD: &str = "/attendees/dashboard";
/// 参会者入驻流程地址
pub const ATTENDEE_ONBOARDING: &str = "/attendees/onboarding";

/// 按角色区分的登录页地址
#[must_use]
pub fn login_url(role: Role) -> String {
    format!("/auth?role={}", role.as_str())
}

/// 重定向解析器
///
/// 保存的深链接是一次性的：`resolve` 总是先取出并删除它，即便最终不使用，
/// 过期的跳转意图也不会跨会话残留。
pub struct RedirectResolver {
    storage: Arc<UnifiedStorageManager>,
}

impl RedirectResolver {
    /// 创建重定向解析器
    #[must_use]
    pub fn new(storage: Arc<UnifiedStorageManager>) -> Self {
        Self { storage }
    }

    /// 保存登录前的深链接（未认证用户被送往登录页之前的目标地址）
    pub async fn save_intent(&self, target: &str) -> Result<()> {
        debug!("保存登录前跳转意图: {target}");
        self.storage
            .set(StorageKey::PostAuthRedirect.build(), target)
            .await
    }

    /// 解析认证后的跳转目标
    ///
    /// 主办方：保存的深链接优先，否则主办方控制台（主办方没有入驻概念）。
    /// 参会者：未入驻时一律进入入驻流程，深链接只对已入驻的参会者生效。
    pub async fn resolve(&self, role: Role, is_onboarded: bool) -> Result<String> {
        // 一次性取出保存的深链接，空字符串视为未保存
        let saved = self
            .storage
            .take(StorageKey::PostAuthRedirect.build())
            .await?
            .filter(|url| !url.is_empty());

        let target = match role {
            Role::Organizer => {
                saved.unwrap_or_else(|| ORGANIZER_DASHBOARD.to_string())
            }
            Role::Attendee if !is_onboarded => {
                if saved.is_some() {
                    debug!("参会者未完成入驻，丢弃保存的深链接");
                }
                ATTENDEE_ONBOARDING.to_string()
            }
            Role::Attendee => saved.unwrap_or_else(|| ATTENDEE_DASHBOARD.to_string()),
        };

        debug!("重定向解析完成: role={role}, onboarded={is_onboarded}, target={target}");
        Ok(target)
    }
}

/// 延迟执行的一次性跳转
///
/// 失败路径用它在展示错误消息后延迟跳转回登录页。句柄被丢弃（页面卸载）
/// 时挂起的跳转静默放弃，不视为错误。
pub struct ScheduledRedirect {
    target: String,
    handle: Option<JoinHandle<()>>,
}

impl ScheduledRedirect {
    /// 调度一次延迟跳转
    ///
    /// `navigate` 在延迟结束后被调用一次，参数为跳转目标。
    pub fn schedule<F>(target: String, delay: Duration, navigate: F) -> Self
    where
        F: FnOnce(String) + Send + 'static,
    {
        info!("调度延迟跳转: target={target}, delay={delay:?}");
        let task_target = target.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            navigate(task_target);
        });

        Self {
            target,
            handle: Some(handle),
        }
    }

    /// 跳转目标
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// 取消挂起的跳转
    pub fn cancel(mut self) {
        if let Some(handle) = self.handle.take() {
            debug!("取消延迟跳转: target={}", self.target);
            handle.abort();
        }
    }

    /// 放弃句柄但保留挂起的跳转（跳转将照常执行）
    pub fn detach(mut self) {
        self.handle.take();
    }
}

impl Drop for ScheduledRedirect {
    fn drop(&mut self) {
        // 页面卸载语义：句柄被丢弃时放弃挂起的跳转
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

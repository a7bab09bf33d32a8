//! # OAuth回调解析器
//!
//! 解析回调负载，判定认证成败，成功时持久化会话并计算下一跳地址

use std::sync::Arc;

use tracing::{debug, info, warn};
use url::Url;

use crate::auth::redirect::{RedirectResolver, login_url};
use crate::auth::session::SessionManager;
use crate::auth::types::{
    AuthOutcome, CallbackPayload, FIELD_IS_ONBOARDED, FIELD_USER_EMAIL, FIELD_USER_ID,
    FIELD_USER_NAME, OAuthResponse, Role, SessionRecord, UserProfile,
};
use crate::error::auth::AuthError;
use crate::error::{Result, WhisprError};
use crate::logging::PayloadFormatter;
use crate::storage::UnifiedStorageManager;

/// OAuth回调解析器
///
/// 每次回调页面加载调用一次。解析本身不做网络IO：后端已完成OAuth握手，
/// 结果随回调URL一并送达。
pub struct CallbackResolver {
    sessions: SessionManager,
    redirects: RedirectResolver,
}

impl CallbackResolver {
    /// 创建回调解析器
    #[must_use]
    pub fn new(storage: Arc<UnifiedStorageManager>) -> Self {
        Self {
            sessions: SessionManager::new(Arc::clone(&storage)),
            redirects: RedirectResolver::new(storage),
        }
    }

    /// 会话管理器
    #[must_use]
    pub const fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// 重定向解析器
    #[must_use]
    pub const fn redirects(&self) -> &RedirectResolver {
        &self.redirects
    }

    /// 解析完整回调URL
    ///
    /// 查询参数与片段分别解析后交给 [`resolve`](Self::resolve)。
    pub async fn resolve_url(&self, callback_url: &str, role: Role) -> Result<AuthOutcome> {
        let url = Url::parse(callback_url)
            .map_err(|e| WhisprError::config_with_source("无效的回调URL", e))?;

        let query = CallbackPayload::from_query_string(url.query().unwrap_or(""));
        let fragment = CallbackPayload::from_fragment(url.fragment().unwrap_or(""));

        self.resolve(&query, &fragment, role).await
    }

    /// 解析回调负载
    ///
    /// 判定顺序：
    /// 1. 任一来源携带非空 `error` 字段，立即失败（查询参数先于片段检查），
    ///    不再检查令牌；
    /// 2. 查询参数携带令牌时具有权威性，片段整体被忽略（包括其用户字段）；
    /// 3. 仅当查询参数既无 `error` 也无令牌时检查片段；
    /// 4. 两个来源都没有令牌，以固定消息失败。
    ///
    /// 失败路径不写存储。
    pub async fn resolve(
        &self,
        query: &CallbackPayload,
        fragment: &CallbackPayload,
        role: Role,
    ) -> Result<AuthOutcome> {
        debug!(
            "解析回调负载: role={role}, query_keys={}, fragment_keys={}",
            PayloadFormatter::summarize_keys(&query.keys()),
            PayloadFormatter::summarize_keys(&fragment.keys()),
        );

        if let Some(message) = query.error().or_else(|| fragment.error()) {
            warn!("回调携带错误字段: {message}");
            return Ok(AuthOutcome::Failure {
                message: message.to_string(),
                login_url: login_url(role),
            });
        }

        let (payload, token) = if let Some(token) = query.token() {
            (query, token)
        } else if let Some(token) = fragment.token() {
            debug!("查询参数无令牌，采用片段负载");
            (fragment, token)
        } else {
            info!("回调未携带令牌: role={role}");
            return Ok(AuthOutcome::Failure {
                message: AuthError::NoTokenReceived.to_string(),
                login_url: login_url(role),
            });
        };

        let user = Self::build_profile(payload, role);
        let session = SessionRecord::new(token.to_string(), role, user);

        self.sessions.persist(&session).await?;
        let redirect = self.redirects.resolve(role, session.is_onboarded()).await?;

        info!(
            "回调解析成功: role={role}, token={}, redirect={redirect}",
            PayloadFormatter::redact_token(&session.token)
        );
        Ok(AuthOutcome::Success { session, redirect })
    }

    /// 解析后端的结构化OAuth响应
    ///
    /// `organizer` 与 `attendee` 都缺失是硬错误，不做静默回退；两者并存时
    /// 主办方优先（与单次判定顺序一致）。
    pub async fn resolve_response(&self, response: &OAuthResponse) -> Result<AuthOutcome> {
        let (role, profile) = if let Some(organizer) = &response.organizer {
            (Role::Organizer, organizer.clone())
        } else if let Some(attendee) = &response.attendee {
            (Role::Attendee, attendee.clone())
        } else {
            warn!("结构化OAuth响应缺少用户数据");
            return Err(AuthError::MalformedResponse.into());
        };

        let session = SessionRecord::new(response.token.clone(), role, Some(profile));

        self.sessions.persist(&session).await?;
        let redirect = self.redirects.resolve(role, session.is_onboarded()).await?;

        info!(
            "结构化响应解析成功: role={role}, token={}",
            PayloadFormatter::redact_token(&session.token)
        );
        Ok(AuthOutcome::Success { session, redirect })
    }

    /// 从负载构造用户资料
    ///
    /// `user_id` 缺失时不构造资料；其余字段缺失按空值处理，入驻标记只认
    /// 字面量 `"true"`。
    fn build_profile(payload: &CallbackPayload, role: Role) -> Option<UserProfile> {
        let id = payload.get(FIELD_USER_ID)?;

        Some(UserProfile {
            id: id.to_string(),
            name: payload.get(FIELD_USER_NAME).unwrap_or_default().to_string(),
            email: payload
                .get(FIELD_USER_EMAIL)
                .unwrap_or_default()
                .to_string(),
            role,
            is_onboarded: payload.get(FIELD_IS_ONBOARDED) == Some("true"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_requires_user_id() {
        let payload = CallbackPayload::from_pairs([("token", "abc"), ("user_name", "Zoya")]);
        assert!(CallbackResolver::build_profile(&payload, Role::Attendee).is_none());
    }

    #[test]
    fn profile_defaults_missing_fields() {
        let payload = CallbackPayload::from_pairs([("token", "abc"), ("user_id", "42")]);
        let profile = CallbackResolver::build_profile(&payload, Role::Attendee).unwrap();

        assert_eq!(profile.id, "42");
        assert_eq!(profile.name, "");
        assert_eq!(profile.email, "");
        assert!(!profile.is_onboarded);
    }

    #[test]
    fn onboarded_flag_only_accepts_literal_true() {
        let payload = CallbackPayload::from_pairs([
            ("user_id", "1"),
            ("is_onboarded", "True"),
        ]);
        let profile = CallbackResolver::build_profile(&payload, Role::Attendee).unwrap();
        assert!(!profile.is_onboarded);

        let payload = CallbackPayload::from_pairs([
            ("user_id", "1"),
            ("is_onboarded", "true"),
        ]);
        let profile = CallbackResolver::build_profile(&payload, Role::Attendee).unwrap();
        assert!(profile.is_onboarded);
    }
}

//! # 会话持久化管理器
//!
//! 负责会话记录的写入、读取与登出清理

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::auth::types::{Role, SessionRecord, UserProfile};
use crate::error::auth::AuthError;
use crate::error::Result;
use crate::logging::PayloadFormatter;
use crate::storage::{StorageKey, UnifiedStorageManager};

/// 会话持久化管理器
///
/// 双令牌键（`token` 与 `whispr_token`）是旧版兼容契约：二者通过一次
/// 批量写入保持同步，避免出现只有单键更新的中间状态。
pub struct SessionManager {
    storage: Arc<UnifiedStorageManager>,
}

impl SessionManager {
    /// 创建会话管理器
    #[must_use]
    pub fn new(storage: Arc<UnifiedStorageManager>) -> Self {
        Self { storage }
    }

    /// 持久化会话记录
    ///
    /// 拒绝空令牌；重复登录时整组键被覆盖。
    pub async fn persist(&self, record: &SessionRecord) -> Result<()> {
        if record.token.is_empty() {
            warn!("拒绝持久化空令牌会话");
            return Err(AuthError::EmptyToken.into());
        }

        let mut entries: Vec<(&str, String)> = vec![
            (StorageKey::Token.build(), record.token.clone()),
            (StorageKey::NamespacedToken.build(), record.token.clone()),
            (StorageKey::Role.build(), record.role.as_str().to_string()),
        ];

        if let Some(user) = &record.user {
            let serialized = serde_json::to_string(user)?;
            entries.push((StorageKey::User.build(), serialized));
        }

        self.storage.set_many(&entries).await?;

        info!(
            "会话已持久化: role={}, token={}",
            record.role,
            PayloadFormatter::redact_token(&record.token)
        );
        Ok(())
    }

    /// 读取当前会话
    ///
    /// 令牌或角色缺失时返回 `None`；优先读取命名空间键，回退到旧版键。
    pub async fn load(&self) -> Result<Option<SessionRecord>> {
        let token = match self.storage.get(StorageKey::NamespacedToken.build()).await? {
            Some(token) if !token.is_empty() => token,
            _ => match self.storage.get(StorageKey::Token.build()).await? {
                Some(token) if !token.is_empty() => token,
                _ => return Ok(None),
            },
        };

        let Some(raw_role) = self.storage.get(StorageKey::Role.build()).await? else {
            debug!("存储中有令牌但没有角色，视为无会话");
            return Ok(None);
        };
        let role = Role::parse(&raw_role)?;

        let user: Option<UserProfile> = self.storage.get_json(StorageKey::User.build()).await?;

        Ok(Some(SessionRecord::new(token, role, user)))
    }

    /// 登出：清除全部会话键（包括未消费的跳转意图）
    pub async fn clear(&self) -> Result<()> {
        for key in StorageKey::session_keys() {
            self.storage.remove(key.build()).await?;
        }
        info!("会话已清除");
        Ok(())
    }
}

//! # 存储键命名规范
//!
//! 定义会话存储的键集合与管理策略

/// 会话存储键类型
///
/// 键名是对外契约的一部分：旧版客户端同时读取 `token` 与 `whispr_token`，
/// 两者必须始终保持同步。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKey {
    /// 认证令牌（旧版兼容键） - `token`
    Token,

    /// 认证令牌（命名空间键） - `whispr_token`
    NamespacedToken,

    /// 会话角色 - `whispr_role`
    Role,

    /// 序列化的用户资料 - `user`
    User,

    /// 登录前保存的深链接（一次性） - `whispr_post_auth_redirect`
    PostAuthRedirect,
}

impl StorageKey {
    /// 生成存储键字符串
    #[must_use]
    pub const fn build(self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::NamespacedToken => "whispr_token",
            Self::Role => "whispr_role",
            Self::User => "user",
            Self::PostAuthRedirect => "whispr_post_auth_redirect",
        }
    }

    /// 获取存储键的命名空间
    #[must_use]
    pub const fn namespace(self) -> &'static str {
        match self {
            Self::Token | Self::User => "legacy",
            Self::NamespacedToken | Self::Role | Self::PostAuthRedirect => "whispr",
        }
    }

    /// 登出时需要清除的全部会话键
    #[must_use]
    pub const fn session_keys() -> [Self; 5] {
        [
            Self::Token,
            Self::NamespacedToken,
            Self::Role,
            Self::User,
            Self::PostAuthRedirect,
        ]
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_names_are_stable() {
        assert_eq!(StorageKey::Token.build(), "token");
        assert_eq!(StorageKey::NamespacedToken.build(), "whispr_token");
        assert_eq!(StorageKey::Role.build(), "whispr_role");
        assert_eq!(StorageKey::User.build(), "user");
        assert_eq!(
            StorageKey::PostAuthRedirect.build(),
            "whispr_post_auth_redirect"
        );
    }

    #[test]
    fn session_keys_cover_all_variants() {
        assert_eq!(StorageKey::session_keys().len(), 5);
    }
}

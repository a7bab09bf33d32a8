//! # 会话数据类型定义
//!
//! 定义角色、用户资料、会话记录与回调负载等核心数据结构

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::auth::AuthError;

/// 回调负载中识别的键：认证令牌
pub const FIELD_TOKEN: &str = "token";
/// 回调负载中识别的键：错误信息
pub const FIELD_ERROR: &str = "error";
/// 回调负载中识别的键：用户ID
pub const FIELD_USER_ID: &str = "user_id";
/// 回调负载中识别的键：用户名
pub const FIELD_USER_NAME: &str = "user_name";
/// 回调负载中识别的键：用户邮箱
pub const FIELD_USER_EMAIL: &str = "user_email";
/// 回调负载中识别的键：是否已完成入驻
pub const FIELD_IS_ONBOARDED: &str = "is_onboarded";

/// 会话角色
///
/// 只允许两种取值，其他字符串在解析阶段即被拒绝。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// 活动主办方
    Organizer,
    /// 参会者
    Attendee,
}

impl Role {
    /// 角色的存储字符串
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Organizer => "organizer",
            Self::Attendee => "attendee",
        }
    }

    /// 解析角色字符串
    pub fn parse(value: &str) -> Result<Self, AuthError> {
        match value {
            "organizer" => Ok(Self::Organizer),
            "attendee" => Ok(Self::Attendee),
            other => Err(AuthError::InvalidRole(other.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 用户资料
///
/// 回调负载可能只携带令牌而不带资料，因此所有字段允许为空字符串。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// 用户ID
    #[serde(default)]
    pub id: String,
    /// 用户名
    #[serde(default)]
    pub name: String,
    /// 邮箱
    #[serde(default)]
    pub email: String,
    /// 角色
    pub role: Role,
    /// 是否已完成入驻流程
    #[serde(default)]
    pub is_onboarded: bool,
}

/// 会话记录
///
/// 不变量：令牌非空。持久化通过 [`SessionManager`](crate::auth::SessionManager)
/// 一次性写入全部会话键。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// 认证令牌
    pub token: String,
    /// 会话角色
    pub role: Role,
    /// 用户资料（回调可能只提供令牌）
    pub user: Option<UserProfile>,
}

impl SessionRecord {
    /// 创建会话记录
    #[must_use]
    pub const fn new(token: String, role: Role, user: Option<UserProfile>) -> Self {
        Self { token, role, user }
    }

    /// 会话对应的入驻状态（无资料时视为未入驻）
    #[must_use]
    pub fn is_onboarded(&self) -> bool {
        self.user.as_ref().is_some_and(|user| user.is_onboarded)
    }
}

/// 回调负载
///
/// 来自回调URL查询参数或片段的扁平键值映射，值已完成百分号解码。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackPayload {
    fields: HashMap<String, String>,
}

impl CallbackPayload {
    /// 创建空负载
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 从键值对构造负载
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// 从查询字符串解析负载（`a=1&b=2` 形式，不含前导 `?`）
    #[must_use]
    pub fn from_query_string(query: &str) -> Self {
        let fields = url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { fields }
    }

    /// 从URL片段解析负载（`#` 之后的部分）
    ///
    /// 片段不保证是表单编码，按 `&`/`=` 拆分后逐段百分号解码。
    #[must_use]
    pub fn from_fragment(fragment: &str) -> Self {
        let fields = fragment
            .split('&')
            .filter(|part| !part.is_empty())
            .filter_map(|part| {
                let (key, value) = part.split_once('=')?;
                let key = urlencoding::decode(key).ok()?.into_owned();
                let value = urlencoding::decode(value).ok()?.into_owned();
                Some((key, value))
            })
            .collect();
        Self { fields }
    }

    /// 读取指定键
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// 读取非空的错误信息
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.get(FIELD_ERROR).filter(|value| !value.is_empty())
    }

    /// 读取非空的令牌（空字符串视为缺失）
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.get(FIELD_TOKEN).filter(|value| !value.is_empty())
    }

    /// 负载是否为空
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 负载中出现的键列表（用于日志）
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

/// 认证结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum AuthOutcome {
    /// 认证成功：会话已持久化，携带下一跳地址
    Success {
        /// 持久化的会话记录
        session: SessionRecord,
        /// 认证后的跳转目标
        redirect: String,
    },
    /// 认证失败：调用方展示消息并延迟跳转回登录页
    Failure {
        /// 展示给用户的失败消息
        message: String,
        /// 按角色区分的登录页地址
        login_url: String,
    },
}

impl AuthOutcome {
    /// 是否为成功结果
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// 后端OAuth接口的结构化响应
///
/// `organizer` 与 `attendee` 预期恰好出现一个。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthResponse {
    /// 后端附带的提示信息
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// 认证令牌
    pub token: String,
    /// 主办方账号资料
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<UserProfile>,
    /// 参会者账号资料
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendee: Option<UserProfile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_role_values() {
        assert_eq!(Role::parse("organizer").unwrap(), Role::Organizer);
        assert_eq!(Role::parse("attendee").unwrap(), Role::Attendee);
        assert!(matches!(
            Role::parse("admin"),
            Err(AuthError::InvalidRole(_))
        ));
    }

    #[test]
    fn payload_treats_empty_values_as_absent() {
        let payload = CallbackPayload::from_pairs([("token", ""), ("error", "")]);
        assert_eq!(payload.token(), None);
        assert_eq!(payload.error(), None);
    }

    #[test]
    fn fragment_parsing_decodes_values() {
        let payload = CallbackPayload::from_fragment("token=abc&user_name=Zo%C3%AB&note");
        assert_eq!(payload.token(), Some("abc"));
        assert_eq!(payload.get(FIELD_USER_NAME), Some("Zoë"));
        // 无 `=` 的片段段落被忽略
        assert_eq!(payload.get("note"), None);
    }
}

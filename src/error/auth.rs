//! Errors related to session resolution and the OAuth callback contract.

use thiserror::Error;

/// The primary error type for callback parsing and session persistence.
///
/// `CallbackDenied` and `NoTokenReceived` are surfaced to the user verbatim,
/// so their messages must stay stable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The backend redirected back with an explicit `error` field.
    /// The message is shown to the user exactly as received.
    #[error("{0}")]
    CallbackDenied(String),

    /// Neither the query parameters nor the fragment carried a token.
    #[error("No authentication token received")]
    NoTokenReceived,

    /// A structured OAuth response held a token but neither an organizer
    /// nor an attendee record.
    #[error("Invalid OAuth response: missing user data")]
    MalformedResponse,

    /// A role value other than `organizer` or `attendee` reached the resolver.
    #[error("Unknown role: {0}")]
    InvalidRole(String),

    /// A session persistence attempt carried an empty token.
    #[error("Refusing to persist a session without a token")]
    EmptyToken,
}

impl AuthError {
    /// 是否为用户可重试的回调失败（显示消息后跳转回登录页）
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::CallbackDenied(_) | Self::NoTokenReceived)
    }
}

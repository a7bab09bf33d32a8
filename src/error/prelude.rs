//! A "prelude" for easily importing the most common error handling items.

pub use super::auth::AuthError;
pub use super::{Context, ErrorCategory, Result, WhisprError};

//! 系统钥匙串凭据存储
//!
//! 认证令牌（完整的 `Authorization` 头值）保存在操作系统钥匙串中，
//! 不写入配置文件。

use base64::Engine;
use keyring::Entry;

const KEYRING_SERVICE: &str = "docshare";
const KEYRING_USER: &str = "auth-token";

/// 凭据存储错误
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("keyring not available: {0}")]
    NotAvailable(String),

    #[error("failed to store credential: {0}")]
    Store(String),

    #[error("failed to delete credential: {0}")]
    Delete(String),
}

fn entry() -> Result<Entry, CredentialError> {
    Entry::new(KEYRING_SERVICE, KEYRING_USER)
        .map_err(|e| CredentialError::NotAvailable(e.to_string()))
}

/// 保存认证令牌
pub fn store_token(token: &str) -> Result<(), CredentialError> {
    entry()?
        .set_password(token)
        .map_err(|e| CredentialError::Store(e.to_string()))
}

/// 读取认证令牌
///
/// 未存储时返回 `Ok(None)`。
pub fn retrieve_token() -> Result<Option<String>, CredentialError> {
    match entry()?.get_password() {
        Ok(token) => Ok(Some(token)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(CredentialError::NotAvailable(e.to_string())),
    }
}

/// 删除认证令牌
///
/// 未存储时也返回 `Ok(())`。
pub fn delete_token() -> Result<(), CredentialError> {
    match entry()?.delete_credential() {
        Ok(()) => Ok(()),
        Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(CredentialError::Delete(e.to_string())),
    }
}

/// 构造 Basic 认证头值
pub fn basic_auth_token(username: &str, password: &str) -> String {
    let credentials = format!("{}:{}", username, password);
    format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode(credentials)
    )
}

/// 构造 Bearer 认证头值
///
/// 已带 `Bearer ` 前缀的令牌原样返回（大小写不敏感）。
pub fn bearer_auth_token(token: &str) -> String {
    if token.len() > 7 && token[..7].eq_ignore_ascii_case("bearer ") {
        return token.to_string();
    }
    format!("Bearer {}", token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_auth_encoding() {
        // base64("user:pass") = dXNlcjpwYXNz
        assert_eq!(basic_auth_token("user", "pass"), "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn test_bearer_prefix_added_once() {
        assert_eq!(bearer_auth_token("abc123"), "Bearer abc123");
        assert_eq!(bearer_auth_token("Bearer abc123"), "Bearer abc123");
        assert_eq!(bearer_auth_token("bearer abc123"), "bearer abc123");
    }

    #[test]
    fn test_short_token_gets_prefix() {
        assert_eq!(bearer_auth_token("abc"), "Bearer abc");
    }
}

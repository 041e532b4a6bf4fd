//! Core data models for authprobe

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a probe session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Base URL of the target API (e.g. http://localhost:5000/v1)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent header value
    pub user_agent: String,
    /// Path of the shared secrets store file
    pub secrets_path: PathBuf,
    /// Directory where per-flow response files are written
    pub output_dir: PathBuf,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/v1".to_string(),
            timeout_secs: 30,
            user_agent: format!("authprobe/{}", env!("CARGO_PKG_VERSION")),
            secrets_path: PathBuf::from("secrets.json"),
            output_dir: PathBuf::from("."),
        }
    }
}

/// A single issued token with its expiry, as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenInfo {
    pub token: String,
    #[serde(default)]
    pub expires: Option<String>,
}

/// Access/refresh token pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: TokenInfo,
    pub refresh: TokenInfo,
}

/// User object embedded in register/login responses and user CRUD responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Response envelope for register/login: `{ "user": ..., "tokens": ... }`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthEnvelope {
    pub user: UserRecord,
    pub tokens: TokenPair,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_envelope_parses_nested_tokens() {
        let body = r#"{
            "user": {"id": 7, "name": "User Example", "email": "user.example@example.com", "role": "user"},
            "tokens": {
                "access": {"token": "acc-123", "expires": "2026-01-01T00:00:00Z"},
                "refresh": {"token": "ref-456", "expires": "2026-02-01T00:00:00Z"}
            }
        }"#;
        let envelope: AuthEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.user.id, 7);
        assert_eq!(envelope.tokens.access.token, "acc-123");
        assert_eq!(envelope.tokens.refresh.token, "ref-456");
    }

    #[test]
    fn token_pair_parses_without_expiry() {
        let body = r#"{"access": {"token": "a"}, "refresh": {"token": "r"}}"#;
        let pair: TokenPair = serde_json::from_str(body).unwrap();
        assert_eq!(pair.access.token, "a");
        assert!(pair.access.expires.is_none());
    }
}

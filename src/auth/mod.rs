//! Authorization against the platform's OAuth2 token endpoint
//!
//! - [`client`]: HTTP client for the password and refresh-token grants
//! - [`login`]: interactive login loop retrying until a token is obtained

pub mod client;
pub mod login;

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

pub use client::{AuthorizeClient, DEFAULT_AUTH_BASE_URL};
pub use login::{attempt_login, LoginOutcome};

/// OAuth2 token response
#[derive(Debug, Clone, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime in seconds. The platform sends this as a string.
    #[serde(default, deserialize_with = "deserialize_seconds")]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Computed from `expires_in` when the token is received
    #[serde(skip)]
    pub expires_at: Option<DateTime<Utc>>,
}

fn deserialize_seconds<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Seconds {
        Number(i64),
        Text(String),
    }

    match Option::<Seconds>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Seconds::Number(n)) => Ok(Some(n)),
        Some(Seconds::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Machine-readable OAuth2 error body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthErrorDetail {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub error_uri: Option<String>,
}

impl fmt::Display for AuthErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.error.as_deref().unwrap_or_default(),
            self.error_description.as_deref().unwrap_or_default(),
            self.error_uri.as_deref().unwrap_or_default()
        )
    }
}

/// Why a single login attempt did not produce a token
#[derive(Debug, Error)]
pub enum AuthFailure {
    /// The token endpoint answered with a structured OAuth2 error
    #[error("Login Failed! Status Code:{status} Error:{detail}")]
    Rejected { status: u16, detail: AuthErrorDetail },

    /// The attempt was interrupted by the user
    #[error("Login cancelled")]
    Cancelled,

    /// Anything else: transport errors, unexpected bodies, bad configuration
    #[error(transparent)]
    Failure(#[from] anyhow::Error),
}

impl AuthFailure {
    /// Short label for the error's origin, shown alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthFailure::Rejected { .. } => "AuthorizationError",
            AuthFailure::Cancelled => "Cancelled",
            AuthFailure::Failure(err) => {
                if err.chain().any(|c| c.is::<reqwest::Error>()) {
                    "HttpError"
                } else if err.chain().any(|c| c.is::<serde_json::Error>()) {
                    "DecodeError"
                } else {
                    "Error"
                }
            }
        }
    }
}

/// The two OAuth2 grants the login loop uses.
///
/// [`AuthorizeClient`] talks to the real endpoint; tests script outcomes.
#[async_trait]
pub trait Authorizer: Send + Sync {
    async fn password_grant(
        &self,
        username: &str,
        password: &str,
        client_id: &str,
    ) -> Result<Token, AuthFailure>;

    async fn refresh_grant(&self, username: &str, refresh_token: &str)
        -> Result<Token, AuthFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_expires_in_as_string() {
        let json = r#"{
            "access_token": "access-123",
            "refresh_token": "refresh-456",
            "expires_in": "300",
            "scope": "trapi",
            "token_type": "Bearer"
        }"#;

        let token: Token = serde_json::from_str(json).unwrap();
        assert_eq!(token.access_token, "access-123");
        assert_eq!(token.refresh_token.as_deref(), Some("refresh-456"));
        assert_eq!(token.expires_in, Some(300));
        assert_eq!(token.token_type.as_deref(), Some("Bearer"));
        assert!(token.expires_at.is_none());
    }

    #[test]
    fn test_token_minimal() {
        let token: Token =
            serde_json::from_str(r#"{"access_token": "a", "expires_in": 600}"#).unwrap();
        assert_eq!(token.expires_in, Some(600));
        assert!(token.refresh_token.is_none());
        assert!(token.scope.is_none());
    }

    #[test]
    fn test_token_rejects_non_numeric_expiry() {
        let result = serde_json::from_str::<Token>(r#"{"access_token": "a", "expires_in": "soon"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejected_message() {
        let failure = AuthFailure::Rejected {
            status: 400,
            detail: AuthErrorDetail {
                error: Some("invalid_grant".to_string()),
                error_description: Some("bad password".to_string()),
                error_uri: None,
            },
        };
        assert_eq!(
            failure.to_string(),
            "Login Failed! Status Code:400 Error:invalid_grant bad password "
        );
        assert_eq!(failure.kind(), "AuthorizationError");
    }

    #[test]
    fn test_failure_kind() {
        let failure = AuthFailure::from(anyhow::anyhow!("boom"));
        assert_eq!(failure.kind(), "Error");
        assert_eq!(failure.to_string(), "boom");
    }
}

//! OAuth2 token endpoint client.
//!
//! Handles the password grant (new session) and the refresh-token grant.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::Client;

use super::{AuthErrorDetail, AuthFailure, Authorizer, Token};
use crate::config::{non_empty, AppConfig};
use crate::transport::{build_http_client, truncate_body};

/// Default authorization endpoint base URL
pub const DEFAULT_AUTH_BASE_URL: &str = "https://api.refinitiv.com/auth/oauth2/beta1";

/// Scope requested by the password grant
const SCOPE: &str = "trapi";

/// HTTP client for the platform's `/token` endpoint.
pub struct AuthorizeClient {
    http_client: Client,
    base_url: String,
}

impl AuthorizeClient {
    /// Create a client using the default authorization base URL.
    pub fn new(http_client: Client) -> Self {
        Self::with_base_url(http_client, DEFAULT_AUTH_BASE_URL.to_string())
    }

    /// Create a client with a custom base URL (config override or mock server).
    pub fn with_base_url(http_client: Client, base_url: String) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build a proxy-aware client, honouring `auth_base_url` when set.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let http_client = build_http_client(config)?;
        Ok(match non_empty(&config.auth_base_url) {
            Some(base_url) => Self::with_base_url(http_client, base_url.to_string()),
            None => Self::new(http_client),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<Token, AuthFailure> {
        let url = format!("{}/token", self.base_url);
        tracing::debug!("Requesting token at {}", url);

        let response = self
            .http_client
            .post(&url)
            .header("Accept", "application/json")
            .form(form)
            .send()
            .await
            .context("Failed to send token request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<AuthErrorDetail>(&body) {
                Ok(detail) if detail.error.is_some() => AuthFailure::Rejected {
                    status: status.as_u16(),
                    detail,
                },
                _ => AuthFailure::Failure(anyhow!(
                    "Token request failed with status {}: {}",
                    status,
                    truncate_body(&body)
                )),
            });
        }

        let mut token: Token = response
            .json()
            .await
            .context("Failed to parse token response")?;
        token.expires_at = token.expires_in.and_then(|seconds| {
            Duration::try_seconds(seconds).and_then(|d| Utc::now().checked_add_signed(d))
        });
        if token.expires_in.is_some() && token.expires_at.is_none() {
            tracing::warn!("Token expiry out of range: {:?}s", token.expires_in);
        }

        tracing::debug!(
            "Token received, has_refresh_token={}, expires_in={:?}",
            token.refresh_token.is_some(),
            token.expires_in
        );
        Ok(token)
    }
}

#[async_trait]
impl Authorizer for AuthorizeClient {
    async fn password_grant(
        &self,
        username: &str,
        password: &str,
        client_id: &str,
    ) -> Result<Token, AuthFailure> {
        self.request_token(&[
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
            ("scope", SCOPE),
            ("client_id", client_id),
            ("takeExclusiveSignOnControl", "true"),
        ])
        .await
    }

    async fn refresh_grant(
        &self,
        username: &str,
        refresh_token: &str,
    ) -> Result<Token, AuthFailure> {
        // The platform keys refresh sessions on the username, sent as client_id.
        self.request_token(&[
            ("grant_type", "refresh_token"),
            ("username", username),
            ("refresh_token", refresh_token),
            ("client_id", username),
        ])
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn client_for(server: &Server) -> AuthorizeClient {
        AuthorizeClient::with_base_url(Client::new(), server.url())
    }

    #[tokio::test]
    async fn test_password_grant() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "password".into()),
                Matcher::UrlEncoded("username".into(), "user@example.com".into()),
                Matcher::UrlEncoded("password".into(), "secret".into()),
                Matcher::UrlEncoded("client_id".into(), "app-key".into()),
                Matcher::UrlEncoded("scope".into(), "trapi".into()),
                Matcher::UrlEncoded("takeExclusiveSignOnControl".into(), "true".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"access_token":"acc","refresh_token":"ref","expires_in":"300","scope":"trapi","token_type":"Bearer"}"#,
            )
            .create_async()
            .await;

        let token = client_for(&server)
            .password_grant("user@example.com", "secret", "app-key")
            .await
            .unwrap();

        assert_eq!(token.access_token, "acc");
        assert_eq!(token.refresh_token.as_deref(), Some("ref"));
        assert_eq!(token.expires_in, Some(300));
        assert!(token.expires_at.is_some());
    }

    #[tokio::test]
    async fn test_refresh_grant_sends_username_as_client_id() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()),
                Matcher::UrlEncoded("refresh_token".into(), "ref-1".into()),
                Matcher::UrlEncoded("client_id".into(), "machine-id".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"access_token":"acc2","expires_in":600}"#)
            .create_async()
            .await;

        let token = client_for(&server)
            .refresh_grant("machine-id", "ref-1")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(token.access_token, "acc2");
    }

    #[tokio::test]
    async fn test_structured_error_is_rejected() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"error":"invalid_grant","error_description":"Invalid username or password.","error_uri":"https://example.com/errors"}"#,
            )
            .create_async()
            .await;

        let err = client_for(&server)
            .password_grant("user", "wrong", "app")
            .await
            .unwrap_err();

        match err {
            AuthFailure::Rejected { status, detail } => {
                assert_eq!(status, 400);
                assert_eq!(detail.error.as_deref(), Some("invalid_grant"));
                assert_eq!(
                    detail.error_description.as_deref(),
                    Some("Invalid username or password.")
                );
            }
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unstructured_error_is_generic_failure() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .with_status(502)
            .with_body("Bad Gateway")
            .create_async()
            .await;

        let err = client_for(&server)
            .password_grant("user", "pw", "app")
            .await
            .unwrap_err();

        assert!(matches!(err, AuthFailure::Failure(_)));
        assert!(err.to_string().contains("502"));
    }

    #[tokio::test]
    async fn test_out_of_range_expiry_keeps_token() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .with_status(200)
            .with_body(r#"{"access_token":"a","expires_in":"9223372036854775807"}"#)
            .create_async()
            .await;

        let token = client_for(&server)
            .password_grant("user", "pw", "app")
            .await
            .unwrap();

        assert_eq!(token.access_token, "a");
        assert_eq!(token.expires_in, Some(i64::MAX));
        assert!(token.expires_at.is_none());
    }

    #[test]
    fn test_from_config_base_url_override() {
        let config = AppConfig {
            auth_base_url: Some("https://auth.example.com/oauth2/".to_string()),
            ..Default::default()
        };
        let client = AuthorizeClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "https://auth.example.com/oauth2");

        let client = AuthorizeClient::from_config(&AppConfig::default()).unwrap();
        assert_eq!(client.base_url(), DEFAULT_AUTH_BASE_URL);
    }
}

//! HTTP client construction shared by the authorization and symbology clients

use anyhow::{anyhow, Context, Result};
use reqwest::{Client, Proxy};

use crate::config::{non_empty, AppConfig};

/// Response bodies quoted in error messages are cut to this many characters
pub const MAX_BODY_IN_ERROR: usize = 512;

const USER_AGENT: &str = concat!("symbology-convert/", env!("CARGO_PKG_VERSION"));

/// Build an HTTP client honouring the proxy settings in `config`.
///
/// Without `use_proxy_server` the client ignores system proxy variables too.
pub fn build_http_client(config: &AppConfig) -> Result<Client> {
    let mut builder = Client::builder().user_agent(USER_AGENT);

    if config.use_proxy_server {
        let server = non_empty(&config.proxy_server)
            .ok_or_else(|| anyhow!("proxy_server is required when use_proxy_server is set"))?;
        let mut proxy = Proxy::all(server)
            .with_context(|| format!("Invalid proxy server address: {}", server))?;
        if let (Some(user), Some(pass)) = (
            non_empty(&config.proxy_username),
            non_empty(&config.proxy_password),
        ) {
            proxy = proxy.basic_auth(user, pass);
        }
        tracing::debug!("Routing requests through proxy {}", server);
        builder = builder.proxy(proxy);
    } else {
        builder = builder.no_proxy();
    }

    builder.build().context("Failed to build HTTP client")
}

/// Cut a response body down for inclusion in an error message.
pub fn truncate_body(body: &str) -> &str {
    match body.char_indices().nth(MAX_BODY_IN_ERROR) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_proxy() {
        assert!(build_http_client(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_proxy_requires_server() {
        let config = AppConfig {
            use_proxy_server: true,
            ..Default::default()
        };
        let err = build_http_client(&config).unwrap_err();
        assert!(err.to_string().contains("proxy_server"));
    }

    #[test]
    fn test_build_with_authenticated_proxy() {
        let config = AppConfig {
            use_proxy_server: true,
            proxy_server: Some("http://proxy.local:3128".to_string()),
            proxy_username: Some("user".to_string()),
            proxy_password: Some("pass".to_string()),
            ..Default::default()
        };
        assert!(build_http_client(&config).is_ok());
    }

    #[test]
    fn test_truncate_body() {
        let long = "x".repeat(MAX_BODY_IN_ERROR + 100);
        assert_eq!(truncate_body(&long).len(), MAX_BODY_IN_ERROR);
        assert_eq!(truncate_body("short"), "short");
    }
}

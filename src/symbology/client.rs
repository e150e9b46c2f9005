use anyhow::Result;
use reqwest::{Client, Response};

use super::{ConversionResult, ConvertRequest, Field, MessageFormat, SymbologyError};
use crate::config::{non_empty, AppConfig};
use crate::transport::{build_http_client, truncate_body};

/// Default symbology endpoint base URL
pub const DEFAULT_SYMBOLOGY_BASE_URL: &str = "https://api.refinitiv.com/discovery/symbology/v1";

/// HTTP client for the symbology `/convert` endpoint.
///
/// Authenticates with the Bearer access token from the login loop.
pub struct SymbologyClient {
    access_token: String,
    http_client: Client,
    base_url: String,
}

impl SymbologyClient {
    /// Create a client using the default symbology base URL.
    pub fn new(http_client: Client, access_token: String) -> Self {
        Self::with_base_url(http_client, access_token, DEFAULT_SYMBOLOGY_BASE_URL.to_string())
    }

    /// Create a client with a custom base URL (config override or mock server).
    pub fn with_base_url(http_client: Client, access_token: String, base_url: String) -> Self {
        Self {
            access_token,
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build a proxy-aware client, honouring `symbology_base_url` when set.
    pub fn from_config(config: &AppConfig, access_token: String) -> Result<Self> {
        let http_client = build_http_client(config)?;
        Ok(match non_empty(&config.symbology_base_url) {
            Some(base_url) => Self::with_base_url(http_client, access_token, base_url.to_string()),
            None => Self::new(http_client, access_token),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Convert with the request in a JSON body.
    ///
    /// `Ok(None)` means the service answered with an empty or `null` body.
    pub async fn post_convert(
        &self,
        request: &ConvertRequest,
        format: MessageFormat,
    ) -> Result<Option<ConversionResult>, SymbologyError> {
        let url = format!("{}/convert", self.base_url);
        tracing::debug!("POST {} ({} instruments)", url, request.universe.len());

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.access_token)
            .query(&[("format", format.as_str())])
            .json(request)
            .send()
            .await?;

        read_result(response).await
    }

    /// Convert with the request in query parameters.
    ///
    /// `Ok(None)` means the service answered with an empty or `null` body.
    pub async fn get_convert(
        &self,
        universe: &str,
        to: &[Field],
        format: MessageFormat,
    ) -> Result<Option<ConversionResult>, SymbologyError> {
        let url = format!("{}/convert", self.base_url);
        let to = to.iter().map(Field::as_str).collect::<Vec<_>>().join(",");
        tracing::debug!("GET {} universe={} to={}", url, universe, to);

        let mut query = vec![("universe", universe), ("format", format.as_str())];
        if !to.is_empty() {
            query.push(("to", to.as_str()));
        }

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&query)
            .send()
            .await?;

        read_result(response).await
    }
}

async fn read_result(response: Response) -> Result<Option<ConversionResult>, SymbologyError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(SymbologyError::Status {
            status: status.as_u16(),
            body: truncate_body(&body).to_string(),
        });
    }

    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(trimmed)?))
}

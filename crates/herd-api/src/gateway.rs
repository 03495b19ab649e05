//! Authenticated JSON gateway for the Heroku platform API.
//!
//! The gateway only fails on exchanges that never complete (transport) or
//! never decode (non-JSON body). Completed exchanges return the decoded body
//! verbatim, including service-reported error payloads; HTTP status is not
//! inspected at this layer.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use thiserror::Error;

/// Default base URL of the Heroku platform API.
pub const API_BASE_URL: &str = "https://api.heroku.com";

/// Versioned media type the platform API requires.
pub const HEROKU_ACCEPT: &str = "application/vnd.heroku+json; version=3";

#[derive(Debug, Error)]
/// Enumerates gateway failure stages.
pub enum GatewayError {
    #[error("no credential supplied and no default token configured")]
    MissingToken,
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
/// Construction-time gateway configuration. The default token is threaded in
/// explicitly; there is no ambient process-global credential.
pub struct GatewayConfig {
    pub api_base: String,
    pub default_token: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_base: API_BASE_URL.to_string(),
            default_token: None,
        }
    }
}

#[derive(Debug, Clone)]
/// One-credential-at-a-time client for the platform API.
pub struct ApiGateway {
    client: reqwest::Client,
    text_client: reqwest::Client,
    config: GatewayConfig,
}

impl ApiGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(HEROKU_ACCEPT));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;
        // Log delivery URLs are plain text served off-platform; they get a
        // bare client without the versioned accept header or bearer auth.
        let text_client = reqwest::Client::builder().build()?;

        Ok(Self {
            client,
            text_client,
            config,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.api_base.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    fn resolve_token<'a>(&'a self, token: Option<&'a str>) -> Result<&'a str, GatewayError> {
        token
            .or(self.config.default_token.as_deref())
            .ok_or(GatewayError::MissingToken)
    }

    /// Issues one authenticated call and returns the decoded JSON body
    /// verbatim. `token` falls back to the configured default.
    pub async fn request(
        &self,
        endpoint: &str,
        method: Method,
        payload: Option<&Value>,
        token: Option<&str>,
    ) -> Result<Value, GatewayError> {
        let token = self.resolve_token(token)?;
        let url = self.endpoint_url(endpoint);
        tracing::debug!(%method, endpoint, "platform api request");

        let mut request = self.client.request(method, url).bearer_auth(token);
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let response = request.send().await?;
        let raw = response.text().await?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub async fn get(&self, endpoint: &str, token: Option<&str>) -> Result<Value, GatewayError> {
        self.request(endpoint, Method::GET, None, token).await
    }

    pub async fn post(
        &self,
        endpoint: &str,
        payload: Option<&Value>,
        token: Option<&str>,
    ) -> Result<Value, GatewayError> {
        self.request(endpoint, Method::POST, payload, token).await
    }

    pub async fn patch(
        &self,
        endpoint: &str,
        payload: Option<&Value>,
        token: Option<&str>,
    ) -> Result<Value, GatewayError> {
        self.request(endpoint, Method::PATCH, payload, token).await
    }

    pub async fn delete(&self, endpoint: &str, token: Option<&str>) -> Result<Value, GatewayError> {
        self.request(endpoint, Method::DELETE, None, token).await
    }

    /// Plain-text retrieval of an absolute URL, outside the JSON path.
    pub async fn fetch_text(&self, url: &str) -> Result<String, GatewayError> {
        tracing::debug!(url, "fetching text payload");
        let response = self.text_client.get(url).send().await?;
        Ok(response.text().await?)
    }
}

//! HTTP client wrapper: one request in, printed + saved response out

use crate::error::{ProbeError, Result};
use crate::models::ProbeConfig;
use colored::Colorize;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Builds the bearer Authorization header pair for an access token
pub fn bearer(token: &str) -> (String, String) {
    ("Authorization".to_string(), format!("Bearer {token}"))
}

/// A completed HTTP exchange: status, headers, and raw body text
#[derive(Debug, Clone)]
pub struct Exchange {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl Exchange {
    /// Parses the body as arbitrary JSON, `None` when it is not JSON
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }

    /// Deserializes the body into a typed response model
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| {
            ProbeError::Api(format!(
                "response body did not match expected shape: {e}"
            ))
        })
    }

    /// Whether the status code is 2xx
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// HTTP client bound to one target API base URL
///
/// Every request goes through [`ApiClient::send`], which prints the status
/// and body and writes the body to a per-flow output file before returning,
/// so call sites only branch on status and pull out fields.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    output_dir: PathBuf,
}

impl ApiClient {
    /// Creates a new ApiClient from probe configuration
    pub fn from_config(config: &ProbeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;

        // A base without a trailing slash would drop its last segment on join.
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        std::fs::create_dir_all(&config.output_dir)?;

        Ok(Self {
            client,
            base_url,
            output_dir: config.output_dir.clone(),
        })
    }

    /// Resolves an endpoint path (no leading slash) against the base URL
    pub fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Resolves an endpoint path with query parameters appended
    pub fn url_with(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.url(path)?;
        url.query_pairs_mut().extend_pairs(params);
        Ok(url)
    }

    /// Sends one request and reports the outcome
    ///
    /// Regardless of status code the response is printed and its body saved
    /// to `<output_dir>/<output_name>.json`, overwriting any previous run.
    /// Transport failures propagate to the caller.
    pub async fn send(
        &self,
        method: Method,
        url: Url,
        headers: &[(String, String)],
        body: Option<&Value>,
        output_name: &str,
    ) -> Result<Exchange> {
        debug!("{method} {url}");

        let mut req = self.client.request(method, url);
        for (key, value) in headers {
            req = req.header(key.as_str(), value.as_str());
        }
        if let Some(json) = body {
            req = req.json(json);
        }

        let response = req.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        let exchange = Exchange {
            status,
            headers,
            body,
        };
        self.print_exchange(&exchange);
        self.save_body(&exchange, output_name)?;
        Ok(exchange)
    }

    fn print_exchange(&self, exchange: &Exchange) {
        let status = exchange.status.as_u16().to_string();
        let status = if exchange.is_success() {
            status.green().bold()
        } else {
            status.red().bold()
        };
        println!("  {} {}", "Status:".bold(), status);

        let rendered = match exchange.json() {
            Some(value) => {
                serde_json::to_string_pretty(&value).unwrap_or_else(|_| exchange.body.clone())
            }
            None => exchange.body.clone(),
        };
        if rendered.is_empty() {
            println!("  {} {}", "Body:".bold(), "(empty)".dimmed());
        } else {
            println!("{rendered}");
        }
    }

    fn save_body(&self, exchange: &Exchange, output_name: &str) -> Result<()> {
        let path = self.output_dir.join(format!("{output_name}.json"));
        let content = match exchange.json() {
            Some(value) => serde_json::to_string_pretty(&value)?,
            None => exchange.body.clone(),
        };
        std::fs::write(&path, content)?;
        info!("Response body saved to {}", path.display());
        Ok(())
    }
}

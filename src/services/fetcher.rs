//! HTTP client for the bot API.
//!
//! One authenticated GET per call, gzip-compressed bodies, connection reuse
//! through a shared `reqwest::Client`. No retry here: retry policy belongs
//! to the cache slots, which keep serving the previous value until the next
//! natural expiry.

use crate::error::{Error, Result};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT_SECS: u64 = 60;

pub struct BotApiClient {
    base_url: String,
    api_token: String,
    client: reqwest::Client,
}

impl BotApiClient {
    pub fn new(base_url: &str, api_token: &str) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(Error::ConfigInvalid(format!(
                "base_url must start with http:// or https://, got: '{}'",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .gzip(true)
            .build()
            .map_err(|e| Error::ConfigInvalid(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            api_token: api_token.to_string(),
            client,
        })
    }

    /// Append the auth token to a path, using `&` when the path already
    /// carries a query string.
    fn build_url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        let separator = if path.contains('?') { '&' } else { '?' };
        format!(
            "{}/{}{}token={}",
            self.base_url, path, separator, self.api_token
        )
    }

    /// GET a path and parse the body as JSON, checking the top-level shape.
    pub async fn fetch(&self, path: &str, expect_array: bool) -> Result<Value> {
        let url = self.build_url(path);
        debug!(path = path, "Calling bot API");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::UpstreamUnavailable(format!("request to '{}' failed: {}", path, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamUnavailable(format!(
                "'{}' returned status {}",
                path, status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::UpstreamUnavailable(format!("failed to read '{}' body: {}", path, e)))?;

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| Error::UpstreamMalformed(format!("'{}' body is not JSON: {}", path, e)))?;

        match (expect_array, &value) {
            (true, Value::Array(_)) | (false, Value::Object(_)) => Ok(value),
            _ => Err(Error::UpstreamMalformed(format!(
                "'{}' returned {} where {} was expected",
                path,
                json_kind(&value),
                if expect_array { "an array" } else { "an object" }
            ))),
        }
    }

    /// GET a path whose body is a JSON object.
    pub async fn fetch_object(&self, path: &str) -> Result<Value> {
        self.fetch(path, false).await
    }

    /// GET a path whose body is a JSON array, returned as its elements.
    pub async fn fetch_array(&self, path: &str) -> Result<Vec<Value>> {
        let value = self.fetch(path, true).await?;
        match value {
            Value::Array(rows) => Ok(rows),
            _ => unreachable!("fetch(expect_array=true) returned a non-array"),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

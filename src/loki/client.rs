//! Blocking HTTP client for the log aggregation service.

use super::fetch::PageSource;
use super::types::{LogStream, QueryRangeResponse};
use crate::utils::config::DEFAULT_HTTP_TIMEOUT;
use crate::utils::error::FetchError;
use log::debug;
use reqwest::blocking::Client;

/// Client for the Loki-style range-query endpoint
pub struct LokiClient {
    client: Client,
    base_url: String,
    headers: Vec<(String, String)>,
}

impl LokiClient {
    /// Create a new client for the given base URL
    ///
    /// Extra headers (e.g. an Authorization bearer token) are applied to
    /// every request.
    pub fn new(
        base_url: impl Into<String>,
        headers: Vec<(String, String)>,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(FetchError::RequestFailed)?;

        let base_url: String = base_url.into();

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            headers,
        })
    }
}

impl PageSource for LokiClient {
    fn fetch_page(
        &self,
        query: &str,
        start_ns: i64,
        end_ns: i64,
        limit: usize,
    ) -> Result<Vec<LogStream>, FetchError> {
        let endpoint = format!("{}/loki/api/v1/query_range", self.base_url);

        debug!("GET {} start={} end={} limit={}", endpoint, start_ns, end_ns, limit);

        let mut request = self.client.get(&endpoint).query(&[
            ("query", query.to_string()),
            ("start", start_ns.to_string()),
            ("end", end_ns.to_string()),
            ("limit", limit.to_string()),
            ("direction", "FORWARD".to_string()),
        ]);

        for (key, value) in &self.headers {
            request = request.header(key.as_str(), value.as_str());
        }

        let response = request.send().map_err(FetchError::RequestFailed)?;

        let status = response.status();
        let body = response.text().map_err(FetchError::RequestFailed)?;

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status,
                body: body_fragment(&body),
            });
        }

        let decoded: QueryRangeResponse =
            serde_json::from_str(&body).map_err(|err| FetchError::MalformedResponse {
                detail: err.to_string(),
                body: body_fragment(&body),
            })?;

        if decoded.status != "success" {
            return Err(FetchError::QueryFailed(decoded.status));
        }

        let data = decoded.data.ok_or_else(|| FetchError::MalformedResponse {
            detail: "missing data field".to_string(),
            body: body_fragment(&body),
        })?;

        Ok(data.result)
    }
}

/// First 200 characters of a response body, for error messages
fn body_fragment(body: &str) -> String {
    body.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = LokiClient::new("http://localhost:3100/", Vec::new()).unwrap();
        assert_eq!(client.base_url, "http://localhost:3100");
    }

    #[test]
    fn test_body_fragment_truncates() {
        let long = "x".repeat(500);
        assert_eq!(body_fragment(&long).len(), 200);
        assert_eq!(body_fragment("short"), "short");
    }
}

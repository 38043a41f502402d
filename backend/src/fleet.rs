//! HTTP client for the upstream fleet-tracking API.
//!
//! Every call is a fresh authenticated GET; no caching, no retries.

use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Timeout applied to every upstream request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from the upstream fleet-tracking API.
#[derive(Debug, thiserror::Error)]
pub enum FleetError {
    /// The upstream responded with a non-success status.
    #[error("fleet API returned status {status}")]
    Upstream { status: StatusCode },
    /// The request could not be sent or completed.
    #[error("fleet API request failed: {0}")]
    Network(#[source] reqwest::Error),
    /// The response body was not valid JSON.
    #[error("fleet API returned a non-JSON body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Client for the fleet-tracking REST API.
#[derive(Clone, Debug)]
pub struct FleetClient {
    base_url: String,
    token: String,
    client: Client,
}

impl FleetClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            client: Client::new(),
        }
    }

    /// Whether both the base host and the bearer token are set.
    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.token.is_empty()
    }

    /// Fetch a JSON document from the upstream API.
    ///
    /// Parameters with a `None` value are omitted from the query string
    /// rather than sent empty.
    pub async fn fetch_json(
        &self,
        path: &str,
        params: &[(&str, Option<String>)],
    ) -> Result<Value, FleetError> {
        let request = self.build_request(path, params)?;
        debug!("GET {}", request.url());

        let response = self
            .client
            .execute(request)
            .await
            .map_err(FleetError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FleetError::Upstream { status });
        }

        response.json().await.map_err(FleetError::Decode)
    }

    fn build_request(
        &self,
        path: &str,
        params: &[(&str, Option<String>)],
    ) -> Result<reqwest::Request, FleetError> {
        let query: Vec<(&str, &str)> = params
            .iter()
            .filter_map(|(key, value)| value.as_deref().map(|v| (*key, v)))
            .collect();

        self.client
            .get(format!("{}{}", self.base_url, path))
            .query(&query)
            .bearer_auth(&self.token)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(FleetError::Network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header;
    use std::collections::HashMap;

    fn test_client() -> FleetClient {
        FleetClient::new("https://fleet.example.com", "upstream-token")
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = FleetClient::new("https://fleet.example.com/", "t");
        let request = client.build_request("/api/vehicles", &[]).unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://fleet.example.com/api/vehicles"
        );
    }

    #[test]
    fn absent_params_are_omitted() {
        let client = test_client();
        let request = client
            .build_request(
                "/api/events",
                &[
                    ("start", Some("2024-01-01T00:00:00Z".to_string())),
                    ("end", Some("2024-01-02T00:00:00Z".to_string())),
                    ("deviceId", None),
                ],
            )
            .unwrap();

        let pairs: HashMap<String, String> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs["start"], "2024-01-01T00:00:00Z");
        assert_eq!(pairs["end"], "2024-01-02T00:00:00Z");
        assert!(!pairs.contains_key("deviceId"));
    }

    #[test]
    fn no_params_means_no_query_string() {
        let client = test_client();
        let request = client.build_request("/api/vehicles", &[]).unwrap();
        assert_eq!(request.url().query(), None);
    }

    #[test]
    fn device_path_is_interpolated() {
        let client = test_client();
        let request = client
            .build_request("/api/vehicles/abc123/last-location", &[])
            .unwrap();
        assert_eq!(request.url().path(), "/api/vehicles/abc123/last-location");
    }

    #[test]
    fn bearer_credential_is_attached() {
        let client = test_client();
        let request = client.build_request("/api/vehicles", &[]).unwrap();
        let auth = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert_eq!(auth, "Bearer upstream-token");
    }
}

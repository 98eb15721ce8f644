use std::future::Future;

use serde_json::Value;

use crate::error::ExportError;

/// The host REST capability: GET one record's full detail by its link.
///
/// The export pipeline is generic over this trait so tests can run against
/// canned responses and the binary against a live Alma instance.
pub trait RestClient {
    fn get_json(&self, link: &str) -> impl Future<Output = Result<Value, ExportError>> + Send;
}

/// REST client for an Alma-style API: api-key authorization, JSON accept,
/// entity links resolved against a base URL.
pub struct AlmaClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AlmaClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Entity links arrive either absolute or as paths relative to the API
    /// root; both forms must resolve to the same resource.
    fn resolve(&self, link: &str) -> String {
        if link.starts_with("http://") || link.starts_with("https://") {
            link.to_string()
        } else {
            format!("{}/{}", self.base_url, link.trim_start_matches('/'))
        }
    }
}

impl RestClient for AlmaClient {
    async fn get_json(&self, link: &str) -> Result<Value, ExportError> {
        let url = self.resolve(link);
        tracing::debug!(%url, "fetching PO line detail");

        let response = self
            .http
            .get(&url)
            .header("Authorization", format!("apikey {}", self.api_key))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ExportError::Fetch(e.to_string()))?;

        let response = response
            .error_for_status()
            .map_err(|e| ExportError::Fetch(e.to_string()))?;

        response
            .json::<Value>()
            .await
            .map_err(|e| ExportError::Fetch(e.to_string()))
    }
}

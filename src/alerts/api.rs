//! REST client for the alerts backend.

use serde::de::DeserializeOwned;
use url::form_urlencoded;

use super::types::{
    Alert, AlertFilters, AlertStats, AlertsListResponse, AnalyseResult, IngestResult,
};
use crate::http_client;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api/alerts";

const MAX_LIST_RESPONSE_BYTES: usize = 8 * 1024 * 1024;
const MAX_RESPONSE_BYTES: usize = 1024 * 1024;

/// Failure of a single network operation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("API {code}: {body}")]
    Status { code: u16, body: String },
    #[error("HTTP error: {0}")]
    Transport(String),
    #[error("Invalid response: {0}")]
    Decode(String),
}

/// The five network operations the dashboard consumes.
///
/// Implementations are called from background jobs, so they block and must be
/// shareable across threads.
pub trait AlertsApi: Send + Sync {
    fn list_alerts(
        &self,
        filters: &AlertFilters,
        limit: u32,
        offset: u32,
    ) -> Result<AlertsListResponse, ApiError>;

    fn get_alert(&self, id: i64) -> Result<Alert, ApiError>;

    fn stats(&self) -> Result<AlertStats, ApiError>;

    fn trigger_fetch(&self) -> Result<IngestResult, ApiError>;

    fn trigger_analyse(&self, limit: u32) -> Result<AnalyseResult, ApiError>;
}

/// [`AlertsApi`] over HTTP using the shared agent.
#[derive(Clone, Debug)]
pub struct HttpAlertsApi {
    base_url: String,
}

impl HttpAlertsApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> String {
        format!("{}{}{}", self.base_url, path, query_string(params))
    }
}

impl AlertsApi for HttpAlertsApi {
    fn list_alerts(
        &self,
        filters: &AlertFilters,
        limit: u32,
        offset: u32,
    ) -> Result<AlertsListResponse, ApiError> {
        let mut params = filters.query_pairs();
        params.push(("limit", limit.to_string()));
        params.push(("offset", offset.to_string()));
        let url = self.url("/", &params);
        let body = send(http_client::agent().get(&url), MAX_LIST_RESPONSE_BYTES)?;
        decode(&body)
    }

    fn get_alert(&self, id: i64) -> Result<Alert, ApiError> {
        let url = self.url(&format!("/{id}"), &[]);
        let body = send(http_client::agent().get(&url), MAX_RESPONSE_BYTES)?;
        decode(&body)
    }

    fn stats(&self) -> Result<AlertStats, ApiError> {
        let url = self.url("/stats", &[]);
        let body = send(http_client::agent().get(&url), MAX_RESPONSE_BYTES)?;
        decode(&body)
    }

    fn trigger_fetch(&self) -> Result<IngestResult, ApiError> {
        let url = self.url("/fetch", &[]);
        let body = send(http_client::agent().post(&url), MAX_RESPONSE_BYTES)?;
        decode(&body)
    }

    fn trigger_analyse(&self, limit: u32) -> Result<AnalyseResult, ApiError> {
        let url = self.url("/analyse", &[("limit", limit.to_string())]);
        let body = send(http_client::agent().post(&url), MAX_RESPONSE_BYTES)?;
        decode(&body)
    }
}

/// Build `?k=v&...` from the non-empty parameters, or an empty string.
pub(crate) fn query_string(params: &[(&str, String)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in params.iter().filter(|(_, value)| !value.is_empty()) {
        serializer.append_pair(key, value);
        any = true;
    }
    if !any {
        return String::new();
    }
    format!("?{}", serializer.finish())
}

fn send(request: ureq::Request, max_bytes: usize) -> Result<String, ApiError> {
    let request = request.set("Accept", "application/json");
    let response = match request.call() {
        Ok(response) => response,
        Err(ureq::Error::Status(code, response)) => {
            let body = http_client::read_response_text(response, MAX_RESPONSE_BYTES)
                .unwrap_or_else(|err| err.to_string());
            return Err(ApiError::Status { code, body });
        }
        Err(ureq::Error::Transport(err)) => {
            return Err(ApiError::Transport(err.to_string()));
        }
    };
    http_client::read_response_text(response, max_bytes)
        .map_err(|err| ApiError::Transport(err.to_string()))
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Decode("Empty response body".to_string()));
    }
    serde_json::from_str(trimmed).map_err(|err| ApiError::Decode(err.to_string()))
}

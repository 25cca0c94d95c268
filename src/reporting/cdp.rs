//! reporting::cdp
//!
//! CDP reporting service client over JSON/HTTP.
//!
//! # Design
//!
//! This module implements the `ReportingService` trait against the CDP test
//! API. Routes, relative to the configured base URL:
//!
//! - `GET  cities?name=..&country=..` → `{"id": ".."}`
//! - `GET  cities/{id}/questionnaire`
//! - `POST cities/{id}/answers/single-select`
//! - `POST cities/{id}/answers/matrix`
//!
//! Path segments are percent-encoded, so a city id never adds or alters
//! path components. Requests carry a bearer token when one is configured. Errors are mapped
//! to [`ReportingError`] by status code; the body's `message` (or `error`)
//! field is kept as detail.
//!
//! No retries happen here. The report builder applies timeouts and treats
//! every failure except `NotConfigured` as a dependency error.
//!
//! # Example
//!
//! ```ignore
//! use citycatalyst_cdp::reporting::cdp::CdpClient;
//! use citycatalyst_cdp::reporting::ReportingService;
//!
//! let client = CdpClient::new("https://cdp.example.org/api/v1", Some("token".into()));
//! let city = client.city_id("Lagos", "Nigeria").await?;
//! ```

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;

use super::traits::{
    CityId, MatrixAnswer, Questionnaire, ReportingError, ReportingService, SingleSelectAnswer,
};

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = concat!("citycatalyst-cdp/", env!("CARGO_PKG_VERSION"));

/// CDP API client.
#[derive(Clone)]
pub struct CdpClient {
    /// HTTP client for making requests
    client: Client,
    /// API base URL, without trailing slash; `None` when unconfigured
    api_base: Option<String>,
    /// Bearer token
    token: Option<String>,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for CdpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CdpClient")
            .field("api_base", &self.api_base)
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

impl CdpClient {
    /// Create a client for the given API base URL.
    pub fn new(api_base: impl Into<String>, token: Option<String>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            api_base: Some(api_base),
            token,
        }
    }

    /// Create a client with no endpoint.
    ///
    /// Every call fails with `ReportingError::NotConfigured`. Used when the
    /// reporting mode never reaches the network.
    pub fn unconfigured() -> Self {
        Self {
            client: Client::new(),
            api_base: None,
            token: None,
        }
    }

    /// The configured API base URL.
    pub fn api_base(&self) -> Option<&str> {
        self.api_base.as_deref()
    }

    /// Build the URL for an API path given as unencoded segments.
    fn url(&self, segments: &[&str]) -> Result<Url, ReportingError> {
        let base = self
            .api_base
            .as_deref()
            .ok_or_else(|| ReportingError::NotConfigured("no api_base set".into()))?;
        let mut url = Url::parse(base).map_err(|e| {
            ReportingError::NotConfigured(format!("invalid api_base '{}': {}", base, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                ReportingError::NotConfigured(format!("api_base '{}' cannot have a path", base))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Build common headers for API requests.
    fn headers(&self) -> Result<HeaderMap, ReportingError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ReportingError::AuthFailed("token is not a valid header".into()))?;
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        Ok(headers)
    }

    /// Handle API response, mapping errors appropriately.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        response: Response,
    ) -> Result<T, ReportingError> {
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| ReportingError::ApiError {
                status: status.as_u16(),
                message: format!("Failed to parse response: {}", e),
            })
        } else {
            Err(Self::error_from_response(response, status).await)
        }
    }

    /// Handle a response whose body we do not need.
    async fn handle_empty_response(response: Response) -> Result<(), ReportingError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::error_from_response(response, status).await)
        }
    }

    /// Map an error response from the API.
    async fn error_from_response(response: Response, status: StatusCode) -> ReportingError {
        let message = match response.json::<CdpErrorResponse>().await {
            Ok(err) => err.message,
            Err(_) => "Unknown error".to_string(),
        };

        match status {
            StatusCode::UNAUTHORIZED => ReportingError::AuthFailed("Invalid or expired token".into()),
            StatusCode::FORBIDDEN => {
                ReportingError::AuthFailed(format!("Permission denied: {}", message))
            }
            StatusCode::NOT_FOUND => ReportingError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => ReportingError::RateLimited,
            _ if status.is_server_error() => ReportingError::ApiError {
                status: status.as_u16(),
                message: format!("CDP server error: {}", message),
            },
            _ => ReportingError::ApiError {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl ReportingService for CdpClient {
    fn name(&self) -> &'static str {
        "cdp"
    }

    async fn city_id(&self, city_name: &str, country: &str) -> Result<CityId, ReportingError> {
        let url = self.url(&["cities"])?;

        let response = self
            .client
            .get(url)
            .headers(self.headers()?)
            .query(&[("name", city_name), ("country", country)])
            .send()
            .await
            .map_err(|e| ReportingError::NetworkError(e.to_string()))?;

        let city: CdpCity = Self::handle_response(response).await?;
        Ok(CityId::new(city.id))
    }

    async fn questionnaire(&self, city: &CityId) -> Result<Questionnaire, ReportingError> {
        let url = self.url(&["cities", city.as_str(), "questionnaire"])?;

        let response = self
            .client
            .get(url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| ReportingError::NetworkError(e.to_string()))?;

        Self::handle_response(response).await
    }

    async fn submit_single_select(
        &self,
        city: &CityId,
        answer: SingleSelectAnswer,
    ) -> Result<(), ReportingError> {
        let url = self.url(&["cities", city.as_str(), "answers", "single-select"])?;

        let response = self
            .client
            .post(url)
            .headers(self.headers()?)
            .json(&answer)
            .send()
            .await
            .map_err(|e| ReportingError::NetworkError(e.to_string()))?;

        Self::handle_empty_response(response).await
    }

    async fn submit_matrix(
        &self,
        city: &CityId,
        answer: MatrixAnswer,
    ) -> Result<(), ReportingError> {
        let url = self.url(&["cities", city.as_str(), "answers", "matrix"])?;

        let response = self
            .client
            .post(url)
            .headers(self.headers()?)
            .json(&answer)
            .send()
            .await
            .map_err(|e| ReportingError::NetworkError(e.to_string()))?;

        Self::handle_empty_response(response).await
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Deserialize)]
struct CdpCity {
    id: String,
}

#[derive(Debug, Deserialize)]
struct CdpErrorResponse {
    #[serde(alias = "error")]
    message: String,
}

//! HTTP client for the travel backend.
//!
//! Listing, detail and auth calls race against a fixed timeout; whichever of
//! the response body or the timer settles first decides the outcome. The
//! favorites endpoints carry no timeout. Nothing is retried.

use std::time::Duration;

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::services::query_builder;
use crate::types::errors::{AuthError, FetchError};
use crate::types::filter::FilterCriteria;
use crate::types::listing::{Destination, ItemKind, ListingItem, Package};
use crate::types::session::{ApiErrorBody, LoginResponse, RegisterRequest};

/// Timeout applied when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Client for the backend REST API.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    /// # Arguments
    /// * `base_url` - API root, e.g. `http://localhost:8000`
    /// * `timeout_secs` - race timeout for listing, detail and auth calls
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| FetchError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(timeout_secs.max(1)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /destinations?..` or `GET /packages/?..`.
    pub async fn fetch_listing(
        &self,
        kind: ItemKind,
        criteria: &FilterCriteria,
    ) -> Result<Vec<ListingItem>, FetchError> {
        let url = query_builder::listing_url(&self.base_url, kind, criteria);
        let body = self.get_with_timeout(&url).await?;

        let items = match kind {
            ItemKind::Destination => decode::<Vec<Destination>>(&body)?
                .into_iter()
                .map(ListingItem::from)
                .collect::<Vec<_>>(),
            ItemKind::Package => decode::<Vec<Package>>(&body)?
                .into_iter()
                .map(ListingItem::from)
                .collect(),
        };
        debug!(kind = kind.label(), count = items.len(), "listing fetched");
        Ok(items)
    }

    /// `GET /destinations/{id}`. A missing destination is `Http { status: 404 }`.
    pub async fn get_destination(&self, id: &str) -> Result<Destination, FetchError> {
        let url = format!("{}/destinations/{}", self.base_url, urlencoding::encode(id));
        decode(&self.get_with_timeout(&url).await?)
    }

    /// `GET /packages/{id}`.
    pub async fn get_package(&self, id: &str) -> Result<Package, FetchError> {
        let url = format!("{}/packages/{}", self.base_url, urlencoding::encode(id));
        decode(&self.get_with_timeout(&url).await?)
    }

    /// `POST /favorites/{id}`.
    pub async fn add_favorite(&self, token: &str, id: &str) -> Result<serde_json::Value, FetchError> {
        let url = self.favorite_url(id);
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(map_transport)?;
        acknowledgement(response).await
    }

    /// `DELETE /favorites/{id}`.
    pub async fn remove_favorite(
        &self,
        token: &str,
        id: &str,
    ) -> Result<serde_json::Value, FetchError> {
        let url = self.favorite_url(id);
        let response = self
            .client
            .delete(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(map_transport)?;
        acknowledgement(response).await
    }

    /// `POST /auth/login`, form-encoded. 400 and 401 mean bad credentials.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let url = format!("{}/auth/login", self.base_url);
        let request = self
            .client
            .post(&url)
            .form(&[("username", username), ("password", password)]);

        let (status, body) = self.send_with_timeout(request).await?;
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::BAD_REQUEST {
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            return Err(http_error(status).into());
        }
        Ok(decode(&body)?)
    }

    /// `POST /auth/register` with a JSON body. A refusal carries the
    /// backend's `detail` text.
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), AuthError> {
        let url = format!("{}/auth/register", self.base_url);
        let (status, body) = self
            .send_with_timeout(self.client.post(&url).json(request))
            .await?;

        if status.is_success() {
            return Ok(());
        }
        let detail = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.message())
            .unwrap_or_else(|_| http_error(status).to_string());
        Err(AuthError::Rejected(detail))
    }

    fn favorite_url(&self, id: &str) -> String {
        format!("{}/favorites/{}", self.base_url, urlencoding::encode(id))
    }

    /// GET `url`, failing on any non-success status.
    async fn get_with_timeout(&self, url: &str) -> Result<String, FetchError> {
        let (status, body) = self.send_with_timeout(self.client.get(url)).await?;
        if !status.is_success() {
            let err = http_error(status);
            error!(%url, error = %err, "request failed");
            return Err(err);
        }
        Ok(body)
    }

    /// Sends and reads the whole body inside one timeout window.
    async fn send_with_timeout(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<(StatusCode, String), FetchError> {
        let exchange = async {
            let response = request.send().await.map_err(map_transport)?;
            let status = response.status();
            let body = response.text().await.map_err(map_transport)?;
            Ok::<_, FetchError>((status, body))
        };

        match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result,
            Err(_) => {
                error!(timeout_secs = self.timeout.as_secs(), "request timed out");
                Err(FetchError::Timeout(self.timeout.as_secs()))
            }
        }
    }
}

fn http_error(status: StatusCode) -> FetchError {
    FetchError::Http {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or("").to_string(),
    }
}

fn map_transport(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout(DEFAULT_TIMEOUT_SECS)
    } else if e.is_decode() {
        FetchError::Malformed(e.to_string())
    } else {
        FetchError::Network(e.to_string())
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))
}

/// An empty acknowledgement body is accepted as `null`.
async fn acknowledgement(response: Response) -> Result<serde_json::Value, FetchError> {
    let status = response.status();
    if !status.is_success() {
        return Err(http_error(status));
    }
    let body = response.text().await.map_err(map_transport)?;
    if body.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    decode(&body)
}

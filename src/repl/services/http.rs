//! # HTTP Service
//!
//! Typed access to the profile endpoints of the backend. Every failure is
//! collapsed into one fixed message per operation; the underlying cause is
//! only logged.

use crate::repl::models::{ProfilePage, ProfileRecord, SearchCriteria};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by profile API calls
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Failed to fetch users")]
    FetchUsers,

    #[error("Failed to add user")]
    AddUser,

    #[error("Failed to update user")]
    UpdateUser,

    #[error("Failed to delete user")]
    DeleteUser,

    #[error("Request timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Request was cancelled before it completed")]
    Cancelled,

    #[error("Invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

/// Parameters of one list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    pub search_text: String,
    pub search_criteria: SearchCriteria,
}

impl ListQuery {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            search_text: String::new(),
            search_criteria: SearchCriteria::default(),
        }
    }

    pub fn with_search(mut self, criteria: SearchCriteria, text: impl Into<String>) -> Self {
        self.search_criteria = criteria;
        self.search_text = text.into();
        self
    }

    /// The `(param, value)` filter pair, present only for non-blank search text
    pub fn search_filter(&self) -> Option<(&'static str, &str)> {
        if self.search_text.trim().is_empty() {
            None
        } else {
            Some((self.search_criteria.as_param(), self.search_text.as_str()))
        }
    }

    /// Append pagination and filter parameters, percent-encoded
    pub fn apply_to(&self, url: &mut Url) {
        let mut pairs = url.query_pairs_mut();
        pairs
            .append_pair("page", &self.page.to_string())
            .append_pair("pageSize", &self.page_size.to_string());
        if let Some((param, text)) = self.search_filter() {
            pairs.append_pair(param, text);
        }
    }
}

/// Transport-agnostic access to the profile backend
#[async_trait]
pub trait ProfileApi: Send + Sync {
    /// `GET /profiles?page=..&pageSize=..[&criteria=text]`
    async fn list_profiles(&self, query: &ListQuery) -> Result<ProfilePage, ApiError>;

    /// `POST /profiles`
    async fn create_profile(&self, record: &ProfileRecord) -> Result<ProfileRecord, ApiError>;

    /// `PUT /profile/{id}`
    async fn update_profile(&self, record: &ProfileRecord) -> Result<ProfileRecord, ApiError>;

    /// `DELETE /user/{id}`
    async fn delete_user(&self, id: i64) -> Result<(), ApiError>;
}

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

fn build_client(builder: ClientBuilder) -> Result<Client, ApiError> {
    builder.build().map_err(|e| {
        tracing::warn!("Failed to build HTTP client: {e}");
        ApiError::ClientBuild(e.to_string())
    })
}

/// reqwest-backed implementation of [`ProfileApi`]
#[derive(Clone)]
pub struct HttpProfileService {
    client: Client,
    base_url: Url,
}

impl HttpProfileService {
    /// Create a service for `base_url`, optionally capping each request
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let parsed =
            Url::parse(base_url).map_err(|_| ApiError::InvalidBaseUrl(base_url.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = build_client(builder)?;

        tracing::debug!("HttpProfileService created for {}", parsed);
        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// Base URL with `segments` appended to its path
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// URL of a list request
    pub fn list_url(&self, query: &ListQuery) -> Url {
        let mut url = self.endpoint(&["profiles"]);
        query.apply_to(&mut url);
        url
    }

    /// Send a request and decode its JSON body, mapping any failure to `failure`
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        failure: ApiError,
    ) -> Result<T, ApiError> {
        let response = self.send(request, failure.clone()).await?;
        response.json::<T>().await.map_err(|e| {
            tracing::warn!("{failure}: undecodable response body: {e}");
            failure
        })
    }

    /// Send a request, treating transport errors and non-2xx statuses as `failure`
    async fn send(
        &self,
        request: RequestBuilder,
        failure: ApiError,
    ) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!("{failure}: {e}");
            failure.clone()
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("{failure}: HTTP {status}");
            return Err(failure);
        }

        Ok(response)
    }
}

#[async_trait]
impl ProfileApi for HttpProfileService {
    async fn list_profiles(&self, query: &ListQuery) -> Result<ProfilePage, ApiError> {
        let url = self.list_url(query);
        tracing::debug!("GET {url}");
        self.send_json(self.client.get(url), ApiError::FetchUsers)
            .await
    }

    async fn create_profile(&self, record: &ProfileRecord) -> Result<ProfileRecord, ApiError> {
        let url = self.endpoint(&["profiles"]);
        tracing::debug!("POST {url}");
        self.send_json(self.client.post(url).json(record), ApiError::AddUser)
            .await
    }

    async fn update_profile(&self, record: &ProfileRecord) -> Result<ProfileRecord, ApiError> {
        let url = self.endpoint(&["profile", &record.id.to_string()]);
        tracing::debug!("PUT {url}");
        self.send_json(self.client.put(url).json(record), ApiError::UpdateUser)
            .await
    }

    async fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&["user", &id.to_string()]);
        tracing::debug!("DELETE {url}");
        self.send(self.client.delete(url), ApiError::DeleteUser)
            .await
            .map(|_| ())
    }
}

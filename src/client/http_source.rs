//! Reqwest-backed random user source.
//!
//! This adapter owns transport details only: building the request URL,
//! HTTP status mapping, and JSON decoding into `UserRecord`s.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use super::{FetchError, ProfileSource, dto::ApiResponseDto};
use crate::models::user::UserRecord;

pub const DEFAULT_ENDPOINT: &str = "https://randomuser.me/api/";

/// Profile source that performs `GET <endpoint>?results=<count>` requests.
#[derive(Debug, Clone)]
pub struct RandomUserSource {
    client: Client,
    endpoint: Url,
}

impl RandomUserSource {
    /// Build a source using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl ProfileSource for RandomUserSource {
    async fn fetch_users(&self, count: usize) -> Result<Vec<UserRecord>, FetchError> {
        let url = results_url(&self.endpoint, count);
        debug!("Fetching {count} user(s) from {url}");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_status_error(status));
        }
        let body = response.bytes().await.map_err(map_transport_error)?;

        parse_users(body.as_ref())
    }
}

/// The endpoint with its `results` query pair set to `count`, other pairs kept.
fn results_url(endpoint: &Url, count: usize) -> Url {
    let mut url = endpoint.clone();
    let kept: Vec<(String, String)> = endpoint
        .query_pairs()
        .filter(|(key, _)| key != "results")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("results", &count.to_string());
    url
}

fn parse_users(body: &[u8]) -> Result<Vec<UserRecord>, FetchError> {
    let decoded: ApiResponseDto = serde_json::from_slice(body)
        .map_err(|error| FetchError::Decode(format!("invalid user payload: {error}")))?;
    Ok(decoded.into_user_records())
}

fn map_transport_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout(error.to_string())
    } else if error.is_decode() {
        FetchError::Decode(error.to_string())
    } else {
        FetchError::Transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode) -> FetchError {
    FetchError::Status {
        status: status.as_u16(),
    }
}

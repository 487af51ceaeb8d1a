//! Outbound access to the random user generation service.

use async_trait::async_trait;

use crate::models::user::UserRecord;

mod dto;
pub mod http_source;

pub use http_source::RandomUserSource;

/// Fallback shown when a failed fetch carries no description.
pub const FETCH_FAILED_FALLBACK: &str = "Failed to fetch users";
/// Shown when the initial load dies without producing a fetch result.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// A source of freshly generated user profiles.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Fetch `count` records in one request, in response order.
    async fn fetch_users(&self, count: usize) -> Result<Vec<UserRecord>, FetchError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Timeout(String),
    #[error("Request failed with status code {status}")]
    Status { status: u16 },
    #[error("{0}")]
    Decode(String),
    #[error("Response contained no results")]
    EmptyResults,
}

impl FetchError {
    /// The message surfaced in the error view.
    pub fn display_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            FETCH_FAILED_FALLBACK.to_owned()
        } else {
            message
        }
    }
}

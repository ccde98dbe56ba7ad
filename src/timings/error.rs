use thiserror::Error;

use crate::db::StoreError;
use crate::models::PrayerRecord;

/// Failures from the remote prayer-time provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("city must not be empty")]
    EmptyCity,

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("provider returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to parse provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("provider response is missing {0}")]
    MissingField(String),
}

/// Everything a caller of the retrieval engine can get back instead of times.
///
/// A cache miss is not an error and never shows up here.
#[derive(Debug, Error)]
pub enum TimingsError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("prayer times cache unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),

    #[error("could not fetch prayer times: {0}")]
    RemoteFetchFailed(#[source] ProviderError),

    /// The provider answered but the answer could not be cached. The fetched
    /// record is kept so the caller can still use it.
    #[error("fetched prayer times for {} but could not cache them: {source}", .record.city)]
    PersistFailed {
        record: Box<PrayerRecord>,
        #[source]
        source: StoreError,
    },
}

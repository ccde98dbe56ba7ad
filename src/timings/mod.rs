pub mod engine;
pub mod error;
pub mod presenter;
pub mod provider;

pub use engine::{get_prayer_times, retrieve, Retrieval, Source};
pub use error::{ProviderError, TimingsError};
pub use provider::{AladhanClient, PrayerTimesProvider};

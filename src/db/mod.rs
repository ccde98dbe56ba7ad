pub mod migrations;
pub mod repository;

pub use repository::{PrayerStore, PutOutcome, SqliteStore, StoreError};

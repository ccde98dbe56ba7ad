//! Cache-or-fetch retrieval
//!
//! Each call looks up today's record for the city in the store. A hit is
//! returned as is. A miss goes to the provider exactly once, and a successful
//! answer is written back to the store before being returned. Nothing is
//! kept between calls.

use chrono::{Local, NaiveDate};
use log::{debug, info};
use std::time::Instant;

use super::error::TimingsError;
use super::provider::PrayerTimesProvider;
use crate::db::{PrayerStore, PutOutcome};
use crate::models::PrayerRecord;
use crate::utils::format::date_key;

/// Where a retrieved record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cache,
    Network,
}

/// A fully populated record plus its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retrieval {
    pub record: PrayerRecord,
    pub source: Source,
}

/// Today's prayer times for `city`, with "today" taken from the local clock.
pub fn get_prayer_times<S, P>(store: &S, provider: &P, city: &str) -> Result<Retrieval, TimingsError>
where
    S: PrayerStore + ?Sized,
    P: PrayerTimesProvider + ?Sized,
{
    retrieve(store, provider, city, Local::now().date_naive())
}

/// Prayer times for `city` on `day`.
pub fn retrieve<S, P>(
    store: &S,
    provider: &P,
    city: &str,
    day: NaiveDate,
) -> Result<Retrieval, TimingsError>
where
    S: PrayerStore + ?Sized,
    P: PrayerTimesProvider + ?Sized,
{
    let started = Instant::now();
    let result = cache_or_fetch(store, provider, city, &date_key(day));
    debug!("retrieve({:?}) took {:?}", city, started.elapsed());
    result
}

fn cache_or_fetch<S, P>(
    store: &S,
    provider: &P,
    city: &str,
    date: &str,
) -> Result<Retrieval, TimingsError>
where
    S: PrayerStore + ?Sized,
    P: PrayerTimesProvider + ?Sized,
{
    if city.trim().is_empty() {
        return Err(TimingsError::InvalidInput("city must not be empty".to_string()));
    }

    if let Some(record) = store
        .get(city, date)
        .map_err(TimingsError::StoreUnavailable)?
    {
        debug!("Cache hit for {} on {}", city, date);
        return Ok(Retrieval {
            record,
            source: Source::Cache,
        });
    }

    debug!("Cache miss for {} on {}", city, date);
    let record = provider
        .fetch(city, date)
        .map_err(TimingsError::RemoteFetchFailed)?;

    match store.put(&record) {
        Ok(PutOutcome::Inserted) => {
            info!("Prayer times for {} saved to cache", city);
            Ok(Retrieval {
                record,
                source: Source::Network,
            })
        }
        // Another invocation cached the same day first. The stored row wins.
        Ok(PutOutcome::AlreadyPresent) => match store.get(city, date) {
            Ok(Some(stored)) => Ok(Retrieval {
                record: stored,
                source: Source::Cache,
            }),
            Ok(None) => Ok(Retrieval {
                record,
                source: Source::Network,
            }),
            Err(e) => Err(TimingsError::StoreUnavailable(e)),
        },
        Err(source) => Err(TimingsError::PersistFailed {
            record: Box::new(record),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::db::{SqliteStore, StoreError};
    use crate::timings::error::ProviderError;
    use rusqlite::Connection;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn sample(city: &str, date: &str) -> PrayerRecord {
        PrayerRecord {
            city: city.to_string(),
            date: date.to_string(),
            fajr: "05:00".to_string(),
            dhuhr: "12:30".to_string(),
            asr: "15:45".to_string(),
            maghrib: "18:20".to_string(),
            isha: "19:50".to_string(),
        }
    }

    #[derive(Default)]
    struct FakeStore {
        rows: RefCell<HashMap<(String, String), PrayerRecord>>,
        get_dates: RefCell<Vec<String>>,
        put_dates: RefCell<Vec<String>>,
        fail_get: bool,
        fail_put: bool,
    }

    impl FakeStore {
        fn with(record: PrayerRecord) -> Self {
            let store = Self::default();
            store
                .rows
                .borrow_mut()
                .insert((record.city.clone(), record.date.clone()), record);
            store
        }

        fn broken() -> StoreError {
            StoreError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        }
    }

    impl PrayerStore for FakeStore {
        fn get(&self, city: &str, date: &str) -> Result<Option<PrayerRecord>, StoreError> {
            self.get_dates.borrow_mut().push(date.to_string());
            if self.fail_get {
                return Err(Self::broken());
            }
            Ok(self
                .rows
                .borrow()
                .get(&(city.to_string(), date.to_string()))
                .cloned())
        }

        fn put(&self, record: &PrayerRecord) -> Result<PutOutcome, StoreError> {
            self.put_dates.borrow_mut().push(record.date.clone());
            if self.fail_put {
                return Err(Self::broken());
            }
            let key = (record.city.clone(), record.date.clone());
            let mut rows = self.rows.borrow_mut();
            if rows.contains_key(&key) {
                return Ok(PutOutcome::AlreadyPresent);
            }
            rows.insert(key, record.clone());
            Ok(PutOutcome::Inserted)
        }
    }

    #[derive(Default)]
    struct FakeProvider {
        calls: Cell<usize>,
        dates: RefCell<Vec<String>>,
        fail: bool,
    }

    impl PrayerTimesProvider for FakeProvider {
        fn fetch(&self, city: &str, date: &str) -> Result<PrayerRecord, ProviderError> {
            self.calls.set(self.calls.get() + 1);
            self.dates.borrow_mut().push(date.to_string());
            if self.fail {
                return Err(ProviderError::MissingField("timings.Fajr".to_string()));
            }
            Ok(sample(city, date))
        }
    }

    #[test]
    fn cache_hit_skips_provider() {
        let store = FakeStore::with(sample("Nairobi", "19-10-2026"));
        let provider = FakeProvider::default();

        for _ in 0..3 {
            let got = retrieve(&store, &provider, "Nairobi", day()).unwrap();
            assert_eq!(got.source, Source::Cache);
            assert_eq!(got.record, sample("Nairobi", "19-10-2026"));
        }
        assert_eq!(provider.calls.get(), 0);
        assert!(store.put_dates.borrow().is_empty());
    }

    #[test]
    fn miss_fetches_once_and_persists_once() {
        let store = FakeStore::default();
        let provider = FakeProvider::default();

        let got = retrieve(&store, &provider, "Nairobi", day()).unwrap();

        assert_eq!(got.source, Source::Network);
        assert_eq!(got.record, sample("Nairobi", "19-10-2026"));
        assert_eq!(provider.calls.get(), 1);
        assert_eq!(store.put_dates.borrow().len(), 1);
        assert_eq!(
            store.rows.borrow().get(&("Nairobi".to_string(), "19-10-2026".to_string())),
            Some(&got.record)
        );

        // Second call the same day is served from the store.
        let again = retrieve(&store, &provider, "Nairobi", day()).unwrap();
        assert_eq!(again.source, Source::Cache);
        assert_eq!(provider.calls.get(), 1);
    }

    #[test]
    fn lookup_fetch_and_write_use_the_same_date_key() {
        let store = FakeStore::default();
        let provider = FakeProvider::default();
        let early = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();

        retrieve(&store, &provider, "Kano", early).unwrap();

        let get_dates = store.get_dates.borrow();
        let put_dates = store.put_dates.borrow();
        assert_eq!(get_dates.as_slice(), ["05-01-2026"]);
        assert_eq!(put_dates.as_slice(), get_dates.as_slice());
        assert_eq!(provider.dates.borrow().as_slice(), get_dates.as_slice());
    }

    #[test]
    fn empty_city_touches_nothing() {
        let store = FakeStore::default();
        let provider = FakeProvider::default();

        for city in ["", "  "] {
            let err = retrieve(&store, &provider, city, day()).unwrap_err();
            assert!(matches!(err, TimingsError::InvalidInput(_)));
        }
        assert!(store.get_dates.borrow().is_empty());
        assert_eq!(provider.calls.get(), 0);
    }

    #[test]
    fn fetch_failure_persists_nothing() {
        let store = FakeStore::default();
        let provider = FakeProvider {
            fail: true,
            ..FakeProvider::default()
        };

        let err = retrieve(&store, &provider, "Nairobi", day()).unwrap_err();

        assert!(matches!(err, TimingsError::RemoteFetchFailed(_)));
        assert!(store.put_dates.borrow().is_empty());
        assert!(store.rows.borrow().is_empty());
    }

    #[test]
    fn store_read_failure_is_store_unavailable() {
        let store = FakeStore {
            fail_get: true,
            ..FakeStore::default()
        };
        let provider = FakeProvider::default();

        let err = retrieve(&store, &provider, "Nairobi", day()).unwrap_err();

        assert!(matches!(err, TimingsError::StoreUnavailable(_)));
        assert_eq!(provider.calls.get(), 0);
    }

    #[test]
    fn write_failure_reports_persist_failed_with_times() {
        let store = FakeStore {
            fail_put: true,
            ..FakeStore::default()
        };
        let provider = FakeProvider::default();

        let err = retrieve(&store, &provider, "Nairobi", day()).unwrap_err();

        match err {
            TimingsError::PersistFailed { record, .. } => {
                assert_eq!(*record, sample("Nairobi", "19-10-2026"));
            }
            other => panic!("expected PersistFailed, got {other:?}"),
        }
        assert_eq!(provider.calls.get(), 1);
    }

    #[test]
    fn city_key_is_case_sensitive() {
        let store = FakeStore::with(sample("Nairobi", "19-10-2026"));
        let provider = FakeProvider::default();

        let got = retrieve(&store, &provider, "nairobi", day()).unwrap();

        assert_eq!(got.source, Source::Network);
        assert_eq!(got.record.city, "nairobi");
        assert_eq!(provider.calls.get(), 1);
    }

    #[test]
    fn works_against_sqlite_store() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();
        let store = SqliteStore::new(conn).unwrap();
        let provider = FakeProvider::default();

        let first = retrieve(&store, &provider, "Cairo", day()).unwrap();
        let second = retrieve(&store, &provider, "Cairo", day()).unwrap();

        assert_eq!(first.source, Source::Network);
        assert_eq!(second.source, Source::Cache);
        assert_eq!(first.record, second.record);
        assert_eq!(provider.calls.get(), 1);
    }

    #[test]
    fn failed_fetch_leaves_sqlite_store_empty() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();
        let store = SqliteStore::new(conn).unwrap();
        let provider = FakeProvider {
            fail: true,
            ..FakeProvider::default()
        };

        assert!(retrieve(&store, &provider, "Cairo", day()).is_err());
        assert!(store.get("Cairo", "19-10-2026").unwrap().is_none());
    }

    /// Misses on the first lookup, then finds a row another writer stored
    /// before our `put` landed.
    struct RacedStore {
        winner: PrayerRecord,
        gets: Cell<usize>,
    }

    impl PrayerStore for RacedStore {
        fn get(&self, _city: &str, _date: &str) -> Result<Option<PrayerRecord>, StoreError> {
            self.gets.set(self.gets.get() + 1);
            if self.gets.get() == 1 {
                Ok(None)
            } else {
                Ok(Some(self.winner.clone()))
            }
        }

        fn put(&self, _record: &PrayerRecord) -> Result<PutOutcome, StoreError> {
            Ok(PutOutcome::AlreadyPresent)
        }
    }

    #[test]
    fn lost_write_race_returns_the_stored_row() {
        let mut winner = sample("Nairobi", "19-10-2026");
        winner.fajr = "04:58".to_string();
        let store = RacedStore {
            winner: winner.clone(),
            gets: Cell::new(0),
        };
        let provider = FakeProvider::default();

        let got = retrieve(&store, &provider, "Nairobi", day()).unwrap();

        assert_eq!(got.record, winner);
        assert_eq!(got.source, Source::Cache);
        assert_eq!(provider.calls.get(), 1);
        assert_eq!(store.gets.get(), 2);
    }
}

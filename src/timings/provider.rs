//! Remote prayer-time provider
//!
//! [`PrayerTimesProvider`] is the seam the retrieval engine talks to;
//! [`AladhanClient`] implements it against the Aladhan `timingsByAddress` API.

use log::debug;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::time::Duration;

use super::error::ProviderError;
use crate::config::settings::ProviderConfig;
use crate::models::{PrayerRecord, PrayerType};

/// Source of authoritative prayer times for a city on a day.
pub trait PrayerTimesProvider {
    /// One outbound request per call. `date` is a `DD-MM-YYYY` key.
    fn fetch(&self, city: &str, date: &str) -> Result<PrayerRecord, ProviderError>;
}

/// Response envelope from the Aladhan API (only the parts we read)
#[derive(Debug, Deserialize)]
struct AladhanResponse {
    data: Option<AladhanData>,
}

#[derive(Debug, Deserialize)]
struct AladhanData {
    timings: Option<AladhanTimings>,
}

#[derive(Debug, Deserialize)]
struct AladhanTimings {
    #[serde(rename = "Fajr")]
    fajr: Option<String>,
    #[serde(rename = "Dhuhr")]
    dhuhr: Option<String>,
    #[serde(rename = "Asr")]
    asr: Option<String>,
    #[serde(rename = "Maghrib")]
    maghrib: Option<String>,
    #[serde(rename = "Isha")]
    isha: Option<String>,
}

impl AladhanTimings {
    fn take(&self, prayer: PrayerType) -> Result<String, ProviderError> {
        let raw = match prayer {
            PrayerType::Fajr => &self.fajr,
            PrayerType::Dhuhr => &self.dhuhr,
            PrayerType::Asr => &self.asr,
            PrayerType::Maghrib => &self.maghrib,
            PrayerType::Isha => &self.isha,
        };
        // Some request options append a zone, e.g. "05:02 (EAT)".
        raw.as_deref()
            .and_then(|s| s.split_whitespace().next())
            .map(str::to_string)
            .ok_or_else(|| ProviderError::MissingField(format!("timings.{}", prayer.api_field())))
    }
}

/// Map a raw Aladhan response body onto a record for `(city, date)`.
///
/// Every one of the five timings must be present.
pub fn parse_timings(body: &str, city: &str, date: &str) -> Result<PrayerRecord, ProviderError> {
    let response: AladhanResponse = serde_json::from_str(body)?;
    let timings = response
        .data
        .ok_or_else(|| ProviderError::MissingField("data".to_string()))?
        .timings
        .ok_or_else(|| ProviderError::MissingField("data.timings".to_string()))?;

    Ok(PrayerRecord {
        city: city.to_string(),
        date: date.to_string(),
        fajr: timings.take(PrayerType::Fajr)?,
        dhuhr: timings.take(PrayerType::Dhuhr)?,
        asr: timings.take(PrayerType::Asr)?,
        maghrib: timings.take(PrayerType::Maghrib)?,
        isha: timings.take(PrayerType::Isha)?,
    })
}

/// Blocking client for the Aladhan prayer times API
#[derive(Debug, Clone)]
pub struct AladhanClient {
    client: Client,
    config: ProviderConfig,
}

impl AladhanClient {
    /// Build a client whose requests give up after `config.timeout_secs`.
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create a new AladhanClient with a custom HTTP client
    pub fn with_client(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            config: config.clone(),
        }
    }

    fn endpoint(&self, date: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), date)
    }
}

impl PrayerTimesProvider for AladhanClient {
    fn fetch(&self, city: &str, date: &str) -> Result<PrayerRecord, ProviderError> {
        if city.trim().is_empty() {
            return Err(ProviderError::EmptyCity);
        }

        let url = self.endpoint(date);
        debug!("Fetching prayer times for {} from {}", city, url);

        let method = self.config.method.to_string();
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .query(&[
                ("address", city),
                ("method", method.as_str()),
                ("shafaq", self.config.shafaq.as_str()),
                ("tune", self.config.tune.as_str()),
                ("calendarMethod", self.config.calendar_method.as_str()),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status));
        }

        let text = response.text()?;
        parse_timings(&text, city, date)
    }
}

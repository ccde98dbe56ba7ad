use anyhow::{anyhow, Context, Result};
use chrono::Local;

use crate::config::AppConfig;
use crate::db::PrayerStore;
use crate::timings::presenter::render_report;
use crate::timings::{get_prayer_times, PrayerTimesProvider};

// ─── Times ───────────────────────────────────────────────────────────────────

/// Pick the city from `--city`, falling back to the config file.
pub fn resolve_city(flag: Option<&str>, config: &AppConfig) -> Result<String> {
    match flag {
        Some(city) => Ok(city.to_string()),
        None if !config.location.city.trim().is_empty() => Ok(config.location.city.clone()),
        None => Err(anyhow!(
            "No city configured. Pass --city <CITY> or run `prayer-times set-city <CITY>`"
        )),
    }
}

pub fn handle_times(
    store: &dyn PrayerStore,
    provider: &dyn PrayerTimesProvider,
    city: &str,
    color: bool,
) -> Result<()> {
    let retrieval = get_prayer_times(store, provider, city)
        .with_context(|| format!("Getting prayer times for {:?}", city))?;

    println!();
    println!("{}", render_report(&retrieval.record, Local::now().time(), color));
    println!();
    Ok(())
}

// ─── Config ──────────────────────────────────────────────────────────────────

pub fn handle_set_city(config: &mut AppConfig, city: &str) -> Result<()> {
    let city = city.trim();
    if city.is_empty() {
        return Err(anyhow!("City must not be empty"));
    }
    config.location.city = city.to_string();
    config.save().context("Saving config")?;
    println!("  City set to {}", city);
    Ok(())
}

pub fn handle_paths() -> Result<()> {
    println!("config:   {}", AppConfig::config_path()?.display());
    println!("database: {}", AppConfig::db_path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins_over_config() {
        let mut config = AppConfig::default();
        config.location.city = "Kano".to_string();
        assert_eq!(resolve_city(Some("Lagos"), &config).unwrap(), "Lagos");
        assert_eq!(resolve_city(None, &config).unwrap(), "Kano");
    }

    #[test]
    fn missing_city_is_an_error() {
        let config = AppConfig::default();
        let err = resolve_city(None, &config).unwrap_err();
        assert!(err.to_string().contains("set-city"));
    }

    #[test]
    fn explicit_empty_flag_is_passed_through() {
        // The retrieval engine is the one that rejects it.
        let config = AppConfig::default();
        assert_eq!(resolve_city(Some(""), &config).unwrap(), "");
    }
}

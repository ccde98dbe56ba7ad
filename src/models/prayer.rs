#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrayerType {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerType {
    /// All five daily prayers in the order they fall during the day.
    pub fn all() -> [PrayerType; 5] {
        [
            PrayerType::Fajr,
            PrayerType::Dhuhr,
            PrayerType::Asr,
            PrayerType::Maghrib,
            PrayerType::Isha,
        ]
    }

    /// Table header used by the presenter.
    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerType::Fajr => "Fajr",
            PrayerType::Dhuhr => "Dhuhr",
            PrayerType::Asr => "'Asr",
            PrayerType::Maghrib => "Maghrib",
            PrayerType::Isha => "'Ishaa",
        }
    }

    /// Key of this prayer inside the provider's `timings` object.
    pub fn api_field(&self) -> &'static str {
        match self {
            PrayerType::Fajr => "Fajr",
            PrayerType::Dhuhr => "Dhuhr",
            PrayerType::Asr => "Asr",
            PrayerType::Maghrib => "Maghrib",
            PrayerType::Isha => "Isha",
        }
    }
}

impl std::fmt::Display for PrayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One city's five prayer times for one calendar day.
///
/// `(city, date)` is the natural key. `date` is always produced by
/// [`crate::utils::format::date_key`] so lookups and writes agree byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrayerRecord {
    pub city: String,
    pub date: String,
    pub fajr: String,
    pub dhuhr: String,
    pub asr: String,
    pub maghrib: String,
    pub isha: String,
}

impl PrayerRecord {
    pub fn time_of(&self, prayer: PrayerType) -> &str {
        match prayer {
            PrayerType::Fajr => &self.fajr,
            PrayerType::Dhuhr => &self.dhuhr,
            PrayerType::Asr => &self.asr,
            PrayerType::Maghrib => &self.maghrib,
            PrayerType::Isha => &self.isha,
        }
    }

    /// `(prayer, "HH:MM")` pairs in chronological order.
    pub fn times(&self) -> [(PrayerType, &str); 5] {
        PrayerType::all().map(|p| (p, self.time_of(p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PrayerRecord {
        PrayerRecord {
            city: "Nairobi".to_string(),
            date: "19-10-2026".to_string(),
            fajr: "05:00".to_string(),
            dhuhr: "12:30".to_string(),
            asr: "15:45".to_string(),
            maghrib: "18:20".to_string(),
            isha: "19:50".to_string(),
        }
    }

    #[test]
    fn times_are_in_chronological_order() {
        let r = record();
        let names: Vec<_> = r.times().iter().map(|(p, _)| *p).collect();
        assert_eq!(names, PrayerType::all().to_vec());
        assert_eq!(r.times()[3], (PrayerType::Maghrib, "18:20"));
    }
}

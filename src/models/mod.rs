pub mod prayer;

pub use prayer::{PrayerRecord, PrayerType};

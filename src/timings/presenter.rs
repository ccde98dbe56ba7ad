use chrono::NaiveTime;
use log::warn;

use crate::models::{PrayerRecord, PrayerType};
use crate::utils::format::{format_duration_secs, format_time, parse_time};

// ─── ANSI styles ─────────────────────────────────────────────────────────────

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";
const GRAY: &str = "\x1b[38;5;245m";
const RED: &str = "\x1b[38;5;160m";

const CELL_WIDTH: usize = 14;

// ─── Classification ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrayerState {
    Elapsed,
    Pending,
    /// One of the two times was not `HH:MM`. Displayed as pending.
    Unparseable,
}

impl PrayerState {
    pub fn is_elapsed(self) -> bool {
        self == PrayerState::Elapsed
    }
}

/// Compare two same-day `HH:MM` strings. Elapsed only when `current_time` is
/// strictly after `prayer_time`.
pub fn prayer_state(prayer_time: &str, current_time: &str) -> PrayerState {
    match (parse_time(prayer_time), parse_time(current_time)) {
        (Ok(prayer), Ok(now)) if now > prayer => PrayerState::Elapsed,
        (Ok(_), Ok(_)) => PrayerState::Pending,
        _ => PrayerState::Unparseable,
    }
}

/// State of each of the record's five prayers at `now`.
///
/// Unparseable entries are reported through the log.
pub fn classify(record: &PrayerRecord, now: NaiveTime) -> [(PrayerType, PrayerState); 5] {
    let current = format_time(now);
    record.times().map(|(prayer, time)| {
        let state = prayer_state(time, &current);
        if state == PrayerState::Unparseable {
            warn!(
                "Could not compare {} time {:?} for {} on {} with current time {}; showing it as pending",
                prayer, time, record.city, record.date, current
            );
        }
        (prayer, state)
    })
}

// ─── Rendering ───────────────────────────────────────────────────────────────

fn paint(text: &str, style: &str, color: bool) -> String {
    if color {
        format!("{}{}{}", style, text, RESET)
    } else {
        text.to_string()
    }
}

fn border(left: char, joint: char, right: char) -> String {
    let segment = "─".repeat(CELL_WIDTH);
    let inner = vec![segment; PrayerType::all().len()].join(joint.to_string().as_str());
    format!("{}{}{}", left, inner, right)
}

fn row(cells: impl IntoIterator<Item = String>, color: bool) -> String {
    let bar = paint("│", GOLD, color);
    let mut line = bar.clone();
    for cell in cells {
        line.push_str(&cell);
        line.push_str(&bar);
    }
    line
}

/// Render the five times as a bordered table. Elapsed prayers are red
/// (or carry a `✓` without color), pending ones gray.
pub fn render(record: &PrayerRecord, now: NaiveTime, color: bool) -> String {
    let states = classify(record, now);

    let header = row(
        PrayerType::all().iter().map(|p| {
            let text = format!("{:^width$}", p.display_name(), width = CELL_WIDTH);
            paint(&text, &format!("{}{}", BOLD, GOLD), color)
        }),
        color,
    );

    let body = row(
        states.iter().map(|(prayer, state)| {
            let time = record.time_of(*prayer);
            let text = if state.is_elapsed() && !color {
                format!(" {:<width$}", format!("{} ✓", time), width = CELL_WIDTH - 1)
            } else {
                format!(" {:<width$}", time, width = CELL_WIDTH - 1)
            };
            let style = if state.is_elapsed() { RED } else { GRAY };
            paint(&text, style, color)
        }),
        color,
    );

    [
        paint(&border('┌', '┬', '┐'), GOLD, color),
        header,
        paint(&border('├', '┼', '┤'), GOLD, color),
        body,
        paint(&border('└', '┴', '┘'), GOLD, color),
    ]
    .join("\n")
}

/// First prayer still ahead of `now`, with the seconds until it.
pub fn next_prayer(record: &PrayerRecord, now: NaiveTime) -> Option<(PrayerType, i64)> {
    let current = parse_time(&format_time(now)).ok()?;
    record.times().into_iter().find_map(|(prayer, time)| {
        let at = parse_time(time).ok()?;
        (at > current).then(|| (prayer, (at - current).num_seconds()))
    })
}

/// Title, table and a countdown line, ready for the terminal.
pub fn render_report(record: &PrayerRecord, now: NaiveTime, color: bool) -> String {
    let title = paint(
        &format!("Prayer times for {} ({})", record.city, record.date),
        GOLD,
        color,
    );
    let footer = match next_prayer(record, now) {
        Some((prayer, secs)) => format!(
            "Next: {} in {}",
            prayer.display_name(),
            format_duration_secs(secs)
        ),
        None => "All prayers for today have passed".to_string(),
    };
    format!("{}\n{}\n{}", title, render(record, now, color), footer)
}

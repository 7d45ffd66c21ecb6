// File: ./src/render/dictionary.rs
//! Builds the placeholder dictionary for one render.
use crate::error::Result;
use crate::model::parser::parse_payload;
use crate::model::{DailySchedule, ScheduleEntry};
use crate::render::RenderSettings;
use crate::render::token::token;
use chrono::{Duration, NaiveDate, NaiveTime};
use indexmap::IndexMap;

pub const CITY: &str = "%city%";
pub const DATE: &str = "%date%";
pub const READABLE_DATE: &str = "%readable_date%";
pub const UTC_HEADER: &str = "%utc_header%";
pub const UTC_DIVIDER: &str = "%utc_divider%";

// Entry-scoped tokens, only meaningful inside the entry template.
pub const ENTRY_LABEL: &str = "%prayer%";
pub const ENTRY_TIME: &str = "%time%";
pub const ENTRY_TIME_24H: &str = "%24h_time%";
pub const ENTRY_UTC: &str = "%utc_time%";
pub const ENTRY_UTC_24H: &str = "%24h_utc_time%";

const UTC_HEADER_CELL: &str = " Time (UTC) |";
const UTC_DIVIDER_CELL: &str = "------------|";

/// Date placeholders, keyed by token. Shared with the output path resolver.
///
/// Case matters: `%MM%` is the month, `%mm%` is not a date token at all.
pub fn date_tokens(date: NaiveDate) -> [(&'static str, String); 10] {
    [
        ("%YYYY%", date.format("%Y").to_string()),
        ("%YY%", date.format("%y").to_string()),
        ("%MMMM%", date.format("%B").to_string()),
        ("%MMM%", date.format("%b").to_string()),
        ("%MM%", date.format("%m").to_string()),
        ("%M%", date.format("%-m").to_string()),
        ("%DD%", date.format("%d").to_string()),
        ("%D%", date.format("%-d").to_string()),
        ("%dddd%", date.format("%A").to_string()),
        ("%ddd%", date.format("%a").to_string()),
    ]
}

pub fn format_12h(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

pub fn format_24h(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Wall-clock shift from local time to UTC. Wraps across midnight, no DST.
pub fn local_to_utc(local: NaiveTime, utc_offset_hours: i8) -> NaiveTime {
    local
        .overflowing_sub_signed(Duration::hours(i64::from(utc_offset_hours)))
        .0
}

/// Rendered times of a single entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryTimes {
    pub label: String,
    pub time_12h: String,
    pub time_24h: String,
    /// Empty when UTC output is disabled.
    pub utc_12h: String,
    pub utc_24h: String,
}

impl EntryTimes {
    fn new(entry: &ScheduleEntry, settings: &RenderSettings) -> Self {
        let local = match settings.minute_adjustment(&entry.label) {
            0 => entry.local_time,
            minutes => {
                entry
                    .local_time
                    .overflowing_add_signed(Duration::minutes(i64::from(minutes)))
                    .0
            }
        };

        let (utc_12h, utc_24h) = if settings.include_utc {
            let utc = local_to_utc(local, settings.utc_offset_hours);
            (format_12h(utc), format_24h(utc))
        } else {
            (String::new(), String::new())
        };

        Self {
            label: entry.label.clone(),
            time_12h: format_12h(local),
            time_24h: format_24h(local),
            utc_12h,
            utc_24h,
        }
    }

    /// `%prayer%`, `%time%` and friends for this entry.
    pub fn tokens(&self) -> [(&'static str, &str); 5] {
        [
            (ENTRY_LABEL, self.label.as_str()),
            (ENTRY_TIME, self.time_12h.as_str()),
            (ENTRY_TIME_24H, self.time_24h.as_str()),
            (ENTRY_UTC, self.utc_12h.as_str()),
            (ENTRY_UTC_24H, self.utc_24h.as_str()),
        ]
    }
}

/// Token to text mapping for one render. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderDictionary {
    globals: IndexMap<String, String>,
    entries: Vec<EntryTimes>,
}

impl PlaceholderDictionary {
    pub fn build(schedule: &DailySchedule, settings: &RenderSettings) -> Self {
        let mut globals = IndexMap::new();
        let mut entries = Vec::with_capacity(schedule.entries.len());

        for entry in &schedule.entries {
            let times = EntryTimes::new(entry, settings);
            let name = entry.label.to_lowercase();
            globals.insert(token(&name), times.time_12h.clone());
            globals.insert(token(&format!("{name}_24h")), times.time_24h.clone());
            globals.insert(token(&format!("{name}_utc")), times.utc_12h.clone());
            globals.insert(token(&format!("{name}_24h_utc")), times.utc_24h.clone());
            entries.push(times);
        }

        for (key, value) in date_tokens(schedule.date) {
            globals.insert(key.to_string(), value);
        }
        globals.insert(
            DATE.to_string(),
            schedule.date.format("%B %-d, %Y").to_string(),
        );
        globals.insert(READABLE_DATE.to_string(), schedule.readable_date.clone());
        globals.insert(CITY.to_string(), settings.city.clone());

        let (header, divider) = if settings.include_utc {
            (UTC_HEADER_CELL, UTC_DIVIDER_CELL)
        } else {
            ("", "")
        };
        globals.insert(UTC_HEADER.to_string(), header.to_string());
        globals.insert(UTC_DIVIDER.to_string(), divider.to_string());

        log::debug!(
            "Built placeholder dictionary: {} tokens, {} entries",
            globals.len(),
            entries.len()
        );

        Self { globals, entries }
    }

    /// Parses a raw feed body and builds the dictionary in one go.
    /// Fails with `Error::DataShape` if the body lacks a date or timings.
    pub fn from_payload(body: &str, settings: &RenderSettings) -> Result<Self> {
        let schedule = parse_payload(body)?;
        Ok(Self::build(&schedule, settings))
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.globals.get(token).map(String::as_str)
    }

    /// Entries in feed order.
    pub fn entries(&self) -> &[EntryTimes] {
        &self.entries
    }
}

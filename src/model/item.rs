// File: ./src/model/item.rs
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{AsRefStr, EnumIter, EnumString};

/// One named time-of-day item (e.g. "Fajr") for a single date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub label: String,
    /// Wall-clock time in the feed's local time for the configured city.
    pub local_time: NaiveTime,
}

impl ScheduleEntry {
    pub fn new(label: impl Into<String>, local_time: NaiveTime) -> Self {
        Self {
            label: label.into(),
            local_time,
        }
    }
}

/// Result of one fetch: the feed's calendar date plus its entries in feed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySchedule {
    pub date: NaiveDate,
    /// Date exactly as the feed printed it ("15 Oct 2026").
    pub readable_date: String,
    pub entries: Vec<ScheduleEntry>,
}

impl DailySchedule {
    pub fn entry(&self, label: &str) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|e| e.label == label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum HourFormat {
    #[default]
    H12,
    H24,
}

impl HourFormat {
    /// Maps a settings key (12 or 24) to a format. Anything else is 12-hour.
    pub fn from_key(key: u8) -> Self {
        match key {
            24 => HourFormat::H24,
            _ => HourFormat::H12,
        }
    }
}

/// Built-in template families. `Custom` is represented by [`Preset`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Hash, EnumString, EnumIter, AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TemplateFamily {
    #[default]
    Table,
    Checklist,
    Simple,
}

impl TemplateFamily {
    /// Parses a family name, falling back to `Table` for anything unknown.
    pub fn from_name(name: &str) -> Self {
        TemplateFamily::from_str(name.trim()).unwrap_or_default()
    }
}

/// What the user selected in settings: a built-in family or their own templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    Builtin(TemplateFamily),
    Custom,
}

impl Default for Preset {
    fn default() -> Self {
        Preset::Builtin(TemplateFamily::Table)
    }
}

impl Preset {
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("custom") {
            Preset::Custom
        } else {
            Preset::Builtin(TemplateFamily::from_name(name))
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Preset::Builtin(family) => family.as_ref(),
            Preset::Custom => "custom",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Stored as a plain string so hand-edited configs with unknown names still load.
impl Serialize for Preset {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Preset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Preset::from_name(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_preset_falls_back_to_table() {
        assert_eq!(
            Preset::from_name("fancy"),
            Preset::Builtin(TemplateFamily::Table)
        );
        assert_eq!(
            Preset::from_name("Checklist"),
            Preset::Builtin(TemplateFamily::Checklist)
        );
        assert_eq!(Preset::from_name(" custom "), Preset::Custom);
    }

    #[test]
    fn test_hour_format_keys() {
        assert_eq!(HourFormat::from_key(24), HourFormat::H24);
        assert_eq!(HourFormat::from_key(12), HourFormat::H12);
        assert_eq!(HourFormat::from_key(13), HourFormat::H12);
    }
}

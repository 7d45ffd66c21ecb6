// File: ./src/render/mod.rs
//! Rendering engine: placeholder dictionary, presets, and template substitution.
//!
//! Everything in here is a pure function of its inputs. The `SyncController`
//! builds a [`RenderSettings`] snapshot from the config at the start of each
//! cycle and passes it down explicitly.
pub mod dictionary;
pub mod preset;
pub mod template;
pub mod token;

pub use dictionary::PlaceholderDictionary;
pub use preset::{PresetOptions, TemplatePair, resolve_preset};
pub use template::{render_document, render_entries};

use crate::model::{DailySchedule, HourFormat, Preset};
use std::collections::BTreeMap;

/// The subset of the configuration that influences rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    pub city: String,
    pub hour_format: HourFormat,
    pub include_utc: bool,
    /// Hours to subtract from local time to get UTC, within [-12, 14].
    pub utc_offset_hours: i8,
    pub show_date: bool,
    pub show_location: bool,
    pub preset: Preset,
    /// Only used when `preset` is `Custom`.
    pub document_template: String,
    /// Only used when `preset` is `Custom`.
    pub entry_template: String,
    pub included_labels: Vec<String>,
    /// Minutes added to a label's local time, keyed case-insensitively.
    pub minute_adjustments: BTreeMap<String, i32>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            city: "London".to_string(),
            hour_format: HourFormat::H12,
            include_utc: false,
            utc_offset_hours: 0,
            show_date: true,
            show_location: true,
            preset: Preset::default(),
            document_template: String::new(),
            entry_template: String::new(),
            included_labels: Vec::new(),
            minute_adjustments: BTreeMap::new(),
        }
    }
}

impl RenderSettings {
    /// Template pair for this render. Built-in presets are re-derived on every
    /// call; custom templates are returned as authored.
    pub fn templates(&self) -> TemplatePair {
        match self.preset {
            Preset::Builtin(family) => resolve_preset(family, PresetOptions::from(self)),
            Preset::Custom => TemplatePair {
                document: self.document_template.clone(),
                entry: self.entry_template.clone(),
            },
        }
    }

    pub fn minute_adjustment(&self, label: &str) -> i32 {
        self.minute_adjustments
            .iter()
            .find(|(key, _)| key.trim().eq_ignore_ascii_case(label))
            .map(|(_, minutes)| *minutes)
            .unwrap_or(0)
    }
}

/// Builds the dictionary and renders the document for one schedule.
pub fn render(schedule: &DailySchedule, settings: &RenderSettings) -> String {
    let dict = PlaceholderDictionary::build(schedule, settings);
    render_document(&settings.templates(), &dict, &settings.included_labels)
}

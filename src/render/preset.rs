// File: ./src/render/preset.rs
//! Built-in template families.
//!
//! Each family has one canonical document template and a 12/24-hour pair of
//! entry templates. Optional parts (UTC column, date and location lines) are
//! cut out of the canonical text rather than left to render as blanks, so a
//! table without UTC has no empty column and a note without a date has no
//! stray `**Date:**` line.
use crate::model::{HourFormat, TemplateFamily};
use crate::render::RenderSettings;

pub const LOCATION_LINE: &str = "**Location:** %city%\n";
pub const DATE_LINE: &str = "**Date:** %date%\n";

struct Canonical {
    document: &'static str,
    entry_12h: &'static str,
    entry_24h: &'static str,
    /// Segments removed from the document when UTC output is off.
    utc_document_segments: &'static [&'static str],
    utc_entry_12h: &'static str,
    utc_entry_24h: &'static str,
}

const TABLE: Canonical = Canonical {
    document: "**Location:** %city%\n**Date:** %date%\n\n| Prayer | Time | Time (UTC) |\n|--------|------|------------|\n%prayers%\n",
    entry_12h: "| %prayer% | %time% | %utc_time% |",
    entry_24h: "| %prayer% | %24h_time% | %24h_utc_time% |",
    utc_document_segments: &[" Time (UTC) |", "------------|"],
    utc_entry_12h: " %utc_time% |",
    utc_entry_24h: " %24h_utc_time% |",
};

const CHECKLIST: Canonical = Canonical {
    document: "**Location:** %city%\n**Date:** %date%\n\n%prayers%\n",
    entry_12h: "- [ ] %prayer%: %time% (%utc_time% UTC)",
    entry_24h: "- [ ] %prayer%: %24h_time% (%24h_utc_time% UTC)",
    utc_document_segments: &[],
    utc_entry_12h: " (%utc_time% UTC)",
    utc_entry_24h: " (%24h_utc_time% UTC)",
};

const SIMPLE: Canonical = Canonical {
    document: "**Location:** %city%\n**Date:** %date%\n\n%prayers%\n",
    entry_12h: "%prayer%: %time% (%utc_time% UTC)",
    entry_24h: "%prayer%: %24h_time% (%24h_utc_time% UTC)",
    utc_document_segments: &[],
    utc_entry_12h: " (%utc_time% UTC)",
    utc_entry_24h: " (%24h_utc_time% UTC)",
};

fn canonical(family: TemplateFamily) -> &'static Canonical {
    match family {
        TemplateFamily::Table => &TABLE,
        TemplateFamily::Checklist => &CHECKLIST,
        TemplateFamily::Simple => &SIMPLE,
    }
}

/// Document template plus the per-entry template it embeds via `%prayers%`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePair {
    pub document: String,
    pub entry: String,
}

/// Settings that shape a built-in template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PresetOptions {
    pub hour_format: HourFormat,
    pub include_utc: bool,
    pub show_date: bool,
    pub show_location: bool,
}

impl From<&RenderSettings> for PresetOptions {
    fn from(settings: &RenderSettings) -> Self {
        Self {
            hour_format: settings.hour_format,
            include_utc: settings.include_utc,
            show_date: settings.show_date,
            show_location: settings.show_location,
        }
    }
}

/// Derives the template pair for a built-in family. Never persisted.
pub fn resolve_preset(family: TemplateFamily, options: PresetOptions) -> TemplatePair {
    let canon = canonical(family);
    let (entry, utc_entry) = match options.hour_format {
        HourFormat::H12 => (canon.entry_12h, canon.utc_entry_12h),
        HourFormat::H24 => (canon.entry_24h, canon.utc_entry_24h),
    };

    let mut document = canon.document.to_string();
    let mut entry = entry.to_string();

    if !options.include_utc {
        for segment in canon.utc_document_segments {
            document = document.replacen(segment, "", 1);
        }
        entry = entry.replacen(utc_entry, "", 1);
    }

    if !options.show_location {
        document = document.replacen(LOCATION_LINE, "", 1);
    }
    if !options.show_date {
        document = document.replacen(DATE_LINE, "", 1);
    }
    if !options.show_location && !options.show_date {
        // The blank separator after the header lines has nothing left to separate.
        document = document.trim_start_matches('\n').to_string();
    }

    TemplatePair { document, entry }
}

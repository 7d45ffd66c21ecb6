// File: ./src/config.rs
// User settings, persisted as TOML in the config directory.
use crate::context::AppContext;
use crate::model::{HourFormat, Preset};
use crate::render::RenderSettings;
use crate::storage::LocalStorage;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

pub const MIN_UTC_OFFSET: i8 = -12;
pub const MAX_UTC_OFFSET: i8 = 14;

fn default_true() -> bool {
    true
}
fn default_city() -> String {
    "London".to_string()
}
fn default_method() -> u8 {
    2
}
fn default_api_url() -> String {
    "https://api.aladhan.com/v1".to_string()
}
fn default_refresh_interval() -> u32 {
    60
}
fn default_output_location() -> String {
    "Prayer Times.md".to_string()
}
fn default_prayer_names() -> Vec<String> {
    ["Fajr", "Sunrise", "Dhuhr", "Asr", "Maghrib", "Isha", "Midnight"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_hour_format() -> u8 {
    12
}
fn default_template() -> String {
    "**Location:** %city%\n**Date:** %MMMM% %DD%, %YYYY%\n\n| Prayer | Time |\n|--------|------|\n%prayers%\n"
        .to_string()
}
fn default_entry_template() -> String {
    "| %prayer% | %time% |".to_string()
}

/// There is no config file yet.
#[derive(Debug, thiserror::Error)]
#[error("no config file at {}", .0.display())]
pub struct MissingConfig(pub PathBuf);

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    #[serde(default = "default_city")]
    pub city: String,
    #[serde(default)]
    pub country: String,
    /// Calculation method id understood by the feed.
    #[serde(default = "default_method")]
    pub method: u8,
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_true")]
    pub fetch_on_launch: bool,
    /// Minutes between timer-triggered syncs in watch mode. 0 disables the timer.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_mins: u32,

    /// Vault root. Defaults to the current directory.
    #[serde(default)]
    pub vault_dir: Option<PathBuf>,
    #[serde(default = "default_output_location")]
    pub output_location: String,
    #[serde(default = "default_prayer_names")]
    pub include_prayer_names: Vec<String>,

    #[serde(default)]
    pub selected_preset: Preset,
    /// Document template, used when `selected_preset` is "custom".
    #[serde(default = "default_template")]
    pub template: String,
    /// Per-entry template, used when `selected_preset` is "custom".
    #[serde(default = "default_entry_template")]
    pub entry_template: String,
    /// 12 or 24. Anything else is treated as 12.
    #[serde(default = "default_hour_format")]
    pub hour_format: u8,
    #[serde(default = "default_true")]
    pub show_date: bool,
    #[serde(default = "default_true")]
    pub show_location: bool,
    #[serde(default)]
    pub include_utc_time: bool,
    /// Local time minus this many hours is UTC.
    #[serde(default)]
    pub utc_offset: i8,

    /// Minute adjustments per prayer, e.g. `Fajr = -2`.
    #[serde(default)]
    pub prayer_offsets: BTreeMap<String, i32>,

    #[serde(default = "default_true")]
    pub notifications: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            city: default_city(),
            country: String::new(),
            method: default_method(),
            api_url: default_api_url(),
            fetch_on_launch: true,
            refresh_interval_mins: default_refresh_interval(),
            vault_dir: None,
            output_location: default_output_location(),
            include_prayer_names: default_prayer_names(),
            selected_preset: Preset::default(),
            template: default_template(),
            entry_template: default_entry_template(),
            hour_format: default_hour_format(),
            show_date: true,
            show_location: true,
            include_utc_time: false,
            utc_offset: 0,
            prayer_offsets: BTreeMap::new(),
            notifications: true,
        }
    }
}

impl Config {
    /// Reads and parses the config file. A missing file is a [`MissingConfig`] error.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(MissingConfig(path).into()),
            Err(e) => {
                return Err(e).with_context(|| format!("Cannot read config file {}", path.display()));
            }
        };
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config.sanitized())
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Err(e) if Self::is_missing_config_error(&e) => {
                log::info!("{}, using defaults", e);
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn is_missing_config_error(err: &anyhow::Error) -> bool {
        err.downcast_ref::<MissingConfig>().is_some()
    }

    /// Writes the config as TOML, holding the config file lock.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        let text = toml::to_string_pretty(self).context("Failed to serialize config")?;
        LocalStorage::with_lock(&path, || {
            LocalStorage::atomic_write(&path, &text)
                .with_context(|| format!("Failed to write config file {}", path.display()))
        })
    }

    /// Clamps values that have a fixed valid range.
    pub fn sanitized(mut self) -> Self {
        let clamped = self.utc_offset.clamp(MIN_UTC_OFFSET, MAX_UTC_OFFSET);
        if clamped != self.utc_offset {
            log::warn!(
                "utc_offset {} is outside [{}, {}], using {}",
                self.utc_offset,
                MIN_UTC_OFFSET,
                MAX_UTC_OFFSET,
                clamped
            );
            self.utc_offset = clamped;
        }
        self
    }

    /// Whether going from `previous` to `self` changes a setting that is baked
    /// into the controller's collaborators (feed client, vault store, notifier)
    /// rather than read on each cycle.
    pub fn requires_rebuild(&self, previous: &Config) -> bool {
        self.api_url != previous.api_url
            || self.vault_dir != previous.vault_dir
            || self.notifications != previous.notifications
    }

    /// Vault root, falling back to the context default.
    pub fn vault_root(&self, ctx: &dyn AppContext) -> Result<PathBuf> {
        match &self.vault_dir {
            Some(dir) => Ok(dir.clone()),
            None => ctx.get_vault_dir(),
        }
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            city: self.city.clone(),
            hour_format: HourFormat::from_key(self.hour_format),
            include_utc: self.include_utc_time,
            utc_offset_hours: self.utc_offset.clamp(MIN_UTC_OFFSET, MAX_UTC_OFFSET),
            show_date: self.show_date,
            show_location: self.show_location,
            preset: self.selected_preset,
            document_template: self.template.clone(),
            entry_template: self.entry_template.clone(),
            included_labels: self.include_prayer_names.clone(),
            minute_adjustments: self.prayer_offsets.clone(),
        }
    }
}

// File: ./src/model/mod.rs
pub mod item;
pub mod merge;
pub mod parser;

pub use item::{DailySchedule, HourFormat, Preset, ScheduleEntry, TemplateFamily};

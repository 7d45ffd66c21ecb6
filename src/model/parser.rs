// File: src/model/parser.rs
//! Turns a timings feed payload into a [`DailySchedule`].
use crate::error::{Error, Result};
use crate::model::{DailySchedule, ScheduleEntry};
use chrono::{NaiveDate, NaiveTime};
use serde_json::Value;

/// Parses the JSON body of a `timingsByCity` answer.
///
/// Expected shape:
/// `{"data": {"date": {"readable": "15 Oct 2026", ...}, "timings": {"Fajr": "05:12", ...}}}`
///
/// Timings keep the order in which the feed lists them.
pub fn parse_payload(body: &str) -> Result<DailySchedule> {
    let root: Value =
        serde_json::from_str(body).map_err(|e| Error::DataShape(format!("invalid JSON: {}", e)))?;
    let data = root
        .get("data")
        .filter(|d| d.is_object())
        .ok_or_else(|| Error::DataShape("missing 'data' object".to_string()))?;

    let (date, readable_date) = parse_date(data.get("date"))?;

    let timings = data
        .get("timings")
        .and_then(Value::as_object)
        .ok_or_else(|| Error::DataShape("missing 'timings' object".to_string()))?;

    let mut entries = Vec::with_capacity(timings.len());
    for (label, raw) in timings {
        let raw = raw
            .as_str()
            .ok_or_else(|| Error::DataShape(format!("timing for '{}' is not a string", label)))?;
        let local_time = parse_clock(raw)
            .ok_or_else(|| Error::DataShape(format!("bad time '{}' for '{}'", raw, label)))?;
        entries.push(ScheduleEntry::new(label.clone(), local_time));
    }

    if entries.is_empty() {
        return Err(Error::DataShape("'timings' object is empty".to_string()));
    }

    Ok(DailySchedule {
        date,
        readable_date,
        entries,
    })
}

fn parse_date(date: Option<&Value>) -> Result<(NaiveDate, String)> {
    let date = date.ok_or_else(|| Error::DataShape("missing 'date' object".to_string()))?;

    // Some answers carry only the readable form, some only the gregorian block.
    if let Some(readable) = date.get("readable").and_then(Value::as_str)
        && let Ok(parsed) = NaiveDate::parse_from_str(readable.trim(), "%d %b %Y")
    {
        return Ok((parsed, readable.trim().to_string()));
    }

    if let Some(gregorian) = date
        .get("gregorian")
        .and_then(|g| g.get("date"))
        .and_then(Value::as_str)
        && let Ok(parsed) = NaiveDate::parse_from_str(gregorian.trim(), "%d-%m-%Y")
    {
        return Ok((parsed, parsed.format("%d %b %Y").to_string()));
    }

    Err(Error::DataShape(
        "no recognizable date in 'date' object".to_string(),
    ))
}

/// Reads "HH:MM", ignoring any trailing zone marker such as "05:12 (BST)".
pub fn parse_clock(raw: &str) -> Option<NaiveTime> {
    let clock = raw.split_whitespace().next()?;
    NaiveTime::parse_from_str(clock, "%H:%M").ok()
}

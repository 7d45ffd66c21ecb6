// File: ./src/model/merge.rs
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// A render without this marker has no checklist and is never merged.
pub const UNCHECKED_MARKER: &str = "- [ ]";

// Captures: 1 = bullet prefix, 2 = state char, 3 = rest of the line.
static CHECKBOX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*[-*]\s+)\[([ xX])\](.*)$").expect("checkbox regex"));

/// A checklist line split into its parts.
struct CheckboxLine<'a> {
    prefix: &'a str,
    checked: bool,
    rest: &'a str,
}

impl<'a> CheckboxLine<'a> {
    fn parse(line: &'a str) -> Option<Self> {
        let caps = CHECKBOX_RE.captures(line)?;
        Some(Self {
            prefix: caps.get(1)?.as_str(),
            checked: !caps.get(2)?.as_str().trim().is_empty(),
            rest: caps.get(3)?.as_str(),
        })
    }

    /// Text after the marker up to the first colon or whitespace.
    fn label(&self) -> Option<&'a str> {
        let trimmed = self.rest.trim_start();
        let end = trimmed
            .find(|c: char| c == ':' || c.is_whitespace())
            .unwrap_or(trimmed.len());
        let label = trimmed[..end].trim();
        (!label.is_empty()).then_some(label)
    }
}

/// Collects checked state per label from a document. First occurrence wins.
pub fn checkbox_states(document: &str) -> HashMap<String, bool> {
    let mut states = HashMap::new();
    for line in document.lines() {
        if let Some(parsed) = CheckboxLine::parse(line)
            && let Some(label) = parsed.label()
        {
            states.entry(label.to_string()).or_insert(parsed.checked);
        }
    }
    states
}

/// Carries checked items from `previous` over to `rendered`.
///
/// Unchecked lines in `rendered` whose label was checked in `previous` get
/// their marker flipped to `[x]`. Everything else, including the text after
/// the marker, comes from `rendered` unchanged.
pub fn merge_checkbox_state(previous: &str, rendered: &str) -> String {
    if !rendered.contains(UNCHECKED_MARKER) {
        return rendered.to_string();
    }

    let states = checkbox_states(previous);
    if !states.values().any(|checked| *checked) {
        return rendered.to_string();
    }

    rendered
        .split('\n')
        .map(|line| {
            // Keep a trailing '\r' out of the match so CRLF documents survive.
            let (body, cr) = match line.strip_suffix('\r') {
                Some(body) => (body, "\r"),
                None => (line, ""),
            };
            match CheckboxLine::parse(body) {
                Some(parsed)
                    if !parsed.checked
                        && parsed
                            .label()
                            .is_some_and(|label| states.get(label) == Some(&true)) =>
                {
                    format!("{}[x]{}{}", parsed.prefix, parsed.rest, cr)
                }
                _ => line.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_state_survives_time_update() {
        let previous = "**Date:** October 15, 2026\n\n- [x] Fajr: 5:00 AM\n- [ ] Dhuhr: 12:30 PM\n";
        let rendered = "**Date:** October 16, 2026\n\n- [ ] Fajr: 5:03 AM\n- [ ] Dhuhr: 12:31 PM\n";

        let merged = merge_checkbox_state(previous, rendered);

        assert_eq!(
            merged,
            "**Date:** October 16, 2026\n\n- [x] Fajr: 5:03 AM\n- [ ] Dhuhr: 12:31 PM\n"
        );
    }

    #[test]
    fn test_checked_in_new_render_is_never_unchecked() {
        let previous = "- [ ] Fajr: 5:00 AM\n- [ ] Dhuhr: 12:30 PM\n- [x] Asr: 3:10 PM\n";
        let rendered = "- [x] Fajr: 5:03 AM\n- [ ] Dhuhr: 12:31 PM\n- [ ] Asr: 3:09 PM\n";

        assert_eq!(
            merge_checkbox_state(previous, rendered),
            "- [x] Fajr: 5:03 AM\n- [ ] Dhuhr: 12:31 PM\n- [x] Asr: 3:09 PM\n"
        );
    }

    #[test]
    fn test_label_missing_from_previous_stays_unchecked() {
        let previous = "- [x] Fajr: 5:00 AM\n- [x] Dhuhr: 12:30 PM\n";
        let rendered = "- [ ] Fajr: 5:03 AM\n- [ ] Dhuhr: 12:31 PM\n- [ ] Isha: 8:12 PM\n";

        assert_eq!(
            merge_checkbox_state(previous, rendered),
            "- [x] Fajr: 5:03 AM\n- [x] Dhuhr: 12:31 PM\n- [ ] Isha: 8:12 PM\n"
        );
    }

    #[test]
    fn test_first_label_occurrence_wins() {
        let previous = "- [ ] Asr: 3:00 PM\n- [x] Asr: 3:00 PM\n";
        let states = checkbox_states(previous);
        assert_eq!(states.get("Asr"), Some(&false));
    }

    #[test]
    fn test_render_without_checklist_is_untouched() {
        let previous = "- [x] Fajr: 5:00 AM";
        let rendered = "| Fajr | 5:03 AM |";
        assert_eq!(merge_checkbox_state(previous, rendered), rendered);
    }

    #[test]
    fn test_label_drift_breaks_continuity() {
        let previous = "- [x] 🌅 Fajr: 5:00 AM";
        let rendered = "- [ ] Fajr: 5:03 AM";
        assert_eq!(merge_checkbox_state(previous, rendered), rendered);
    }

    #[test]
    fn test_uppercase_and_indented_markers() {
        let previous = "  * [X] Isha 8:10 PM";
        let rendered = "- [ ] Isha: 8:12 PM\n  - [ ] Isha: 8:12 PM";
        assert_eq!(
            merge_checkbox_state(previous, rendered),
            "- [x] Isha: 8:12 PM\n  - [x] Isha: 8:12 PM"
        );
    }

    #[test]
    fn test_crlf_lines_keep_their_endings() {
        let previous = "- [x] Fajr: 5:00 AM\r\n";
        let rendered = "- [ ] Fajr: 5:03 AM\r\n- [ ] Dhuhr: 12:31 PM\r\n";
        assert_eq!(
            merge_checkbox_state(previous, rendered),
            "- [x] Fajr: 5:03 AM\r\n- [ ] Dhuhr: 12:31 PM\r\n"
        );
    }
}

// File: src/paths.rs
//! Resolves the configured output location into a concrete note path.
use crate::error::{Error, Result};
use crate::render::dictionary::date_tokens;
use crate::render::token::substitute_pairs;
use chrono::NaiveDate;

pub const DEFAULT_DOCUMENT_STEM: &str = "Prayer Times";
pub const DOCUMENT_EXTENSION: &str = ".md";

/// Where this cycle writes. Vault-relative, `/`-separated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub path: String,
    /// Every parent directory, shallowest first ("Notes", "Notes/2026").
    pub ancestors: Vec<String>,
}

impl OutputTarget {
    /// Resolves `template` against `today`.
    ///
    /// `today` is the date at resolution time, not the feed's date: the two
    /// agree in normal operation but the path is settled before the fetch.
    pub fn resolve(template: &str, today: NaiveDate) -> Result<Self> {
        let trimmed = template.trim();
        let raw = if trimmed.is_empty() {
            DEFAULT_DOCUMENT_STEM.to_string()
        } else {
            let dates = date_tokens(today);
            let pairs: Vec<(&str, &str)> = dates.iter().map(|(k, v)| (*k, v.as_str())).collect();
            substitute_pairs(trimmed, &pairs).into_owned()
        };

        let normalized = raw.replace('\\', "/");
        let names_directory = normalized.ends_with('/');

        let mut segments: Vec<String> = Vec::new();
        for segment in normalized.split('/') {
            let segment = segment.trim();
            match segment {
                "" | "." => continue,
                ".." => {
                    return Err(Error::PathResolution {
                        path: template.to_string(),
                        reason: "'..' would leave the vault".to_string(),
                    });
                }
                _ => segments.push(segment.to_string()),
            }
        }

        if names_directory || segments.is_empty() {
            segments.push(DEFAULT_DOCUMENT_STEM.to_string());
        }

        // Non-empty: the default stem was pushed above if nothing else was.
        let file = segments.last_mut().ok_or_else(|| Error::PathResolution {
            path: template.to_string(),
            reason: "no file name".to_string(),
        })?;
        if !has_document_extension(file) {
            file.push_str(DOCUMENT_EXTENSION);
        }
        if file.len() == DOCUMENT_EXTENSION.len() {
            return Err(Error::PathResolution {
                path: template.to_string(),
                reason: "empty file name".to_string(),
            });
        }

        let ancestors = (1..segments.len())
            .map(|depth| segments[..depth].join("/"))
            .collect();

        Ok(Self {
            path: segments.join("/"),
            ancestors,
        })
    }

    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

fn has_document_extension(name: &str) -> bool {
    let ext = DOCUMENT_EXTENSION.len();
    name.len() >= ext
        && name.is_char_boundary(name.len() - ext)
        && name[name.len() - ext..].eq_ignore_ascii_case(DOCUMENT_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_blank_template_uses_default_name() {
        for template in ["", "   ", "\t\n"] {
            let target = OutputTarget::resolve(template, day(2026, 10, 15)).unwrap();
            assert_eq!(target.path, "Prayer Times.md");
            assert!(target.ancestors.is_empty());
        }
    }

    #[test]
    fn test_extension_appended_once() {
        let today = day(2026, 10, 15);
        assert_eq!(
            OutputTarget::resolve("Notes/Today", today).unwrap().path,
            "Notes/Today.md"
        );
        assert_eq!(OutputTarget::resolve("Today.md", today).unwrap().path, "Today.md");
        assert_eq!(OutputTarget::resolve("Today.MD", today).unwrap().path, "Today.MD");
    }

    #[test]
    fn test_date_tokens_and_ancestors() {
        let target = OutputTarget::resolve(
            "Journal/%YYYY%/%MM% %MMMM%/%YYYY%-%MM%-%DD% (%ddd%)",
            day(2026, 3, 7),
        )
        .unwrap();
        assert_eq!(target.path, "Journal/2026/03 March/2026-03-07 (Sat).md");
        assert_eq!(
            target.ancestors,
            vec!["Journal", "Journal/2026", "Journal/2026/03 March"]
        );
        assert_eq!(target.file_name(), "2026-03-07 (Sat).md");
    }

    #[test]
    fn test_same_day_is_stable_and_days_differ() {
        let a = OutputTarget::resolve("Daily/Prayers", day(2026, 10, 15)).unwrap();
        let b = OutputTarget::resolve("Daily/Prayers", day(2026, 10, 15)).unwrap();
        assert_eq!(a, b);

        let c = OutputTarget::resolve("%YYYY%-%MM%-%DD%", day(2026, 10, 15)).unwrap();
        let d = OutputTarget::resolve("%YYYY%-%MM%-%DD%", day(2026, 10, 16)).unwrap();
        assert_ne!(c.path, d.path);
    }

    #[test]
    fn test_separators_are_normalized() {
        let target = OutputTarget::resolve("/Notes\\\\Daily/./Today", day(2026, 1, 1)).unwrap();
        assert_eq!(target.path, "Notes/Daily/Today.md");

        let dir = OutputTarget::resolve("Notes/", day(2026, 1, 1)).unwrap();
        assert_eq!(dir.path, "Notes/Prayer Times.md");
    }

    #[test]
    fn test_parent_segments_are_rejected() {
        assert!(matches!(
            OutputTarget::resolve("../outside", day(2026, 1, 1)),
            Err(Error::PathResolution { .. })
        ));
        assert!(matches!(
            OutputTarget::resolve("Notes/.md", day(2026, 1, 1)),
            Err(Error::PathResolution { .. })
        ));
    }
}

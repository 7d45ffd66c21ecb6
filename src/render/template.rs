// File: ./src/render/template.rs
//! Two-level rendering: entry template per included entry, then the document.
//!
//! Tokens the dictionary does not define are left in the output verbatim, so a
//! typo in a custom template shows up in the note instead of failing the sync.
use crate::render::dictionary::{EntryTimes, PlaceholderDictionary};
use crate::render::preset::TemplatePair;
use crate::render::token::substitute;

/// Placeholder in the document template that receives the entry block.
pub const ENTRIES: &str = "%prayers%";

fn is_included(entry: &EntryTimes, included_labels: &[String]) -> bool {
    included_labels
        .iter()
        .any(|label| label.trim().eq_ignore_ascii_case(entry.label.trim()))
}

/// Renders one line per included entry, in feed order, joined by `\n`.
pub fn render_entries(
    entry_template: &str,
    dict: &PlaceholderDictionary,
    included_labels: &[String],
) -> String {
    dict.entries()
        .iter()
        .filter(|entry| is_included(entry, included_labels))
        .map(|entry| {
            let scoped = entry.tokens();
            substitute(entry_template, |t| {
                scoped
                    .iter()
                    .find(|(token, _)| *token == t)
                    .map(|(_, value)| *value)
                    .or_else(|| dict.get(t))
            })
            .into_owned()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders the full document: entry block into `%prayers%`, globals elsewhere.
/// The entry block is inserted as finished text and not scanned again.
pub fn render_document(
    templates: &TemplatePair,
    dict: &PlaceholderDictionary,
    included_labels: &[String],
) -> String {
    let block = render_entries(&templates.entry, dict, included_labels);
    substitute(&templates.document, |t| {
        if t == ENTRIES {
            Some(block.as_str())
        } else {
            dict.get(t)
        }
    })
    .into_owned()
}

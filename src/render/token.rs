// File: ./src/render/token.rs
//! The one substitution primitive shared by every renderer.
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Sentinel wrapped around every placeholder name.
pub const DELIMITER: char = '%';

// A candidate placeholder at the start of the haystack: `%name%`.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^%[^%\s]+%").expect("token regex"));

/// Builds `%name%` from a bare placeholder name.
pub fn token(name: &str) -> String {
    format!("{DELIMITER}{name}{DELIMITER}")
}

/// Replaces placeholders in `text` with whatever `lookup` returns for them.
///
/// One left-to-right pass: inserted values are never scanned again, so a `%`
/// or a whole `%token%` inside a value (a city name, say) reaches the output
/// literally. `lookup` receives the token with its delimiters. Tokens it does
/// not know stay verbatim, and their closing `%` may still open the next token.
pub fn substitute<'v, F>(text: &str, lookup: F) -> Cow<'_, str>
where
    F: Fn(&str) -> Option<&'v str>,
{
    if !text.contains(DELIMITER) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(DELIMITER) {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match TOKEN_RE
            .find(tail)
            .and_then(|m| lookup(m.as_str()).map(|value| (m.end(), value)))
        {
            Some((end, value)) => {
                out.push_str(value);
                rest = &tail[end..];
            }
            None => {
                out.push(DELIMITER);
                rest = &tail[DELIMITER.len_utf8()..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// [`substitute`] against a fixed list of `(token, value)` pairs.
pub fn substitute_pairs<'a>(text: &'a str, pairs: &[(&str, &str)]) -> Cow<'a, str> {
    substitute(text, |t| {
        pairs
            .iter()
            .find(|(token, _)| *token == t)
            .map(|(_, value)| *value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_every_occurrence() {
        assert_eq!(
            substitute_pairs("%city% and %city% again", &[("%city%", "Oslo")]),
            "Oslo and Oslo again"
        );
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let text = "a %x.y% b %xzy% c";
        assert_eq!(substitute_pairs(text, &[("%x.y%", "1")]), "a 1 b %xzy% c");
        assert_eq!(
            substitute_pairs("(%a+b%)", &[("%a+b%", "$0 ${1}")]),
            "($0 ${1})"
        );
    }

    #[test]
    fn test_inserted_values_are_not_rescanned() {
        let pairs = [("%city%", "Site %date% 100%"), ("%date%", "today")];
        assert_eq!(
            substitute_pairs("%city% on %date%", &pairs),
            "Site %date% 100% on today"
        );
    }

    #[test]
    fn test_unknown_token_does_not_swallow_next() {
        let pairs = [("%fajr%", "5:12 AM")];
        assert_eq!(substitute_pairs("%nope%fajr%", &pairs), "%nope5:12 AM");
        assert_eq!(substitute_pairs("50% at %fajr%", &pairs), "50% at 5:12 AM");
        assert_eq!(substitute_pairs("%fajr%%fajr%", &pairs), "5:12 AM5:12 AM");
    }

    #[test]
    fn test_text_without_delimiter_borrows() {
        assert!(matches!(
            substitute_pairs("nothing here", &[("%fajr%", "5:00 AM")]),
            Cow::Borrowed(_)
        ));
    }
}

//! # Built-in Plugins
//!
//! Small plugins covering the common block decorations. Each constructor
//! returns a fresh [`Plugin`](crate::plugin::Plugin) with its own identity, so
//! two instances never see each other's data.
//!
//! ## Modules
//!
//! - **`text_markers`**: `{1,3-4}` line ranges and `"term"` highlights from the meta string
//! - **`frames`**: `title="..."` captions and the surrounding figure markup
//! - **`line_numbers`**: a gutter number in front of every rendered line

pub mod frames;
pub mod line_numbers;
pub mod text_markers;

pub use frames::frames;
pub use line_numbers::line_numbers;
pub use text_markers::text_markers;

use std::sync::LazyLock;

use regex::{Captures, Regex};

// Quoted values are consumed whole, so braces or quotes inside them never
// start a token of their own.
static META_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?P<key>[\w-]+)="(?P<value>(?:[^"\\]|\\.)*)"|"(?P<quoted>(?:[^"\\]|\\.)*)"|\{(?P<braced>[^}]*)\}|\S+"#,
    )
    .unwrap_or_else(|e| panic!("invalid meta token pattern: {e}"))
});

/// One token of a block's meta string. Quoted contents are still escaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MetaToken<'a> {
    /// `key="value"`
    Attribute { key: &'a str, value: &'a str },
    /// A bare `"string"`.
    Quoted(&'a str),
    /// The inside of `{...}`.
    Braced(&'a str),
    /// Anything else, kept as written unless taken.
    Word,
}

impl<'a> MetaToken<'a> {
    fn from_captures(caps: &Captures<'a>) -> Option<Self> {
        if let (Some(key), Some(value)) = (caps.name("key"), caps.name("value")) {
            return Some(MetaToken::Attribute {
                key: key.as_str(),
                value: value.as_str(),
            });
        }
        if let Some(quoted) = caps.name("quoted") {
            return Some(MetaToken::Quoted(quoted.as_str()));
        }
        if let Some(braced) = caps.name("braced") {
            return Some(MetaToken::Braced(braced.as_str()));
        }
        caps.get(0).map(|_| MetaToken::Word)
    }
}

/// Splits `meta` into tokens and removes every token `take` returns a value
/// for.
///
/// Returns the remaining tokens joined with single spaces, together with the
/// taken values in meta order.
pub(crate) fn take_from_meta<'a, T>(
    meta: &'a str,
    mut take: impl FnMut(MetaToken<'a>) -> Option<T>,
) -> (String, Vec<T>) {
    let mut values = Vec::new();
    let mut kept = Vec::new();
    for caps in META_TOKEN.captures_iter(meta) {
        let (Some(whole), Some(token)) = (caps.get(0), MetaToken::from_captures(&caps)) else {
            continue;
        };
        match take(token) {
            Some(value) => values.push(value),
            None => kept.push(whole.as_str()),
        }
    }
    (kept.join(" "), values)
}

/// Undoes `\"` and `\\` escapes of a quoted meta value.
pub(crate) fn unescape_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some(next @ ('"' | '\\')) => out.push(next),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            },
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn braced(token: MetaToken<'_>) -> Option<String> {
        match token {
            MetaToken::Braced(inner) => Some(inner.to_string()),
            _ => None,
        }
    }

    #[test]
    fn take_from_meta_strips_matches_and_tidies_spacing() {
        let (rest, values) = take_from_meta("{1} title=\"x\"   {2-3} wrap", braced);

        assert_eq!(rest, "title=\"x\" wrap");
        assert_eq!(values, vec!["1", "2-3"]);
    }

    #[test]
    fn take_from_meta_leaves_quoted_values_alone() {
        let (rest, values) = take_from_meta(r#"title="see {2}" "a {3} b" {4}"#, braced);

        assert_eq!(values, vec!["4"]);
        assert_eq!(rest, r#"title="see {2}" "a {3} b""#);
    }

    #[test]
    fn meta_tokens_are_classified() {
        let mut tokens = Vec::new();
        take_from_meta(r#"title="a \"b\"" "term" {1, 2} wrap x{3}"#, |token| {
            tokens.push(token);
            None::<()>
        });

        assert_eq!(
            tokens,
            vec![
                MetaToken::Attribute {
                    key: "title",
                    value: r#"a \"b\""#,
                },
                MetaToken::Quoted("term"),
                MetaToken::Braced("1, 2"),
                MetaToken::Word,
                MetaToken::Word,
            ]
        );
    }

    #[test]
    fn take_from_meta_without_matches_keeps_tokens() {
        let (rest, values) = take_from_meta(" plain  meta ", braced);

        assert_eq!(rest, "plain meta");
        assert!(values.is_empty());
    }

    #[test]
    fn unescape_handles_quotes_and_backslashes() {
        assert_eq!(unescape_quoted(r#"say \"hi\""#), r#"say "hi""#);
        assert_eq!(unescape_quoted(r"a\\b\n"), r"a\b\n");
    }
}

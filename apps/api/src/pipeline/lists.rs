use std::collections::BTreeSet;

use serde::Serialize;

/// Separator used by a delimiter-joined form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Delimiter {
    /// Skills, tags.
    Comma,
    /// Experience bullets and achievements, which may contain commas themselves.
    Semicolon,
}

impl Delimiter {
    pub fn as_char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Semicolon => ';',
        }
    }
}

/// Splits `raw` on `delimiter`, trimming every piece and dropping empty ones.
/// Order is kept and duplicates pass through.
pub fn parse_list(raw: &str, delimiter: Delimiter) -> Vec<String> {
    raw.split(delimiter.as_char())
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/// Sorted union of `items` with duplicates removed.
pub fn sorted_unique<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

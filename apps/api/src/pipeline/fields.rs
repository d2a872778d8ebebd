//! Default-or-value access to raw form fields.

use crate::pipeline::lists::{parse_list, Delimiter};

/// Trims `raw` and falls back to `default` when nothing is left.
pub fn normalize(raw: Option<&str>, default: &str) -> String {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => default.to_string(),
    }
}

/// A possibly-absent raw form value.
///
/// Every read of a submission goes through this accessor so trimming and
/// default substitution behave the same for scalars, lists and group fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Field<'a>(Option<&'a str>);

impl<'a> Field<'a> {
    pub fn new(raw: Option<&'a str>) -> Self {
        Self(raw)
    }

    /// The trimmed value, `""` when absent.
    pub fn trimmed(&self) -> &'a str {
        self.0.map(str::trim).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.trimmed().is_empty()
    }

    pub fn or(&self, default: &str) -> String {
        normalize(self.0, default)
    }

    /// Like [`Field::or`], for defaults that are built per call (`"Project 3"`).
    pub fn or_else(&self, default: impl FnOnce() -> String) -> String {
        if self.is_empty() {
            default()
        } else {
            self.trimmed().to_string()
        }
    }

    /// `None` for empty values; used for links the templates hide when unset.
    pub fn optional(&self) -> Option<String> {
        (!self.is_empty()).then(|| self.trimmed().to_string())
    }

    pub fn list(&self, delimiter: Delimiter) -> Vec<String> {
        parse_list(self.trimmed(), delimiter)
    }

    /// The list, or `fallback` when it parses to nothing.
    pub fn list_or(&self, delimiter: Delimiter, fallback: &[&str]) -> Vec<String> {
        let items = self.list(delimiter);
        if items.is_empty() {
            fallback.iter().map(|s| s.to_string()).collect()
        } else {
            items
        }
    }
}

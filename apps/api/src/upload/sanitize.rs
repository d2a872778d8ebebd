//! Filesystem-safe names for uploaded files.

use unicode_normalization::UnicodeNormalization;

/// Names Windows refuses as file stems.
const RESERVED_STEMS: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Reduces a client-supplied file name to a safe single path component.
///
/// - Only the last path component is kept (`../../me.png` → `me.png`).
/// - Accents are decomposed and the remaining non-ASCII dropped.
/// - Whitespace runs become `_`; anything outside `[A-Za-z0-9_.-]` is removed.
/// - Leading and trailing `.` / `_` are stripped, so no hidden or dot-only names.
///
/// Returns `None` when nothing usable remains.
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();

    let ascii: String = base.nfkd().filter(char::is_ascii).collect();
    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');

    if trimmed.is_empty() {
        return None;
    }

    let stem = trimmed.split('.').next().unwrap_or_default();
    if RESERVED_STEMS.contains(&stem.to_ascii_uppercase().as_str()) {
        return Some(format!("_{trimmed}"));
    }
    Some(trimmed.to_string())
}

/// Lowercased text after the last `.`, or `None` for names without one.
pub fn extension(name: &str) -> Option<String> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Splits `photo.tar.gz` into `("photo.tar", ".gz")`; `("README", "")` without one.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) if pos > 0 => name.split_at(pos),
        _ => (name, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_name_is_unchanged() {
        assert_eq!(sanitize_filename("photo.jpg").as_deref(), Some("photo.jpg"));
    }

    #[test]
    fn test_path_components_are_stripped() {
        assert_eq!(sanitize_filename("../../etc/me.png").as_deref(), Some("me.png"));
        assert_eq!(sanitize_filename(r"C:\Users\me\avatar.gif").as_deref(), Some("avatar.gif"));
    }

    #[test]
    fn test_whitespace_and_unsafe_characters() {
        assert_eq!(
            sanitize_filename("my  profile (1)?.PNG").as_deref(),
            Some("my_profile_1.PNG")
        );
    }

    #[test]
    fn test_accents_are_transliterated() {
        assert_eq!(sanitize_filename("résumé.webp").as_deref(), Some("resume.webp"));
    }

    #[test]
    fn test_hidden_and_empty_names() {
        assert_eq!(sanitize_filename(".bashrc.png").as_deref(), Some("bashrc.png"));
        assert_eq!(sanitize_filename("../"), None);
        assert_eq!(sanitize_filename("照片"), None);
    }

    #[test]
    fn test_reserved_stem_is_prefixed() {
        assert_eq!(sanitize_filename("con.jpg").as_deref(), Some("_con.jpg"));
        assert_eq!(sanitize_filename("com9.png").as_deref(), Some("_com9.png"));
        assert_eq!(sanitize_filename("LPT7.gif").as_deref(), Some("_LPT7.gif"));
        assert_eq!(sanitize_filename("com10.png").as_deref(), Some("com10.png"));
    }

    #[test]
    fn test_extension() {
        assert_eq!(extension("Me.JPEG").as_deref(), Some("jpeg"));
        assert_eq!(extension("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(extension("noext"), None);
        assert_eq!(extension("trailing."), None);
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("photo.jpg"), ("photo", ".jpg"));
        assert_eq!(split_extension("photo"), ("photo", ""));
    }
}

//! Destination file names for materialized copies.

/// Name used when neither the provider nor the reference yield anything usable.
pub const DEFAULT_NAME: &str = "document.bin";

use super::STAGING_SUFFIX;

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;
/// Longest name whose staging file (`<name>.part`) still fits in NAME_MAX.
pub const MAX_NAME_BYTES: usize = NAME_MAX - STAGING_SUFFIX.len();
/// Extensions up to this many bytes (dot included) survive truncation.
const MAX_KEPT_EXTENSION: usize = 16;

/// Makes a provider-supplied display name safe to use as a single path component.
///
/// - Replaces NUL, `/`, `\`, and control characters with `_`
/// - Trims leading/trailing spaces and dots
/// - Limits length to `MAX_NAME_BYTES`, keeping a short extension
///
/// Spaces inside the name are kept; display names are shown to users.
pub fn sanitize_display_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if c == '\0' || c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    let trimmed = replaced.trim_matches(|c: char| c == ' ' || c == '.');

    if trimmed.len() <= MAX_NAME_BYTES {
        return trimmed.to_string();
    }
    let (stem, ext) = match trimmed.rfind('.') {
        Some(i) if i > 0 && trimmed.len() - i <= MAX_KEPT_EXTENSION => trimmed.split_at(i),
        _ => (trimmed, ""),
    };
    let stem = cut_to(stem, MAX_NAME_BYTES - ext.len()).trim_end_matches(|c: char| c == ' ' || c == '.');
    format!("{stem}{ext}")
}

/// Longest prefix of `s` of at most `max` bytes ending on a char boundary.
fn cut_to(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut take = max;
    while take > 0 && !s.is_char_boundary(take) {
        take -= 1;
    }
    &s[..take]
}

/// Picks the destination name: the provider's display name when usable,
/// else the reference's last path segment, else `DEFAULT_NAME`.
pub fn destination_name(display_name: Option<&str>, last_segment: Option<&str>) -> String {
    [display_name, last_segment]
        .into_iter()
        .flatten()
        .map(sanitize_display_name)
        .find(|n| !n.is_empty())
        .unwrap_or_else(|| DEFAULT_NAME.to_string())
}

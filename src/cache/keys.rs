/*!
 * Cache key normalization.
 *
 * Logically identical requests must collide: terms are trimmed and
 * lower-cased, and absent or blank fields are replaced by explicit defaults
 * before the key is formatted.
 */

pub const DEFAULT_VIDEO_ID: &str = "default";
pub const DEFAULT_SOURCE_LANGUAGE: &str = "en";
pub const DEFAULT_TARGET_LANGUAGE: &str = "zh";

/// Trimmed value, or `default` when absent or blank
pub fn or_default<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => default,
    }
}

/// Key of a subtitle set; the target defaults to empty
pub fn subtitle_key(video_id: Option<&str>, source_lang: Option<&str>, target_lang: Option<&str>) -> String {
    format!(
        "{}:{}:{}",
        or_default(video_id, DEFAULT_VIDEO_ID),
        or_default(source_lang, DEFAULT_SOURCE_LANGUAGE),
        or_default(target_lang, ""),
    )
}

/// Key of a translation map
pub fn translation_key(video_id: Option<&str>, source_lang: Option<&str>, target_lang: Option<&str>) -> String {
    format!(
        "{}:{}:{}",
        or_default(video_id, DEFAULT_VIDEO_ID),
        or_default(source_lang, DEFAULT_SOURCE_LANGUAGE),
        or_default(target_lang, DEFAULT_TARGET_LANGUAGE),
    )
}

/// Key of a dictionary entry; the term is case-insensitive
pub fn dictionary_key(term: &str, source_lang: Option<&str>, target_lang: Option<&str>) -> String {
    format!(
        "{}:{}:{}",
        term.trim().to_lowercase(),
        or_default(source_lang, DEFAULT_SOURCE_LANGUAGE),
        or_default(target_lang, DEFAULT_TARGET_LANGUAGE),
    )
}
